/*
 * Dialog adapter for desktops where the `zenity` program provides the
 * dialogs (Linux and the BSDs).
 *
 * Options are translated into zenity's command-line flags, the program is run
 * to completion, and its stdout and exit status are mapped back: exit 0 with
 * the answer on stdout confirms, exit 1 cancels (or reports the extra button,
 * whose label zenity prints), anything else is a failure.
 */
#![cfg_attr(any(target_os = "windows", target_os = "macos"), allow(dead_code))]

use super::subprocess::{self, strip_line_break};
use super::{DialogOperations, MessageKind};
use crate::core::{MessageReply, Options, RawOutcome, Rgb};
use std::path::{Path, PathBuf};

const DEFAULT_PROGRAM: &str = "zenity";

// Record separator for multi-select output; cannot appear in a file name typed by a user.
pub(crate) const MULTI_SEPARATOR: &str = "\u{1e}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileMode {
    Open,
    Save,
    Directory,
}

pub(crate) fn file_selection_args(opts: &Options, mode: FileMode) -> Vec<String> {
    let mut args = vec!["--file-selection".to_string()];
    if mode == FileMode::Save {
        args.push("--save".to_string());
        if opts.confirm_overwrite {
            args.push("--confirm-overwrite".to_string());
        }
    }
    if mode == FileMode::Directory || opts.directory {
        args.push("--directory".to_string());
    }
    if opts.multiple_selection {
        args.push("--multiple".to_string());
        args.push(format!("--separator={MULTI_SEPARATOR}"));
    }
    if let Some(title) = &opts.title {
        args.push(format!("--title={title}"));
    }
    if let Some(filename) = &opts.filename {
        args.push(format!("--filename={filename}"));
    }
    for filter in &opts.file_filters {
        args.push(format!("--file-filter={}", filter.to_zenity_spec()));
    }
    args
}

pub(crate) fn message_args(kind: MessageKind, text: &str, opts: &Options) -> Vec<String> {
    let flag = match kind {
        MessageKind::Error => "--error",
        MessageKind::Warning => "--warning",
        MessageKind::Info | MessageKind::Plain => "--info",
        MessageKind::Question => "--question",
    };
    let mut args = vec![flag.to_string(), format!("--text={text}")];
    if let Some(title) = &opts.title {
        args.push(format!("--title={title}"));
    }
    if let Some(icon) = opts.icon {
        args.push(format!("--icon-name={}", icon.freedesktop_name()));
    }
    if let Some(label) = &opts.ok_label {
        args.push(format!("--ok-label={label}"));
    }
    if kind == MessageKind::Question {
        if let Some(label) = &opts.cancel_label {
            args.push(format!("--cancel-label={label}"));
        }
        if opts.default_cancel {
            args.push("--default-cancel".to_string());
        }
    }
    if let Some(label) = &opts.extra_button {
        args.push(format!("--extra-button={label}"));
    }
    if opts.no_wrap {
        args.push("--no-wrap".to_string());
    }
    if opts.ellipsize {
        args.push("--ellipsize".to_string());
    }
    args
}

pub(crate) fn color_args(opts: &Options) -> Vec<String> {
    let mut args = vec!["--color-selection".to_string()];
    if let Some(title) = &opts.title {
        args.push(format!("--title={title}"));
    }
    if let Some(color) = opts.color {
        args.push(format!("--color={color}"));
    }
    if opts.show_palette {
        args.push("--show-palette".to_string());
    }
    args
}

// An empty answer carries no path, so it is treated like a cancellation.
pub(crate) fn parse_single_path(stdout: String) -> RawOutcome<PathBuf> {
    match strip_line_break(&stdout) {
        "" => RawOutcome::Cancelled,
        path => RawOutcome::Confirmed(PathBuf::from(path)),
    }
}

pub(crate) fn parse_multiple_paths(stdout: String) -> RawOutcome<Vec<PathBuf>> {
    match strip_line_break(&stdout) {
        "" => RawOutcome::Cancelled,
        paths => RawOutcome::Confirmed(paths.split(MULTI_SEPARATOR).map(PathBuf::from).collect()),
    }
}

/*
 * zenity exits with 1 for Cancel, No, closing the window, and the extra
 * button; only the extra button writes its label to stdout.
 */
pub(crate) fn message_reply(output: subprocess::ProcessOutput, opts: &Options) -> RawOutcome<MessageReply> {
    if output.status == Some(1) {
        if let Some(extra) = &opts.extra_button {
            let printed = String::from_utf8_lossy(&output.stdout);
            if strip_line_break(&printed) == extra {
                return RawOutcome::Confirmed(MessageReply::ExtraButton);
            }
        }
    }
    output.into_outcome().map(|_| MessageReply::Ok)
}

pub(crate) struct ZenityDialogs {}

impl ZenityDialogs {
    pub fn new() -> Self {
        ZenityDialogs {}
    }

    fn program(opts: &Options) -> &Path {
        opts.program
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_PROGRAM))
    }

    fn run_text(&self, opts: &Options, args: Vec<String>) -> RawOutcome<String> {
        log::trace!("ZenityDialogs: Running with args {:?}", args);
        match subprocess::run(Self::program(opts), &args, opts.context.as_ref()) {
            Ok(output) => output.into_outcome(),
            Err(e) => {
                log::error!("ZenityDialogs: Failed to run zenity: {e}");
                RawOutcome::Failed(e)
            }
        }
    }

    fn pick_single(&self, opts: &Options, mode: FileMode) -> RawOutcome<PathBuf> {
        let mut opts = opts.clone();
        opts.multiple_selection = false;
        match self.run_text(&opts, file_selection_args(&opts, mode)) {
            RawOutcome::Confirmed(stdout) => parse_single_path(stdout),
            RawOutcome::Cancelled => RawOutcome::Cancelled,
            RawOutcome::Failed(e) => RawOutcome::Failed(e),
        }
    }
}

impl Default for ZenityDialogs {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogOperations for ZenityDialogs {
    fn select_file(&self, opts: &Options) -> RawOutcome<PathBuf> {
        self.pick_single(opts, FileMode::Open)
    }

    fn select_file_save(&self, opts: &Options) -> RawOutcome<PathBuf> {
        self.pick_single(opts, FileMode::Save)
    }

    fn select_file_multiple(&self, opts: &Options) -> RawOutcome<Vec<PathBuf>> {
        let mut opts = opts.clone();
        opts.multiple_selection = true;
        match self.run_text(&opts, file_selection_args(&opts, FileMode::Open)) {
            RawOutcome::Confirmed(stdout) => parse_multiple_paths(stdout),
            RawOutcome::Cancelled => RawOutcome::Cancelled,
            RawOutcome::Failed(e) => RawOutcome::Failed(e),
        }
    }

    fn select_directory(&self, opts: &Options) -> RawOutcome<PathBuf> {
        self.pick_single(opts, FileMode::Directory)
    }

    fn select_color(&self, opts: &Options) -> RawOutcome<Rgb> {
        self.run_text(opts, color_args(opts))
            .and_then(|stdout| strip_line_break(&stdout).parse::<Rgb>())
    }

    fn show_message(&self, kind: MessageKind, text: &str, opts: &Options) -> RawOutcome<MessageReply> {
        let args = message_args(kind, text, opts);
        log::trace!("ZenityDialogs: Running with args {:?}", args);
        match subprocess::run(Self::program(opts), &args, opts.context.as_ref()) {
            Ok(output) => message_reply(output, opts),
            Err(e) => {
                log::error!("ZenityDialogs: Failed to run zenity: {e}");
                RawOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{self as opt, DialogIcon};
    use crate::core::{DialogError, FileFilter, FileFilters};

    #[test]
    fn test_open_args_with_title_filename_and_filters() {
        let opts = Options::apply([
            opt::title("Open log"),
            opt::filename("/var/log/"),
            FileFilters::from(vec![
                FileFilter::new("Logs", ["*.log", "*.txt"]),
                FileFilter::new("", ["*"]),
            ])
            .build(),
        ]);
        assert_eq!(
            file_selection_args(&opts, FileMode::Open),
            vec![
                "--file-selection",
                "--title=Open log",
                "--filename=/var/log/",
                "--file-filter=Logs | *.log *.txt",
                "--file-filter=*",
            ]
        );
    }

    #[test]
    fn test_save_args_honor_confirm_overwrite() {
        let opts = Options::apply([opt::confirm_overwrite()]);
        assert_eq!(
            file_selection_args(&opts, FileMode::Save),
            vec!["--file-selection", "--save", "--confirm-overwrite"]
        );
    }

    #[test]
    fn test_directory_flag_and_directory_mode_add_directory_once() {
        let opts = Options::apply([opt::directory()]);
        let args = file_selection_args(&opts, FileMode::Directory);
        assert_eq!(args.iter().filter(|a| *a == "--directory").count(), 1);
        assert!(file_selection_args(&opts, FileMode::Open).contains(&"--directory".to_string()));
    }

    #[test]
    fn test_multiple_args_request_separator() {
        let mut opts = Options::default();
        opts.multiple_selection = true;
        let args = file_selection_args(&opts, FileMode::Open);
        assert!(args.contains(&"--multiple".to_string()));
        assert!(args.contains(&format!("--separator={MULTI_SEPARATOR}")));
    }

    #[test]
    fn test_explicit_empty_title_is_passed_through() {
        let opts = Options::apply([opt::title("")]);
        assert!(file_selection_args(&opts, FileMode::Open).contains(&"--title=".to_string()));
        assert!(!file_selection_args(&Options::default(), FileMode::Open)
            .iter()
            .any(|a| a.starts_with("--title")));
    }

    #[test]
    fn test_question_args_include_all_button_options() {
        let opts = Options::apply([
            opt::icon(DialogIcon::Warning),
            opt::ok_label("Yes"),
            opt::cancel_label("No"),
            opt::extra_button("Maybe"),
            opt::default_cancel(),
            opt::no_wrap(),
            opt::ellipsize(),
        ]);
        assert_eq!(
            message_args(MessageKind::Question, "Proceed?", &opts),
            vec![
                "--question",
                "--text=Proceed?",
                "--icon-name=dialog-warning",
                "--ok-label=Yes",
                "--cancel-label=No",
                "--default-cancel",
                "--extra-button=Maybe",
                "--no-wrap",
                "--ellipsize",
            ]
        );
    }

    #[test]
    fn test_info_args_skip_question_only_options() {
        let opts = Options::apply([opt::cancel_label("No"), opt::default_cancel()]);
        assert_eq!(
            message_args(MessageKind::Error, "Boom", &opts),
            vec!["--error", "--text=Boom"]
        );
        assert_eq!(message_args(MessageKind::Plain, "Hi", &opts)[0], "--info");
    }

    #[test]
    fn test_color_args() {
        let opts = Options::apply([opt::color(Rgb::new(1, 2, 3)), opt::show_palette()]);
        assert_eq!(
            color_args(&opts),
            vec!["--color-selection", "--color=rgb(1,2,3)", "--show-palette"]
        );
    }

    #[test]
    fn test_parse_paths() {
        assert!(matches!(parse_single_path("\n".into()), RawOutcome::Cancelled));
        match parse_single_path("/home/u/a b.txt\n".into()) {
            RawOutcome::Confirmed(p) => assert_eq!(p, PathBuf::from("/home/u/a b.txt")),
            other => panic!("unexpected {other:?}"),
        }
        match parse_multiple_paths(format!("/a{MULTI_SEPARATOR}/b|c\n")) {
            RawOutcome::Confirmed(p) => {
                assert_eq!(p, vec![PathBuf::from("/a"), PathBuf::from("/b|c")])
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse_multiple_paths("/only\n".into()) {
            RawOutcome::Confirmed(p) => assert_eq!(p, vec![PathBuf::from("/only")]),
            other => panic!("unexpected {other:?}"),
        }
    }

    fn exit(status: i32, stdout: &str) -> subprocess::ProcessOutput {
        subprocess::ProcessOutput {
            status: Some(status),
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
        }
    }

    #[test]
    fn test_message_reply_mapping() {
        let opts = Options::apply([opt::extra_button("Later")]);
        assert!(matches!(
            message_reply(exit(0, ""), &opts),
            RawOutcome::Confirmed(MessageReply::Ok)
        ));
        assert!(matches!(
            message_reply(exit(1, "Later\n"), &opts),
            RawOutcome::Confirmed(MessageReply::ExtraButton)
        ));
        assert!(matches!(message_reply(exit(1, ""), &opts), RawOutcome::Cancelled));
        assert!(matches!(
            message_reply(exit(1, "Later\n"), &Options::default()),
            RawOutcome::Cancelled
        ));
        assert!(matches!(
            message_reply(exit(5, ""), &opts),
            RawOutcome::Failed(DialogError::Subprocess { status: Some(5), .. })
        ));
    }
}
