/*
 * Dialog adapter for macOS, driven through `osascript` in JavaScript mode.
 *
 * Each call serializes a small request (operation, prompt, location, ...) to
 * JSON with serde and embeds it in a fixed JXA script that invokes the
 * matching Standard Additions command. The user cancelling raises error -128
 * inside the script, which makes osascript exit with status 1. Otherwise the
 * answer is printed on stdout followed by a line break: one path, or several
 * paths separated by NUL characters.
 *
 * Filter names are not transferred: the chooser only accepts a flat list of
 * types, so all patterns of all filters are flattened into one list.
 */
#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

use super::subprocess::{self, strip_line_break};
use super::{DialogOperations, MessageKind};
use crate::core::file_filter::apple_patterns;
use crate::core::path_utils::split_dir_and_name;
use crate::core::{DialogError, DialogIcon, MessageReply, Options, RawOutcome, Result, Rgb};
use serde::Serialize;
use std::path::{Path, PathBuf};

const DEFAULT_PROGRAM: &str = "osascript";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum FileOperation {
    ChooseFile,
    ChooseFileName,
    ChooseFolder,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileRequest {
    pub operation: FileOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub multiple: bool,
    pub invisibles: bool,
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

impl FileRequest {
    pub(crate) fn new(operation: FileOperation, opts: &Options) -> Self {
        let (location, name) = match (&opts.filename, operation) {
            (Some(filename), FileOperation::ChooseFileName) => {
                let (dir, name) = split_dir_and_name(filename);
                (non_empty(dir), non_empty(name))
            }
            (Some(filename), _) => (non_empty(filename), None),
            (None, _) => (None, None),
        };
        let types = if operation == FileOperation::ChooseFile {
            apple_patterns(&opts.file_filters)
        } else {
            Vec::new()
        };
        FileRequest {
            operation,
            prompt: opts.title.clone(),
            location,
            name,
            multiple: opts.multiple_selection && operation != FileOperation::ChooseFileName,
            invisibles: opts.show_hidden && operation != FileOperation::ChooseFileName,
            types,
        }
    }
}

// The `directory` option turns every file chooser into a folder chooser.
pub(crate) fn file_operation(opts: &Options, requested: FileOperation) -> FileOperation {
    if opts.directory {
        FileOperation::ChooseFolder
    } else {
        requested
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessageRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    pub buttons: Vec<String>,
    pub default_button: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_button: Option<String>,
}

impl MessageRequest {
    /*
     * Buttons are laid out left to right as [extra, cancel, ok]; the cancel
     * button only exists for questions. The icon comes from the options, or
     * from the message kind when none was given.
     */
    pub(crate) fn new(kind: MessageKind, text: &str, opts: &Options) -> Self {
        let ok = opts.ok_label.clone().unwrap_or_else(|| "OK".to_string());
        let cancel = (kind == MessageKind::Question)
            .then(|| opts.cancel_label.clone().unwrap_or_else(|| "Cancel".to_string()));

        let mut buttons = Vec::new();
        if let Some(extra) = &opts.extra_button {
            buttons.push(extra.clone());
        }
        if let Some(cancel) = &cancel {
            buttons.push(cancel.clone());
        }
        buttons.push(ok.clone());

        let default_button = match (&cancel, opts.default_cancel) {
            (Some(cancel), true) => cancel.clone(),
            _ => ok,
        };
        let icon = opts.icon.or(match kind {
            MessageKind::Error => Some(DialogIcon::Error),
            MessageKind::Warning => Some(DialogIcon::Warning),
            MessageKind::Info => Some(DialogIcon::Info),
            MessageKind::Question => Some(DialogIcon::Question),
            MessageKind::Plain => None,
        });
        MessageRequest {
            text: text.to_string(),
            title: opts.title.clone(),
            icon: icon.map(apple_icon),
            buttons,
            default_button,
            cancel_button: cancel,
        }
    }
}

fn apple_icon(icon: DialogIcon) -> &'static str {
    match icon {
        DialogIcon::Error => "stop",
        DialogIcon::Warning => "caution",
        DialogIcon::Info | DialogIcon::Question => "note",
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ColorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_color: Option<[f64; 3]>,
}

const SCRIPT_PRELUDE: &str = "var app = Application.currentApplication();
app.includeStandardAdditions = true;
app.activate();
";

const FILE_SCRIPT: &str = "var args = {};
if (req.prompt !== undefined) args.withPrompt = req.prompt;
if (req.location !== undefined) args.defaultLocation = Path(req.location);
if (req.name !== undefined) args.defaultName = req.name;
if (req.type !== undefined) args.ofType = req.type;
if (req.multiple) args.multipleSelectionsAllowed = true;
if (req.invisibles) args.invisibles = true;
var res = app[req.operation](args);
Array.isArray(res) ? res.map(String).join('\\0') : String(res);
";

const MESSAGE_SCRIPT: &str = "var args = {buttons: req.buttons, defaultButton: req.defaultButton};
if (req.title !== undefined) args.withTitle = req.title;
if (req.icon !== undefined) args.withIcon = req.icon;
if (req.cancelButton !== undefined) args.cancelButton = req.cancelButton;
app.displayDialog(req.text, args).buttonReturned;
";

const COLOR_SCRIPT: &str = "var args = {};
if (req.defaultColor !== undefined) args.defaultColor = req.defaultColor;
app.chooseColor(args).join(',');
";

// Embeds the JSON request as a JavaScript object literal in front of `body`.
pub(crate) fn build_script<T: Serialize>(request: &T, body: &str) -> Result<String> {
    let json = serde_json::to_string(request)
        .map_err(|e| DialogError::Decode(format!("cannot encode dialog request: {e}")))?;
    Ok(format!("{SCRIPT_PRELUDE}var req = {json};\n{body}"))
}

pub(crate) fn parse_single_path(stdout: String) -> RawOutcome<PathBuf> {
    match strip_line_break(&stdout) {
        "" => RawOutcome::Cancelled,
        path => RawOutcome::Confirmed(PathBuf::from(path)),
    }
}

pub(crate) fn parse_multiple_paths(stdout: String) -> RawOutcome<Vec<PathBuf>> {
    match strip_line_break(&stdout) {
        "" => RawOutcome::Cancelled,
        paths => RawOutcome::Confirmed(paths.split('\0').map(PathBuf::from).collect()),
    }
}

pub(crate) fn parse_color(stdout: &str) -> Result<Rgb> {
    let malformed = || DialogError::Decode(format!("invalid color answer {stdout:?}"));
    let channels: Vec<f64> = strip_line_break(stdout)
        .split(',')
        .map(|c| match c.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(malformed()),
        })
        .collect::<Result<_>>()?;
    let channels: [f64; 3] = channels.try_into().map_err(|_| malformed())?;
    Ok(Rgb::from_unit_channels(channels))
}

pub(crate) struct AppleScriptDialogs {}

impl AppleScriptDialogs {
    pub fn new() -> Self {
        AppleScriptDialogs {}
    }

    fn run_script(&self, opts: &Options, script: Result<String>) -> RawOutcome<String> {
        let script = match script {
            Ok(script) => script,
            Err(e) => return RawOutcome::Failed(e),
        };
        log::trace!("AppleScriptDialogs: Running script:\n{script}");
        let program = opts
            .program
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_PROGRAM));
        let args = ["-l", "JavaScript", "-e", script.as_str()];
        match subprocess::run(program, args, opts.context.as_ref()) {
            Ok(output) => output.into_outcome(),
            Err(e) => {
                log::error!("AppleScriptDialogs: Failed to run osascript: {e}");
                RawOutcome::Failed(e)
            }
        }
    }

    fn run_file_request(&self, opts: &Options, operation: FileOperation) -> RawOutcome<String> {
        let request = FileRequest::new(operation, opts);
        self.run_script(opts, build_script(&request, FILE_SCRIPT))
    }

    fn pick_single(&self, opts: &Options, operation: FileOperation) -> RawOutcome<PathBuf> {
        let mut opts = opts.clone();
        opts.multiple_selection = false;
        let operation = file_operation(&opts, operation);
        match self.run_file_request(&opts, operation) {
            RawOutcome::Confirmed(stdout) => parse_single_path(stdout),
            RawOutcome::Cancelled => RawOutcome::Cancelled,
            RawOutcome::Failed(e) => RawOutcome::Failed(e),
        }
    }
}

impl Default for AppleScriptDialogs {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogOperations for AppleScriptDialogs {
    fn select_file(&self, opts: &Options) -> RawOutcome<PathBuf> {
        self.pick_single(opts, FileOperation::ChooseFile)
    }

    fn select_file_save(&self, opts: &Options) -> RawOutcome<PathBuf> {
        self.pick_single(opts, FileOperation::ChooseFileName)
    }

    fn select_file_multiple(&self, opts: &Options) -> RawOutcome<Vec<PathBuf>> {
        let mut opts = opts.clone();
        opts.multiple_selection = true;
        let operation = file_operation(&opts, FileOperation::ChooseFile);
        match self.run_file_request(&opts, operation) {
            RawOutcome::Confirmed(stdout) => parse_multiple_paths(stdout),
            RawOutcome::Cancelled => RawOutcome::Cancelled,
            RawOutcome::Failed(e) => RawOutcome::Failed(e),
        }
    }

    fn select_directory(&self, opts: &Options) -> RawOutcome<PathBuf> {
        self.pick_single(opts, FileOperation::ChooseFolder)
    }

    fn select_color(&self, opts: &Options) -> RawOutcome<Rgb> {
        let request = ColorRequest {
            default_color: opts.color.map(Rgb::to_unit_channels),
        };
        self.run_script(opts, build_script(&request, COLOR_SCRIPT))
            .and_then(|stdout| parse_color(&stdout))
    }

    fn show_message(&self, kind: MessageKind, text: &str, opts: &Options) -> RawOutcome<MessageReply> {
        let request = MessageRequest::new(kind, text, opts);
        let extra = opts.extra_button.clone();
        self.run_script(opts, build_script(&request, MESSAGE_SCRIPT))
            .map(|stdout| match extra {
                Some(label) if strip_line_break(&stdout) == label => MessageReply::ExtraButton,
                _ => MessageReply::Ok,
            })
    }
}
