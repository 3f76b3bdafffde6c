/*
 * Command-line front-end: shows one dialog described by flags and reports the
 * answer through stdout and the exit status.
 *
 * Exit status 0 means confirmed, 1 means cancelled or answered "No" (the
 * extra button prints its label and also exits with 1), and 255 means the
 * dialog failed or the command line was invalid.
 */
use clap::{ArgGroup, Parser};
use simple_dialogs::core::{ConfigManagerOperations, CoreConfigManager, Settings};
use simple_dialogs::{DialogContext, DialogError, DialogIcon, DialogOption, FileFilter, FileFilters, Rgb};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;

const APP_NAME: &str = "SimpleDialogs";
const EXIT_ERROR: u8 = 255;

#[derive(Parser, Debug)]
#[command(version, about = "Display native dialog boxes from the command line")]
#[command(group(
    ArgGroup::new("dialog")
        .required(true)
        .args(["error", "info", "warning", "question", "file_selection", "color_selection"])
))]
struct Cli {
    /// Display error dialog
    #[arg(long)]
    error: bool,
    /// Display info dialog
    #[arg(long)]
    info: bool,
    /// Display warning dialog
    #[arg(long)]
    warning: bool,
    /// Display question dialog
    #[arg(long)]
    question: bool,
    /// Display file selection dialog
    #[arg(long)]
    file_selection: bool,
    /// Display color selection dialog
    #[arg(long)]
    color_selection: bool,

    /// Set the dialog title
    #[arg(long)]
    title: Option<String>,

    /// Set the dialog text
    #[arg(long, default_value = "")]
    text: String,
    /// Set the dialog icon (error, info, question, warning)
    #[arg(long)]
    icon_name: Option<String>,
    /// Set the label of the OK button
    #[arg(long)]
    ok_label: Option<String>,
    /// Set the label of the Cancel button
    #[arg(long)]
    cancel_label: Option<String>,
    /// Add an extra button
    #[arg(long)]
    extra_button: Option<String>,
    /// Do not enable text wrapping
    #[arg(long)]
    no_wrap: bool,
    /// Enable ellipsizing in the dialog text
    #[arg(long)]
    ellipsize: bool,
    /// Give Cancel button focus by default
    #[arg(long)]
    default_cancel: bool,

    /// Activate save mode
    #[arg(long)]
    save: bool,
    /// Allow multiple files to be selected
    #[arg(long)]
    multiple: bool,
    /// Activate directory-only selection
    #[arg(long)]
    directory: bool,
    /// Confirm file selection if filename already exists
    #[arg(long)]
    confirm_overwrite: bool,
    /// Confirm file selection if filename does not yet exist (Windows only)
    #[arg(long)]
    confirm_create: bool,
    /// Show hidden files (Windows and macOS only)
    #[arg(long)]
    show_hidden: bool,
    /// Set the filename
    #[arg(long)]
    filename: Option<String>,
    /// Set output separator character
    #[arg(long)]
    separator: Option<String>,
    /// Set a filename filter (NAME | PATTERN1 PATTERN2 ...)
    #[arg(long = "file-filter")]
    file_filters: Vec<FileFilter>,

    /// Set the initial color, e.g. rgb(255,128,0) or #ff8000
    #[arg(long)]
    color: Option<Rgb>,
    /// Show the palette
    #[arg(long)]
    show_palette: bool,

    /// Dismiss the dialog after this many seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

/*
 * Translates the flags into dialog options. Only flags that were given are
 * turned into options, so unset labels keep their platform defaults.
 */
fn build_options(cli: &Cli, settings: &Settings) -> Vec<DialogOption> {
    use simple_dialogs as dlg;

    let mut options = Vec::new();
    if let Some(title) = &cli.title {
        options.push(dlg::title(title.as_str()));
    }

    if let Some(icon) = cli.icon_name.as_deref().and_then(DialogIcon::from_name) {
        options.push(dlg::icon(icon));
    }
    if let Some(label) = &cli.ok_label {
        options.push(dlg::ok_label(label.as_str()));
    }
    if let Some(label) = &cli.cancel_label {
        options.push(dlg::cancel_label(label.as_str()));
    }
    if let Some(label) = &cli.extra_button {
        options.push(dlg::extra_button(label.as_str()));
    }
    if cli.no_wrap {
        options.push(dlg::no_wrap());
    }
    if cli.ellipsize {
        options.push(dlg::ellipsize());
    }
    if cli.default_cancel {
        options.push(dlg::default_cancel());
    }

    if !cli.file_filters.is_empty() {
        options.push(FileFilters::from(cli.file_filters.clone()).build());
    }
    if let Some(filename) = &cli.filename {
        options.push(dlg::filename(filename.as_str()));
    }
    if cli.directory {
        options.push(dlg::directory());
    }
    if cli.confirm_overwrite {
        options.push(dlg::confirm_overwrite());
    }
    if cli.confirm_create {
        options.push(dlg::confirm_create());
    }
    if cli.show_hidden {
        options.push(dlg::show_hidden());
    }

    if let Some(color) = cli.color {
        options.push(dlg::color(color));
    }
    if cli.show_palette {
        options.push(dlg::show_palette());
    }

    if let Some(seconds) = cli.timeout {
        options.push(dlg::context(DialogContext::with_timeout(
            Duration::from_secs_f64(seconds.max(0.0)),
        )));
    }
    if let Some(program) = settings.program_override() {
        options.push(dlg::program(program));
    }
    options
}

fn fail(err: DialogError) -> ExitCode {
    log::error!("SimpleDialogs: {err}");
    eprintln!("{err}");
    ExitCode::from(EXIT_ERROR)
}

fn message_result(result: simple_dialogs::Result<bool>, extra_button: Option<&str>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(DialogError::ExtraButton) => {
            println!("{}", extra_button.unwrap_or_default());
            ExitCode::from(1)
        }
        Err(DialogError::CancelOrClosed) => ExitCode::from(1),
        Err(e) => fail(e),
    }
}

fn path_result(result: simple_dialogs::Result<Option<PathBuf>>) -> ExitCode {
    match result {
        Ok(Some(path)) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::from(1),
        Err(e) => fail(e),
    }
}

fn list_result(result: simple_dialogs::Result<Option<Vec<PathBuf>>>, separator: &str) -> ExitCode {
    match result {
        Ok(Some(paths)) => {
            let joined: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            println!("{}", joined.join(separator));
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::from(1),
        Err(e) => fail(e),
    }
}

fn color_result(result: simple_dialogs::Result<Option<Rgb>>) -> ExitCode {
    match result {
        Ok(Some(color)) => {
            println!("{color}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::from(1),
        Err(e) => fail(e),
    }
}

fn run(cli: &Cli, settings: &Settings) -> ExitCode {
    let options = build_options(cli, settings);
    let extra = cli.extra_button.as_deref();
    let separator = cli.separator.as_deref().unwrap_or(&settings.separator);

    if cli.error {
        message_result(simple_dialogs::error(&cli.text, options), extra)
    } else if cli.info {
        message_result(simple_dialogs::info(&cli.text, options), extra)
    } else if cli.warning {
        message_result(simple_dialogs::warning(&cli.text, options), extra)
    } else if cli.question {
        message_result(simple_dialogs::question(&cli.text, options), extra)
    } else if cli.color_selection {
        color_result(simple_dialogs::select_color(options))
    } else if cli.save {
        path_result(simple_dialogs::select_file_save(options))
    } else if cli.multiple {
        list_result(simple_dialogs::select_file_multiple(options), separator)
    } else {
        path_result(simple_dialogs::select_file(options))
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let config_manager = CoreConfigManager::new();
    let (settings, config_error) = match config_manager.load_settings(APP_NAME) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    let level_name = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    let level = LevelFilter::from_str(level_name).unwrap_or(LevelFilter::Warn);
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Failed to initialize logger: {e}");
    }
    if let Some(e) = config_error {
        log::warn!("SimpleDialogs: Using default settings, could not load them: {e}");
    }
    log::debug!("SimpleDialogs: Parsed command line: {cli:?}");

    run(&cli, &settings)
}
