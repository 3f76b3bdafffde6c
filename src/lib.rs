/*
 * Native "simple dialogs" behind one API: message boxes, questions, file,
 * directory and color pickers.
 *
 * Every operation takes a list of `DialogOption`s, resolves them into an
 * `Options` record, hands that to the adapter of the current platform and
 * normalizes the adapter's answer:
 *  - pickers return `Ok(Some(value))` when confirmed and `Ok(None)` when the
 *    user cancelled, so cancellation is never an error;
 *  - messages return `Ok(true)` for OK/Yes, `Ok(false)` for Cancel/No or a
 *    closed window, and `Err(DialogError::ExtraButton)` for the extra button.
 *
 * ```no_run
 * use simple_dialogs::{FileFilter, FileFilters, select_file, title};
 *
 * let filters = FileFilters::from(vec![FileFilter::new("Rust", ["*.rs"])]);
 * match select_file([title("Open source file"), filters.build()]) {
 *     Ok(Some(path)) => println!("picked {}", path.display()),
 *     Ok(None) => println!("cancelled"),
 *     Err(e) => eprintln!("dialog failed: {e}"),
 * }
 * ```
 */
pub mod core;
mod platform_layer;

use crate::platform_layer::{DialogOperations, MessageKind};
use std::path::PathBuf;

pub use crate::core::options::{
    cancel_label, color, confirm_create, confirm_overwrite, context, default_cancel, directory,
    ellipsize, extra_button, file_filters, filename, icon, multiple_selection, no_wrap,
    ok_label, program, show_hidden, show_palette, title,
};
pub use crate::core::{
    ContextError, DialogContext, DialogError, DialogIcon, DialogOption, FileFilter, FileFilters,
    Options, Result, Rgb,
};

/// Shows a picker for one existing file. With `directory()` it picks a folder instead.
pub fn select_file(options: impl IntoIterator<Item = DialogOption>) -> Result<Option<PathBuf>> {
    let opts = Options::apply(options);
    platform_layer::native().select_file(&opts).into_result()
}

/*
 * Shows a picker for several existing files. Cancellation yields `Ok(None)`,
 * which stays distinct from a confirmed empty selection `Ok(Some(vec![]))`.
 */
pub fn select_file_multiple(
    options: impl IntoIterator<Item = DialogOption>,
) -> Result<Option<Vec<PathBuf>>> {
    let opts = Options::apply(options);
    platform_layer::native().select_file_multiple(&opts).into_result()
}

/// Shows a save-as picker; `confirm_overwrite()` asks before returning an existing file.
pub fn select_file_save(options: impl IntoIterator<Item = DialogOption>) -> Result<Option<PathBuf>> {
    let opts = Options::apply(options);
    platform_layer::native().select_file_save(&opts).into_result()
}

pub fn select_directory(options: impl IntoIterator<Item = DialogOption>) -> Result<Option<PathBuf>> {
    let opts = Options::apply(options);
    platform_layer::native().select_directory(&opts).into_result()
}

/// Shows a color picker, starting from `color(...)` when given.
pub fn select_color(options: impl IntoIterator<Item = DialogOption>) -> Result<Option<Rgb>> {
    let opts = Options::apply(options);
    platform_layer::native().select_color(&opts).into_result()
}

fn show_message(
    kind: MessageKind,
    text: &str,
    options: impl IntoIterator<Item = DialogOption>,
) -> Result<bool> {
    let opts = Options::apply(options);
    log::trace!("SimpleDialogs: Showing {kind:?} message");
    platform_layer::native()
        .show_message(kind, text, &opts)
        .into_confirmation()
}

/// Shows a message without a preset icon.
pub fn message(text: &str, options: impl IntoIterator<Item = DialogOption>) -> Result<bool> {
    show_message(MessageKind::Plain, text, options)
}

pub fn info(text: &str, options: impl IntoIterator<Item = DialogOption>) -> Result<bool> {
    show_message(MessageKind::Info, text, options)
}

pub fn warning(text: &str, options: impl IntoIterator<Item = DialogOption>) -> Result<bool> {
    show_message(MessageKind::Warning, text, options)
}

pub fn error(text: &str, options: impl IntoIterator<Item = DialogOption>) -> Result<bool> {
    show_message(MessageKind::Error, text, options)
}

/// Asks a question with OK and Cancel buttons; `Ok(true)` means OK.
pub fn question(text: &str, options: impl IntoIterator<Item = DialogOption>) -> Result<bool> {
    show_message(MessageKind::Question, text, options)
}
