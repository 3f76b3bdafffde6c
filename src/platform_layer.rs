/*
 * Platform dispatch. Each supported environment gets one adapter that turns
 * an `Options` record into a native dialog invocation and reports what
 * happened as a `RawOutcome`:
 *  - Windows: in-process Win32 common dialogs and the shell folder dialog.
 *  - macOS: `osascript` running a JavaScript for Automation script.
 *  - Other Unix systems: the `zenity` program.
 *
 * The adapters for the other platforms are still compiled everywhere they can
 * be, so their argument building and output parsing stay covered by tests.
 */
pub(crate) mod apartment;
pub(crate) mod folder_picker;
pub(crate) mod osascript;
pub(crate) mod subprocess;
#[cfg(windows)]
pub(crate) mod win32;
pub(crate) mod zenity;

use crate::core::{MessageReply, Options, RawOutcome, Rgb};
use std::path::PathBuf;

/// The flavour of a message dialog; it selects the default icon and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Plain,
    Error,
    Warning,
    Info,
    Question,
}

pub(crate) trait DialogOperations {
    fn select_file(&self, opts: &Options) -> RawOutcome<PathBuf>;
    fn select_file_save(&self, opts: &Options) -> RawOutcome<PathBuf>;
    fn select_file_multiple(&self, opts: &Options) -> RawOutcome<Vec<PathBuf>>;
    fn select_directory(&self, opts: &Options) -> RawOutcome<PathBuf>;
    fn select_color(&self, opts: &Options) -> RawOutcome<Rgb>;

    /*
     * `Confirmed(Ok)` for the OK/Yes button, `Confirmed(ExtraButton)` for the
     * extra button, and `Cancelled` for Cancel/No or closing the window.
     */
    fn show_message(&self, kind: MessageKind, text: &str, opts: &Options) -> RawOutcome<MessageReply>;
}

#[cfg(windows)]
pub(crate) fn native() -> impl DialogOperations {
    win32::Win32Dialogs::new()
}

#[cfg(target_os = "macos")]
pub(crate) fn native() -> impl DialogOperations {
    osascript::AppleScriptDialogs::new()
}

#[cfg(not(any(windows, target_os = "macos")))]
pub(crate) fn native() -> impl DialogOperations {
    zenity::ZenityDialogs::new()
}
