/*
 * In-process Win32 adapter. Every call runs synchronously on the calling
 * thread: COM state, hooks and dialog objects are created and released
 * within the call, so nothing crosses threads.
 *
 * A `DialogContext` is only consulted before the dialog is shown. A modal
 * common dialog has no out-of-band dismissal hook here, so cancelling the
 * context while the dialog is open leaves it open until the user acts.
 */
mod com;
mod file_dialogs;
mod message_box;

use super::folder_picker::pick_folder;
use super::{DialogOperations, MessageKind};
use crate::core::{DialogError, MessageReply, Options, RawOutcome, Rgb};
use file_dialogs::FileDialogMode;
use std::path::PathBuf;

pub(crate) struct Win32Dialogs {}

impl Win32Dialogs {
    pub fn new() -> Self {
        Win32Dialogs {}
    }

    // Runs `show` unless the caller's context is already done.
    fn guarded<T>(opts: &Options, show: impl FnOnce() -> RawOutcome<T>) -> RawOutcome<T> {
        if let Some(reason) = opts.context.as_ref().and_then(|ctx| ctx.err()) {
            log::debug!("Win32Dialogs: Context done ({reason}), not showing dialog.");
            return RawOutcome::Failed(DialogError::Dismissed(reason));
        }
        show()
    }
}

impl Default for Win32Dialogs {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogOperations for Win32Dialogs {
    fn select_file(&self, opts: &Options) -> RawOutcome<PathBuf> {
        if opts.directory {
            return self.select_directory(opts);
        }
        Self::guarded(opts, || file_dialogs::select_file(opts, FileDialogMode::Open))
    }

    fn select_file_save(&self, opts: &Options) -> RawOutcome<PathBuf> {
        if opts.directory {
            return self.select_directory(opts);
        }
        Self::guarded(opts, || file_dialogs::select_file(opts, FileDialogMode::Save))
    }

    fn select_file_multiple(&self, opts: &Options) -> RawOutcome<Vec<PathBuf>> {
        if opts.directory {
            return self.select_directory(opts).map(|path| vec![path]);
        }
        Self::guarded(opts, || file_dialogs::select_file_multiple(opts))
    }

    fn select_directory(&self, opts: &Options) -> RawOutcome<PathBuf> {
        Self::guarded(opts, || {
            pick_folder(&com::ComRuntime, &com::ShellDialogProvider, opts)
        })
    }

    fn select_color(&self, opts: &Options) -> RawOutcome<Rgb> {
        Self::guarded(opts, || file_dialogs::select_color(opts))
    }

    fn show_message(&self, kind: MessageKind, text: &str, opts: &Options) -> RawOutcome<MessageReply> {
        Self::guarded(opts, || message_box::show_message(kind, text, opts))
    }
}
