/*
 * The directory picker state machine of the Win32 adapter, written against
 * small traits so every transition can be exercised without a desktop.
 *
 * Sequence: enter a COM apartment, create the shell folder dialog (or fall
 * back to the legacy folder browser when the dialog class is unavailable),
 * add the folder-only flags to the dialog options, set title and starting
 * folder, show it, then read the chosen item's file system path.
 *
 * Native objects release themselves when dropped. The locals in `pick_folder`
 * are declared so that the result item is dropped first, then the dialog,
 * and the apartment guard last, on every return path.
 */
#![cfg_attr(not(windows), allow(dead_code))]

use super::apartment::{ApartmentGuard, ApartmentRuntime};
use crate::core::{DialogError, Options, RawOutcome, Result};
use std::path::PathBuf;

pub(crate) const FOS_NOCHANGEDIR: u32 = 0x0000_0008;
pub(crate) const FOS_PICKFOLDERS: u32 = 0x0000_0020;
pub(crate) const FOS_FORCEFILESYSTEM: u32 = 0x0000_0040;

/// `HRESULT_FROM_WIN32(ERROR_CANCELLED)`, returned by `Show` when the user dismisses the dialog.
pub(crate) const HRESULT_ERROR_CANCELLED: i32 = 0x8007_04C7_u32 as i32;

pub(crate) trait ShellItem {
    fn file_system_path(&self) -> Result<String>;
}

pub(crate) trait FolderDialog {
    type Item: ShellItem;

    fn options(&self) -> std::result::Result<u32, i32>;
    fn set_options(&self, flags: u32) -> std::result::Result<(), i32>;
    fn set_title(&self, title: &str) -> std::result::Result<(), i32>;
    fn set_default_folder(&self, folder: &str) -> std::result::Result<(), i32>;
    fn show(&self) -> std::result::Result<(), i32>;
    fn result(&self) -> std::result::Result<Self::Item, i32>;
}

pub(crate) trait FolderDialogProvider {
    type Dialog: FolderDialog;

    fn create_dialog(&self) -> std::result::Result<Self::Dialog, i32>;

    /// Older folder browser used when the dialog object cannot be created.
    fn browse_legacy(&self, opts: &Options) -> RawOutcome<PathBuf>;
}

fn native(function: &'static str) -> impl FnOnce(i32) -> DialogError {
    move |code| DialogError::Native { function, code }
}

pub(crate) fn pick_folder<R, P>(runtime: &R, provider: &P, opts: &Options) -> RawOutcome<PathBuf>
where
    R: ApartmentRuntime + ?Sized,
    P: FolderDialogProvider,
{
    let _apartment = match ApartmentGuard::enter(runtime) {
        Ok(guard) => guard,
        Err(hr) => return RawOutcome::Failed(native("CoInitializeEx")(hr)),
    };

    let dialog = match provider.create_dialog() {
        Ok(dialog) => dialog,
        Err(hr) => {
            log::warn!(
                "FolderPicker: Folder dialog unavailable ({hr:#010x}), using legacy browser."
            );
            return provider.browse_legacy(opts);
        }
    };

    match show_dialog(&dialog, opts) {
        Ok(outcome) => outcome,
        Err(e) => RawOutcome::Failed(e),
    }
}

fn show_dialog<D: FolderDialog>(dialog: &D, opts: &Options) -> Result<RawOutcome<PathBuf>> {
    let flags = dialog.options().map_err(native("IFileOpenDialog::GetOptions"))?;
    dialog
        .set_options(flags | FOS_NOCHANGEDIR | FOS_PICKFOLDERS | FOS_FORCEFILESYSTEM)
        .map_err(native("IFileOpenDialog::SetOptions"))?;

    if let Some(title) = &opts.title {
        dialog
            .set_title(title)
            .map_err(native("IFileOpenDialog::SetTitle"))?;
    }
    if let Some(folder) = opts.filename.as_deref().filter(|f| !f.is_empty()) {
        if let Err(hr) = dialog.set_default_folder(folder) {
            log::debug!("FolderPicker: Ignoring unusable start folder {folder:?} ({hr:#010x}).");
        }
    }

    match dialog.show() {
        Ok(()) => {}
        Err(HRESULT_ERROR_CANCELLED) => return Ok(RawOutcome::Cancelled),
        Err(hr) => return Err(native("IFileOpenDialog::Show")(hr)),
    }

    let item = dialog.result().map_err(native("IFileOpenDialog::GetResult"))?;
    let path = item.file_system_path()?;
    Ok(RawOutcome::Confirmed(PathBuf::from(path)))
}
