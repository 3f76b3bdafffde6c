/*
 * COM-backed implementations of the folder picker seams: the per-thread
 * apartment, the shell `IFileOpenDialog` in folder mode, its result item,
 * and the legacy `SHBrowseForFolderW` browser used when the dialog class
 * cannot be instantiated. Interface references are released by the
 * `windows` crate wrappers when they are dropped.
 */
use crate::core::wide_buffer::{PATH_BUF_LEN, encode_wide, string_from_wide};
use crate::core::{DialogError, Options, RawOutcome, Result};
use crate::platform_layer::apartment::{ApartmentInit, ApartmentRuntime, init_status_from_hresult};
use crate::platform_layer::folder_picker::{FolderDialog, FolderDialogProvider, ShellItem};

use std::ffi::c_void;
use std::path::PathBuf;

use windows::{
    Win32::{
        System::Com::{
            CLSCTX_INPROC_SERVER, COINIT, COINIT_APARTMENTTHREADED, COINIT_DISABLE_OLE1DDE,
            CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize,
        },
        UI::Shell::{
            BIF_RETURNONLYFSDIRS, BROWSEINFOW, FILEOPENDIALOGOPTIONS, FileOpenDialog,
            GPFIDL_DEFAULT, IFileOpenDialog, IShellItem, SHBrowseForFolderW,
            SHCreateItemFromParsingName, SHGetPathFromIDListEx, SIGDN_FILESYSPATH,
        },
    },
    core::{HSTRING, PCWSTR},
};

pub(crate) struct ComRuntime;

impl ApartmentRuntime for ComRuntime {
    fn initialize(&self) -> ApartmentInit {
        let flags = COINIT(COINIT_APARTMENTTHREADED.0 | COINIT_DISABLE_OLE1DDE.0);
        let hr = unsafe { CoInitializeEx(None, flags) };
        init_status_from_hresult(hr.0)
    }

    fn uninitialize(&self) {
        unsafe { CoUninitialize() };
    }
}

pub(crate) struct ShellResultItem(IShellItem);

impl ShellItem for ShellResultItem {
    fn file_system_path(&self) -> Result<String> {
        let path = unsafe { self.0.GetDisplayName(SIGDN_FILESYSPATH) }
            .map_err(|e| DialogError::from_windows("IShellItem::GetDisplayName", e))?;
        let text = unsafe { path.to_string() };
        unsafe { CoTaskMemFree(Some(path.as_ptr() as *const c_void)) };
        text.map_err(|e| DialogError::Decode(format!("folder path is not valid UTF-16: {e}")))
    }
}

pub(crate) struct ShellFolderDialog(IFileOpenDialog);

impl FolderDialog for ShellFolderDialog {
    type Item = ShellResultItem;

    fn options(&self) -> std::result::Result<u32, i32> {
        unsafe { self.0.GetOptions() }
            .map(|flags| flags.0)
            .map_err(|e| e.code().0)
    }

    fn set_options(&self, flags: u32) -> std::result::Result<(), i32> {
        unsafe { self.0.SetOptions(FILEOPENDIALOGOPTIONS(flags)) }.map_err(|e| e.code().0)
    }

    fn set_title(&self, title: &str) -> std::result::Result<(), i32> {
        let title = HSTRING::from(title);
        unsafe { self.0.SetTitle(&title) }.map_err(|e| e.code().0)
    }

    fn set_default_folder(&self, folder: &str) -> std::result::Result<(), i32> {
        let folder = HSTRING::from(folder);
        let item: IShellItem =
            unsafe { SHCreateItemFromParsingName(&folder, None) }.map_err(|e| e.code().0)?;
        unsafe { self.0.SetDefaultFolder(&item) }.map_err(|e| e.code().0)
    }

    fn show(&self) -> std::result::Result<(), i32> {
        unsafe { self.0.Show(None) }.map_err(|e| e.code().0)
    }

    fn result(&self) -> std::result::Result<ShellResultItem, i32> {
        unsafe { self.0.GetResult() }
            .map(ShellResultItem)
            .map_err(|e| e.code().0)
    }
}

pub(crate) struct ShellDialogProvider;

impl FolderDialogProvider for ShellDialogProvider {
    type Dialog = ShellFolderDialog;

    fn create_dialog(&self) -> std::result::Result<ShellFolderDialog, i32> {
        unsafe { CoCreateInstance::<_, IFileOpenDialog>(&FileOpenDialog, None, CLSCTX_INPROC_SERVER) }
            .map(ShellFolderDialog)
            .map_err(|e| e.code().0)
    }

    /*
     * `SHBrowseForFolderW` returns a PIDL owned by the caller, or null when
     * the user cancels. The PIDL is freed before returning in both the
     * success and the decode-failure case.
     */
    fn browse_legacy(&self, opts: &Options) -> RawOutcome<PathBuf> {
        let title = opts.title.as_deref().map(encode_wide);
        let info = BROWSEINFOW {
            lpszTitle: title
                .as_ref()
                .map_or(PCWSTR::null(), |t| PCWSTR(t.as_ptr())),
            ulFlags: BIF_RETURNONLYFSDIRS,
            ..Default::default()
        };

        let pidl = unsafe { SHBrowseForFolderW(&info) };
        if pidl.is_null() {
            log::debug!("ShellDialogProvider: Legacy folder browser cancelled.");
            return RawOutcome::Cancelled;
        }

        let mut buffer = vec![0u16; PATH_BUF_LEN];
        let found = unsafe { SHGetPathFromIDListEx(pidl, &mut buffer, GPFIDL_DEFAULT) };
        unsafe { CoTaskMemFree(Some(pidl as *const c_void)) };

        if !found.as_bool() {
            return RawOutcome::Failed(DialogError::Native {
                function: "SHGetPathFromIDListEx",
                code: 0,
            });
        }
        string_from_wide(&buffer).map(PathBuf::from).into()
    }
}
