/*
 * Common dialog pickers: `GetOpenFileNameW` / `GetSaveFileNameW` for files and
 * `ChooseColorW` for colors. All strings handed to the dialogs live in local
 * buffers that outlive the call. The result buffer is pre-allocated large
 * enough for the worst-case multi-selection and is decoded by
 * `core::wide_buffer`.
 */
use crate::core::path_utils::split_dir_and_name;
use crate::core::wide_buffer::{
    MULTI_SELECT_BUF_LEN, PATH_BUF_LEN, decode_multi_select, encode_wide, filter_buffer, prefill,
    string_from_wide,
};
use crate::core::{DialogError, Options, RawOutcome, Rgb};

use std::path::PathBuf;

use windows::{
    Win32::{
        Foundation::COLORREF,
        UI::Controls::Dialogs::{
            CC_ANYCOLOR, CC_FULLOPEN, CC_RGBINIT, CHOOSECOLORW, COMMON_DLG_ERRORS, ChooseColorW,
            CommDlgExtendedError, GetOpenFileNameW, GetSaveFileNameW, OFN_ALLOWMULTISELECT,
            OFN_CREATEPROMPT, OFN_EXPLORER, OFN_FORCESHOWHIDDEN, OFN_NOCHANGEDIR,
            OFN_OVERWRITEPROMPT, OPEN_FILENAME_FLAGS, OPENFILENAMEW,
        },
    },
    core::{BOOL, PCWSTR, PWSTR},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileDialogMode {
    Open,
    OpenMultiple,
    Save,
}

impl FileDialogMode {
    fn flags(self, opts: &Options) -> OPEN_FILENAME_FLAGS {
        let mut flags = OFN_NOCHANGEDIR | OFN_EXPLORER;
        match self {
            FileDialogMode::Open => {}
            FileDialogMode::OpenMultiple => flags |= OFN_ALLOWMULTISELECT,
            FileDialogMode::Save if opts.confirm_overwrite => flags |= OFN_OVERWRITEPROMPT,
            FileDialogMode::Save => {}
        }
        if opts.confirm_create {
            flags |= OFN_CREATEPROMPT;
        }
        if opts.show_hidden {
            flags |= OFN_FORCESHOWHIDDEN;
        }
        flags
    }

    fn buffer_len(self) -> usize {
        match self {
            FileDialogMode::OpenMultiple => MULTI_SELECT_BUF_LEN,
            _ => PATH_BUF_LEN,
        }
    }
}

/*
 * A failed common dialog call is a cancellation when `CommDlgExtendedError`
 * reports no error, otherwise a native failure carrying that code.
 */
fn dialog_failure<T>(function: &'static str) -> RawOutcome<T> {
    let code = unsafe { CommDlgExtendedError() };
    if code == COMMON_DLG_ERRORS(0) {
        log::debug!("FileDialogs: {function} cancelled by user.");
        RawOutcome::Cancelled
    } else {
        log::error!("FileDialogs: {function} failed with {:#x}", code.0);
        RawOutcome::Failed(DialogError::Native {
            function,
            code: code.0 as i32,
        })
    }
}

/*
 * Shows an open or save dialog and returns the raw result buffer. The
 * `filename` option is split so its directory becomes the initial directory
 * and its name pre-fills the result buffer.
 */
fn run_file_dialog(opts: &Options, mode: FileDialogMode) -> RawOutcome<Vec<u16>> {
    let mut buffer = vec![0u16; mode.buffer_len()];
    let (dir, name) = opts
        .filename
        .as_deref()
        .map(split_dir_and_name)
        .unwrap_or_default();
    if let Err(e) = prefill(&mut buffer, name) {
        return RawOutcome::Failed(e);
    }
    let initial_dir = (!dir.is_empty()).then(|| encode_wide(dir));
    let title = opts.title.as_deref().map(encode_wide);
    let filters = filter_buffer(&opts.file_filters);

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        lpstrFile: PWSTR(buffer.as_mut_ptr()),
        nMaxFile: buffer.len() as u32,
        lpstrFilter: filters.as_ref().map_or(PCWSTR::null(), |f| PCWSTR(f.as_ptr())),
        lpstrTitle: title.as_ref().map_or(PCWSTR::null(), |t| PCWSTR(t.as_ptr())),
        lpstrInitialDir: initial_dir
            .as_ref()
            .map_or(PCWSTR::null(), |d| PCWSTR(d.as_ptr())),
        Flags: mode.flags(opts),
        ..Default::default()
    };
    log::debug!("FileDialogs: Showing {mode:?} dialog with flags {:#x}", ofn.Flags.0);

    let (succeeded, function): (BOOL, &'static str) = match mode {
        FileDialogMode::Save => (unsafe { GetSaveFileNameW(&mut ofn) }, "GetSaveFileNameW"),
        _ => (unsafe { GetOpenFileNameW(&mut ofn) }, "GetOpenFileNameW"),
    };
    if !succeeded.as_bool() {
        return dialog_failure(function);
    }
    RawOutcome::Confirmed(buffer)
}

pub(crate) fn select_file(opts: &Options, mode: FileDialogMode) -> RawOutcome<PathBuf> {
    run_file_dialog(opts, mode).and_then(|buffer| string_from_wide(&buffer).map(PathBuf::from))
}

pub(crate) fn select_file_multiple(opts: &Options) -> RawOutcome<Vec<PathBuf>> {
    run_file_dialog(opts, FileDialogMode::OpenMultiple).and_then(|buffer| {
        decode_multi_select(&buffer).map(|paths| paths.into_iter().map(PathBuf::from).collect())
    })
}

pub(crate) fn select_color(opts: &Options) -> RawOutcome<Rgb> {
    let mut custom_colors = [COLORREF(0x00FF_FFFF); 16];
    let mut flags = CC_ANYCOLOR;
    if !opts.show_palette {
        flags |= CC_FULLOPEN;
    }
    let initial = opts.color.map(Rgb::to_colorref).unwrap_or(0);
    if opts.color.is_some() {
        flags |= CC_RGBINIT;
    }

    let mut cc = CHOOSECOLORW {
        lStructSize: std::mem::size_of::<CHOOSECOLORW>() as u32,
        rgbResult: COLORREF(initial),
        lpCustColors: custom_colors.as_mut_ptr(),
        Flags: flags,
        ..Default::default()
    };
    if !unsafe { ChooseColorW(&mut cc) }.as_bool() {
        return dialog_failure("ChooseColorW");
    }
    RawOutcome::Confirmed(Rgb::from_colorref(cc.rgbResult.0))
}
