/*
 * Message dialogs through `MessageBoxW`.
 *
 * `MessageBoxW` only offers fixed button sets, so custom labels and the extra
 * button are applied by a thread-local CBT hook: when the message box
 * activates, the hook renames its buttons with `SetDlgItemTextW`. The hook is
 * installed for the calling thread only and removed by `HookGuard` as soon as
 * `MessageBoxW` returns.
 *
 * Button sets used:
 *  - question:            OK/Cancel, or Yes(ok)/No(extra)/Cancel with an extra button
 *  - other kinds:         OK, or Yes(ok)/No(extra) with an extra button
 */
use crate::core::wide_buffer::encode_wide;
use crate::core::{DialogError, DialogIcon, MessageReply, Options, RawOutcome};
use crate::platform_layer::MessageKind;

use std::cell::RefCell;

use windows::{
    Win32::{
        Foundation::{GetLastError, HWND, LPARAM, LRESULT, WPARAM},
        System::Threading::GetCurrentThreadId,
        UI::WindowsAndMessaging::{
            CallNextHookEx, HCBT_ACTIVATE, HHOOK, IDCANCEL, IDNO, IDOK, IDYES, MB_DEFBUTTON2,
            MB_DEFBUTTON3, MB_ICONERROR, MB_ICONINFORMATION, MB_ICONQUESTION, MB_ICONWARNING,
            MB_OK, MB_OKCANCEL, MB_SETFOREGROUND, MB_YESNO, MB_YESNOCANCEL, MESSAGEBOX_RESULT,
            MESSAGEBOX_STYLE, MessageBoxW, SetDlgItemTextW, SetWindowsHookExW,
            UnhookWindowsHookEx, WH_CBT,
        },
    },
    core::PCWSTR,
};

thread_local! {
    // Labels waiting for the next message box activated on this thread.
    static PENDING_LABELS: RefCell<Option<Vec<(i32, Vec<u16>)>>> = const { RefCell::new(None) };
}

#[derive(Debug)]
pub(crate) struct ButtonLayout {
    pub style: MESSAGEBOX_STYLE,
    /// Control id and text of every button that needs a new label.
    pub labels: Vec<(i32, String)>,
    has_extra: bool,
}

impl ButtonLayout {
    pub(crate) fn new(kind: MessageKind, opts: &Options) -> Self {
        let mut labels = Vec::new();
        let style = match (kind, &opts.extra_button) {
            (MessageKind::Question, None) => {
                push_label(&mut labels, IDOK, &opts.ok_label);
                push_label(&mut labels, IDCANCEL, &opts.cancel_label);
                let default = if opts.default_cancel { MB_DEFBUTTON2 } else { MB_OK };
                MB_OKCANCEL | default
            }
            (MessageKind::Question, Some(extra)) => {
                labels.push((IDYES.0, opts.ok_label.clone().unwrap_or_else(|| "OK".into())));
                labels.push((IDNO.0, extra.clone()));
                labels.push((
                    IDCANCEL.0,
                    opts.cancel_label.clone().unwrap_or_else(|| "Cancel".into()),
                ));
                let default = if opts.default_cancel { MB_DEFBUTTON3 } else { MB_OK };
                MB_YESNOCANCEL | default
            }
            (_, None) => {
                push_label(&mut labels, IDOK, &opts.ok_label);
                MB_OK
            }
            (_, Some(extra)) => {
                labels.push((IDYES.0, opts.ok_label.clone().unwrap_or_else(|| "OK".into())));
                labels.push((IDNO.0, extra.clone()));
                MB_YESNO
            }
        };
        ButtonLayout {
            style: style | icon_style(kind, opts.icon) | MB_SETFOREGROUND,
            labels,
            has_extra: opts.extra_button.is_some(),
        }
    }

    pub(crate) fn reply(&self, result: MESSAGEBOX_RESULT) -> RawOutcome<MessageReply> {
        match result {
            IDOK | IDYES => RawOutcome::Confirmed(MessageReply::Ok),
            IDNO if self.has_extra => RawOutcome::Confirmed(MessageReply::ExtraButton),
            _ => RawOutcome::Cancelled,
        }
    }
}

fn push_label(labels: &mut Vec<(i32, String)>, id: MESSAGEBOX_RESULT, label: &Option<String>) {
    if let Some(label) = label {
        labels.push((id.0, label.clone()));
    }
}

fn icon_style(kind: MessageKind, icon: Option<DialogIcon>) -> MESSAGEBOX_STYLE {
    let icon = icon.or(match kind {
        MessageKind::Error => Some(DialogIcon::Error),
        MessageKind::Warning => Some(DialogIcon::Warning),
        MessageKind::Info => Some(DialogIcon::Info),
        MessageKind::Question => Some(DialogIcon::Question),
        MessageKind::Plain => None,
    });
    match icon {
        Some(DialogIcon::Error) => MB_ICONERROR,
        Some(DialogIcon::Warning) => MB_ICONWARNING,
        Some(DialogIcon::Info) => MB_ICONINFORMATION,
        Some(DialogIcon::Question) => MB_ICONQUESTION,
        None => MESSAGEBOX_STYLE(0),
    }
}

unsafe extern "system" fn relabel_hook(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HCBT_ACTIVATE as i32 {
        if let Some(labels) = PENDING_LABELS.with(|pending| pending.borrow_mut().take()) {
            let hwnd = HWND(wparam.0 as *mut _);
            for (id, label) in &labels {
                if let Err(e) = unsafe { SetDlgItemTextW(hwnd, *id, PCWSTR(label.as_ptr())) } {
                    log::warn!("MessageBox: Failed to relabel button {id}: {e}");
                }
            }
        }
    }
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

struct HookGuard(HHOOK);

impl HookGuard {
    fn install(labels: &[(i32, String)]) -> Option<Self> {
        if labels.is_empty() {
            return None;
        }
        let wide = labels
            .iter()
            .map(|(id, label)| (*id, encode_wide(label)))
            .collect();
        PENDING_LABELS.with(|pending| *pending.borrow_mut() = Some(wide));
        match unsafe { SetWindowsHookExW(WH_CBT, Some(relabel_hook), None, GetCurrentThreadId()) } {
            Ok(hook) => Some(HookGuard(hook)),
            Err(e) => {
                log::warn!("MessageBox: Could not install relabel hook, keeping default labels: {e}");
                PENDING_LABELS.with(|pending| pending.borrow_mut().take());
                None
            }
        }
    }
}

impl Drop for HookGuard {
    fn drop(&mut self) {
        if let Err(e) = unsafe { UnhookWindowsHookEx(self.0) } {
            log::warn!("MessageBox: Failed to remove relabel hook: {e}");
        }
        PENDING_LABELS.with(|pending| pending.borrow_mut().take());
    }
}

pub(crate) fn show_message(kind: MessageKind, text: &str, opts: &Options) -> RawOutcome<MessageReply> {
    let layout = ButtonLayout::new(kind, opts);
    log::debug!("MessageBox: Showing {kind:?} with {layout:?}");

    let text = encode_wide(text);
    let caption = opts.title.as_deref().map(encode_wide);
    let caption_ptr = caption
        .as_ref()
        .map_or(PCWSTR::null(), |c| PCWSTR(c.as_ptr()));

    let result = {
        let _hook = HookGuard::install(&layout.labels);
        unsafe { MessageBoxW(None, PCWSTR(text.as_ptr()), caption_ptr, layout.style) }
    };
    if result.0 == 0 {
        let code = unsafe { GetLastError() };
        return RawOutcome::Failed(DialogError::Native {
            function: "MessageBoxW",
            code: code.0 as i32,
        });
    }
    layout.reply(result)
}
