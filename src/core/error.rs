/*
 * Defines the error type shared by every dialog operation.
 *
 * Cancellation is absent from this enum: a user dismissing a
 * picker is reported as `Ok(None)` / `Ok(false)` by the public operations.
 * The variants here cover launch failures, native status codes, helper program
 * failures, malformed responses, context dismissal and the two sentinel values
 * that callers match on (`ExtraButton`, `CancelOrClosed`).
 */
use std::io;

/// Why a `DialogContext` stopped a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    Canceled,
    DeadlineExceeded,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextError::Canceled => write!(f, "context canceled"),
            ContextError::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

#[derive(Debug)]
pub enum DialogError {
    /// The helper program or native facility could not be started.
    Launch(io::Error),
    /// A native call returned a failure status (HRESULT or common dialog code).
    Native { function: &'static str, code: i32 },
    /// The helper program exited with an unexpected status.
    Subprocess { status: Option<i32>, stderr: String },
    /// The response from the native facility or helper could not be decoded.
    Decode(String),
    /// The caller's context ended before the user answered.
    Dismissed(ContextError),
    /// The extra button was pressed. The label is the one the caller configured.
    ExtraButton,
    /// The dialog was closed or its cancel button pressed.
    CancelOrClosed,
}

impl From<io::Error> for DialogError {
    fn from(err: io::Error) -> Self {
        DialogError::Launch(err)
    }
}

impl From<ContextError> for DialogError {
    fn from(err: ContextError) -> Self {
        DialogError::Dismissed(err)
    }
}

impl DialogError {
    // HRESULT failures keep their raw code so they can be reported as-is.
    #[cfg(target_os = "windows")]
    pub(crate) fn from_windows(function: &'static str, err: windows::core::Error) -> Self {
        DialogError::Native {
            function,
            code: err.code().0,
        }
    }
}

impl std::fmt::Display for DialogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogError::Launch(e) => write!(f, "Failed to launch dialog: {e}"),
            DialogError::Native { function, code } => {
                write!(f, "{function} failed (error {:#010x})", *code as u32)
            }
            DialogError::Subprocess { status, stderr } => match (status, stderr.is_empty()) {
                (Some(code), true) => write!(f, "Dialog helper exited with status {code}"),
                (Some(code), false) => {
                    write!(f, "Dialog helper exited with status {code}: {stderr}")
                }
                (None, true) => write!(f, "Dialog helper was terminated by a signal"),
                (None, false) => write!(f, "Dialog helper was terminated by a signal: {stderr}"),
            },
            DialogError::Decode(s) => write!(f, "Malformed dialog response: {s}"),
            DialogError::Dismissed(e) => write!(f, "Dialog dismissed: {e}"),
            DialogError::ExtraButton => write!(f, "Extra button pressed"),
            DialogError::CancelOrClosed => write!(f, "Canceled or closed"),
        }
    }
}

impl std::error::Error for DialogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DialogError::Launch(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized `Result` type for dialog operations.
pub type Result<T> = std::result::Result<T, DialogError>;
