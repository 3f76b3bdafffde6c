/*
 * The three-way outcome every platform adapter produces, and its mapping to
 * the public return shapes.
 *
 * Adapters see cancellation in very different ways (exit status 1, an
 * `ERROR_CANCELLED` HRESULT, a zero common dialog error, a null PIDL). They all
 * reduce it to `RawOutcome::Cancelled`, and the normalizer below turns that
 * into the zero value with no error. For list results this keeps `None`
 * (cancelled) apart from `Some(vec![])` (confirmed, empty).
 */
use super::error::{DialogError, Result};

#[derive(Debug)]
pub enum RawOutcome<T> {
    Confirmed(T),
    Cancelled,
    Failed(DialogError),
}

impl<T> RawOutcome<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> RawOutcome<U> {
        match self {
            RawOutcome::Confirmed(v) => RawOutcome::Confirmed(f(v)),
            RawOutcome::Cancelled => RawOutcome::Cancelled,
            RawOutcome::Failed(e) => RawOutcome::Failed(e),
        }
    }

    /// Like `map`, but a decoding step may turn a confirmation into a failure.
    pub fn and_then<U, F: FnOnce(T) -> Result<U>>(self, f: F) -> RawOutcome<U> {
        match self {
            RawOutcome::Confirmed(v) => match f(v) {
                Ok(u) => RawOutcome::Confirmed(u),
                Err(e) => RawOutcome::Failed(e),
            },
            RawOutcome::Cancelled => RawOutcome::Cancelled,
            RawOutcome::Failed(e) => RawOutcome::Failed(e),
        }
    }

    /*
     * Cancellation becomes `Ok(None)`, failure becomes `Err`, confirmation
     * becomes `Ok(Some(value))`. Used for single paths, path lists and colors.
     */
    pub fn into_result(self) -> Result<Option<T>> {
        match self {
            RawOutcome::Confirmed(v) => Ok(Some(v)),
            RawOutcome::Cancelled => Ok(None),
            RawOutcome::Failed(e) => Err(e),
        }
    }
}

impl<T> From<Result<T>> for RawOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => RawOutcome::Confirmed(v),
            Err(e) => RawOutcome::Failed(e),
        }
    }
}

/// Which button closed a message dialog with a positive answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageReply {
    Ok,
    ExtraButton,
}

impl RawOutcome<MessageReply> {
    /*
     * OK maps to `Ok(true)`, Cancel/No/close to `Ok(false)`, and the extra
     * button to the `ExtraButton` sentinel error.
     */
    pub fn into_confirmation(self) -> Result<bool> {
        match self {
            RawOutcome::Confirmed(MessageReply::Ok) => Ok(true),
            RawOutcome::Confirmed(MessageReply::ExtraButton) => Err(DialogError::ExtraButton),
            RawOutcome::Cancelled => Ok(false),
            RawOutcome::Failed(e) => Err(e),
        }
    }
}
