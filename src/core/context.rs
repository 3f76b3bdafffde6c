/*
 * A caller-owned cancellation handle that can dismiss a pending dialog.
 *
 * `DialogContext` is cheap to clone; all clones share one cancel flag. A
 * context may also carry a deadline, after which it reports
 * `ContextError::DeadlineExceeded`. Adapters that launch a helper process
 * poll the context while waiting and kill the helper once it is done. The
 * Win32 adapter has no out-of-band dismissal hook for modal dialogs, so it only
 * checks the context before showing anything.
 */
use super::error::ContextError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct DialogContext {
    canceled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl DialogContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        DialogContext {
            canceled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns why the context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<ContextError> {
        if self.canceled.load(Ordering::SeqCst) {
            return Some(ContextError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }
}

// Two contexts are equal when they share a cancel flag and a deadline.
impl PartialEq for DialogContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.canceled, &other.canceled) && self.deadline == other.deadline
    }
}
