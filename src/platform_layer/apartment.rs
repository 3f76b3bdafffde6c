/*
 * COM apartment bookkeeping for the folder picker.
 *
 * Initializing COM on a thread can end three ways: this call set up the
 * apartment (S_OK, or S_FALSE when it was already set up with the same
 * model), the thread already belongs to an apartment of a different model
 * (RPC_E_CHANGED_MODE), or initialization failed. Only in the first case is
 * this code responsible for the matching uninitialize call. `ApartmentGuard`
 * encodes that rule, and it is `!Send` so the uninitialize call runs on the
 * thread that made the initialize call.
 */
#![cfg_attr(not(windows), allow(dead_code))]

use std::marker::PhantomData;

pub(crate) const S_OK: i32 = 0;
pub(crate) const S_FALSE: i32 = 1;
pub(crate) const RPC_E_CHANGED_MODE: i32 = 0x8001_0106_u32 as i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApartmentInit {
    /// This thread's apartment must be torn down by us.
    Owned,
    /// The thread was already in an apartment of another model; use it as is.
    Borrowed,
    Failed(i32),
}

pub(crate) fn init_status_from_hresult(hr: i32) -> ApartmentInit {
    match hr {
        S_OK | S_FALSE => ApartmentInit::Owned,
        RPC_E_CHANGED_MODE => ApartmentInit::Borrowed,
        failure => ApartmentInit::Failed(failure),
    }
}

pub(crate) trait ApartmentRuntime {
    /// Enters a single-threaded apartment on the calling thread.
    fn initialize(&self) -> ApartmentInit;
    fn uninitialize(&self);
}

pub(crate) struct ApartmentGuard<'a, R: ApartmentRuntime + ?Sized> {
    runtime: &'a R,
    owned: bool,
    _not_send: PhantomData<*const ()>,
}

impl<'a, R: ApartmentRuntime + ?Sized> ApartmentGuard<'a, R> {
    /*
     * Enters an apartment and returns a guard for it, or the failing HRESULT.
     * A borrowed apartment yields a guard that does nothing on drop.
     */
    pub(crate) fn enter(runtime: &'a R) -> Result<Self, i32> {
        let owned = match runtime.initialize() {
            ApartmentInit::Owned => true,
            ApartmentInit::Borrowed => {
                log::debug!("ApartmentGuard: Thread already in another apartment, borrowing it.");
                false
            }
            ApartmentInit::Failed(hr) => {
                log::error!("ApartmentGuard: COM initialization failed: {hr:#010x}");
                return Err(hr);
            }
        };
        Ok(ApartmentGuard {
            runtime,
            owned,
            _not_send: PhantomData,
        })
    }

    #[cfg(test)]
    pub(crate) fn is_owned(&self) -> bool {
        self.owned
    }
}

impl<R: ApartmentRuntime + ?Sized> Drop for ApartmentGuard<'_, R> {
    fn drop(&mut self) {
        if self.owned {
            self.runtime.uninitialize();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    // Records calls into a shared log so tests can check teardown order.
    pub(crate) struct MockRuntime {
        pub init_result: i32,
        pub uninit_calls: Cell<u32>,
        pub log: Rc<RefCell<Vec<String>>>,
    }

    impl MockRuntime {
        pub(crate) fn new(init_result: i32, log: Rc<RefCell<Vec<String>>>) -> Self {
            MockRuntime {
                init_result,
                uninit_calls: Cell::new(0),
                log,
            }
        }
    }

    impl ApartmentRuntime for MockRuntime {
        fn initialize(&self) -> ApartmentInit {
            self.log.borrow_mut().push("init".to_string());
            init_status_from_hresult(self.init_result)
        }

        fn uninitialize(&self) {
            self.uninit_calls.set(self.uninit_calls.get() + 1);
            self.log.borrow_mut().push("uninit".to_string());
        }
    }

    #[test]
    fn test_init_status_classification() {
        assert_eq!(init_status_from_hresult(S_OK), ApartmentInit::Owned);
        assert_eq!(init_status_from_hresult(S_FALSE), ApartmentInit::Owned);
        assert_eq!(
            init_status_from_hresult(RPC_E_CHANGED_MODE),
            ApartmentInit::Borrowed
        );
        let e_outofmemory = 0x8007_000E_u32 as i32;
        assert_eq!(
            init_status_from_hresult(e_outofmemory),
            ApartmentInit::Failed(e_outofmemory)
        );
    }

    #[test]
    fn test_owned_apartment_is_uninitialized_exactly_once() {
        // Arrange
        let runtime = MockRuntime::new(S_OK, Rc::default());

        // Act
        {
            let guard = ApartmentGuard::enter(&runtime).unwrap();
            assert!(guard.is_owned());
        }

        // Assert
        assert_eq!(runtime.uninit_calls.get(), 1);
    }

    #[test]
    fn test_borrowed_apartment_is_left_alone() {
        let runtime = MockRuntime::new(RPC_E_CHANGED_MODE, Rc::default());
        {
            let guard = ApartmentGuard::enter(&runtime).unwrap();
            assert!(!guard.is_owned());
        }
        assert_eq!(runtime.uninit_calls.get(), 0);
    }

    #[test]
    fn test_failed_initialization_returns_hresult_without_teardown() {
        let e_unexpected = 0x8000_FFFF_u32 as i32;
        let runtime = MockRuntime::new(e_unexpected, Rc::default());
        assert_eq!(ApartmentGuard::enter(&runtime).err(), Some(e_unexpected));
        assert_eq!(runtime.uninit_calls.get(), 0);
    }
}
