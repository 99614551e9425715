//! Converting panics into test failures.
//!
//! A panic hook is installed once per process. While a thread is inside
//! [`catch_panic`] the hook records the panic location instead of printing,
//! so the failure can be reported with file and line through
//! [`UnitTestError`]. Panics outside a capture go to the previous hook.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::error::{TestFailure, UnitTestError};

static HOOK: Once = Once::new();

thread_local! {
    /// Nesting depth of active captures on this thread.
    static DEPTH: Cell<u32> = const { Cell::new(0) };
    /// Location of the most recent captured panic.
    static LOCATION: RefCell<Option<(String, u32)>> = const { RefCell::new(None) };
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if DEPTH.with(Cell::get) == 0 {
                previous(info);
                return;
            }
            let location = info
                .location()
                .map(|location| (location.file().to_string(), location.line()));
            LOCATION.with(|slot| *slot.borrow_mut() = location);
        }));
    });
}

/// Run `f`, turning a panic into a [`UnitTestError`].
pub(crate) fn catch_panic<T>(f: impl FnOnce() -> T) -> Result<T, UnitTestError> {
    install_hook();
    LOCATION.with(|slot| slot.borrow_mut().take());
    DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));

    result.map_err(|payload| {
        let location = LOCATION.with(|slot| slot.borrow_mut().take());
        from_payload(&*payload, location)
    })
}

/// Run a test body, folding a panic into the returned failure.
pub(crate) fn catch_failure(f: impl FnOnce() -> Result<(), TestFailure>) -> Result<(), TestFailure> {
    catch_panic(f).unwrap_or_else(|error| Err(error.into()))
}

/// Build a failure from a panic payload.
///
/// A payload that already is a failure keeps its own location.
fn from_payload(payload: &(dyn Any + Send), location: Option<(String, u32)>) -> UnitTestError {
    if let Some(error) = payload.downcast_ref::<UnitTestError>() {
        return error.clone();
    }
    if let Some(TestFailure::Assertion(error)) = payload.downcast_ref::<TestFailure>() {
        return error.clone();
    }

    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(failure) = payload.downcast_ref::<TestFailure>() {
        failure.to_string()
    } else {
        "test panicked with a non-string payload".to_string()
    };

    let (file, line) = location.unwrap_or_default();
    UnitTestError::at(message, file, line)
}
