//! Panic isolation for test bodies.
//!
//! Panics inside a test body must not reach the terminal as a raw
//! `thread 'main' panicked at ..` line; the runtime reports them as failures
//! of the procedure instead. [`catch`] runs a closure under
//! `catch_unwind` while a process-wide hook, installed once, records the
//! panic's message and location for the current thread. Outside of
//! [`catch`] the hook defers to whatever hook was installed before it.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::failure::Origin;

/// A panic intercepted by [`catch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaughtPanic {
    pub message: String,
    pub origin: Option<Origin>,
}

thread_local! {
    static CATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_PANIC: RefCell<Option<CaughtPanic>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CATCH_DEPTH.with(Cell::get) == 0 {
                previous(info);
                return;
            }
            let caught = CaughtPanic {
                message: payload_message(info.payload()),
                origin: info.location().map(Origin::from),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(caught));
        }));
    });
}

/// Runs `f`, turning a panic into a [`CaughtPanic`].
pub fn catch<R>(f: impl FnOnce() -> R) -> Result<R, CaughtPanic> {
    install_hook();
    CATCH_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CATCH_DEPTH.with(|depth| depth.set(depth.get() - 1));

    result.map_err(|payload| {
        LAST_PANIC
            .with(|slot| slot.borrow_mut().take())
            .unwrap_or_else(|| CaughtPanic {
                message: payload_message(payload.as_ref()),
                origin: None,
            })
    })
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "Box<dyn Any>".to_string()
}
