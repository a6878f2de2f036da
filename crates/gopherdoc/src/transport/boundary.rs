//! Panic isolation for connection threads.
//!
//! A panic while serving one connection must not reach the listener or any
//! other connection. [`isolate`] runs the connection body under
//! `catch_unwind` and logs the payload with the peer address and the
//! backtrace captured by the process-wide hook installed through
//! [`install_panic_hook`].

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::OnceCell;
use tracing::error;

use super::LISTENER_TARGET;

static PANIC_HOOK: OnceCell<()> = OnceCell::new();

thread_local! {
    static ISOLATED: Cell<bool> = const { Cell::new(false) };
    static CAPTURED_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Installs the backtrace-capturing panic hook once per process.
///
/// Inside an isolated connection the hook records the backtrace for the
/// boundary to log. Everywhere else it defers to the previously installed
/// hook.
pub(crate) fn install_panic_hook() {
    PANIC_HOOK.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if ISOLATED.with(Cell::get) {
                let backtrace = Backtrace::force_capture().to_string();
                CAPTURED_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(backtrace));
            } else {
                previous(info);
            }
        }));
    });
}

/// Clears the isolation flag when the boundary is left, even by unwinding.
struct IsolationGuard;

impl IsolationGuard {
    fn enter() -> Self {
        ISOLATED.with(|flag| flag.set(true));
        CAPTURED_BACKTRACE.with(|slot| slot.borrow_mut().take());
        Self
    }
}

impl Drop for IsolationGuard {
    fn drop(&mut self) {
        ISOLATED.with(|flag| flag.set(false));
    }
}

/// Runs `body`, containing any panic it raises.
///
/// Returns `true` when `body` completed and `false` when it panicked. The
/// panic is logged at `error` before returning.
pub(crate) fn isolate<F>(peer: Option<SocketAddr>, body: F) -> bool
where
    F: FnOnce(),
{
    install_panic_hook();
    let outcome = {
        let _guard = IsolationGuard::enter();
        panic::catch_unwind(AssertUnwindSafe(body))
    };
    let Err(payload) = outcome else {
        return true;
    };

    let backtrace = CAPTURED_BACKTRACE
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| String::from("<unavailable>"));
    let peer = peer.map_or_else(|| String::from("<unknown>"), |addr| addr.to_string());
    error!(
        target: LISTENER_TARGET,
        peer = %peer,
        panic = %panic_message(payload.as_ref()),
        backtrace = %backtrace,
        "connection handler panicked"
    );
    false
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
}
