//! Shutdown handling.
//!
//! Ctrl+C (or SIGTERM) sets a global flag that pollers check on every
//! wake-up. Inside the dashboard the terminal is in raw mode, so Ctrl+C
//! arrives as a key event instead and the UI triggers the signal itself.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Global flag indicating shutdown has been requested.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// How many times Ctrl+C was pressed.
static INTERRUPT_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Number of interrupts after which the process exits immediately.
const MAX_INTERRUPTS: usize = 2;

/// Register the Ctrl+C handler. Call once at startup.
pub fn register_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let count = INTERRUPT_COUNT.fetch_add(1, Ordering::SeqCst) + 1;
        if count >= MAX_INTERRUPTS {
            eprintln!("\nForce quit (received {} interrupts)", count);
            std::process::exit(130);
        }
        tracing::info!(event = "client.shutdown.interrupted", count);
        SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
    })
}

/// Whether shutdown has been requested globally.
pub fn requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
}

/// Set the global flag as the Ctrl+C handler would.
#[cfg(test)]
fn request() {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Clear the global state.
#[cfg(test)]
fn reset() {
    SHUTDOWN_REQUESTED.store(false, Ordering::SeqCst);
    INTERRUPT_COUNT.store(0, Ordering::SeqCst);
}

/// A cloneable shutdown handle shared with poller threads.
///
/// Reports shutdown when either the global flag is set or `trigger()` was
/// called on any clone.
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shutdown(&self) -> bool {
        requested() || self.flag.load(Ordering::SeqCst)
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}
