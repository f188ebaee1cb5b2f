//! Test utilities for devdash.
//!
//! Environment variables and the global shutdown flag are process-wide, and
//! Rust's test runner executes tests in parallel. Tests that touch either
//! must hold [`GLOBAL_LOCK`].

#[cfg(test)]
use std::sync::Mutex;

/// Serializes tests that touch process-wide state.
#[cfg(test)]
pub static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

/// Run a closure with the given environment variables set, removing them
/// afterward.
///
/// # Example
///
/// ```ignore
/// use devdash::testutil::with_env;
///
/// #[test]
/// fn test_something() {
///     with_env(&[("DEVDASH_URL", "http://10.0.0.2:5000")], || {
///         // DEVDASH_URL is set here
///     });
///     // and unset again here
/// }
/// ```
#[cfg(test)]
pub fn with_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = GLOBAL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    let result = f();
    for (key, _) in vars {
        std::env::remove_var(key);
    }
    result
}
