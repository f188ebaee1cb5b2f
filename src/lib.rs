//! devdash: terminal dashboard for a local project-runner service.
//!
//! Watches the service's projects and their logs, and drives start, stop,
//! and remove commands against it.
//!
//! ## Layout
//!
//! - `api` - HTTP client for the project-runner backend (plus a stub)
//! - `status` / `logs` / `toast` - dashboard view state
//! - `poller` - background status and log polling threads
//! - `dispatch` - control resolution and command dispatch
//! - `tui` - ratatui front end
//!
//! Configuration is read from `devdash.toml`, `DEVDASH_*` variables, and
//! the command line, in increasing order of precedence.

pub mod api;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod logs;
pub mod poller;
pub mod shutdown;
pub mod status;
#[doc(hidden)]
pub mod testutil;
pub mod toast;
pub mod tui;
