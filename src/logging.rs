//! Tracing setup.
//!
//! The dashboard owns the terminal, so it logs to a file. One-shot commands
//! log to stderr. `RUST_LOG` directives are honored on top of the default
//! `devdash=info` (`devdash=debug` when verbose).

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter(verbose: bool) -> EnvFilter {
    let directive = if verbose { "devdash=debug" } else { "devdash=info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Log to stderr.
pub fn init_stderr(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .with(filter(verbose))
        .try_init();
}

/// Log to `path`, appending. Parent directories are created.
pub fn init_file(path: &Path, verbose: bool) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter(verbose))
        .try_init();
    Ok(())
}
