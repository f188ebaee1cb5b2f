use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI arguments parsed from the command line.
#[derive(Debug, Default, Parser)]
#[command(
    name = "devdash",
    version,
    about = "Terminal dashboard for a local dev-server project manager"
)]
pub struct CliArgs {
    /// Path to config file (default: ./devdash.toml if present).
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Base URL of the project manager backend.
    #[arg(long, global = true)]
    pub url: Option<String>,
    /// Status poll interval in milliseconds.
    #[arg(long = "status-interval", global = true, value_name = "MS")]
    pub status_interval_ms: Option<u64>,
    /// Log poll interval in milliseconds.
    #[arg(long = "log-interval", global = true, value_name = "MS")]
    pub log_interval_ms: Option<u64>,
    /// File the dashboard writes its own log to.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Subcommand to execute (default: watch).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// devdash subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive dashboard.
    Watch {
        /// Open directly on this project's detail view.
        #[arg(long, value_name = "ID")]
        project: Option<String>,
    },
    /// Print every project's status once.
    Status,
    /// Print a project's current log lines.
    Logs { id: String },
    /// Start a project.
    Start { id: String },
    /// Stop a project.
    Stop { id: String },
    /// Remove a project (asks for confirmation).
    Remove {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Open a running project in the browser.
    Open { id: String },
}

/// Parse CLI arguments. The first item is the program name.
pub fn parse_args<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(args)
}
