//! Configuration loading for devdash.
//!
//! Supports devdash.toml, environment variables, and CLI flags.
//! Precedence (highest to lowest): CLI flags > env vars > config file > defaults.

mod cli;
mod env;
mod file;
mod types;

pub use cli::{parse_args, CliArgs, Command};
pub use types::{Config, ConfigError, DEFAULT_CONFIG_FILE, DEFAULT_URL};
