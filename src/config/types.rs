use std::path::{Path, PathBuf};
use std::time::Duration;

use super::cli::CliArgs;
use super::{env, file};

/// Default backend URL (the project manager's default bind address).
pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "devdash.toml";

/// Lower bound for poll intervals and the toast delay.
const MIN_INTERVAL_MS: u64 = 100;

/// devdash configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the backend.
    pub base_url: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Status poll interval in milliseconds.
    pub status_interval_ms: u64,
    /// Log poll interval in milliseconds.
    pub log_interval_ms: u64,
    /// Toast display time in milliseconds.
    pub toast_delay_ms: u64,
    /// Host used to build the URL a running project is opened at.
    pub open_host: String,
    /// Log file for the dashboard (defaults to `<tmp>/devdash.log`).
    pub log_file: Option<PathBuf>,
    /// Debug logging.
    pub verbose: bool,
    /// Problems skipped while loading, to be logged once logging is up.
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            connect_timeout_secs: 3,
            request_timeout_secs: 10,
            status_interval_ms: 5000,
            log_interval_ms: 3000,
            toast_delay_ms: 5000,
            open_host: "localhost".to_string(),
            log_file: None,
            verbose: false,
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from all sources with proper precedence.
    ///
    /// Precedence: CLI args > env vars > config file > defaults.
    ///
    /// An explicit `--config` file must load; an implicit `./devdash.toml`
    /// that fails to load is reported and skipped.
    pub fn load(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        Self::load_with_default(cli_args, Path::new(DEFAULT_CONFIG_FILE))
    }

    /// [`Config::load`] with `default_file` as the implicit config file.
    pub(super) fn load_with_default(
        cli_args: &CliArgs,
        default_file: &Path,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ref path) = cli_args.config {
            file::load_from_file(path)?.apply(&mut config);
        } else if default_file.exists() {
            match file::load_from_file(default_file) {
                Ok(file_config) => file_config.apply(&mut config),
                Err(e) => config
                    .warnings
                    .push(format!("ignoring {}: {}", default_file.display(), e)),
            }
        }

        env::apply_env(&mut config);
        config.apply_cli(cli_args);
        Ok(config)
    }

    /// Load a config file over the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        file::load_from_file(path.as_ref())?.apply(&mut config);
        Ok(config)
    }

    /// Parse TOML content over the defaults.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        file::parse_toml(content)?.apply(&mut config);
        Ok(config)
    }

    /// Apply CLI arguments.
    pub(super) fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(ref url) = args.url {
            self.base_url = url.clone();
        }
        if let Some(n) = args.status_interval_ms {
            self.status_interval_ms = n;
        }
        if let Some(n) = args.log_interval_ms {
            self.log_interval_ms = n;
        }
        if let Some(ref path) = args.log_file {
            self.log_file = Some(path.clone());
        }
        if args.verbose {
            self.verbose = true;
        }
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms.max(MIN_INTERVAL_MS))
    }

    pub fn log_interval(&self) -> Duration {
        Duration::from_millis(self.log_interval_ms.max(MIN_INTERVAL_MS))
    }

    pub fn toast_delay(&self) -> Duration {
        Duration::from_millis(self.toast_delay_ms.max(MIN_INTERVAL_MS))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Effective dashboard log file.
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("devdash.log"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading config file.
    #[error("config I/O error: {0}")]
    Io(String),
    /// Parse error in config file.
    #[error("config parse error: {0}")]
    Parse(String),
}
