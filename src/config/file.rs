use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::types::{Config, ConfigError};

/// Contents of devdash.toml. Every key is optional; unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct FileConfig {
    server: ServerSection,
    poll: PollSection,
    ui: UiSection,
    log: LogSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    url: Option<String>,
    connect_timeout: Option<u64>,
    request_timeout: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PollSection {
    status_interval_ms: Option<u64>,
    log_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UiSection {
    toast_delay_ms: Option<u64>,
    open_host: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LogSection {
    file: Option<PathBuf>,
}

impl FileConfig {
    /// Overwrite the values this file sets.
    pub(super) fn apply(self, config: &mut Config) {
        if let Some(url) = self.server.url {
            config.base_url = url;
        }
        if let Some(n) = self.server.connect_timeout {
            config.connect_timeout_secs = n;
        }
        if let Some(n) = self.server.request_timeout {
            config.request_timeout_secs = n;
        }
        if let Some(n) = self.poll.status_interval_ms {
            config.status_interval_ms = n;
        }
        if let Some(n) = self.poll.log_interval_ms {
            config.log_interval_ms = n;
        }
        if let Some(n) = self.ui.toast_delay_ms {
            config.toast_delay_ms = n;
        }
        if let Some(host) = self.ui.open_host {
            config.open_host = host;
        }
        if let Some(path) = self.log.file {
            config.log_file = Some(path);
        }
    }
}

pub(super) fn load_from_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    parse_toml(&content)
}

pub(super) fn parse_toml(content: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}
