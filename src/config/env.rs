use std::env;
use std::path::PathBuf;

use super::types::Config;

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|val| val.trim().parse().ok())
}

pub(super) fn apply_env(config: &mut Config) {
    if let Ok(val) = env::var("DEVDASH_URL") {
        if !val.trim().is_empty() {
            config.base_url = val.trim().to_string();
        }
    }
    if let Some(n) = parse_var("DEVDASH_CONNECT_TIMEOUT") {
        config.connect_timeout_secs = n;
    }
    if let Some(n) = parse_var("DEVDASH_REQUEST_TIMEOUT") {
        config.request_timeout_secs = n;
    }
    if let Some(n) = parse_var("DEVDASH_STATUS_INTERVAL_MS") {
        config.status_interval_ms = n;
    }
    if let Some(n) = parse_var("DEVDASH_LOG_INTERVAL_MS") {
        config.log_interval_ms = n;
    }
    if let Some(n) = parse_var("DEVDASH_TOAST_DELAY_MS") {
        config.toast_delay_ms = n;
    }
    if let Ok(val) = env::var("DEVDASH_OPEN_HOST") {
        if !val.trim().is_empty() {
            config.open_host = val.trim().to_string();
        }
    }
    if let Ok(val) = env::var("DEVDASH_LOG_FILE") {
        if !val.is_empty() {
            config.log_file = Some(PathBuf::from(val));
        }
    }
}
