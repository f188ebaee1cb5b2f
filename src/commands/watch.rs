use std::sync::Arc;

use anyhow::Context;

use devdash::api::Backend;
use devdash::config::Config;
use devdash::shutdown::ShutdownSignal;
use devdash::tui;

/// Run the interactive dashboard.
pub fn cmd_watch(
    config: &Config,
    backend: Arc<dyn Backend>,
    project: Option<String>,
) -> anyhow::Result<()> {
    tui::run_dashboard(config, backend, project, ShutdownSignal::new())
        .context("dashboard terminated with an error")
}
