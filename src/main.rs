use std::process;
use std::sync::Arc;

use anyhow::Context;

use devdash::api::{Backend, HttpBackend};
use devdash::config::{self, Command, Config};
use devdash::logging;
use devdash::shutdown;

mod commands;

fn main() {
    let cli = match config::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    // Default command is Watch if none specified
    let command = cli.command.clone().unwrap_or(Command::Watch { project: None });

    if let Err(e) = run(&cli, command) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &config::CliArgs, command: Command) -> anyhow::Result<()> {
    let config = Config::load(cli).context("failed to load configuration")?;

    // The dashboard owns the terminal, so it logs to a file
    if matches!(command, Command::Watch { .. }) {
        let path = config.log_file_path();
        logging::init_file(&path, config.verbose)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    } else {
        logging::init_stderr(config.verbose);
    }
    for warning in &config.warnings {
        tracing::warn!(event = "client.config.skipped", warning = %warning);
    }

    if let Err(e) = shutdown::register_handler() {
        tracing::warn!(event = "client.shutdown.handler_failed", error = %e);
    }

    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(
        &config.base_url,
        config.connect_timeout(),
        config.request_timeout(),
    ));

    match command {
        Command::Watch { project } => commands::cmd_watch(&config, backend, project),
        Command::Status => commands::cmd_status(backend.as_ref()),
        Command::Logs { id } => commands::cmd_logs(backend.as_ref(), &id),
        Command::Start { id } => commands::cmd_start(backend.as_ref(), &id),
        Command::Stop { id } => commands::cmd_stop(backend.as_ref(), &id),
        Command::Remove { id, yes } => commands::cmd_remove(backend.as_ref(), &id, yes),
        Command::Open { id } => commands::cmd_open(&config, backend.as_ref(), &id),
    }
}
