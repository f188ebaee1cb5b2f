use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context};

use devdash::api::{Backend, CommandKind};
use devdash::color::{self, emoji};
use devdash::config::Config;
use devdash::dispatch::{self, ControlKind, REMOVE_CONFIRMATION};
use devdash::status::ControlStates;

pub fn cmd_start(backend: &dyn Backend, project_id: &str) -> anyhow::Result<()> {
    send(backend, project_id, CommandKind::Start)
}

pub fn cmd_stop(backend: &dyn Backend, project_id: &str) -> anyhow::Result<()> {
    send(backend, project_id, CommandKind::Stop)
}

/// Remove a project, asking first unless `yes` is set.
pub fn cmd_remove(backend: &dyn Backend, project_id: &str, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm(REMOVE_CONFIRMATION)? {
        println!("{}", color::warning("Aborted."));
        return Ok(());
    }
    send(backend, project_id, CommandKind::Remove)
}

/// Open a running project in the browser.
pub fn cmd_open(config: &Config, backend: &dyn Backend, project_id: &str) -> anyhow::Result<()> {
    let projects = backend
        .list_projects()
        .context("failed to fetch project statuses")?;
    let project = projects
        .into_iter()
        .find(|p| p.id == project_id)
        .ok_or_else(|| anyhow!("no project with id {}", project_id))?;

    if !ControlKind::Open.is_enabled(&ControlStates::for_project(&project)) {
        bail!("project {} is not running on a known port", project_id);
    }
    let Some(port) = project.port else {
        bail!("project {} has no port", project_id);
    };

    let url = dispatch::project_url(&config.open_host, port);
    dispatch::open_url(&url).with_context(|| format!("failed to open {}", url))?;
    println!("{} {}", emoji::LINK, color::info(&url));
    Ok(())
}

fn send(backend: &dyn Backend, project_id: &str, command: CommandKind) -> anyhow::Result<()> {
    tracing::debug!(
        event = "client.command.sending",
        project_id,
        command = command.as_str()
    );
    let reply = match backend.send_command(project_id, command) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(
                event = "client.command.failed",
                project_id,
                command = command.as_str(),
                error = %e
            );
            bail!("{}", command.fallback_error());
        }
    };

    if reply.success {
        println!("{} {}", emoji::CHECK, color::success(&reply.message));
        Ok(())
    } else if reply.message.is_empty() {
        bail!("{}", command.fallback_error())
    } else {
        bail!("{}", reply.message)
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}
