use anyhow::Context;

use devdash::api::Backend;
use devdash::color::{self, emoji};
use devdash::status::StatusRow;

/// Print every project's status once.
pub fn cmd_status(backend: &dyn Backend) -> anyhow::Result<()> {
    let projects = backend
        .list_projects()
        .context("failed to fetch project statuses")?;

    println!("{} {}:", emoji::PACKAGE, color::label("Projects"));
    if projects.is_empty() {
        println!("  (no projects)");
        return Ok(());
    }

    for project in projects {
        let row = StatusRow::new(project);
        let port = row
            .project
            .port
            .map(|p| format!(":{}", p))
            .unwrap_or_default();
        println!(
            "  {}  {:<24} {} {}",
            color::badge(&row.badge),
            row.project.display_name(),
            color::timestamp(row.id()),
            color::number(port),
        );
    }
    Ok(())
}

/// Print a project's current log lines.
pub fn cmd_logs(backend: &dyn Backend, project_id: &str) -> anyhow::Result<()> {
    let lines = backend
        .project_logs(project_id)
        .with_context(|| format!("failed to fetch logs for {}", project_id))?;

    if lines.is_empty() {
        println!("{}", color::timestamp("(no log output)"));
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
