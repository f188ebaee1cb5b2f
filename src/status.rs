//! Project status reconciliation.
//!
//! Maps each fetched project onto a status row (badge + control states) and
//! decides how loudly a failed fetch gets reported.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::api::{ApiError, Project, ProjectStatus};

/// Body of the toast raised when the status fetch fails for a reason other
/// than connectivity loss.
pub const STATUS_FAILURE_MESSAGE: &str = "Failed to fetch project statuses. Check server logs.";

/// Minimum spacing between "backend offline" log entries.
pub const OFFLINE_LOG_INTERVAL: Duration = Duration::from_secs(30);

/// Badge color class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Success,
    Secondary,
    Danger,
    Warning,
}

/// Small colored status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub style: BadgeStyle,
    pub label: &'static str,
}

impl Badge {
    pub fn for_status(status: ProjectStatus) -> Self {
        let (style, label) = match status {
            ProjectStatus::Running => (BadgeStyle::Success, "Running"),
            ProjectStatus::Stopped => (BadgeStyle::Secondary, "Stopped"),
            ProjectStatus::Error => (BadgeStyle::Danger, "Error"),
            ProjectStatus::Unknown => (BadgeStyle::Warning, "Unknown"),
        };
        Self { style, label }
    }
}

/// Enabled state of a row's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlStates {
    pub start: bool,
    pub stop: bool,
    /// Opening needs a running process with a known port.
    pub open: bool,
    pub remove: bool,
}

impl ControlStates {
    pub fn for_project(project: &Project) -> Self {
        let running = project.status == ProjectStatus::Running;
        Self {
            start: !running,
            stop: running,
            open: running && project.port.is_some(),
            remove: true,
        }
    }
}

/// One rendered project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub project: Project,
    pub badge: Badge,
    pub controls: ControlStates,
}

impl StatusRow {
    pub fn new(project: Project) -> Self {
        Self {
            badge: Badge::for_status(project.status),
            controls: ControlStates::for_project(&project),
            project,
        }
    }

    pub fn id(&self) -> &str {
        &self.project.id
    }
}

/// Rendered status of every project, as of the newest applied fetch.
#[derive(Debug, Default)]
pub struct StatusBoard {
    rows: Vec<StatusRow>,
    applied_seq: Option<u64>,
    updated_at: Option<DateTime<Local>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the result of fetch number `seq`.
    ///
    /// Returns false (and changes nothing) when a newer fetch was already
    /// applied.
    pub fn apply(&mut self, seq: u64, projects: Vec<Project>) -> bool {
        if self.applied_seq.is_some_and(|applied| seq <= applied) {
            tracing::debug!(event = "client.status.stale_dropped", seq);
            return false;
        }
        self.applied_seq = Some(seq);
        self.rows = projects.into_iter().map(StatusRow::new).collect();
        self.updated_at = Some(Local::now());
        true
    }

    pub fn rows(&self) -> &[StatusRow] {
        &self.rows
    }

    pub fn row(&self, project_id: &str) -> Option<&StatusRow> {
        self.rows.iter().find(|r| r.id() == project_id)
    }

    pub fn is_loaded(&self) -> bool {
        self.applied_seq.is_some()
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }
}

/// Rate limiting for status-fetch failure reports.
///
/// Offline failures are only logged, at most once per [`OFFLINE_LOG_INTERVAL`].
/// Other failures raise one toast per failure streak; a successful fetch ends
/// the streak.
#[derive(Debug)]
pub struct StatusReporter {
    offline_logged_at: Option<Instant>,
    offline_log_interval: Duration,
    streak_reported: bool,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter {
    pub fn new() -> Self {
        Self {
            offline_logged_at: None,
            offline_log_interval: OFFLINE_LOG_INTERVAL,
            streak_reported: false,
        }
    }

    /// Record a failed fetch. Returns true when a toast should be raised.
    pub fn on_failure(&mut self, err: &ApiError, now: Instant) -> bool {
        if err.is_offline() {
            let due = self
                .offline_logged_at
                .map_or(true, |at| now.duration_since(at) >= self.offline_log_interval);
            if due {
                tracing::warn!(event = "client.status.backend_offline", error = %err);
                self.offline_logged_at = Some(now);
            }
            return false;
        }

        if self.streak_reported {
            tracing::debug!(event = "client.status.fetch_failed", error = %err);
            return false;
        }
        tracing::error!(event = "client.status.fetch_failed", error = %err);
        self.streak_reported = true;
        true
    }

    /// Record a successful fetch.
    pub fn on_success(&mut self) {
        if self.offline_logged_at.take().is_some() || self.streak_reported {
            tracing::info!(event = "client.status.recovered");
        }
        self.streak_reported = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, status: ProjectStatus) -> Project {
        Project::new(id, status).with_port(8000)
    }

    #[test]
    fn test_running_row() {
        let row = StatusRow::new(project("a", ProjectStatus::Running));
        assert_eq!(row.badge, Badge { style: BadgeStyle::Success, label: "Running" });
        assert!(!row.controls.start);
        assert!(row.controls.stop);
        assert!(row.controls.open);
        assert!(row.controls.remove);
    }

    #[test]
    fn test_not_running_rows() {
        let cases = [
            (ProjectStatus::Stopped, BadgeStyle::Secondary, "Stopped"),
            (ProjectStatus::Error, BadgeStyle::Danger, "Error"),
            (ProjectStatus::Unknown, BadgeStyle::Warning, "Unknown"),
        ];
        for (status, style, label) in cases {
            let row = StatusRow::new(project("a", status));
            assert_eq!(row.badge.style, style);
            assert_eq!(row.badge.label, label);
            assert!(row.controls.start, "{label}: start should be enabled");
            assert!(!row.controls.stop, "{label}: stop should be disabled");
            assert!(!row.controls.open, "{label}: open should be disabled");
        }
    }

    #[test]
    fn test_open_needs_port() {
        let row = StatusRow::new(Project::new("a", ProjectStatus::Running));
        assert!(!row.controls.open);
    }

    #[test]
    fn test_apply_replaces_rows() {
        let mut board = StatusBoard::new();
        assert!(!board.is_loaded());

        let rows = vec![
            project("a", ProjectStatus::Running),
            project("b", ProjectStatus::Stopped),
        ];
        assert!(board.apply(1, rows));
        assert_eq!(board.rows().len(), 2);
        assert!(board.is_loaded());
        assert!(board.updated_at().is_some());

        assert!(board.apply(2, vec![project("a", ProjectStatus::Stopped)]));
        assert_eq!(board.rows().len(), 1);
        assert_eq!(board.row("a").unwrap().badge.label, "Stopped");
        assert!(board.row("b").is_none());
    }

    #[test]
    fn test_stale_result_ignored() {
        let mut board = StatusBoard::new();
        board.apply(5, vec![project("a", ProjectStatus::Running)]);

        assert!(!board.apply(4, vec![project("a", ProjectStatus::Stopped)]));
        assert!(!board.apply(5, vec![]));
        assert_eq!(board.row("a").unwrap().badge.label, "Running");
    }

    #[test]
    fn test_offline_never_toasts() {
        let mut reporter = StatusReporter::new();
        let now = Instant::now();
        let err = ApiError::Offline("connection refused".into());
        for i in 0..5 {
            assert!(!reporter.on_failure(&err, now + Duration::from_secs(i * 40)));
        }
    }

    #[test]
    fn test_offline_log_is_rate_limited() {
        let mut reporter = StatusReporter::new();
        let start = Instant::now();
        let err = ApiError::Offline("connection refused".into());

        reporter.on_failure(&err, start);
        assert_eq!(reporter.offline_logged_at, Some(start));

        reporter.on_failure(&err, start + Duration::from_secs(5));
        assert_eq!(reporter.offline_logged_at, Some(start));

        let later = start + OFFLINE_LOG_INTERVAL;
        reporter.on_failure(&err, later);
        assert_eq!(reporter.offline_logged_at, Some(later));
    }

    #[test]
    fn test_failure_toasts_once_per_streak() {
        let mut reporter = StatusReporter::new();
        let now = Instant::now();
        let err = ApiError::Rejected("db locked".into());

        assert!(reporter.on_failure(&err, now));
        assert!(!reporter.on_failure(&err, now));
        assert!(!reporter.on_failure(&ApiError::Status(500), now));

        reporter.on_success();
        assert!(reporter.on_failure(&ApiError::Status(500), now));
    }
}
