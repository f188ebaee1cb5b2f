use crate::api::{ApiError, CommandKind, CommandReply, Project};

/// Messages delivered to the dashboard loop by background threads.
#[derive(Debug, Clone)]
pub enum TuiMessage {
    /// Result of status fetch number `seq`.
    Projects {
        seq: u64,
        result: Result<Vec<Project>, ApiError>,
    },
    /// Log lines of a successful log fetch number `seq`.
    Logs {
        seq: u64,
        project_id: String,
        lines: Vec<String>,
    },
    /// A dispatched command finished.
    CommandFinished {
        project_id: String,
        command: CommandKind,
        result: Result<CommandReply, ApiError>,
    },
}
