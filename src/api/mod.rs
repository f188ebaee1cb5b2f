//! Backend access for the dashboard.
//!
//! Supports two backends:
//! - `HttpBackend`: the project manager's JSON-over-HTTP API
//! - `StubBackend`: in-memory backend for tests (no network)

mod http;
mod stub;
mod types;

pub use http::HttpBackend;
pub use stub::{StubBackend, StubCall};
pub use types::{parse_projects, CommandReply, LogsReply, Project, ProjectStatus};

/// Commands the backend accepts for a single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Start the project's process.
    Start,
    /// Stop the project's process.
    Stop,
    /// Remove the project from the manager.
    Remove,
}

impl CommandKind {
    /// Path segment used in `/api/project/{id}/{segment}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Remove => "remove",
        }
    }

    /// Generic message shown when the backend gives no usable reason.
    pub fn fallback_error(&self) -> &'static str {
        match self {
            Self::Start => "Failed to start project",
            Self::Stop => "Failed to stop project",
            Self::Remove => "Failed to remove project",
        }
    }
}

/// Errors returned by a backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend could not be reached at all (refused connection, DNS).
    #[error("backend unreachable: {0}")]
    Offline(String),

    /// The backend answered with a non-success HTTP status.
    #[error("HTTP error! Status: {0}")]
    Status(u16),

    /// Any other transport failure (timeouts, broken connections).
    #[error("transport error: {0}")]
    Transport(String),

    /// The body was not valid JSON for the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The payload carried `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The payload was valid JSON with an unexpected shape.
    #[error("unexpected data format: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Whether this failure is plain connectivity loss.
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline(_))
    }
}

/// Backend trait for the project manager API.
pub trait Backend: Send + Sync {
    /// Fetch every project with its current status.
    fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// Fetch the log lines of one project.
    fn project_logs(&self, project_id: &str) -> Result<Vec<String>, ApiError>;

    /// Issue a command for one project.
    ///
    /// A reply with `success: false` is returned as `Ok`; `Err` means no
    /// usable reply arrived.
    fn send_command(
        &self,
        project_id: &str,
        command: CommandKind,
    ) -> Result<CommandReply, ApiError>;
}
