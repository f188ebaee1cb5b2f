use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use super::types::{CommandReply, Project};
use super::{ApiError, Backend, CommandKind};

/// A call recorded by [`StubBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubCall {
    ListProjects,
    ProjectLogs(String),
    Command(String, CommandKind),
}

#[derive(Default)]
struct StubState {
    projects: Vec<Project>,
    logs: HashMap<String, Vec<String>>,
    list_failure: Option<ApiError>,
    logs_failure: Option<ApiError>,
    logs_delay: Option<Duration>,
    command_replies: HashMap<CommandKind, Result<CommandReply, ApiError>>,
    calls: Vec<StubCall>,
}

/// Stub backend for testing.
///
/// Serves canned projects, logs and command replies without network calls,
/// and records every call it receives.
#[derive(Default)]
pub struct StubBackend {
    state: Mutex<StubState>,
}

impl StubBackend {
    /// Create an empty stub backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stub backend serving the given projects.
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let stub = Self::new();
        stub.set_projects(projects);
        stub
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_projects(&self, projects: Vec<Project>) {
        self.lock().projects = projects;
    }

    pub fn set_logs(&self, project_id: &str, lines: Vec<String>) {
        self.lock().logs.insert(project_id.to_string(), lines);
    }

    /// Make `list_projects` fail until cleared with `None`.
    pub fn fail_list(&self, error: Option<ApiError>) {
        self.lock().list_failure = error;
    }

    /// Make `project_logs` fail until cleared with `None`.
    pub fn fail_logs(&self, error: Option<ApiError>) {
        self.lock().logs_failure = error;
    }

    /// Make every `project_logs` call take at least `delay`.
    pub fn delay_logs(&self, delay: Option<Duration>) {
        self.lock().logs_delay = delay;
    }

    /// Set the reply returned for a command kind.
    ///
    /// Unset kinds answer with a successful generic reply.
    pub fn set_command_reply(&self, command: CommandKind, reply: Result<CommandReply, ApiError>) {
        self.lock().command_replies.insert(command, reply);
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<StubCall> {
        self.lock().calls.clone()
    }

    /// Number of `list_projects` calls received so far.
    pub fn list_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| **c == StubCall::ListProjects)
            .count()
    }
}

impl Backend for StubBackend {
    fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let mut state = self.lock();
        state.calls.push(StubCall::ListProjects);
        match &state.list_failure {
            Some(err) => Err(err.clone()),
            None => Ok(state.projects.clone()),
        }
    }

    fn project_logs(&self, project_id: &str) -> Result<Vec<String>, ApiError> {
        let delay = {
            let mut state = self.lock();
            state.calls.push(StubCall::ProjectLogs(project_id.to_string()));
            state.logs_delay
        };
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        let state = self.lock();
        if let Some(err) = &state.logs_failure {
            return Err(err.clone());
        }
        Ok(state.logs.get(project_id).cloned().unwrap_or_default())
    }

    fn send_command(
        &self,
        project_id: &str,
        command: CommandKind,
    ) -> Result<CommandReply, ApiError> {
        let mut state = self.lock();
        state
            .calls
            .push(StubCall::Command(project_id.to_string(), command));
        match state.command_replies.get(&command) {
            Some(reply) => reply.clone(),
            None => Ok(CommandReply::ok(format!(
                "Project {} {}",
                project_id,
                command.as_str()
            ))),
        }
    }
}
