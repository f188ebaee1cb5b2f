//! Command dispatch for project controls.
//!
//! A control activation resolves to a [`Control`] (kind + project id). Backend
//! commands run on a short-lived thread and report back through the
//! dashboard channel; [`outcome_effects`] turns the outcome into UI effects.

use std::io;
use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::api::{ApiError, Backend, CommandKind, CommandReply};
use crate::status::{ControlStates, StatusBoard};
use crate::toast::ToastKind;
use crate::tui::TuiMessage;

/// Prompt shown before a remove command is issued.
pub const REMOVE_CONFIRMATION: &str = "Are you sure you want to remove this project?";

/// Kinds of per-project controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Start,
    Stop,
    Open,
    Remove,
}

impl ControlKind {
    /// The backend command behind this control, if any.
    pub fn command(&self) -> Option<CommandKind> {
        match self {
            Self::Start => Some(CommandKind::Start),
            Self::Stop => Some(CommandKind::Stop),
            Self::Remove => Some(CommandKind::Remove),
            Self::Open => None,
        }
    }

    pub fn is_enabled(&self, controls: &ControlStates) -> bool {
        match self {
            Self::Start => controls.start,
            Self::Stop => controls.stop,
            Self::Open => controls.open,
            Self::Remove => controls.remove,
        }
    }
}

/// A control bound to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub kind: ControlKind,
    pub project_id: String,
}

impl Control {
    /// Resolve an activation against the rendered board. Returns `None` for
    /// unknown projects and disabled controls.
    pub fn resolve(board: &StatusBoard, project_id: &str, kind: ControlKind) -> Option<Self> {
        let row = board.row(project_id)?;
        if !kind.is_enabled(&row.controls) {
            return None;
        }
        Some(Self {
            kind,
            project_id: project_id.to_string(),
        })
    }

    /// Whether a confirmation must be accepted before dispatch.
    pub fn needs_confirmation(&self) -> bool {
        self.kind == ControlKind::Remove
    }
}

/// UI effect of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Toast {
        title: String,
        body: String,
        kind: ToastKind,
    },
    /// Fetch statuses immediately.
    RefreshStatuses,
    /// Leave the detail view and reload the project list.
    NavigateToList,
}

impl Effect {
    fn toast(title: &str, body: &str, kind: ToastKind) -> Self {
        Self::Toast {
            title: title.to_string(),
            body: body.to_string(),
            kind,
        }
    }
}

/// Effects of a finished command.
///
/// Start/stop success refreshes statuses exactly once; remove success
/// navigates back to the list. Failures toast the server message, or the
/// command's generic fallback.
pub fn outcome_effects(
    command: CommandKind,
    result: &Result<CommandReply, ApiError>,
) -> Vec<Effect> {
    match result {
        Ok(reply) if reply.success => {
            let follow_up = match command {
                CommandKind::Start | CommandKind::Stop => Effect::RefreshStatuses,
                CommandKind::Remove => Effect::NavigateToList,
            };
            vec![Effect::toast("Success", &reply.message, ToastKind::Success), follow_up]
        }
        Ok(reply) => {
            let body = if reply.message.is_empty() {
                command.fallback_error()
            } else {
                reply.message.as_str()
            };
            vec![Effect::toast("Error", body, ToastKind::Danger)]
        }
        Err(_) => vec![Effect::toast("Error", command.fallback_error(), ToastKind::Danger)],
    }
}

/// Runs backend commands off the UI thread.
#[derive(Clone)]
pub struct CommandDispatcher {
    backend: Arc<dyn Backend>,
    tx: Sender<TuiMessage>,
}

impl CommandDispatcher {
    pub fn new(backend: Arc<dyn Backend>, tx: Sender<TuiMessage>) -> Self {
        Self { backend, tx }
    }

    /// Issue `command` for `project_id`. The outcome arrives as
    /// [`TuiMessage::CommandFinished`].
    pub fn dispatch(&self, project_id: &str, command: CommandKind) -> io::Result<JoinHandle<()>> {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let project_id = project_id.to_string();

        tracing::info!(
            event = "client.command.dispatched",
            project_id = %project_id,
            command = command.as_str()
        );

        thread::Builder::new()
            .name(format!("command-{}", command.as_str()))
            .spawn(move || {
                let result = backend.send_command(&project_id, command);
                match &result {
                    Ok(reply) => tracing::info!(
                        event = "client.command.completed",
                        project_id = %project_id,
                        command = command.as_str(),
                        success = reply.success,
                        message = %reply.message
                    ),
                    Err(e) => tracing::error!(
                        event = "client.command.failed",
                        project_id = %project_id,
                        command = command.as_str(),
                        error = %e
                    ),
                }
                let _ = tx.send(TuiMessage::CommandFinished {
                    project_id,
                    command,
                    result,
                });
            })
    }
}

/// URL a running project serves on.
pub fn project_url(host: &str, port: u16) -> String {
    format!("http://{}:{}", host, port)
}

/// Open a URL in the system browser.
pub fn open_url(url: &str) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    };

    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    tracing::info!(event = "client.open.launched", url = %url);
    Ok(())
}
