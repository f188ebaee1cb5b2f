use std::time::Duration;

use serde_json::Value;

use super::types::{parse_projects, CommandReply, LogsReply, Project};
use super::{ApiError, Backend, CommandKind};

/// Backend speaking the project manager's JSON-over-HTTP API.
pub struct HttpBackend {
    agent: ureq::Agent,
    /// Base URL without a trailing slash (e.g. `http://127.0.0.1:5000`).
    base_url: String,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url`.
    pub fn new(base_url: &str, connect_timeout: Duration, request_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout(request_timeout)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_url(&self, project_id: &str, action: &str) -> String {
        format!(
            "{}/api/project/{}/{}",
            self.base_url,
            urlencoding::encode(project_id),
            action
        )
    }

    fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        tracing::debug!(event = "client.http.get", url = %url);
        let response = self.agent.get(url).call().map_err(map_error)?;
        response
            .into_json::<Value>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl Backend for HttpBackend {
    fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let value = self.get_json(&format!("{}/api/projects", self.base_url))?;
        parse_projects(value)
    }

    fn project_logs(&self, project_id: &str) -> Result<Vec<String>, ApiError> {
        let value = self.get_json(&self.project_url(project_id, "logs"))?;
        let reply: LogsReply =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        reply.into_lines()
    }

    fn send_command(
        &self,
        project_id: &str,
        command: CommandKind,
    ) -> Result<CommandReply, ApiError> {
        let url = self.project_url(project_id, command.as_str());
        tracing::debug!(event = "client.http.post", url = %url);

        let response = match self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .call()
        {
            Ok(response) => response,
            // Error statuses still carry `{success, message}` from the backend
            Err(ureq::Error::Status(code, response)) => {
                return response
                    .into_json::<CommandReply>()
                    .map_err(|_| ApiError::Status(code));
            }
            Err(e) => return Err(map_error(e)),
        };

        response
            .into_json::<CommandReply>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn map_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(code, _) => ApiError::Status(code),
        ureq::Error::Transport(transport) => match transport.kind() {
            ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Dns => {
                ApiError::Offline(transport.to_string())
            }
            _ => ApiError::Transport(transport.to_string()),
        },
    }
}
