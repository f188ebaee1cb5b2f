use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::ApiError;

/// Lifecycle state reported by the backend for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectStatus {
    Running,
    Stopped,
    Error,
    /// Missing or unrecognized status string.
    #[default]
    Unknown,
}

impl ProjectStatus {
    /// Parse a status string. Anything unrecognized is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for ProjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::parse).unwrap_or_default())
    }
}

/// A project as reported by `GET /api/projects`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Numbers and numeric strings are both accepted.
    #[serde(default, deserialize_with = "lenient_port")]
    pub port: Option<u16>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub entry_file: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub added_date: Option<String>,
}

impl Project {
    /// Create a project with only an id and a status.
    pub fn new(id: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            id: id.into(),
            status,
            port: None,
            name: None,
            path: None,
            entry_file: None,
            added_date: None,
        }
    }

    /// Builder-style port setter.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Builder-style name setter.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.id)
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Decode the `/api/projects` payload.
///
/// Accepts an array of projects (order kept) or a mapping keyed by project
/// id (ordered by key). An object carrying `success: false` is rejected with
/// its message. Records that do not decode are skipped.
pub fn parse_projects(value: Value) -> Result<Vec<Project>, ApiError> {
    let records: Vec<(Value, Option<String>)> = match value {
        Value::Array(items) => items.into_iter().map(|item| (item, None)).collect(),
        Value::Object(map) => {
            if map.get("success") == Some(&Value::Bool(false)) {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .unwrap_or("Unknown error");
                return Err(ApiError::Rejected(message.to_string()));
            }
            map.into_iter().map(|(key, item)| (item, Some(key))).collect()
        }
        other => {
            return Err(ApiError::Malformed(format!(
                "expected a list or mapping of projects, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(records
        .into_iter()
        .filter_map(|(item, key)| match decode_project(item, key) {
            Ok(project) => Some(project),
            Err(e) => {
                tracing::warn!(event = "client.status.record_skipped", error = %e);
                None
            }
        })
        .collect())
}

fn decode_project(item: Value, key: Option<String>) -> Result<Project, ApiError> {
    let mut project: Project =
        serde_json::from_value(item).map_err(|e| ApiError::Malformed(e.to_string()))?;
    if project.id.is_empty() {
        project.id = key.unwrap_or_default();
    }
    if project.id.is_empty() {
        return Err(ApiError::Malformed("project record without an id".to_string()));
    }
    Ok(project)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reply of `GET /api/project/{id}/logs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsReply {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub logs: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LogsReply {
    /// Lines to display. Only an explicit `success: true` yields lines.
    pub fn into_lines(self) -> Result<Vec<String>, ApiError> {
        match self.success {
            Some(false) => Err(ApiError::Rejected(
                self.message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )),
            Some(true) => Ok(self.logs.unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }
}

/// Reply of `POST /api/project/{id}/{start|stop|remove}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
}

impl CommandReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parse() {
        assert_eq!(ProjectStatus::parse("running"), ProjectStatus::Running);
        assert_eq!(ProjectStatus::parse("stopped"), ProjectStatus::Stopped);
        assert_eq!(ProjectStatus::parse("error"), ProjectStatus::Error);
        assert_eq!(ProjectStatus::parse("starting"), ProjectStatus::Unknown);
        assert_eq!(ProjectStatus::parse(""), ProjectStatus::Unknown);
    }

    #[test]
    fn test_parse_array_keeps_order() {
        let projects = parse_projects(json!([
            {"id": "b", "status": "running", "port": 8001},
            {"id": "a", "status": "stopped"}
        ]))
        .unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, "b");
        assert_eq!(projects[0].status, ProjectStatus::Running);
        assert_eq!(projects[0].port, Some(8001));
        assert_eq!(projects[1].id, "a");
        assert_eq!(projects[1].port, None);
    }

    #[test]
    fn test_parse_mapping_takes_id_from_key() {
        let projects = parse_projects(json!({
            "zeta": {"status": "error"},
            "alpha": {"id": "alpha", "status": "running", "port": "5001"}
        }))
        .unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, "alpha");
        assert_eq!(projects[0].port, Some(5001));
        assert_eq!(projects[1].id, "zeta");
        assert_eq!(projects[1].status, ProjectStatus::Error);
    }

    #[test]
    fn test_parse_error_flagged_payload() {
        let err = parse_projects(json!({"success": false, "message": "db locked"})).unwrap_err();
        assert_eq!(err, ApiError::Rejected("db locked".to_string()));

        let err = parse_projects(json!({"success": false})).unwrap_err();
        assert_eq!(err, ApiError::Rejected("Unknown error".to_string()));
    }

    #[test]
    fn test_parse_malformed_payloads() {
        assert!(matches!(parse_projects(json!("nope")), Err(ApiError::Malformed(_))));
        assert!(matches!(parse_projects(json!(null)), Err(ApiError::Malformed(_))));
        assert_eq!(parse_projects(json!([{"status": "running"}])), Ok(Vec::new()));
        assert_eq!(parse_projects(json!({"a": 3})), Ok(Vec::new()));
    }

    #[test]
    fn test_bad_records_do_not_discard_siblings() {
        let projects = parse_projects(json!([
            {"id": "a", "status": "running"},
            {"status": "stopped"},
            "garbage",
            {"id": "b", "status": "stopped", "name": 42, "path": ["x"]}
        ]))
        .unwrap();

        let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(projects[0].status, ProjectStatus::Running);
        assert_eq!(projects[1].name.as_deref(), Some("42"));
        assert_eq!(projects[1].path, None);
    }

    #[test]
    fn test_bad_mapping_entry_is_skipped() {
        let projects = parse_projects(json!({
            "good": {"status": "running"},
            "bad": 7
        }))
        .unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, "good");
    }

    #[test]
    fn test_unknown_and_missing_status() {
        let projects = parse_projects(json!([
            {"id": "x", "status": "booting"},
            {"id": "y"},
            {"id": "z", "status": null}
        ]))
        .unwrap();
        assert!(projects.iter().all(|p| p.status == ProjectStatus::Unknown));
    }

    #[test]
    fn test_out_of_range_port_is_dropped() {
        let projects = parse_projects(json!([{"id": "x", "port": 70000}])).unwrap();
        assert_eq!(projects[0].port, None);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let bare = Project::new("abc", ProjectStatus::Stopped);
        assert_eq!(bare.display_name(), "abc");
        let named = bare.with_name("Blog");
        assert_eq!(named.display_name(), "Blog");
    }

    #[test]
    fn test_logs_reply_lines() {
        let reply: LogsReply =
            serde_json::from_value(json!({"success": true, "logs": ["a", "b"]})).unwrap();
        assert_eq!(reply.into_lines().unwrap(), vec!["a", "b"]);

        let reply: LogsReply =
            serde_json::from_value(json!({"success": false, "message": "gone"})).unwrap();
        assert_eq!(reply.into_lines().unwrap_err(), ApiError::Rejected("gone".into()));

        let reply: LogsReply = serde_json::from_value(json!({"logs": ["a"]})).unwrap();
        assert!(reply.into_lines().unwrap().is_empty());
    }

    #[test]
    fn test_command_reply_defaults() {
        let reply: CommandReply = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(reply, CommandReply::ok(""));
    }
}
