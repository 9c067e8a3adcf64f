//! Timers and manual time entries.

use super::{copy_strings, date_field, parse_action, require_workspace, respond, with_status, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::ids::to_epoch_millis;
use crate::json::{pretty, JsonExt};
use serde_json::{json, Map, Value};
use std::str::FromStr;
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("action", "Action: \"start\", \"stop\", \"log\", \"list\", or \"current\".")
        .required(),
    Param::string("taskId", "Task ID (required for start, log, list)."),
    Param::string("duration", "Duration in milliseconds (required for log action)."),
    Param::string("start", "Start time in ISO 8601 format (required for log action)."),
    Param::string("description", "Description for the time entry."),
    Param::boolean("billable", "Whether the time is billable."),
    Param::string("tags", "Comma-separated tag names for the time entry."),
    Param::string("workspaceId", "Workspace ID. Uses configured default if omitted."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Start,
    Stop,
    Log,
    List,
    Current,
}

impl Action {
    const NAMES: &'static [&'static str] = &["start", "stop", "log", "list", "current"];
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "log" => Ok(Self::Log),
            "list" => Ok(Self::List),
            "current" => Ok(Self::Current),
            _ => Err(Error::unknown_action(s, Self::NAMES)),
        }
    }
}

/// Render a millisecond duration as minutes with one decimal, e.g. `1.5 min`.
#[allow(clippy::cast_precision_loss)]
fn format_minutes(millis: i64) -> String {
    let minutes = (millis as f64 / 60_000.0 * 10.0).round() / 10.0;
    format!("{minutes} min")
}

/// The fields of a timer response worth showing: `{id, task, description, start, duration, billable}`.
///
/// Timer endpoints wrap the entry in `data`; some answer with it bare.
fn entry_summary(result: &Value) -> Value {
    let entry = result.at(&["data"]).unwrap_or(result);
    let task = entry
        .opt_str_at(&["task", "name"])
        .or_else(|| entry.opt_str_at(&["task", "id"]))
        .or_else(|| entry.opt_str_at(&["tid"]))
        .or_else(|| entry.opt_str_at(&["task_id"]))
        .unwrap_or_default();
    json!({
        "id": entry.str_at(&["id"]),
        "task": task,
        "description": entry.str_at(&["description"]),
        "start": date_field(entry, &["start"], json!("")),
        "duration": entry.i64_at(&["duration"]).map(format_minutes).unwrap_or_default(),
        "billable": entry.bool_at(&["billable"]),
    })
}

/// `clickup_time_tracking`
pub struct TimeTracking {
    client: Arc<ClickUpClient>,
}

impl TimeTracking {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let action = parse_action(args, Action::NAMES, None)?;
        if action == Action::List {
            return self.list(args);
        }

        let workspace_id = require_workspace(&self.client, args, "time tracking")?;
        match action {
            Action::Start => self.start(&workspace_id, args),
            Action::Stop => {
                let result = self.client.stop_time_entry(&workspace_id)?;
                Ok(with_status("Timer stopped.", &entry_summary(&result)))
            }
            Action::Log => self.log(&workspace_id, args),
            Action::Current => self.current(&workspace_id),
            Action::List => self.list(args),
        }
    }

    /// Optional entry fields shared by `start` and `log`.
    fn entry_fields(args: &ToolArgs, body: &mut Map<String, Value>) {
        copy_strings(args, body, &[("description", "description")]);
        if let Some(billable) = args.bool("billable") {
            body.insert("billable".to_string(), Value::Bool(billable));
        }
        if let Some(tags) = args.list("tags") {
            let tags: Vec<Value> = tags.into_iter().map(|name| json!({"name": name})).collect();
            body.insert("tags".to_string(), Value::Array(tags));
        }
    }

    fn start(&self, workspace_id: &str, args: &ToolArgs) -> Result<String> {
        let task_id = args
            .str("taskId")
            .ok_or_else(|| Error::validation("taskId is required for start action."))?;

        let mut body = Map::new();
        Self::entry_fields(args, &mut body);

        let result = self.client.start_time_entry(workspace_id, &task_id, body)?;
        Ok(with_status(&format!("Timer started on task '{task_id}'."), &entry_summary(&result)))
    }

    fn log(&self, workspace_id: &str, args: &ToolArgs) -> Result<String> {
        let task_id = args
            .str("taskId")
            .ok_or_else(|| Error::validation("taskId is required for log action."))?;
        let start = args
            .str("start")
            .ok_or_else(|| Error::validation("start time is required for log action (ISO 8601)."))?;
        let duration = args
            .int("duration")?
            .filter(|d| *d != 0)
            .ok_or_else(|| Error::validation("duration is required in milliseconds."))?;

        let mut body = Map::new();
        body.insert("tid".to_string(), Value::String(task_id));
        body.insert("start".to_string(), json!(to_epoch_millis(&start)?));
        body.insert("duration".to_string(), json!(duration));
        Self::entry_fields(args, &mut body);

        let result = self.client.add_time_entry(workspace_id, body)?;
        Ok(with_status("Time entry logged.", &entry_summary(&result)))
    }

    fn list(&self, args: &ToolArgs) -> Result<String> {
        let task_id = args
            .str("taskId")
            .ok_or_else(|| Error::validation("taskId is required for list action."))?;

        let result = self.client.get_task_time_entries(&task_id)?;
        let entries = result.array_at(&["data"]);
        if entries.is_empty() {
            return Ok("No time entries found for this task.".to_string());
        }

        let entries: Vec<Value> = entries
            .iter()
            .map(|e| {
                json!({
                    "id": e.str_at(&["id"]),
                    "user": e.str_at(&["user", "username"]),
                    "duration": e.i64_at(&["duration"]).map(format_minutes).unwrap_or_default(),
                    "description": e.str_at(&["description"]),
                    "start": date_field(e, &["start"], json!("")),
                    "end": date_field(e, &["end"], json!("")),
                    "billable": e.bool_at(&["billable"]),
                })
            })
            .collect();
        Ok(pretty(&json!({"count": entries.len(), "entries": entries})))
    }

    fn current(&self, workspace_id: &str) -> Result<String> {
        let result = self.client.get_current_time_entry(workspace_id)?;
        let Some(data) = result.at(&["data"]).filter(|d| d.as_object().is_some_and(|o| !o.is_empty()))
        else {
            return Ok("No timer is currently running.".to_string());
        };

        Ok(with_status("Currently running timer:", &entry_summary(data)))
    }
}

impl Tool for TimeTracking {
    fn name(&self) -> &'static str {
        "clickup_time_tracking"
    }

    fn description(&self) -> &'static str {
        "Manage time tracking on ClickUp tasks. Actions:\n\
         - **start**: Start a timer on a task.\n\
         - **stop**: Stop the currently running timer.\n\
         - **log**: Add a manual time entry.\n\
         - **list**: Get all time entries for a task.\n\
         - **current**: Get the currently running time entry."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "with time tracking", || self.run(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Credentials;
    use crate::testing::{mock_client, mock_client_with};

    fn args(value: Value) -> ToolArgs {
        ToolArgs::from_value(value)
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(3_600_000), "60 min");
        assert_eq!(format_minutes(90_000), "1.5 min");
        assert_eq!(format_minutes(100_000), "1.7 min");
    }

    #[test]
    fn test_start_timer() {
        let (client, mock) = mock_client();
        mock.respond(json!({"data": {"id": "te1"}}));

        let out = TimeTracking::new(Arc::new(client)).handle(&args(json!({
            "action": "start",
            "taskId": "abc",
            "billable": true,
            "tags": "dev, review"
        })));

        assert!(out.starts_with("Timer started on task 'abc'.\n"));
        assert!(out.contains("\"id\": \"te1\""));
        let request = mock.last_request();
        assert_eq!(request.path, "/team/999/time_entries/start");
        assert_eq!(
            request.body,
            Some(json!({
                "tid": "abc",
                "billable": true,
                "tags": [{"name": "dev"}, {"name": "review"}]
            }))
        );
    }

    #[test]
    fn test_stop_shows_entry_fields_only() {
        let (client, mock) = mock_client();
        mock.respond(json!({"data": {
            "id": "te1",
            "task": {"id": "abc", "name": "Fix", "custom_type": null},
            "user": {"id": 5, "email": "ana@example.com"},
            "start": "1773585000000",
            "duration": "5400000",
            "billable": true,
            "source": "clickup"
        }}));

        let out = TimeTracking::new(Arc::new(client)).handle(&args(json!({"action": "stop"})));

        assert!(out.starts_with("Timer stopped.\n"));
        let projection: Value = serde_json::from_str(out.split_once('\n').unwrap().1).unwrap();
        assert_eq!(
            projection,
            json!({
                "id": "te1",
                "task": "Fix",
                "description": "",
                "start": "2026-03-15T14:30:00Z",
                "duration": "90 min",
                "billable": true
            })
        );
        assert_eq!(mock.last_request().path, "/team/999/time_entries/stop");
    }

    #[test]
    fn test_log_requires_fields_in_order() {
        let (client, mock) = mock_client();
        let tool = TimeTracking::new(Arc::new(client));

        assert_eq!(
            tool.handle(&args(json!({"action": "log"}))),
            "Error: taskId is required for log action."
        );
        assert_eq!(
            tool.handle(&args(json!({"action": "log", "taskId": "a"}))),
            "Error: start time is required for log action (ISO 8601)."
        );
        assert_eq!(
            tool.handle(&args(json!({"action": "log", "taskId": "a", "start": "2026-03-15"}))),
            "Error: duration is required in milliseconds."
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_log_entry() {
        let (client, mock) = mock_client();
        let out = TimeTracking::new(Arc::new(client)).handle(&args(json!({
            "action": "log",
            "taskId": "abc",
            "start": "2026-03-15T14:30:00",
            "duration": "3600000"
        })));

        assert!(out.starts_with("Time entry logged."));
        assert_eq!(
            mock.last_request().body,
            Some(json!({"tid": "abc", "start": 1_773_585_000_000_i64, "duration": 3_600_000}))
        );
    }

    #[test]
    fn test_list_works_without_workspace() {
        let (client, mock) = mock_client_with(Credentials::new("pk_test", None));
        mock.respond(json!({"data": [
            {"id": "e1", "user": {"username": "ana"}, "duration": "5400000", "start": "0", "billable": true}
        ]}));

        let out = TimeTracking::new(Arc::new(client))
            .handle(&args(json!({"action": "list", "taskId": "abc"})));
        let parsed: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["entries"][0]["duration"], "90 min");
        assert_eq!(parsed["entries"][0]["end"], "");
        assert_eq!(mock.last_request().path, "/task/abc/time");
    }

    #[test]
    fn test_other_actions_need_workspace() {
        let (client, mock) = mock_client_with(Credentials::new("pk_test", None));
        let out = TimeTracking::new(Arc::new(client)).handle(&args(json!({"action": "stop"})));
        assert_eq!(
            out,
            "Error: Workspace ID is required for time tracking. Configure it in settings or pass workspaceId."
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_current_timer() {
        let (client, mock) = mock_client();
        mock.respond(json!({"data": {"id": "te1", "task": {"name": "Fix"}, "start": "0"}}))
            .respond(json!({"data": null}));
        let tool = TimeTracking::new(Arc::new(client));

        let out = tool.handle(&args(json!({"action": "current"})));
        assert!(out.starts_with("Currently running timer:\n"));
        assert!(out.contains("\"task\": \"Fix\""));

        let out = tool.handle(&args(json!({"action": "current"})));
        assert_eq!(out, "No timer is currently running.");
    }

    #[test]
    fn test_bogus_action() {
        let (client, mock) = mock_client();
        let out = TimeTracking::new(Arc::new(client)).handle(&args(json!({"action": "pause"})));
        assert_eq!(out, "Error: Unknown action 'pause'. Use: start, stop, log, list, current.");
        assert_eq!(mock.call_count(), 0);
    }
}
