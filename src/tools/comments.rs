//! Read or add task comments.

use super::{date_field, object, parse_action, respond, with_status, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::json::{pretty, JsonExt};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("action", "Action: \"read\" or \"add\".").required(),
    Param::string("taskId", "Task ID. Supports custom IDs like \"DEV-42\".").required(),
    Param::string("commentText", "Comment text (required for \"add\" action)."),
    Param::string("assignee", "User ID to assign the comment to."),
    Param::boolean("notifyAll", "Notify all assignees. Default: false."),
    Param::string("start", "Timestamp (ms) for pagination when reading."),
    Param::string("startId", "Comment ID for pagination when reading."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Read,
    Add,
}

impl Action {
    const NAMES: &'static [&'static str] = &["read", "add"];
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "read" => Ok(Self::Read),
            "add" => Ok(Self::Add),
            _ => Err(Error::unknown_action(s, Self::NAMES)),
        }
    }
}

/// `clickup_comments`
pub struct Comments {
    client: Arc<ClickUpClient>,
}

impl Comments {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let action = parse_action(args, Action::NAMES, Some(Action::Read))?;
        let task_id = args.require("taskId")?;
        match action {
            Action::Read => self.read(&task_id, args),
            Action::Add => self.add(&task_id, args),
        }
    }

    fn read(&self, task_id: &str, args: &ToolArgs) -> Result<String> {
        let mut params = Vec::new();
        for (arg, field) in [("start", "start"), ("startId", "start_id")] {
            if let Some(value) = args.str(arg) {
                params.push((field.to_string(), value));
            }
        }

        let result = self.client.get_task_comments(task_id, params)?;
        let comments = result.array_at(&["comments"]);
        if comments.is_empty() {
            return Ok("No comments found on this task.".to_string());
        }

        let comments: Vec<Value> = comments
            .iter()
            .map(|c| {
                let text: String =
                    c.array_at(&["comment"]).iter().map(|block| block.str_at(&["text"])).collect();
                let user = c
                    .opt_str_at(&["user", "username"])
                    .or_else(|| c.opt_str_at(&["user", "email"]))
                    .unwrap_or_else(|| "Unknown".to_string());
                json!({
                    "id": c.str_at(&["id"]),
                    "text": text.trim(),
                    "user": user,
                    "date": date_field(c, &["date"], json!("")),
                })
            })
            .collect();
        Ok(pretty(&json!({"count": comments.len(), "comments": comments})))
    }

    fn add(&self, task_id: &str, args: &ToolArgs) -> Result<String> {
        let text = args
            .str("commentText")
            .ok_or_else(|| Error::validation("commentText is required for add action."))?;

        let mut body = object([("comment_text", Value::String(text))]);
        if let Some(assignee) = args.int("assignee")? {
            body.insert("assignee".to_string(), json!(assignee));
        }
        if args.flag("notifyAll") {
            body.insert("notify_all".to_string(), Value::Bool(true));
        }

        let result = self.client.create_task_comment(task_id, body)?;
        Ok(with_status("Comment added successfully.", &json!({"id": result.str_at(&["id"])})))
    }
}

impl Tool for Comments {
    fn name(&self) -> &'static str {
        "clickup_comments"
    }

    fn description(&self) -> &'static str {
        "Read or add comments on a ClickUp task.\n\
         - **read**: Get all comments on a task.\n\
         - **add**: Add a new comment to a task."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "with comments", || self.run(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;

    #[test]
    fn test_read_flattens_blocks() {
        let (client, mock) = mock_client();
        mock.respond(json!({"comments": [
            {"id": "c1", "comment": [{"text": "Looks "}, {"text": "good "}], "user": {"email": "bo@example.com"}, "date": "0"},
            {"id": "c2", "comment": [], "user": {}}
        ]}));

        let out = Comments::new(Arc::new(client))
            .handle(&ToolArgs::from_value(json!({"taskId": "abc", "startId": "c0"})));
        let parsed: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["count"], 2);
        assert_eq!(parsed["comments"][0]["text"], "Looks good");
        assert_eq!(parsed["comments"][0]["user"], "bo@example.com");
        assert_eq!(parsed["comments"][0]["date"], "1970-01-01T00:00:00Z");
        assert_eq!(parsed["comments"][1]["user"], "Unknown");
        assert_eq!(parsed["comments"][1]["date"], "");
        assert_eq!(mock.last_request().query, vec![("start_id".to_string(), "c0".to_string())]);
    }

    #[test]
    fn test_read_empty() {
        let (client, mock) = mock_client();
        mock.respond(json!({"comments": []}));
        let out = Comments::new(Arc::new(client))
            .handle(&ToolArgs::from_value(json!({"action": "read", "taskId": "abc"})));
        assert_eq!(out, "No comments found on this task.");
    }

    #[test]
    fn test_add_comment() {
        let (client, mock) = mock_client();
        mock.respond(json!({"id": 456}));

        let out = Comments::new(Arc::new(client)).handle(&ToolArgs::from_value(json!({
            "action": "add",
            "taskId": "abc",
            "commentText": "Done",
            "assignee": "11",
            "notifyAll": true
        })));

        assert!(out.starts_with("Comment added successfully.\n"));
        assert!(out.contains("\"456\""));
        assert_eq!(
            mock.last_request().body,
            Some(json!({"comment_text": "Done", "assignee": 11, "notify_all": true}))
        );
    }

    #[test]
    fn test_add_requires_text() {
        let (client, mock) = mock_client();
        let out = Comments::new(Arc::new(client))
            .handle(&ToolArgs::from_value(json!({"action": "add", "taskId": "abc"})));
        assert_eq!(out, "Error: commentText is required for add action.");
        assert_eq!(mock.call_count(), 0);
    }
}
