//! Workspace-wide task search.

use super::{date_field, indexed_params, require_workspace, respond, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::Result;
use crate::json::{pretty, JsonExt};
use serde_json::{json, Value};
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("query", "Search query to match task names."),
    Param::string("statuses", "Comma-separated statuses to filter by (e.g., \"open,in progress\")."),
    Param::string("assignees", "Comma-separated assignee user IDs."),
    Param::boolean("includeClosed", "Include closed tasks in results. Default: false."),
    Param::boolean("includeSubtasks", "Include subtasks in results. Default: false."),
    Param::integer("page", "Page number for pagination (starts at 0)."),
    Param::string("workspaceId", "Workspace ID. Uses configured default if omitted."),
];

/// `clickup_search`
pub struct Search {
    client: Arc<ClickUpClient>,
}

impl Search {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let workspace_id = require_workspace(&self.client, args, "search")?;

        let mut params = Vec::new();
        if let Some(query) = args.str("query") {
            params.push(("name".to_string(), query));
        }
        params.extend(indexed_params(args, "statuses", "statuses"));
        params.extend(indexed_params(args, "assignees", "assignees"));
        if args.flag("includeClosed") {
            params.push(("include_closed".to_string(), "true".to_string()));
        }
        if args.flag("includeSubtasks") {
            params.push(("subtasks".to_string(), "true".to_string()));
        }
        if let Some(page) = args.int("page")? {
            params.push(("page".to_string(), page.to_string()));
        }

        let result = self.client.search_tasks(&workspace_id, params)?;
        let tasks = result.array_at(&["tasks"]);
        if tasks.is_empty() {
            return Ok("No tasks found matching the search criteria.".to_string());
        }

        let tasks: Vec<Value> = tasks.iter().map(summarize).collect();
        Ok(pretty(&json!({"count": tasks.len(), "tasks": tasks})))
    }
}

fn summarize(task: &Value) -> Value {
    let assignees: Vec<String> = task
        .array_at(&["assignees"])
        .iter()
        .map(|a| {
            a.opt_str_at(&["username"])
                .or_else(|| a.opt_str_at(&["email"]))
                .unwrap_or_else(|| a.str_at(&["id"]))
        })
        .collect();

    json!({
        "id": task.str_at(&["id"]),
        "custom_id": task.value_at(&["custom_id"]),
        "name": task.str_at(&["name"]),
        "status": task.str_at(&["status", "status"]),
        "priority": task.value_at(&["priority", "priority"]),
        "assignees": assignees,
        "due_date": date_field(task, &["due_date"], Value::Null),
        "url": task.str_at(&["url"]),
    })
}

impl Tool for Search {
    fn name(&self) -> &'static str {
        "clickup_search"
    }

    fn description(&self) -> &'static str {
        "Search tasks across the ClickUp workspace.\n\
         Supports filtering by query, statuses, assignees, and more.\n\
         Returns matching tasks with their details."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "searching tasks", || self.run(args))
    }
}
