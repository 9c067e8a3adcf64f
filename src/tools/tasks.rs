//! Task tools: list, get, create, update, delete.

use super::{
    copy_strings, date_field, indexed_params, object, respond, with_status, Param, Tool,
};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::ids::to_epoch_millis;
use crate::json::{pretty, JsonExt};
use serde_json::{json, Map, Value};
use std::sync::Arc;

const MINUTE_MS: i64 = 60_000;

/// `{id, name, status, url}` of a task returned by a write.
fn write_summary(task: &Value) -> Value {
    json!({
        "id": task.str_at(&["id"]),
        "name": task.str_at(&["name"]),
        "status": task.str_at(&["status", "status"]),
        "url": task.str_at(&["url"]),
    })
}

/// Set `<field>` to the millis of a date argument and `<field>_time` to true.
fn set_date(args: &ToolArgs, body: &mut Map<String, Value>, arg: &str, field: &str) -> Result<()> {
    if let Some(date) = args.str(arg) {
        body.insert(field.to_string(), json!(to_epoch_millis(&date)?));
        body.insert(format!("{field}_time"), Value::Bool(true));
    }
    Ok(())
}

// Get tasks

const GET_TASKS_PARAMS: &[Param] = &[
    Param::string("listId", "List ID to get tasks from.").required(),
    Param::string("statuses", "Comma-separated statuses to filter by."),
    Param::string("assignees", "Comma-separated assignee user IDs."),
    Param::string(
        "dueDateGt",
        "Only tasks with due date after this (ISO 8601, e.g., \"2026-01-01\").",
    ),
    Param::string("dueDateLt", "Only tasks with due date before this (ISO 8601)."),
    Param::boolean("includeClosed", "Include closed tasks. Default: false."),
    Param::integer("page", "Page number for pagination (starts at 0)."),
];

/// `clickup_get_tasks`
pub struct GetTasks {
    client: Arc<ClickUpClient>,
}

impl GetTasks {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let list_id = args.require("listId")?;

        let mut params = indexed_params(args, "statuses", "statuses");
        params.extend(indexed_params(args, "assignees", "assignees"));
        for (arg, field) in [("dueDateGt", "due_date_gt"), ("dueDateLt", "due_date_lt")] {
            if let Some(date) = args.str(arg) {
                params.push((field.to_string(), to_epoch_millis(&date)?.to_string()));
            }
        }
        if args.flag("includeClosed") {
            params.push(("include_closed".to_string(), "true".to_string()));
        }
        if let Some(page) = args.int("page")? {
            params.push(("page".to_string(), page.to_string()));
        }

        let result = self.client.get_tasks(&list_id, params)?;
        let tasks = result.array_at(&["tasks"]);
        if tasks.is_empty() {
            return Ok("No tasks found in this list.".to_string());
        }

        let tasks: Vec<Value> = tasks
            .iter()
            .map(|task| {
                let assignees: Vec<String> = task
                    .array_at(&["assignees"])
                    .iter()
                    .map(|a| a.opt_str_at(&["username"]).unwrap_or_else(|| a.str_at(&["id"])))
                    .collect();
                json!({
                    "id": task.str_at(&["id"]),
                    "custom_id": task.value_at(&["custom_id"]),
                    "name": task.str_at(&["name"]),
                    "status": task.str_at(&["status", "status"]),
                    "priority": task.value_at(&["priority", "priority"]),
                    "assignees": assignees,
                    "due_date": date_field(task, &["due_date"], Value::Null),
                })
            })
            .collect();
        Ok(pretty(&json!({"count": tasks.len(), "tasks": tasks})))
    }
}

impl Tool for GetTasks {
    fn name(&self) -> &'static str {
        "clickup_get_tasks"
    }

    fn description(&self) -> &'static str {
        "Get all tasks in a ClickUp list.\n\
         Supports filtering by statuses, assignees, and due dates.\n\
         Use clickup_get_hierarchy first to find the list ID."
    }

    fn params(&self) -> &'static [Param] {
        GET_TASKS_PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "getting tasks", || self.run(args))
    }
}

// Get task

const GET_TASK_PARAMS: &[Param] = &[
    Param::string("taskId", "Task ID. Supports regular IDs or custom IDs like \"DEV-42\".")
        .required(),
    Param::boolean("includeSubtasks", "Include subtask details. Default: false."),
];

/// `clickup_get_task`
pub struct GetTask {
    client: Arc<ClickUpClient>,
}

impl GetTask {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let task_id = args.require("taskId")?;
        let mut params = Vec::new();
        if args.flag("includeSubtasks") {
            params.push(("include_subtasks".to_string(), "true".to_string()));
        }

        let task = self.client.get_task(&task_id, params)?;

        let assignees: Vec<Value> = task
            .array_at(&["assignees"])
            .iter()
            .map(|a| json!({"id": a.value_at(&["id"]), "username": a.str_at(&["username"])}))
            .collect();
        let tags: Vec<String> = task.array_at(&["tags"]).iter().map(|t| t.str_at(&["name"])).collect();

        let mut output = json!({
            "id": task.str_at(&["id"]),
            "custom_id": task.value_at(&["custom_id"]),
            "name": task.str_at(&["name"]),
            "description": task.str_at(&["description"]),
            "status": task.str_at(&["status", "status"]),
            "priority": task.value_at(&["priority", "priority"]),
            "assignees": assignees,
            "tags": tags,
            "due_date": date_field(&task, &["due_date"], Value::Null),
            "start_date": date_field(&task, &["start_date"], Value::Null),
            "time_estimate": task.value_at(&["time_estimate"]),
            "url": task.str_at(&["url"]),
            "list": {"id": task.str_at(&["list", "id"]), "name": task.str_at(&["list", "name"])},
            "folder": {"id": task.str_at(&["folder", "id"]), "name": task.str_at(&["folder", "name"])},
            "space": {"id": task.str_at(&["space", "id"])},
        });

        let subtasks = task.array_at(&["subtasks"]);
        if !subtasks.is_empty() {
            output["subtasks"] = subtasks
                .iter()
                .map(|st| {
                    json!({
                        "id": st.str_at(&["id"]),
                        "name": st.str_at(&["name"]),
                        "status": st.str_at(&["status", "status"]),
                    })
                })
                .collect();
        }

        Ok(pretty(&output))
    }
}

impl Tool for GetTask {
    fn name(&self) -> &'static str {
        "clickup_get_task"
    }

    fn description(&self) -> &'static str {
        "Get a single ClickUp task by ID with full details.\n\
         Supports both regular IDs and custom IDs (e.g., \"DEV-42\").\n\
         Optionally include subtask details."
    }

    fn params(&self) -> &'static [Param] {
        GET_TASK_PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "getting task", || self.run(args))
    }
}

// Create task

const CREATE_TASK_PARAMS: &[Param] = &[
    Param::string("listId", "List ID to create the task in.").required(),
    Param::string("name", "Task name.").required(),
    Param::string("description", "Task description text."),
    Param::string("status", "Task status (must be valid for the list)."),
    Param::integer("priority", "Priority: 1=urgent, 2=high, 3=normal, 4=low."),
    Param::string(
        "assignees",
        "Comma-separated user IDs to assign. Use clickup_members to resolve names to IDs.",
    ),
    Param::string(
        "dueDate",
        "Due date in ISO 8601 format (e.g., \"2026-03-15\" or \"2026-03-15T14:30:00\").",
    ),
    Param::string("startDate", "Start date in ISO 8601 format."),
    Param::string("tags", "Comma-separated tag names. Tags must exist in the space."),
    Param::string("parentTaskId", "Parent task ID to create this as a subtask."),
];

/// `clickup_create_task`
pub struct CreateTask {
    client: Arc<ClickUpClient>,
}

impl CreateTask {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let list_id = args.require("listId")?;
        let name = args.require("name")?;

        let mut body = object([("name", Value::String(name.clone()))]);
        copy_strings(
            args,
            &mut body,
            &[("description", "description"), ("status", "status"), ("parentTaskId", "parent")],
        );
        if let Some(priority) = args.int("priority")? {
            body.insert("priority".to_string(), json!(priority));
        }
        if let Some(assignees) = args.int_list("assignees")? {
            body.insert("assignees".to_string(), json!(assignees));
        }
        set_date(args, &mut body, "dueDate", "due_date")?;
        set_date(args, &mut body, "startDate", "start_date")?;
        if let Some(tags) = args.list("tags") {
            body.insert("tags".to_string(), json!(tags));
        }

        let task = self.client.create_task(&list_id, body)?;
        let id = task.opt_str_at(&["id"]).ok_or(Error::MissingField("id"))?;

        Ok(with_status(
            &format!("Task '{name}' created successfully (ID: {id})."),
            &write_summary(&task),
        ))
    }
}

impl Tool for CreateTask {
    fn name(&self) -> &'static str {
        "clickup_create_task"
    }

    fn description(&self) -> &'static str {
        "Create a new task in a ClickUp list.\n\
         Requires a list ID and task name. Supports description, status,\n\
         priority, assignees, dates, tags, and creating subtasks via parentTaskId.\n\
         Use clickup_get_hierarchy to find list IDs."
    }

    fn params(&self) -> &'static [Param] {
        CREATE_TASK_PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "creating task", || self.run(args))
    }
}

// Update task

const UPDATE_TASK_PARAMS: &[Param] = &[
    Param::string("taskId", "Task ID to update. Supports custom IDs like \"DEV-42\".").required(),
    Param::string("name", "New task name."),
    Param::string("description", "New task description."),
    Param::string("status", "New status. Set to \"closed\" to complete the task."),
    Param::integer("priority", "Priority: 1=urgent, 2=high, 3=normal, 4=low."),
    Param::string("assignees", "Comma-separated user IDs to add as assignees."),
    Param::string("removeAssignees", "Comma-separated user IDs to remove as assignees."),
    Param::string("dueDate", "New due date (ISO 8601). Empty string to clear."),
    Param::string("startDate", "New start date (ISO 8601). Empty string to clear."),
    Param::integer("timeEstimate", "Time estimate in minutes."),
];

/// `clickup_update_task`
pub struct UpdateTask {
    client: Arc<ClickUpClient>,
}

impl UpdateTask {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let task_id = args.require("taskId")?;

        let mut body = Map::new();
        copy_strings(
            args,
            &mut body,
            &[("name", "name"), ("description", "description"), ("status", "status")],
        );
        if let Some(priority) = args.int("priority")? {
            body.insert("priority".to_string(), json!(priority));
        }

        let mut assignees = Map::new();
        if let Some(add) = args.int_list("assignees")? {
            assignees.insert("add".to_string(), json!(add));
        }
        if let Some(rem) = args.int_list("removeAssignees")? {
            assignees.insert("rem".to_string(), json!(rem));
        }
        if !assignees.is_empty() {
            body.insert("assignees".to_string(), Value::Object(assignees));
        }

        for (arg, field) in [("dueDate", "due_date"), ("startDate", "start_date")] {
            if args.str(arg).is_some() {
                set_date(args, &mut body, arg, field)?;
            } else if args.has(arg) {
                // Supplied but empty: clear the date.
                body.insert(field.to_string(), Value::Null);
            }
        }
        if let Some(minutes) = args.int("timeEstimate")? {
            let millis = minutes
                .checked_mul(MINUTE_MS)
                .ok_or_else(|| Error::validation("timeEstimate is too large."))?;
            body.insert("time_estimate".to_string(), json!(millis));
        }

        if body.is_empty() {
            return Err(Error::validation("At least one field to update is required."));
        }

        let task = self.client.update_task(&task_id, body)?;
        Ok(with_status("Task updated successfully.", &write_summary(&task)))
    }
}

impl Tool for UpdateTask {
    fn name(&self) -> &'static str {
        "clickup_update_task"
    }

    fn description(&self) -> &'static str {
        "Update an existing ClickUp task.\n\
         Supports changing name, description, status, priority, assignees, and dates.\n\
         Set status to \"closed\" to complete a task.\n\
         Supports custom task IDs like \"DEV-42\"."
    }

    fn params(&self) -> &'static [Param] {
        UPDATE_TASK_PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "updating task", || self.run(args))
    }
}

// Delete task

const DELETE_TASK_PARAMS: &[Param] = &[Param::string(
    "taskId",
    "Task ID to delete. Supports custom IDs like \"DEV-42\".",
)
.required()];

/// `clickup_delete_task`
pub struct DeleteTask {
    client: Arc<ClickUpClient>,
}

impl DeleteTask {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let task_id = args.require("taskId")?;
        self.client.delete_task(&task_id)?;
        Ok(format!("Task '{task_id}' deleted successfully."))
    }
}

impl Tool for DeleteTask {
    fn name(&self) -> &'static str {
        "clickup_delete_task"
    }

    fn description(&self) -> &'static str {
        "Delete a ClickUp task permanently.\n\
         Supports custom task IDs like \"DEV-42\".\n\
         This action cannot be undone."
    }

    fn params(&self) -> &'static [Param] {
        DELETE_TASK_PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "deleting task", || self.run(args))
    }
}
