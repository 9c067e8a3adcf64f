//! Agent-callable tools.
//!
//! Each tool validates its arguments, makes one or more calls through the
//! shared [`ClickUpClient`], and renders a human/agent-readable string. Tools
//! never return errors to the host: [`respond`] turns every failure into an
//! `Error...` line.

mod attachments;
mod chat;
mod comments;
mod document_pages;
mod documents;
mod folders;
mod hierarchy;
mod lists;
mod members;
mod search;
mod tags;
mod tasks;
mod time_tracking;

pub use attachments::AttachFile;
pub use chat::Chat;
pub use comments::Comments;
pub use document_pages::DocumentPages;
pub use documents::ManageDocument;
pub use folders::ManageFolder;
pub use hierarchy::GetHierarchy;
pub use lists::ManageList;
pub use members::Members;
pub use search::Search;
pub use tags::ManageTags;
pub use tasks::{CreateTask, DeleteTask, GetTask, GetTasks, UpdateTask};
pub use time_tracking::TimeTracking;

use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, ErrorKind, Result};
use crate::ids::from_epoch_millis;
use crate::json::JsonExt;
use serde_json::{json, Map, Value};
use std::str::FromStr;

/// A single agent-callable operation.
pub trait Tool: Send + Sync {
    /// The catalog name, e.g. `clickup_create_task`.
    fn name(&self) -> &'static str;

    /// Markdown description shown to the agent.
    fn description(&self) -> &'static str;

    /// The arguments the tool accepts.
    fn params(&self) -> &'static [Param];

    /// Run the tool. Always returns text; failures start with `Error`.
    fn handle(&self, args: &ToolArgs) -> String;
}

/// JSON type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A string (also used for comma-separated lists).
    String,
    /// An integer.
    Integer,
    /// A boolean.
    Boolean,
}

impl ParamKind {
    /// The JSON-schema type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

/// One argument in a tool's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Argument key (camelCase).
    pub name: &'static str,
    /// JSON type.
    pub kind: ParamKind,
    /// Description shown to the agent.
    pub description: &'static str,
    /// Whether the agent must supply it.
    pub required: bool,
}

impl Param {
    /// An optional string argument.
    #[must_use]
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self { name, kind: ParamKind::String, description, required: false }
    }

    /// An optional integer argument.
    #[must_use]
    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self { name, kind: ParamKind::Integer, description, required: false }
    }

    /// An optional boolean argument.
    #[must_use]
    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self { name, kind: ParamKind::Boolean, description, required: false }
    }

    /// Mark the argument as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Render a parameter list as a JSON-schema object.
#[must_use]
pub fn input_schema(params: &[Param]) -> Value {
    let properties: Map<String, Value> = params
        .iter()
        .map(|p| {
            (p.name.to_string(), json!({"type": p.kind.as_str(), "description": p.description}))
        })
        .collect();
    let required: Vec<&str> = params.iter().filter(|p| p.required).map(|p| p.name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Run a tool body behind the configuration guard and render its outcome.
///
/// `doing` names the operation for remote failures, e.g. `"creating task"`
/// gives `Error creating task: ...`.
pub fn respond(client: &ClickUpClient, doing: &str, body: impl FnOnce() -> Result<String>) -> String {
    if !client.is_configured() {
        return format!("Error: {}", Error::NotConfigured);
    }
    body().unwrap_or_else(|e| render_error(&e, doing))
}

/// Render an error the way tools report it.
#[must_use]
pub fn render_error(error: &Error, doing: &str) -> String {
    match error.kind() {
        ErrorKind::Configuration | ErrorKind::Validation | ErrorKind::UnknownAction => {
            format!("Error: {error}")
        }
        ErrorKind::Transport | ErrorKind::Remote | ErrorKind::Internal => {
            tracing::warn!(doing, error = %error, "tool call failed");
            format!("Error {doing}: {error}")
        }
    }
}

/// Parse the `action` argument of a consolidated tool.
///
/// Falls back to `default` when no action is given. Without a default, a
/// missing action is a validation error listing `names`.
pub(crate) fn parse_action<A>(args: &ToolArgs, names: &[&str], default: Option<A>) -> Result<A>
where
    A: FromStr<Err = Error>,
{
    match (args.str("action"), default) {
        (Some(action), _) => action.parse(),
        (None, Some(default)) => Ok(default),
        (None, None) => {
            Err(Error::validation(format!("action is required ({}).", names.join(", "))))
        }
    }
}

/// The workspace for a call, or the standard validation error naming `purpose`.
pub(crate) fn require_workspace(
    client: &ClickUpClient,
    args: &ToolArgs,
    purpose: &str,
) -> Result<String> {
    client.resolve_workspace(args.str("workspaceId").as_deref()).ok_or_else(|| {
        Error::validation(format!(
            "Workspace ID is required for {purpose}. Configure it in settings or pass workspaceId."
        ))
    })
}

/// A body object from key/value pairs.
pub(crate) fn object<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Copy optional string arguments into a request body under new keys.
pub(crate) fn copy_strings(args: &ToolArgs, body: &mut Map<String, Value>, keys: &[(&str, &str)]) {
    for (arg, field) in keys {
        if let Some(value) = args.str(arg) {
            body.insert((*field).to_string(), Value::String(value));
        }
    }
}

/// Indexed query parameters for a list argument: `statuses[0]=a&statuses[1]=b`.
pub(crate) fn indexed_params(args: &ToolArgs, arg: &str, field: &str) -> Vec<(String, String)> {
    args.list(arg)
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, value)| (format!("{field}[{i}]"), value))
        .collect()
}

/// An epoch-millis field rendered as RFC 3339, or `default` when absent.
pub(crate) fn date_field(value: &Value, path: &[&str], default: Value) -> Value {
    value.i64_at(path).map_or(default, |ms| Value::String(from_epoch_millis(ms)))
}

/// `{id, name}` of each item in an array field.
pub(crate) fn id_names(items: &[Value]) -> Vec<Value> {
    items.iter().map(|item| json!({"id": item.str_at(&["id"]), "name": item.str_at(&["name"])})).collect()
}

/// Prefix a pretty JSON projection with a status line.
pub(crate) fn with_status(line: &str, projection: &Value) -> String {
    format!("{line}\n{}", crate::json::pretty(projection))
}
