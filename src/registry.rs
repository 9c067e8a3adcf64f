//! The tool catalog and integration metadata.
//!
//! [`Catalog`] lists every tool with the metadata a host needs to present
//! it. [`Catalog::bind`] turns the catalog into a [`Toolbox`] of live tools
//! sharing one client. The rest of this module describes the integration
//! itself: its settings form, how settings are validated, and a cheap
//! connection probe.

use crate::args::ToolArgs;
use crate::client::{ClickUpClient, Credentials};
use crate::json::JsonExt;
use crate::logging::ToolCallGuard;
use crate::tools::{
    AttachFile, Chat, Comments, CreateTask, DeleteTask, DocumentPages, GetHierarchy, GetTask,
    GetTasks, ManageDocument, ManageFolder, ManageList, ManageTags, Members, Search, TimeTracking,
    Tool, UpdateTask,
};
use crate::traits::{ApiRequest, Transport};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Builds a tool bound to a client.
pub type ToolFactory = fn(Arc<ClickUpClient>) -> Box<dyn Tool>;

/// Whether a tool only reads or also changes workspace state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// No side effects.
    Read,
    /// Creates, updates, or deletes something.
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

/// Catalog entry for one tool.
#[derive(Clone, Copy)]
pub struct ToolDescriptor {
    /// Unique tool name, e.g. `clickup_get_task`.
    pub name: &'static str,
    /// Grouping used by hosts (navigation, tasks, time, ...).
    pub category: &'static str,
    /// Short human label.
    pub label: &'static str,
    /// One-line summary.
    pub description: &'static str,
    /// Read or write.
    pub access: Access,
    /// Icon identifier.
    pub icon: &'static str,
    factory: ToolFactory,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

const fn descriptor(
    name: &'static str,
    category: &'static str,
    label: &'static str,
    description: &'static str,
    access: Access,
    icon: &'static str,
    factory: ToolFactory,
) -> ToolDescriptor {
    ToolDescriptor { name, category, label, description, access, icon, factory }
}

/// The fixed set of tools this integration offers.
#[derive(Debug, Clone)]
pub struct Catalog {
    descriptors: Vec<ToolDescriptor>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Build the catalog.
    #[must_use]
    pub fn new() -> Self {
        use Access::{Read, Write};

        let descriptors = vec![
            descriptor(
                "clickup_get_hierarchy",
                "navigation",
                "Get Hierarchy",
                "Get workspace hierarchy: spaces, folders, lists.",
                Read,
                "ph:tree-structure",
                |c| Box::new(GetHierarchy::new(c)),
            ),
            descriptor(
                "clickup_search",
                "navigation",
                "Search Tasks",
                "Search tasks across the workspace.",
                Read,
                "ph:magnifying-glass",
                |c| Box::new(Search::new(c)),
            ),
            descriptor(
                "clickup_members",
                "members",
                "Members",
                "List, find, or resolve workspace members.",
                Read,
                "ph:users",
                |c| Box::new(Members::new(c)),
            ),
            descriptor(
                "clickup_get_tasks",
                "tasks",
                "Get Tasks",
                "Get all tasks in a list.",
                Read,
                "ph:list-checks",
                |c| Box::new(GetTasks::new(c)),
            ),
            descriptor(
                "clickup_get_task",
                "tasks",
                "Get Task",
                "Get a task by ID with details.",
                Read,
                "ph:clipboard-text",
                |c| Box::new(GetTask::new(c)),
            ),
            descriptor(
                "clickup_create_task",
                "tasks",
                "Create Task",
                "Create a new task in a list.",
                Write,
                "ph:plus-circle",
                |c| Box::new(CreateTask::new(c)),
            ),
            descriptor(
                "clickup_update_task",
                "tasks",
                "Update Task",
                "Update an existing task.",
                Write,
                "ph:pencil-simple",
                |c| Box::new(UpdateTask::new(c)),
            ),
            descriptor(
                "clickup_delete_task",
                "tasks",
                "Delete Task",
                "Delete a task.",
                Write,
                "ph:trash",
                |c| Box::new(DeleteTask::new(c)),
            ),
            descriptor(
                "clickup_manage_tags",
                "tasks",
                "Manage Tags",
                "Add or remove a tag on a task.",
                Write,
                "ph:tag",
                |c| Box::new(ManageTags::new(c)),
            ),
            descriptor(
                "clickup_attach_file",
                "tasks",
                "Attach File",
                "Attach a file to a task.",
                Write,
                "ph:paperclip",
                |c| Box::new(AttachFile::new(c)),
            ),
            descriptor(
                "clickup_comments",
                "comments",
                "Comments",
                "Read or add comments on a task.",
                Write,
                "ph:chat-circle",
                |c| Box::new(Comments::new(c)),
            ),
            descriptor(
                "clickup_time_tracking",
                "time",
                "Time Tracking",
                "Start, stop, log, and list time entries.",
                Write,
                "ph:timer",
                |c| Box::new(TimeTracking::new(c)),
            ),
            descriptor(
                "clickup_manage_list",
                "lists",
                "Manage List",
                "Create, get, or update lists.",
                Write,
                "ph:list-bullets",
                |c| Box::new(ManageList::new(c)),
            ),
            descriptor(
                "clickup_manage_folder",
                "folders",
                "Manage Folder",
                "Create, get, or update folders.",
                Write,
                "ph:folder",
                |c| Box::new(ManageFolder::new(c)),
            ),
            descriptor(
                "clickup_chat",
                "chat",
                "Chat",
                "List chat channels or send a message.",
                Write,
                "ph:chat-dots",
                |c| Box::new(Chat::new(c)),
            ),
            descriptor(
                "clickup_manage_document",
                "documents",
                "Manage Document",
                "Create a ClickUp document.",
                Write,
                "ph:file-text",
                |c| Box::new(ManageDocument::new(c)),
            ),
            descriptor(
                "clickup_document_pages",
                "documents",
                "Document Pages",
                "List, read, create, or update pages in a document.",
                Write,
                "ph:note",
                |c| Box::new(DocumentPages::new(c)),
            ),
        ];

        Self { descriptors }
    }

    /// Look up a descriptor by tool name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Iterate over descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.descriptors.iter()
    }

    /// Number of tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Tool names in catalog order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.name).collect()
    }

    /// Build one tool.
    #[must_use]
    pub fn instantiate(descriptor: &ToolDescriptor, client: Arc<ClickUpClient>) -> Box<dyn Tool> {
        (descriptor.factory)(client)
    }

    /// Build every tool against one shared client.
    #[must_use]
    pub fn bind(&self, client: Arc<ClickUpClient>) -> Toolbox {
        let entries = self
            .descriptors
            .iter()
            .map(|d| (*d, Self::instantiate(d, Arc::clone(&client))))
            .collect();
        Toolbox { entries }
    }
}

/// Live tools, ready to be called by name.
pub struct Toolbox {
    entries: Vec<(ToolDescriptor, Box<dyn Tool>)>,
}

impl fmt::Debug for Toolbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|(d, _)| d.name)).finish()
    }
}

impl Toolbox {
    /// Look up a live tool.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.entries.iter().find(|(d, _)| d.name == name).map(|(_, t)| t.as_ref())
    }

    /// Iterate over descriptors and their tools.
    pub fn iter(&self) -> impl Iterator<Item = (&ToolDescriptor, &dyn Tool)> {
        self.entries.iter().map(|(d, t)| (d, t.as_ref()))
    }

    /// Run a tool by name. Unknown names produce an error line, not a panic.
    #[must_use]
    pub fn call(&self, name: &str, args: &ToolArgs) -> String {
        let Some(tool) = self.get(name) else {
            tracing::warn!(tool = name, "unknown tool requested");
            return format!("Error: Unknown tool '{name}'.");
        };

        let mut guard = ToolCallGuard::new(name);
        let output = tool.handle(args);
        if output.starts_with("Error") {
            guard.mark_error();
        }
        output
    }
}

/// How the integration presents itself in a host's integration list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegrationMeta {
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Icon identifier.
    pub icon: &'static str,
    /// Brand logo identifier.
    pub logo: &'static str,
    /// Host category.
    pub category: &'static str,
    /// Trust badge.
    pub badge: &'static str,
    /// Upstream API documentation.
    pub docs_url: &'static str,
}

/// How the integration presents itself as an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppMeta {
    /// Machine name.
    pub name: &'static str,
    /// Short label listing what the app covers.
    pub label: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Icon identifier.
    pub icon: &'static str,
    /// Brand logo identifier.
    pub logo: &'static str,
}

/// Integration metadata.
pub const INTEGRATION: IntegrationMeta = IntegrationMeta {
    name: "ClickUp",
    description: "Project management, tasks, docs, and time tracking",
    icon: "ph:kanban",
    logo: "simple-icons:clickup",
    category: "productivity",
    badge: "verified",
    docs_url: "https://clickup.com/api",
};

/// App metadata.
pub const APP: AppMeta = AppMeta {
    name: "clickup",
    label: "tasks, projects, docs, time tracking",
    description: "Project management",
    icon: "ph:kanban",
    logo: "simple-icons:clickup",
};

/// Input widget for a settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Masked input.
    Secret,
    /// Plain text input.
    Text,
}

/// One field of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    /// Settings key.
    pub key: &'static str,
    /// Widget type.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Field label.
    pub label: &'static str,
    /// Placeholder text.
    pub placeholder: &'static str,
    /// Help text (may contain inline HTML).
    pub hint: &'static str,
    /// Whether the integration is unusable without it.
    pub required: bool,
}

/// The settings form.
#[must_use]
pub const fn config_schema() -> [ConfigField; 2] {
    [
        ConfigField {
            key: "api_token",
            kind: FieldKind::Secret,
            label: "Personal API Token",
            placeholder: "pk_...",
            hint: "Generate at ClickUp → Settings → Apps. Starts with <code>pk_</code>.",
            required: true,
        },
        ConfigField {
            key: "workspace_id",
            kind: FieldKind::Text,
            label: "Workspace ID",
            placeholder: "12345678",
            hint: "From your ClickUp URL: <code>app.clickup.com/{workspace_id}/...</code>. \
                   Required for search, time tracking, and members.",
            required: false,
        },
    ]
}

/// Check a settings map. Returns one message per violation.
#[must_use]
pub fn validate_config(config: &Map<String, Value>) -> Vec<String> {
    config_schema()
        .iter()
        .filter(|field| !matches!(config.get(field.key), None | Some(Value::Null | Value::String(_))))
        .map(|field| format!("{} must be a string.", field.key))
        .collect()
}

/// Credentials from a validated settings map. Non-string values are ignored.
#[must_use]
pub fn credentials_from_config(config: &Map<String, Value>) -> Credentials {
    let get = |key: &str| config.get(key).and_then(Value::as_str).unwrap_or_default();
    let workspace = get("workspace_id");
    Credentials::new(get("api_token"), (!workspace.is_empty()).then_some(workspace))
}

/// Outcome of a connection probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionReport {
    /// Whether the token was accepted.
    pub success: bool,
    /// Summary on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Reason on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionReport {
    fn ok(message: String) -> Self {
        Self { success: true, message: Some(message), error: None }
    }

    fn failed(error: String) -> Self {
        Self { success: false, message: None, error: Some(error) }
    }
}

/// Probe the API with `GET /team` and summarize the visible workspaces.
///
/// An empty token fails without any request.
pub fn test_connection(transport: &dyn Transport, credentials: &Credentials) -> ConnectionReport {
    if credentials.token.is_empty() {
        return ConnectionReport::failed(
            "No API token provided. Generate one at ClickUp → Settings → Apps.".to_string(),
        );
    }

    match transport.send(&ApiRequest::get("/team")) {
        Ok(result) => {
            let teams = result.array_at(&["teams"]);
            let names: Vec<String> = teams
                .iter()
                .map(|t| t.opt_str_at(&["name"]).unwrap_or_else(|| "Unknown".to_string()))
                .collect();
            ConnectionReport::ok(format!(
                "Connected to ClickUp. Found {} workspace(s): {}",
                teams.len(),
                names.join(", ")
            ))
        }
        Err(e) => {
            tracing::warn!(error = %e, "connection test failed");
            ConnectionReport::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{mock_client, MockTransport};
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_unique() {
        let catalog = Catalog::new();
        let names: HashSet<_> = catalog.names().into_iter().collect();
        assert_eq!(names.len(), catalog.len());
        assert_eq!(catalog.len(), 17);
    }

    #[test]
    fn test_descriptor_matches_tool_name() {
        let (client, _) = mock_client();
        let client = Arc::new(client);
        for d in Catalog::new().iter() {
            let tool = Catalog::instantiate(d, Arc::clone(&client));
            assert_eq!(tool.name(), d.name);
            assert!(!tool.description().is_empty());
        }
    }

    #[test]
    fn test_access_classification() {
        let catalog = Catalog::new();
        assert_eq!(catalog.get("clickup_search").unwrap().access, Access::Read);
        assert_eq!(catalog.get("clickup_delete_task").unwrap().access, Access::Write);
        assert!(catalog.get("clickup_nope").is_none());
    }

    #[test]
    fn test_toolbox_dispatch() {
        let (client, mock) = mock_client();
        let toolbox = Catalog::new().bind(Arc::new(client));

        let out = toolbox.call("clickup_get_task", &ToolArgs::default());
        assert_eq!(out, "Error: taskId is required.");
        assert_eq!(mock.call_count(), 0);

        let out = toolbox.call("clickup_teleport", &ToolArgs::default());
        assert_eq!(out, "Error: Unknown tool 'clickup_teleport'.");
    }

    #[test]
    fn test_config_schema_fields() {
        let schema = config_schema();
        assert_eq!(schema[0].key, "api_token");
        assert_eq!(schema[0].kind, FieldKind::Secret);
        assert!(schema[0].required);
        assert_eq!(schema[1].key, "workspace_id");
        assert!(!schema[1].required);

        let rendered = serde_json::to_value(schema[0]).unwrap();
        assert_eq!(rendered["type"], "secret");
    }

    #[test]
    fn test_validate_config() {
        let ok = json!({"api_token": "pk_1", "workspace_id": null});
        assert!(validate_config(ok.as_object().unwrap()).is_empty());

        let bad = json!({"api_token": 12, "workspace_id": ["x"]});
        assert_eq!(
            validate_config(bad.as_object().unwrap()),
            vec!["api_token must be a string.", "workspace_id must be a string."]
        );
    }

    #[test]
    fn test_credentials_from_config() {
        let config = json!({"api_token": "pk_1", "workspace_id": ""});
        let creds = credentials_from_config(config.as_object().unwrap());
        assert_eq!(creds.token, "pk_1");
        assert!(creds.workspace_id.is_empty());
    }

    #[test]
    fn test_connection_without_token() {
        let mock = MockTransport::new();
        let report = test_connection(&mock, &Credentials::default());
        assert!(!report.success);
        assert!(report.error.unwrap().starts_with("No API token provided."));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_connection_lists_workspaces() {
        let mock = MockTransport::new();
        mock.respond(json!({"teams": [{"name": "Acme"}, {"id": "2"}]}));
        let report = test_connection(&mock, &Credentials::new("pk_1", None));
        assert!(report.success);
        assert_eq!(
            report.message.as_deref(),
            Some("Connected to ClickUp. Found 2 workspace(s): Acme, Unknown")
        );
        assert_eq!(mock.last_request().path, "/team");
    }

    #[test]
    fn test_connection_reports_api_error() {
        let mock = MockTransport::new();
        mock.fail(401, "Token invalid");
        let report = test_connection(&mock, &Credentials::new("pk_bad", None));
        assert_eq!(report.error.as_deref(), Some("ClickUp API error (401): Token invalid"));
    }
}
