//! The ClickUp API client.
//!
//! [`ClickUpClient`] owns the credentials and a [`Transport`]. Every typed
//! operation builds one [`ApiRequest`] and hands it to [`ClickUpClient::send`],
//! which refuses to touch the network when no token is configured. Task-scoped
//! operations run their task ID through [`with_custom_id_params`].

use crate::error::{Error, Result};
use crate::http::HttpTransport;
use crate::ids::with_custom_id_params;
use crate::traits::{ApiRequest, Transport};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Query parameters, in order.
pub type Params = Vec<(String, String)>;

/// The static credentials the client is built with.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Personal API token (`pk_...`). Empty means "not configured".
    pub token: String,
    /// Default workspace (team) ID. May be empty.
    pub workspace_id: String,
}

impl Credentials {
    /// Create credentials from a token and optional default workspace.
    pub fn new(token: impl Into<String>, workspace_id: Option<&str>) -> Self {
        Self { token: token.into(), workspace_id: workspace_id.unwrap_or_default().to_string() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

/// Client for the ClickUp v2 and v3 APIs.
#[derive(Clone)]
pub struct ClickUpClient {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
}

impl fmt::Debug for ClickUpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickUpClient").field("credentials", &self.credentials).finish_non_exhaustive()
    }
}

impl ClickUpClient {
    /// Create a client that talks to ClickUp over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let transport = HttpTransport::new(&credentials.token)?;
        Ok(Self::with_transport(credentials, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(credentials: Credentials, transport: Arc<dyn Transport>) -> Self {
        Self { transport, credentials }
    }

    /// A client without credentials, for reading tool metadata.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::with_transport(Credentials::default(), Arc::new(Offline))
    }

    /// Whether an API token is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.credentials.token.is_empty()
    }

    /// The configured default workspace, if any.
    #[must_use]
    pub fn workspace_id(&self) -> Option<&str> {
        Some(self.credentials.workspace_id.as_str()).filter(|w| !w.is_empty())
    }

    /// Pick the workspace for a call: the explicit argument, else the default.
    #[must_use]
    pub fn resolve_workspace(&self, explicit: Option<&str>) -> Option<String> {
        explicit.filter(|w| !w.is_empty()).or_else(|| self.workspace_id()).map(str::to_string)
    }

    /// Send a raw request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] without any I/O when the token is
    /// empty, otherwise whatever the transport reports.
    pub fn send(&self, request: ApiRequest) -> Result<Value> {
        if !self.is_configured() {
            return Err(Error::NotConfigured);
        }
        self.transport.send(&request)
    }

    fn task_params(&self, task_id: &str, params: Params) -> Params {
        with_custom_id_params(task_id, self.workspace_id(), params)
    }

    // Workspace

    /// `GET /team`: every workspace the token can see, with members embedded.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_teams(&self) -> Result<Value> {
        self.send(ApiRequest::get("/team"))
    }

    /// Spaces in a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_spaces(&self, team_id: &str) -> Result<Value> {
        self.send(ApiRequest::get(format!("/team/{team_id}/space")))
    }

    /// Folders in a space.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_folders(&self, space_id: &str) -> Result<Value> {
        self.send(ApiRequest::get(format!("/space/{space_id}/folder")))
    }

    /// Folderless lists in a space.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_space_lists(&self, space_id: &str) -> Result<Value> {
        self.send(ApiRequest::get(format!("/space/{space_id}/list")))
    }

    /// Lists in a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_folder_lists(&self, folder_id: &str) -> Result<Value> {
        self.send(ApiRequest::get(format!("/folder/{folder_id}/list")))
    }

    // Search and members

    /// Filtered task search across a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn search_tasks(&self, team_id: &str, params: Params) -> Result<Value> {
        self.send(ApiRequest::get(format!("/team/{team_id}/task")).query(params))
    }

    /// Workspace members. ClickUp embeds them in the `/team` listing, so this
    /// is the same call as [`Self::get_teams`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_members(&self) -> Result<Value> {
        self.get_teams()
    }

    // Tasks

    /// Tasks in a list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_tasks(&self, list_id: &str, params: Params) -> Result<Value> {
        self.send(ApiRequest::get(format!("/list/{list_id}/task")).query(params))
    }

    /// A single task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_task(&self, task_id: &str, params: Params) -> Result<Value> {
        let params = self.task_params(task_id, params);
        self.send(ApiRequest::get(format!("/task/{task_id}")).query(params))
    }

    /// Create a task in a list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_task(&self, list_id: &str, body: Map<String, Value>) -> Result<Value> {
        self.send(ApiRequest::post(format!("/list/{list_id}/task")).json(Value::Object(body)))
    }

    /// Update a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn update_task(&self, task_id: &str, body: Map<String, Value>) -> Result<Value> {
        let params = self.task_params(task_id, Vec::new());
        self.send(
            ApiRequest::put(format!("/task/{task_id}")).query(params).json(Value::Object(body)),
        )
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn delete_task(&self, task_id: &str) -> Result<Value> {
        let params = self.task_params(task_id, Vec::new());
        self.send(ApiRequest::delete(format!("/task/{task_id}")).query(params))
    }

    // Tags and attachments

    /// Add an existing space tag to a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn add_tag_to_task(&self, task_id: &str, tag: &str) -> Result<Value> {
        let params = self.task_params(task_id, Vec::new());
        self.send(ApiRequest::post(tag_path(task_id, tag)).query(params))
    }

    /// Remove a tag from a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn remove_tag_from_task(&self, task_id: &str, tag: &str) -> Result<Value> {
        let params = self.task_params(task_id, Vec::new());
        self.send(ApiRequest::delete(tag_path(task_id, tag)).query(params))
    }

    /// Attach a publicly reachable file to a task by URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn attach_file_to_task(&self, task_id: &str, body: Map<String, Value>) -> Result<Value> {
        let params = self.task_params(task_id, Vec::new());
        self.send(
            ApiRequest::post(format!("/task/{task_id}/attachment"))
                .query(params)
                .json(Value::Object(body)),
        )
    }

    // Comments

    /// Comments on a task, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_task_comments(&self, task_id: &str, params: Params) -> Result<Value> {
        let params = self.task_params(task_id, params);
        self.send(ApiRequest::get(format!("/task/{task_id}/comment")).query(params))
    }

    /// Post a comment on a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_task_comment(&self, task_id: &str, body: Map<String, Value>) -> Result<Value> {
        let params = self.task_params(task_id, Vec::new());
        self.send(
            ApiRequest::post(format!("/task/{task_id}/comment"))
                .query(params)
                .json(Value::Object(body)),
        )
    }

    // Time tracking

    /// Time entries recorded on a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_task_time_entries(&self, task_id: &str) -> Result<Value> {
        let params = self.task_params(task_id, Vec::new());
        self.send(ApiRequest::get(format!("/task/{task_id}/time")).query(params))
    }

    /// Start a timer on a task. The task ID is sent as `tid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn start_time_entry(
        &self,
        team_id: &str,
        task_id: &str,
        mut body: Map<String, Value>,
    ) -> Result<Value> {
        body.insert("tid".to_string(), Value::String(task_id.to_string()));
        self.send(
            ApiRequest::post(format!("/team/{team_id}/time_entries/start")).json(Value::Object(body)),
        )
    }

    /// Stop the running timer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn stop_time_entry(&self, team_id: &str) -> Result<Value> {
        self.send(ApiRequest::post(format!("/team/{team_id}/time_entries/stop")))
    }

    /// Record a manual time entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn add_time_entry(&self, team_id: &str, body: Map<String, Value>) -> Result<Value> {
        self.send(ApiRequest::post(format!("/team/{team_id}/time_entries")).json(Value::Object(body)))
    }

    /// The currently running time entry, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_current_time_entry(&self, team_id: &str) -> Result<Value> {
        self.send(ApiRequest::get(format!("/team/{team_id}/time_entries/current")))
    }

    // Lists

    /// A list by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_list(&self, list_id: &str) -> Result<Value> {
        self.send(ApiRequest::get(format!("/list/{list_id}")))
    }

    /// Create a folderless list in a space.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_list(&self, space_id: &str, body: Map<String, Value>) -> Result<Value> {
        self.send(ApiRequest::post(format!("/space/{space_id}/list")).json(Value::Object(body)))
    }

    /// Create a list inside a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_list_in_folder(&self, folder_id: &str, body: Map<String, Value>) -> Result<Value> {
        self.send(ApiRequest::post(format!("/folder/{folder_id}/list")).json(Value::Object(body)))
    }

    /// Update a list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn update_list(&self, list_id: &str, body: Map<String, Value>) -> Result<Value> {
        self.send(ApiRequest::put(format!("/list/{list_id}")).json(Value::Object(body)))
    }

    // Folders

    /// A folder by ID, with its lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_folder(&self, folder_id: &str) -> Result<Value> {
        self.send(ApiRequest::get(format!("/folder/{folder_id}")))
    }

    /// Create a folder in a space.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_folder(&self, space_id: &str, body: Map<String, Value>) -> Result<Value> {
        self.send(ApiRequest::post(format!("/space/{space_id}/folder")).json(Value::Object(body)))
    }

    /// Update a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn update_folder(&self, folder_id: &str, body: Map<String, Value>) -> Result<Value> {
        self.send(ApiRequest::put(format!("/folder/{folder_id}")).json(Value::Object(body)))
    }

    // Chat (v3)

    /// Chat channels in a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_chat_channels(&self, workspace_id: &str, params: Params) -> Result<Value> {
        self.send(
            ApiRequest::get(format!("/workspaces/{workspace_id}/chat/channels")).v3().query(params),
        )
    }

    /// Post a message to a chat channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn send_chat_message(
        &self,
        workspace_id: &str,
        channel_id: &str,
        body: Map<String, Value>,
    ) -> Result<Value> {
        self.send(
            ApiRequest::post(format!("/workspaces/{workspace_id}/chat/channels/{channel_id}/messages"))
                .v3()
                .json(Value::Object(body)),
        )
    }

    // Documents (v3)

    /// Create a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_document(&self, workspace_id: &str, body: Map<String, Value>) -> Result<Value> {
        self.send(
            ApiRequest::post(format!("/workspaces/{workspace_id}/docs")).v3().json(Value::Object(body)),
        )
    }

    /// The page listing of a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn list_document_pages(&self, workspace_id: &str, doc_id: &str, params: Params) -> Result<Value> {
        self.send(pages_request(workspace_id, doc_id).query(params))
    }

    /// The content of selected pages of a document.
    ///
    /// Same endpoint as [`Self::list_document_pages`]; the `page_ids` and
    /// `content_format` parameters select content instead of the outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn get_document_pages(&self, workspace_id: &str, doc_id: &str, params: Params) -> Result<Value> {
        self.send(pages_request(workspace_id, doc_id).query(params))
    }

    /// Add a page to a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_document_page(
        &self,
        workspace_id: &str,
        doc_id: &str,
        body: Map<String, Value>,
    ) -> Result<Value> {
        self.send(
            ApiRequest::post(format!("/workspaces/{workspace_id}/docs/{doc_id}/pages"))
                .v3()
                .json(Value::Object(body)),
        )
    }

    /// Edit a document page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn update_document_page(
        &self,
        workspace_id: &str,
        doc_id: &str,
        page_id: &str,
        body: Map<String, Value>,
    ) -> Result<Value> {
        self.send(
            ApiRequest::put(format!("/workspaces/{workspace_id}/docs/{doc_id}/pages/{page_id}"))
                .v3()
                .json(Value::Object(body)),
        )
    }
}

/// Transport for clients that must never reach the network.
struct Offline;

impl Transport for Offline {
    fn send(&self, _request: &ApiRequest) -> Result<Value> {
        Err(Error::NotConfigured)
    }
}

fn pages_request(workspace_id: &str, doc_id: &str) -> ApiRequest {
    ApiRequest::get(format!("/workspaces/{workspace_id}/docs/{doc_id}/pages")).v3()
}

/// Tag names may contain spaces and other reserved characters.
fn tag_path(task_id: &str, tag: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(tag.as_bytes()).collect();
    format!("/task/{task_id}/tag/{}", encoded.replace('+', "%20"))
}
