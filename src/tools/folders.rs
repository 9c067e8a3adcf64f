//! Create, read, and rename folders.

use super::{id_names, object, parse_action, respond, with_status, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::json::{pretty, JsonExt};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("action", "Action: \"create\", \"get\", or \"update\".").required(),
    Param::string("spaceId", "Space ID (required for create)."),
    Param::string("folderId", "Folder ID (required for get and update)."),
    Param::string("name", "Folder name."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Get,
    Update,
}

impl Action {
    const NAMES: &'static [&'static str] = &["create", "get", "update"];
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(Self::Create),
            "get" => Ok(Self::Get),
            "update" => Ok(Self::Update),
            _ => Err(Error::unknown_action(s, Self::NAMES)),
        }
    }
}

fn required_for(args: &ToolArgs, key: &str, action: &str) -> Result<String> {
    args.str(key).ok_or_else(|| Error::validation(format!("{key} is required for {action} action.")))
}

/// `clickup_manage_folder`
pub struct ManageFolder {
    client: Arc<ClickUpClient>,
}

impl ManageFolder {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        match parse_action(args, Action::NAMES, None)? {
            Action::Create => {
                let space_id = required_for(args, "spaceId", "create")?;
                let name = args.require("name")?;
                let result = self
                    .client
                    .create_folder(&space_id, object([("name", Value::String(name.clone()))]))?;
                Ok(with_status(
                    &format!("Folder '{name}' created successfully."),
                    &json!({"id": result.str_at(&["id"]), "name": result.str_at(&["name"])}),
                ))
            }
            Action::Get => {
                let folder = self.client.get_folder(&required_for(args, "folderId", "get")?)?;
                Ok(pretty(&json!({
                    "id": folder.str_at(&["id"]),
                    "name": folder.str_at(&["name"]),
                    "space": {
                        "id": folder.str_at(&["space", "id"]),
                        "name": folder.str_at(&["space", "name"]),
                    },
                    "lists": id_names(folder.array_at(&["lists"])),
                })))
            }
            Action::Update => {
                let folder_id = required_for(args, "folderId", "update")?;
                let name = required_for(args, "name", "update")?;
                let result =
                    self.client.update_folder(&folder_id, object([("name", Value::String(name))]))?;
                Ok(with_status(
                    "Folder updated successfully.",
                    &json!({"id": result.str_at(&["id"]), "name": result.str_at(&["name"])}),
                ))
            }
        }
    }
}

impl Tool for ManageFolder {
    fn name(&self) -> &'static str {
        "clickup_manage_folder"
    }

    fn description(&self) -> &'static str {
        "Create, get, or update ClickUp folders. Actions:\n\
         - **create**: Create a folder in a space (requires spaceId and name).\n\
         - **get**: Get folder details by ID.\n\
         - **update**: Update a folder's name."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "managing folder", || self.run(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;

    fn args(value: Value) -> ToolArgs {
        ToolArgs::from_value(value)
    }

    #[test]
    fn test_create_folder() {
        let (client, mock) = mock_client();
        mock.respond(json!({"id": "f1", "name": "Q3"}));

        let out = ManageFolder::new(Arc::new(client))
            .handle(&args(json!({"action": "create", "spaceId": "s1", "name": "Q3"})));
        assert!(out.starts_with("Folder 'Q3' created successfully.\n"));
        assert_eq!(mock.last_request().path, "/space/s1/folder");
        assert_eq!(mock.last_request().body, Some(json!({"name": "Q3"})));
    }

    #[test]
    fn test_get_folder_lists() {
        let (client, mock) = mock_client();
        mock.respond(json!({"id": "f1", "name": "Q3", "lists": [{"id": "l1", "name": "Sprint"}]}));

        let out = ManageFolder::new(Arc::new(client))
            .handle(&args(json!({"action": "get", "folderId": "f1"})));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["lists"], json!([{"id": "l1", "name": "Sprint"}]));
    }

    #[test]
    fn test_update_requires_name() {
        let (client, mock) = mock_client();
        let out = ManageFolder::new(Arc::new(client))
            .handle(&args(json!({"action": "update", "folderId": "f1"})));
        assert_eq!(out, "Error: name is required for update action.");
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_remote_failure_context() {
        let (client, mock) = mock_client();
        mock.fail(404, "Folder not found");
        let out = ManageFolder::new(Arc::new(client))
            .handle(&args(json!({"action": "get", "folderId": "nope"})));
        assert_eq!(out, "Error managing folder: ClickUp API error (404): Folder not found");
    }
}
