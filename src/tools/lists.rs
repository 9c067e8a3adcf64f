//! Create, read, and update lists.

use super::{copy_strings, object, parse_action, respond, with_status, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::json::{pretty, JsonExt};
use serde_json::{json, Map, Value};
use std::str::FromStr;
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("action", "Action: \"create\", \"create_in_folder\", \"get\", or \"update\".")
        .required(),
    Param::string("spaceId", "Space ID (required for create)."),
    Param::string("folderId", "Folder ID (required for create_in_folder)."),
    Param::string("listId", "List ID (required for get and update)."),
    Param::string("name", "List name (required for create, optional for update)."),
    Param::string("content", "List description/content."),
    Param::string("status", "List status."),
];

/// Optional list fields shared by create and update.
const LIST_FIELDS: &[(&str, &str)] = &[("content", "content"), ("status", "status")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    CreateInFolder,
    Get,
    Update,
}

impl Action {
    const NAMES: &'static [&'static str] = &["create", "create_in_folder", "get", "update"];
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(Self::Create),
            "create_in_folder" => Ok(Self::CreateInFolder),
            "get" => Ok(Self::Get),
            "update" => Ok(Self::Update),
            _ => Err(Error::unknown_action(s, Self::NAMES)),
        }
    }
}

fn required_for(args: &ToolArgs, key: &str, action: &str) -> Result<String> {
    args.str(key).ok_or_else(|| Error::validation(format!("{key} is required for {action} action.")))
}

fn id_name(result: &Value) -> Value {
    json!({"id": result.str_at(&["id"]), "name": result.str_at(&["name"])})
}

/// `clickup_manage_list`
pub struct ManageList {
    client: Arc<ClickUpClient>,
}

impl ManageList {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        match parse_action(args, Action::NAMES, None)? {
            Action::Create => {
                let space_id = required_for(args, "spaceId", "create")?;
                let (name, body) = Self::new_list_body(args)?;
                let result = self.client.create_list(&space_id, body)?;
                Ok(with_status(&format!("List '{name}' created successfully."), &id_name(&result)))
            }
            Action::CreateInFolder => {
                let folder_id = required_for(args, "folderId", "create_in_folder")?;
                let (name, body) = Self::new_list_body(args)?;
                let result = self.client.create_list_in_folder(&folder_id, body)?;
                Ok(with_status(
                    &format!("List '{name}' created in folder successfully."),
                    &id_name(&result),
                ))
            }
            Action::Get => self.get(&required_for(args, "listId", "get")?),
            Action::Update => {
                let list_id = required_for(args, "listId", "update")?;
                let mut body = Map::new();
                copy_strings(args, &mut body, &[("name", "name")]);
                copy_strings(args, &mut body, LIST_FIELDS);
                if body.is_empty() {
                    return Err(Error::validation(
                        "At least one field to update (name, content, status) is required.",
                    ));
                }
                let result = self.client.update_list(&list_id, body)?;
                Ok(with_status("List updated successfully.", &id_name(&result)))
            }
        }
    }

    fn new_list_body(args: &ToolArgs) -> Result<(String, Map<String, Value>)> {
        let name = args.require("name")?;
        let mut body = object([("name", Value::String(name.clone()))]);
        copy_strings(args, &mut body, LIST_FIELDS);
        Ok((name, body))
    }

    fn get(&self, list_id: &str) -> Result<String> {
        let list = self.client.get_list(list_id)?;
        Ok(pretty(&json!({
            "id": list.str_at(&["id"]),
            "name": list.str_at(&["name"]),
            "content": list.str_at(&["content"]),
            "status": list.value_at(&["status"]),
            "task_count": list.i64_at(&["task_count"]).unwrap_or(0),
            "space": {"id": list.str_at(&["space", "id"]), "name": list.str_at(&["space", "name"])},
            "folder": {"id": list.str_at(&["folder", "id"]), "name": list.str_at(&["folder", "name"])},
        })))
    }
}

impl Tool for ManageList {
    fn name(&self) -> &'static str {
        "clickup_manage_list"
    }

    fn description(&self) -> &'static str {
        "Create, get, or update ClickUp lists. Actions:\n\
         - **create**: Create a list in a space (requires spaceId).\n\
         - **create_in_folder**: Create a list in a folder (requires folderId).\n\
         - **get**: Get list details by ID.\n\
         - **update**: Update a list's name, content, or status."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "managing list", || self.run(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;
    use crate::traits::Method;

    fn args(value: Value) -> ToolArgs {
        ToolArgs::from_value(value)
    }

    #[test]
    fn test_create_in_space_and_folder() {
        let (client, mock) = mock_client();
        mock.respond(json!({"id": "l1", "name": "Backlog"}))
            .respond(json!({"id": "l2", "name": "Sprint"}));
        let tool = ManageList::new(Arc::new(client));

        let out = tool.handle(&args(json!({"action": "create", "spaceId": "s1", "name": "Backlog", "content": "All"})));
        assert!(out.starts_with("List 'Backlog' created successfully.\n"));

        let out = tool.handle(&args(json!({"action": "create_in_folder", "folderId": "f1", "name": "Sprint"})));
        assert!(out.starts_with("List 'Sprint' created in folder successfully.\n"));

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/space/s1/list");
        assert_eq!(requests[0].body, Some(json!({"name": "Backlog", "content": "All"})));
        assert_eq!(requests[1].path, "/folder/f1/list");
    }

    #[test]
    fn test_get_list() {
        let (client, mock) = mock_client();
        mock.respond(json!({"id": "l1", "name": "Backlog", "task_count": "12", "space": {"id": "s1", "name": "Eng"}}));

        let out = ManageList::new(Arc::new(client)).handle(&args(json!({"action": "get", "listId": "l1"})));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["task_count"], 12);
        assert_eq!(parsed["space"]["name"], "Eng");
        assert_eq!(parsed["folder"]["id"], "");
        assert_eq!(parsed["status"], Value::Null);
    }

    #[test]
    fn test_update_list() {
        let (client, mock) = mock_client();
        let tool = ManageList::new(Arc::new(client));

        let out = tool.handle(&args(json!({"action": "update", "listId": "l1"})));
        assert_eq!(out, "Error: At least one field to update (name, content, status) is required.");
        assert_eq!(mock.call_count(), 0);

        let out = tool.handle(&args(json!({"action": "update", "listId": "l1", "status": "red"})));
        assert!(out.starts_with("List updated successfully."));
        assert_eq!(mock.last_request().method, Method::Put);
    }

    #[test]
    fn test_validation_messages() {
        let (client, mock) = mock_client();
        let tool = ManageList::new(Arc::new(client));

        assert_eq!(
            tool.handle(&args(json!({}))),
            "Error: action is required (create, create_in_folder, get, update)."
        );
        assert_eq!(
            tool.handle(&args(json!({"action": "create", "name": "x"}))),
            "Error: spaceId is required for create action."
        );
        assert_eq!(
            tool.handle(&args(json!({"action": "create", "spaceId": "s1"}))),
            "Error: name is required."
        );
        assert_eq!(
            tool.handle(&args(json!({"action": "archive"}))),
            "Error: Unknown action 'archive'. Use: create, create_in_folder, get, update."
        );
        assert_eq!(mock.call_count(), 0);
    }
}
