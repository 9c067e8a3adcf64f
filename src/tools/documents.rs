//! Document creation (v3 API).

use super::{object, require_workspace, respond, with_status, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::json::JsonExt;
use serde_json::{json, Value};
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("name", "Document name.").required(),
    Param::string("parentId", "ID of the parent container (space, folder, or list).").required(),
    Param::string("parentType", "Parent type: \"space\", \"folder\", or \"list\".").required(),
    Param::string("visibility", "Visibility: \"PUBLIC\" (default) or \"PRIVATE\"."),
    Param::boolean("createPage", "Create an initial blank page. Default: true."),
    Param::string("workspaceId", "Workspace ID. Uses configured default if omitted."),
];

/// The numeric parent type the docs API expects. Unknown names pass through.
fn parent_type_code(name: &str) -> Value {
    match name.to_ascii_lowercase().as_str() {
        "space" => json!(4),
        "folder" => json!(5),
        "list" => json!(6),
        "everything" => json!(7),
        "workspace" => json!(12),
        _ => Value::String(name.to_string()),
    }
}

/// `clickup_manage_document`
pub struct ManageDocument {
    client: Arc<ClickUpClient>,
}

impl ManageDocument {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let name = args.require("name")?;
        let parent_id = args.require("parentId")?;
        let parent_type = args
            .str("parentType")
            .ok_or_else(|| Error::validation("parentType is required (space, folder, list)."))?;
        let workspace_id = require_workspace(&self.client, args, "documents")?;

        let visibility = args.str("visibility").unwrap_or_else(|| "PUBLIC".to_string());
        let body = object([
            ("name", Value::String(name.clone())),
            ("parent", json!({"id": parent_id, "type": parent_type_code(&parent_type)})),
            ("visibility", Value::String(visibility)),
            ("create_page", Value::Bool(args.bool("createPage").unwrap_or(true))),
        ]);

        let result = self.client.create_document(&workspace_id, body)?;
        Ok(with_status(
            &format!("Document '{name}' created successfully."),
            &json!({"id": result.str_at(&["id"]), "name": result.str_at(&["name"])}),
        ))
    }
}

impl Tool for ManageDocument {
    fn name(&self) -> &'static str {
        "clickup_manage_document"
    }

    fn description(&self) -> &'static str {
        "Create a ClickUp document in a space, folder, or list.\n\
         Specify the parent container and visibility (PUBLIC or PRIVATE)."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "creating document", || self.run(args))
    }
}
