//! Workspace tree: spaces, folders, and lists.

use super::{id_names, respond, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::json::{pretty, JsonExt};
use serde_json::{json, Value};
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("workspaceId", "Workspace/team ID. Uses configured default if omitted."),
    Param::string("spaceIds", "Comma-separated space IDs to filter. Omit to get all spaces."),
];

/// `clickup_get_hierarchy`
pub struct GetHierarchy {
    client: Arc<ClickUpClient>,
}

impl GetHierarchy {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let workspace_id = match self.client.resolve_workspace(args.str("workspaceId").as_deref()) {
            Some(id) => id,
            None => self.first_workspace()?,
        };
        let filter = args.list("spaceIds").filter(|ids| !ids.is_empty());

        let spaces = self.client.get_spaces(&workspace_id)?;
        let mut tree = Vec::new();
        for space in spaces.array_at(&["spaces"]) {
            let space_id = space.str_at(&["id"]);
            if filter.as_ref().is_some_and(|ids| !ids.contains(&space_id)) {
                continue;
            }

            let folders = self.client.get_folders(&space_id)?;
            let folders: Vec<Value> = folders
                .array_at(&["folders"])
                .iter()
                .map(|folder| {
                    json!({
                        "id": folder.str_at(&["id"]),
                        "name": folder.str_at(&["name"]),
                        "lists": id_names(folder.array_at(&["lists"])),
                    })
                })
                .collect();
            let lists = self.client.get_space_lists(&space_id)?;

            tree.push(json!({
                "id": space_id,
                "name": space.str_at(&["name"]),
                "folders": folders,
                "lists": id_names(lists.array_at(&["lists"])),
            }));
        }

        Ok(pretty(&json!({"workspace_id": workspace_id, "spaces": tree})))
    }

    fn first_workspace(&self) -> Result<String> {
        let teams = self.client.get_teams()?;
        teams
            .array_at(&["teams"])
            .first()
            .map(|team| team.str_at(&["id"]))
            .ok_or_else(|| Error::validation("No workspaces found. Check your API token."))
    }
}

impl Tool for GetHierarchy {
    fn name(&self) -> &'static str {
        "clickup_get_hierarchy"
    }

    fn description(&self) -> &'static str {
        "Get the ClickUp workspace hierarchy: spaces, folders, and lists.\n\
         Returns a tree structure with IDs and names for navigation.\n\
         Optionally filter to specific space IDs."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "getting hierarchy", || self.run(args))
    }
}
