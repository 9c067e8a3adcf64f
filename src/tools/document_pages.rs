//! Pages inside a document (v3 API).

use super::{
    copy_strings, indexed_params, object, parse_action, require_workspace, respond, with_status,
    Param, Tool,
};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::json::{pretty, JsonExt};
use serde_json::{json, Map, Value};
use std::str::FromStr;
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("action", "Action: \"list\", \"get\", \"create\", or \"update\".").required(),
    Param::string("documentId", "Document ID.").required(),
    Param::string("pageId", "Page ID (required for update)."),
    Param::string("pageIds", "Comma-separated page IDs (required for get)."),
    Param::string("name", "Page name (required for create)."),
    Param::string("subTitle", "Page subtitle."),
    Param::string("content", "Page content."),
    Param::string("contentFormat", "Content format: \"text/md\" (default) or \"text/plain\"."),
    Param::string("editMode", "How to apply content on update: \"replace\" (default), \"append\", or \"prepend\"."),
    Param::string("parentPageId", "Parent page ID when creating a sub-page."),
    Param::integer("maxDepth", "Maximum page depth when listing."),
    Param::string("workspaceId", "Workspace ID. Uses configured default if omitted."),
];

const DEFAULT_FORMAT: &str = "text/md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    List,
    Get,
    Create,
    Update,
}

impl Action {
    const NAMES: &'static [&'static str] = &["list", "get", "create", "update"];
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(Self::List),
            "get" => Ok(Self::Get),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            _ => Err(Error::unknown_action(s, Self::NAMES)),
        }
    }
}

fn content_format(args: &ToolArgs) -> Value {
    Value::String(args.str("contentFormat").unwrap_or_else(|| DEFAULT_FORMAT.to_string()))
}

/// Page listings come back either bare or wrapped in `pages`.
fn page_array(result: &Value) -> &[Value] {
    match result {
        Value::Array(items) => items,
        other => other.array_at(&["pages"]),
    }
}

/// `clickup_document_pages`
pub struct DocumentPages {
    client: Arc<ClickUpClient>,
}

impl DocumentPages {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let action = parse_action(args, Action::NAMES, None)?;
        let doc_id = args.require("documentId")?;
        let workspace_id = require_workspace(&self.client, args, "documents")?;
        match action {
            Action::List => self.list(&workspace_id, &doc_id, args),
            Action::Get => self.get(&workspace_id, &doc_id, args),
            Action::Create => self.create(&workspace_id, &doc_id, args),
            Action::Update => self.update(&workspace_id, &doc_id, args),
        }
    }

    fn list(&self, workspace_id: &str, doc_id: &str, args: &ToolArgs) -> Result<String> {
        let mut params = Vec::new();
        if let Some(depth) = args.int("maxDepth")? {
            params.push(("max_page_depth".to_string(), depth.to_string()));
        }

        let result = self.client.list_document_pages(workspace_id, doc_id, params)?;
        let pages = page_array(&result);
        if pages.is_empty() {
            return Ok("No pages found in this document.".to_string());
        }

        let pages: Vec<Value> = pages
            .iter()
            .map(|p| {
                json!({
                    "id": p.str_at(&["id"]),
                    "name": p.str_at(&["name"]),
                    "sub_title": p.str_at(&["sub_title"]),
                })
            })
            .collect();
        Ok(pretty(&json!({"count": pages.len(), "pages": pages})))
    }

    fn get(&self, workspace_id: &str, doc_id: &str, args: &ToolArgs) -> Result<String> {
        if !args.list("pageIds").is_some_and(|ids| !ids.is_empty()) {
            return Err(Error::validation("pageIds is required for get action (comma-separated)."));
        }
        let mut params = indexed_params(args, "pageIds", "page_ids");
        let format = args.str("contentFormat").unwrap_or_else(|| DEFAULT_FORMAT.to_string());
        params.push(("content_format".to_string(), format));

        let result = self.client.get_document_pages(workspace_id, doc_id, params)?;
        let pages = page_array(&result);
        if pages.is_empty() {
            return Ok("No page content found.".to_string());
        }
        let pages: Vec<Value> = pages
            .iter()
            .map(|p| {
                json!({
                    "id": p.str_at(&["id"]),
                    "name": p.str_at(&["name"]),
                    "content": p.str_at(&["content"]),
                })
            })
            .collect();
        Ok(pretty(&json!({"pages": pages})))
    }

    fn create(&self, workspace_id: &str, doc_id: &str, args: &ToolArgs) -> Result<String> {
        let name = args
            .str("name")
            .ok_or_else(|| Error::validation("name is required for create action."))?;

        let mut body = object([
            ("name", Value::String(name.clone())),
            ("content", Value::String(args.str("content").unwrap_or_default())),
            ("content_format", content_format(args)),
        ]);
        copy_strings(args, &mut body, &[("subTitle", "sub_title"), ("parentPageId", "parent_page_id")]);

        let result = self.client.create_document_page(workspace_id, doc_id, body)?;
        Ok(with_status(
            &format!("Page '{name}' created successfully."),
            &json!({"id": result.str_at(&["id"])}),
        ))
    }

    fn update(&self, workspace_id: &str, doc_id: &str, args: &ToolArgs) -> Result<String> {
        let page_id = args
            .str("pageId")
            .ok_or_else(|| Error::validation("pageId is required for update action."))?;

        let mut body = Map::new();
        copy_strings(args, &mut body, &[("name", "name"), ("subTitle", "sub_title")]);
        if let Some(content) = args.str("content") {
            body.insert("content".to_string(), Value::String(content));
            body.insert("content_format".to_string(), content_format(args));
            let mode = args.str("editMode").unwrap_or_else(|| "replace".to_string());
            body.insert("content_edit_mode".to_string(), Value::String(mode));
        }
        if body.is_empty() {
            return Err(Error::validation(
                "At least one field to update (name, subTitle, content) is required.",
            ));
        }

        self.client.update_document_page(workspace_id, doc_id, &page_id, body)?;
        Ok(format!("Page '{page_id}' updated successfully."))
    }
}

impl Tool for DocumentPages {
    fn name(&self) -> &'static str {
        "clickup_document_pages"
    }

    fn description(&self) -> &'static str {
        "Manage pages within a ClickUp document. Actions:\n\
         - **list**: List all pages in a document.\n\
         - **get**: Get content of specific pages.\n\
         - **create**: Create a new page in a document.\n\
         - **update**: Update a page (replace, append, or prepend content)."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "with document pages", || self.run(args))
    }
}
