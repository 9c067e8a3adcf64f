//! Attach a file to a task by URL.

use super::{object, respond, with_status, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::Result;
use crate::json::JsonExt;
use serde_json::{json, Value};
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string(
        "taskId",
        "Task ID to attach the file to. Supports custom IDs like \"DEV-42\".",
    )
    .required(),
    Param::string("fileUrl", "Public URL of the file to attach (http/https).").required(),
];

/// `clickup_attach_file`
pub struct AttachFile {
    client: Arc<ClickUpClient>,
}

impl AttachFile {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let task_id = args.require("taskId")?;
        let file_url = args.require("fileUrl")?;

        let result =
            self.client.attach_file_to_task(&task_id, object([("url", Value::String(file_url))]))?;
        Ok(with_status(
            "File attached to task successfully.",
            &json!({
                "id": result.str_at(&["id"]),
                "title": result.str_at(&["title"]),
                "url": result.str_at(&["url"]),
            }),
        ))
    }
}

impl Tool for AttachFile {
    fn name(&self) -> &'static str {
        "clickup_attach_file"
    }

    fn description(&self) -> &'static str {
        "Attach a file to a ClickUp task via URL.\n\
         The file URL must be publicly accessible (http/https)."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "attaching file", || self.run(args))
    }
}
