//! Add or remove tags on a task.

use super::{parse_action, respond, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use std::str::FromStr;
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("action", "Action: \"add\" or \"remove\".").required(),
    Param::string("taskId", "Task ID. Supports custom IDs like \"DEV-42\".").required(),
    Param::string("tagName", "Tag name to add or remove.").required(),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Remove,
}

impl Action {
    const NAMES: &'static [&'static str] = &["add", "remove"];
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            _ => Err(Error::unknown_action(s, Self::NAMES)),
        }
    }
}

/// `clickup_manage_tags`
pub struct ManageTags {
    client: Arc<ClickUpClient>,
}

impl ManageTags {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let action = parse_action(args, Action::NAMES, None)?;
        let task_id = args.require("taskId")?;
        let tag = args.require("tagName")?;

        match action {
            Action::Add => {
                self.client.add_tag_to_task(&task_id, &tag)?;
                Ok(format!("Tag '{tag}' added to task successfully."))
            }
            Action::Remove => {
                self.client.remove_tag_from_task(&task_id, &tag)?;
                Ok(format!("Tag '{tag}' removed from task successfully."))
            }
        }
    }
}

impl Tool for ManageTags {
    fn name(&self) -> &'static str {
        "clickup_manage_tags"
    }

    fn description(&self) -> &'static str {
        "Add or remove tags on a ClickUp task.\n\
         - **add**: Add an existing tag to a task.\n\
         - **remove**: Remove a tag from a task.\n\
         Tags must already exist in the space."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "managing tags", || self.run(args))
    }
}
