//! Workspace members: list, find, and resolve names to IDs.

use super::{parse_action, respond, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::json::{pretty, JsonExt};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string(
        "action",
        "Action: \"list\" (all members), \"find\" (search by name/email), \"resolve\" (names to IDs).",
    )
    .required(),
    Param::string(
        "query",
        "For find: name or email to search. For resolve: comma-separated names or emails.",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    List,
    Find,
    Resolve,
}

impl Action {
    const NAMES: &'static [&'static str] = &["list", "find", "resolve"];
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(Self::List),
            "find" => Ok(Self::Find),
            "resolve" => Ok(Self::Resolve),
            _ => Err(Error::unknown_action(s, Self::NAMES)),
        }
    }
}

/// `clickup_members`
pub struct Members {
    client: Arc<ClickUpClient>,
}

impl Members {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        match parse_action(args, Action::NAMES, Some(Action::List))? {
            Action::List => self.list(),
            Action::Find => self.find(args),
            Action::Resolve => self.resolve(args),
        }
    }

    /// Every member of every workspace the token can see.
    fn all_members(&self) -> Result<Vec<Value>> {
        let teams = self.client.get_members()?;
        Ok(teams
            .array_at(&["teams"])
            .iter()
            .flat_map(|team| team.array_at(&["members"]))
            .map(|member| member.at(&["user"]).unwrap_or(member).clone())
            .collect())
    }

    fn list(&self) -> Result<String> {
        let members = self.all_members()?;
        if members.is_empty() {
            return Ok("No members found.".to_string());
        }

        let members: Vec<Value> = members
            .iter()
            .map(|m| {
                json!({
                    "id": m.value_at(&["id"]),
                    "username": m.str_at(&["username"]),
                    "email": m.str_at(&["email"]),
                    "role": m.value_at(&["role"]),
                })
            })
            .collect();
        Ok(pretty(&json!({"count": members.len(), "members": members})))
    }

    fn find(&self, args: &ToolArgs) -> Result<String> {
        let query = args
            .str("query")
            .ok_or_else(|| Error::validation("\"query\" parameter is required for find action."))?;
        let needle = query.to_lowercase();

        let matches: Vec<Value> = self
            .all_members()?
            .iter()
            .filter(|m| {
                ["username", "email", "initials"]
                    .iter()
                    .any(|field| m.str_at(&[*field]).to_lowercase().contains(&needle))
            })
            .map(|m| {
                json!({
                    "id": m.value_at(&["id"]),
                    "username": m.str_at(&["username"]),
                    "email": m.str_at(&["email"]),
                })
            })
            .collect();

        if matches.is_empty() {
            return Ok(format!("No member found matching '{query}'."));
        }
        Ok(pretty(&json!({"matches": matches})))
    }

    fn resolve(&self, args: &ToolArgs) -> Result<String> {
        let names = args.list("query").filter(|names| !names.is_empty()).ok_or_else(|| {
            Error::validation(
                "\"query\" parameter is required. Provide comma-separated names or emails.",
            )
        })?;
        let members = self.all_members()?;

        let results: Vec<Value> = names
            .iter()
            .map(|name| {
                let wanted = name.to_lowercase();
                let found = members
                    .iter()
                    .find(|m| {
                        m.str_at(&["username"]).to_lowercase() == wanted
                            || m.str_at(&["email"]).to_lowercase() == wanted
                    })
                    .map(|m| m.value_at(&["id"]))
                    .filter(|id| !id.is_null());
                json!({
                    "query": name,
                    "resolved": found.is_some(),
                    "id": found.unwrap_or(Value::Null),
                })
            })
            .collect();

        Ok(pretty(&json!({"results": results})))
    }
}

impl Tool for Members {
    fn name(&self) -> &'static str {
        "clickup_members"
    }

    fn description(&self) -> &'static str {
        "Manage workspace members. Actions:\n\
         - **list**: Get all workspace members with IDs, names, and emails.\n\
         - **find**: Find a member by name or email.\n\
         - **resolve**: Convert names/emails to user IDs for assigning tasks."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "with members", || self.run(args))
    }
}
