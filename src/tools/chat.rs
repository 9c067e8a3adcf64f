//! Chat channels and messages (v3 API).

use super::{object, parse_action, require_workspace, respond, with_status, Param, Tool};
use crate::args::ToolArgs;
use crate::client::ClickUpClient;
use crate::error::{Error, Result};
use crate::json::{pretty, JsonExt};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

const PARAMS: &[Param] = &[
    Param::string("action", "Action: \"list_channels\" or \"send_message\".").required(),
    Param::string("channelId", "Channel ID (required for send_message)."),
    Param::string("content", "Message content, supports markdown (required for send_message)."),
    Param::string("contentFormat", "Content format: \"text/md\" (default) or \"text/plain\"."),
    Param::string("type", "Message type: \"message\" (default) or \"post\"."),
    Param::string("postTitle", "Post title (required if type is \"post\")."),
    Param::string("cursor", "Pagination cursor for list_channels."),
    Param::string("workspaceId", "Workspace ID. Uses configured default if omitted."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ListChannels,
    SendMessage,
}

impl Action {
    const NAMES: &'static [&'static str] = &["list_channels", "send_message"];
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list_channels" => Ok(Self::ListChannels),
            "send_message" => Ok(Self::SendMessage),
            _ => Err(Error::unknown_action(s, Self::NAMES)),
        }
    }
}

/// `clickup_chat`
pub struct Chat {
    client: Arc<ClickUpClient>,
}

impl Chat {
    /// Create the tool.
    pub const fn new(client: Arc<ClickUpClient>) -> Self {
        Self { client }
    }

    fn run(&self, args: &ToolArgs) -> Result<String> {
        let action = parse_action(args, Action::NAMES, None)?;
        let workspace_id = require_workspace(&self.client, args, "chat")?;
        match action {
            Action::ListChannels => self.list_channels(&workspace_id, args),
            Action::SendMessage => self.send_message(&workspace_id, args),
        }
    }

    fn list_channels(&self, workspace_id: &str, args: &ToolArgs) -> Result<String> {
        let params: Vec<(String, String)> =
            args.str("cursor").map(|c| ("cursor".to_string(), c)).into_iter().collect();

        let result = self.client.get_chat_channels(workspace_id, params)?;
        let channels = result.array_at(&["channels"]);
        if channels.is_empty() {
            return Ok("No chat channels found.".to_string());
        }

        let channels: Vec<Value> = channels
            .iter()
            .map(|ch| {
                json!({
                    "id": ch.str_at(&["id"]),
                    "name": ch.str_at(&["name"]),
                    "type": ch.str_at(&["type"]),
                    "member_count": ch.i64_at(&["member_count"]).unwrap_or(0),
                })
            })
            .collect();

        let mut output = json!({"count": channels.len(), "channels": channels});
        if let Some(cursor) = result.opt_str_at(&["next_cursor"]).filter(|c| !c.is_empty()) {
            output["next_cursor"] = Value::String(cursor);
        }
        Ok(pretty(&output))
    }

    fn send_message(&self, workspace_id: &str, args: &ToolArgs) -> Result<String> {
        let channel_id = args
            .str("channelId")
            .ok_or_else(|| Error::validation("channelId is required for send_message action."))?;
        let content = args.require("content")?;

        let format = args.str("contentFormat").unwrap_or_else(|| "text/md".to_string());
        let mut body =
            object([("content", Value::String(content)), ("content_format", Value::String(format))]);
        if args.str("type").as_deref() == Some("post") {
            body.insert("type".to_string(), json!("post"));
            if let Some(title) = args.str("postTitle") {
                body.insert("post_title".to_string(), Value::String(title));
            }
        }

        let result = self.client.send_chat_message(workspace_id, &channel_id, body)?;
        Ok(with_status(
            &format!("Message sent to channel '{channel_id}' successfully."),
            &json!({"id": result.str_at(&["id"])}),
        ))
    }
}

impl Tool for Chat {
    fn name(&self) -> &'static str {
        "clickup_chat"
    }

    fn description(&self) -> &'static str {
        "Manage ClickUp chat. Actions:\n\
         - **list_channels**: List all chat channels in the workspace.\n\
         - **send_message**: Send a message to a chat channel."
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    fn handle(&self, args: &ToolArgs) -> String {
        respond(&self.client, "with chat", || self.run(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;
    use crate::traits::ApiVersion;

    fn args(value: Value) -> ToolArgs {
        ToolArgs::from_value(value)
    }

    #[test]
    fn test_list_channels_with_cursor() {
        let (client, mock) = mock_client();
        mock.respond(json!({
            "channels": [{"id": "c1", "name": "general", "type": "CHANNEL", "member_count": 4}],
            "next_cursor": "abc"
        }));

        let out = Chat::new(Arc::new(client))
            .handle(&args(json!({"action": "list_channels", "cursor": "start"})));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["next_cursor"], "abc");

        let request = mock.last_request();
        assert_eq!(request.version, ApiVersion::V3);
        assert_eq!(request.path, "/workspaces/999/chat/channels");
        assert_eq!(request.query, vec![("cursor".to_string(), "start".to_string())]);
    }

    #[test]
    fn test_send_post_message() {
        let (client, mock) = mock_client();
        mock.respond(json!({"id": "m1"}));

        let out = Chat::new(Arc::new(client)).handle(&args(json!({
            "action": "send_message",
            "channelId": "c1",
            "content": "Release is out",
            "type": "post",
            "postTitle": "v2"
        })));
        assert!(out.starts_with("Message sent to channel 'c1' successfully.\n"));
        assert_eq!(
            mock.last_request().body,
            Some(json!({
                "content": "Release is out",
                "content_format": "text/md",
                "type": "post",
                "post_title": "v2"
            }))
        );
    }

    #[test]
    fn test_plain_message_ignores_post_title() {
        let (client, mock) = mock_client();
        Chat::new(Arc::new(client)).handle(&args(json!({
            "action": "send_message",
            "channelId": "c1",
            "content": "hi",
            "postTitle": "ignored"
        })));
        assert_eq!(
            mock.last_request().body,
            Some(json!({"content": "hi", "content_format": "text/md"}))
        );
    }

    #[test]
    fn test_no_channels() {
        let (client, mock) = mock_client();
        mock.respond(json!({"channels": []}));
        let out = Chat::new(Arc::new(client)).handle(&args(json!({"action": "list_channels"})));
        assert_eq!(out, "No chat channels found.");
    }
}
