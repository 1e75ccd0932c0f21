//! Wire types for interaction webhooks.
//!
//! Only the handful of fields the bot acts on are modelled.  Discord sends far more, and anything
//! not named here is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single inbound webhook event.
///
/// Everything except `type` is kept as raw JSON and read on demand, so a PING parses whatever
/// else its body carries.
#[derive(Debug, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    id: Option<Value>,
    /// Handle for editing the original response later.  Valid for a limited time only.
    #[serde(default)]
    token: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u64")]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    Other(u64),
}

impl From<u64> for InteractionType {
    fn from(value: u64) -> Self {
        match value {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandData {
    pub name: String,
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl Interaction {
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }

    /// Interaction token, if the body carried one as a string.
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().and_then(Value::as_str)
    }

    /// Slash command payload.  A missing or non-string name reads as empty, which the dispatcher
    /// reports as unknown.  Options that are not a list, or entries without a name, are skipped.
    pub fn command_data(&self) -> CommandData {
        let Some(data) = &self.data else {
            return CommandData::default();
        };
        let name = data
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let options = data
            .get("options")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| CommandOption::deserialize(option).ok())
                    .collect()
            })
            .unwrap_or_default();
        CommandData { name, options }
    }
}

impl CommandData {
    /// Value of the named option as text.  Absent options and `null` are empty; other non-string
    /// values are rendered as JSON.
    pub fn option_text(&self, name: &str) -> String {
        match self.options.iter().find(|o| o.name == name).map(|o| &o.value) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Bit flag marking a message as built from layout components.
pub const IS_COMPONENTS_V2: u64 = 1 << 15;

/// Body of a webhook response.
#[derive(Debug, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: ResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ResponseType {
    Pong,
    ChannelMessageWithSource,
    DeferredChannelMessageWithSource,
}

impl From<ResponseType> for u8 {
    fn from(value: ResponseType) -> Self {
        match value {
            ResponseType::Pong => 1,
            ResponseType::ChannelMessageWithSource => 4,
            ResponseType::DeferredChannelMessageWithSource => 5,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct MessageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

#[derive(Debug, Serialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: u8,
    pub content: String,
}

impl Component {
    pub fn text_display(content: impl Into<String>) -> Self {
        Self {
            kind: 10,
            content: content.into(),
        }
    }
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: ResponseType::Pong,
            data: None,
        }
    }

    /// "Thinking..." placeholder, replaced later by editing the original response.
    pub fn deferred() -> Self {
        Self {
            kind: ResponseType::DeferredChannelMessageWithSource,
            data: None,
        }
    }

    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseType::ChannelMessageWithSource,
            data: Some(MessageData {
                content: Some(content.into()),
                ..Default::default()
            }),
        }
    }

    pub fn components(components: Vec<Component>) -> Self {
        Self {
            kind: ResponseType::ChannelMessageWithSource,
            data: Some(MessageData {
                flags: Some(IS_COMPONENTS_V2),
                components,
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ping_ignores_unusual_data() {
        let interaction: Interaction =
            serde_json::from_value(json!({ "type": 1, "data": [1, 2, 3], "extra": true })).unwrap();
        assert_eq!(interaction.kind, InteractionType::Ping);
    }

    #[test]
    fn ping_ignores_non_string_id_and_token() {
        let interaction: Interaction =
            serde_json::from_value(json!({ "type": 1, "id": 123, "token": 5 })).unwrap();
        assert_eq!(interaction.kind, InteractionType::Ping);
        assert_eq!(interaction.id(), None);
        assert_eq!(interaction.token(), None);
    }

    #[test]
    fn unknown_types_are_kept() {
        let interaction: Interaction = serde_json::from_value(json!({ "type": 3 })).unwrap();
        assert_eq!(interaction.kind, InteractionType::Other(3));
        let interaction: Interaction = serde_json::from_value(json!({ "type": 300 })).unwrap();
        assert_eq!(interaction.kind, InteractionType::Other(300));
    }

    #[test]
    fn command_options_by_name() {
        let interaction: Interaction = serde_json::from_value(json!({
            "type": 2,
            "id": "I",
            "token": "T",
            "data": {
                "name": "ask",
                "options": [
                    { "name": "other", "value": "x" },
                    { "name": "question", "value": "2+2?" },
                    { "name": "count", "value": 3 }
                ]
            }
        }))
        .unwrap();

        let data = interaction.command_data();
        assert_eq!(data.name, "ask");
        assert_eq!(data.option_text("question"), "2+2?");
        assert_eq!(data.option_text("count"), "3");
        assert_eq!(data.option_text("missing"), "");
        assert_eq!(interaction.id(), Some("I"));
        assert_eq!(interaction.token(), Some("T"));
    }

    #[test]
    fn malformed_command_data_is_empty() {
        let interaction: Interaction =
            serde_json::from_value(json!({ "type": 2, "data": { "name": 5 } })).unwrap();
        assert_eq!(interaction.command_data().name, "");
    }

    #[test]
    fn malformed_options_are_skipped() {
        let interaction: Interaction = serde_json::from_value(json!({
            "type": 2,
            "data": { "name": "ask", "options": "x" }
        }))
        .unwrap();
        let data = interaction.command_data();
        assert_eq!(data.name, "ask");
        assert!(data.options.is_empty());

        let interaction: Interaction = serde_json::from_value(json!({
            "type": 2,
            "data": {
                "name": "ask",
                "options": [7, { "value": "nameless" }, { "name": "question", "value": "why?" }]
            }
        }))
        .unwrap();
        assert_eq!(interaction.command_data().option_text("question"), "why?");
    }

    #[test]
    fn response_shapes() {
        assert_eq!(
            serde_json::to_value(InteractionResponse::pong()).unwrap(),
            json!({ "type": 1 })
        );
        assert_eq!(
            serde_json::to_value(InteractionResponse::deferred()).unwrap(),
            json!({ "type": 5 })
        );
        assert_eq!(
            serde_json::to_value(InteractionResponse::message("hi")).unwrap(),
            json!({ "type": 4, "data": { "content": "hi" } })
        );
        assert_eq!(
            serde_json::to_value(InteractionResponse::components(vec![
                Component::text_display("hello world")
            ]))
            .unwrap(),
            json!({
                "type": 4,
                "data": {
                    "flags": 32768,
                    "components": [{ "type": 10, "content": "hello world" }]
                }
            })
        );
    }
}
