//! Conversation message types shared by the chat API and the LLM gateway
//!
//! The shapes follow the OpenAI tool-calling message format so that a
//! conversation history can be sent to the gateway verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: Role,
    /// Assistant messages that only request tools may carry no content
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    #[cfg(test)]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Tool result message answering `tool_call_id`
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }

    /// Tool calls requested by this message, empty for anything but an assistant turn
    pub fn requested_tool_calls(&self) -> &[ToolCall] {
        match (&self.role, &self.tool_calls) {
            (Role::Assistant, Some(calls)) => calls,
            _ => &[],
        }
    }

    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// A structured request from the model to invoke a named tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub kind: String,
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object
    #[serde(default, deserialize_with = "arguments_as_string")]
    pub arguments: String,
}

impl ToolCall {
    #[cfg(test)]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Decode the argument object; a blank argument string is an empty object
    pub fn parse_arguments(&self) -> Result<Value, serde_json::Error> {
        let raw = self.function.arguments.trim();
        if raw.is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(raw)
    }
}

/// Some gateway backends inline the argument object instead of encoding it
fn arguments_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Tool metadata advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the argument object
    #[schema(value_type = Object)]
    pub parameters: Value,
}

impl ToolDefinition {
    /// Convert to OpenAI function calling format
    pub fn to_openai_format(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequencingError {
    #[error("tool message at position {position} has no tool_call_id")]
    MissingCallId { position: usize },

    #[error("tool message at position {position} answers unknown tool call '{call_id}'")]
    UnmatchedCallId { position: usize, call_id: String },
}

/// Check that every tool message answers a call from the assistant turn that precedes
/// its block of tool results
pub fn check_tool_sequencing(messages: &[ChatMessage]) -> Result<(), SequencingError> {
    let mut open_calls: &[ToolCall] = &[];

    for (position, message) in messages.iter().enumerate() {
        match message.role {
            Role::Tool => {
                let call_id = message
                    .tool_call_id
                    .as_deref()
                    .ok_or(SequencingError::MissingCallId { position })?;
                if !open_calls.iter().any(|c| c.id == call_id) {
                    return Err(SequencingError::UnmatchedCallId {
                        position,
                        call_id: call_id.to_string(),
                    });
                }
            }
            Role::Assistant => open_calls = message.requested_tool_calls(),
            Role::System | Role::User => open_calls = &[],
        }
    }

    Ok(())
}
