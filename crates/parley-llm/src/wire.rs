//! Chat-completions wire format
//!
//! Conversation messages are mapped onto chat roles here, and completion
//! replies are converted into [`Message`] exactly once. Function calls use
//! the `functions`/`function_call` shape; `tool_calls` replies are accepted
//! as well and reduced to their first call.

use parley_core::{Arguments, Message, ParticipantId, ToolTable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LlmError, LlmResult};

/// Longest `name` the chat API accepts on a message
const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object
    pub arguments: String,
}

/// One entry of a chat-completions `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            name: None,
            function_call: None,
        }
    }

    /// A message received from `sender`
    pub fn incoming(message: &Message, sender: &ParticipantId) -> Self {
        match message {
            Message::ToolResult { .. } => Self::function_result(message),
            _ => Self {
                role: Role::User,
                content: Some(message.render().into_owned()),
                name: Some(api_name(sender.as_str())),
                function_call: None,
            },
        }
    }

    /// A message produced by the participant itself
    pub fn outgoing(message: &Message) -> Self {
        match message {
            Message::PlainText { body } => Self {
                role: Role::Assistant,
                content: Some(body.clone()),
                name: None,
                function_call: None,
            },
            Message::ToolInvocationRequest {
                tool_name,
                arguments,
            } => Self {
                role: Role::Assistant,
                content: None,
                name: None,
                function_call: Some(FunctionCall {
                    name: tool_name.clone(),
                    arguments: serde_json::json!(arguments).to_string(),
                }),
            },
            Message::ToolResult { .. } => Self::function_result(message),
        }
    }

    fn function_result(message: &Message) -> Self {
        Self {
            role: Role::Function,
            content: Some(message.render().into_owned()),
            name: message.tool_name().map(api_name),
            function_call: None,
        }
    }
}

/// Restrict a participant or tool name to `[A-Za-z0-9_-]{1,64}`.
fn api_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect()
}

/// A callable function advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub parameters: Value,
}

impl FunctionDefinition {
    /// Definitions for every tool in `tools`, in table order.
    ///
    /// Tools without an input schema are advertised as taking no arguments.
    pub fn from_tools(tools: &ToolTable) -> Vec<Self> {
        tools
            .iter()
            .map(|tool| Self {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.input_schema().unwrap_or_else(
                    || serde_json::json!({ "type": "object", "properties": {} }),
                ),
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub functions: &'a [FunctionDefinition],
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToolCall {
    pub function: FunctionCall,
}

/// The assistant message of a completion choice.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
    #[serde(default)]
    pub(crate) tool_calls: Option<Vec<ToolCall>>,
}

impl ResponseMessage {
    /// Convert the reply into a conversation message.
    ///
    /// A function call becomes a tool invocation request whose arguments are
    /// flattened to strings; anything else is plain text, empty if the model
    /// returned no content.
    pub fn into_message(self) -> LlmResult<Message> {
        let call = self.function_call.or_else(|| {
            self.tool_calls
                .and_then(|calls| calls.into_iter().next())
                .map(|call| call.function)
        });

        match call {
            Some(call) => {
                let arguments = parse_arguments(&call)?;
                Ok(Message::tool_request(call.name, arguments))
            }
            None => Ok(Message::plain(self.content.unwrap_or_default())),
        }
    }
}

fn parse_arguments(call: &FunctionCall) -> LlmResult<Arguments> {
    if call.arguments.trim().is_empty() {
        return Ok(Arguments::new());
    }

    let object: Map<String, Value> =
        serde_json::from_str(&call.arguments).map_err(|source| LlmError::FunctionArguments {
            function: call.name.clone(),
            source,
        })?;

    Ok(object
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingResponse {
    #[serde(default)]
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingData {
    pub embedding: Vec<f32>,
}
