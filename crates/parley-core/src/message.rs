//! Conversation message model
//!
//! A [`Message`] is one unit of conversation content. Replies coming from
//! external backends are converted into this tagged union once, at the edge,
//! so routing decisions inside the engine only ever match on the variant.
//!
//! A [`ChatRecord`] is one audited exchange: who addressed whom, with what,
//! and when. Chat records are append-only and ordered by insertion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::identifiers::ParticipantId;

/// Named string arguments of a tool invocation.
///
/// A `BTreeMap` keeps serialization order stable, which keeps persisted chat
/// logs byte-identical across repeated writes.
pub type Arguments = BTreeMap<String, String>;

/// One unit of conversation content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Free-form text.
    PlainText { body: String },
    /// A request to execute a named tool with the given arguments.
    ToolInvocationRequest {
        tool_name: String,
        arguments: Arguments,
    },
    /// The string produced by executing a tool.
    ToolResult { tool_name: String, content: String },
}

impl Message {
    /// Create a plain text message
    pub fn plain(body: impl Into<String>) -> Self {
        Message::PlainText { body: body.into() }
    }

    /// Create a tool invocation request
    pub fn tool_request(tool_name: impl Into<String>, arguments: Arguments) -> Self {
        Message::ToolInvocationRequest {
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Create a tool result
    pub fn tool_result(tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Message::ToolResult {
            tool_name: tool_name.into(),
            content: content.into(),
        }
    }

    pub fn is_plain_text(&self) -> bool {
        matches!(self, Message::PlainText { .. })
    }

    pub fn is_tool_request(&self) -> bool {
        matches!(self, Message::ToolInvocationRequest { .. })
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self, Message::ToolResult { .. })
    }

    /// Textual content carried by the message, if any.
    ///
    /// Plain text yields its body and tool results their content. A tool
    /// invocation request carries no textual content.
    pub fn text(&self) -> Option<&str> {
        match self {
            Message::PlainText { body } => Some(body),
            Message::ToolResult { content, .. } => Some(content),
            Message::ToolInvocationRequest { .. } => None,
        }
    }

    /// Name of the tool this message refers to, if any.
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Message::ToolInvocationRequest { tool_name, .. }
            | Message::ToolResult { tool_name, .. } => Some(tool_name),
            Message::PlainText { .. } => None,
        }
    }

    /// Render the message as a single string.
    ///
    /// Textual variants render their content verbatim; a tool invocation
    /// request renders as its JSON call object `{"name": .., "arguments": ..}`.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Message::PlainText { body } => Cow::Borrowed(body),
            Message::ToolResult { content, .. } => Cow::Borrowed(content),
            Message::ToolInvocationRequest {
                tool_name,
                arguments,
            } => Cow::Owned(
                serde_json::json!({ "name": tool_name, "arguments": arguments }).to_string(),
            ),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Message {
    fn from(body: &str) -> Self {
        Message::plain(body)
    }
}

impl From<String> for Message {
    fn from(body: String) -> Self {
        Message::plain(body)
    }
}

/// One audited exchange between two participants.
///
/// `from` and `to` are equal for self-addressed exchanges (tool resolution,
/// memory retention, terminal self-invocation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub content: Message,
    pub created_at: DateTime<Utc>,
}

impl ChatRecord {
    /// Create a record stamped with the current time
    pub fn new(from: ParticipantId, to: ParticipantId, content: Message) -> Self {
        Self {
            from,
            to,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn is_self_addressed(&self) -> bool {
        self.from == self.to
    }
}
