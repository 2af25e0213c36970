//! # Participant
//!
//! A participant is anything that can reply when addressed. Participants that
//! expose a non-empty [`ToolTable`] are tool-capable and can resolve tool
//! invocation requests naming one of their tools.

use crate::error::{ToolError, ToolResult};
use crate::identifiers::ParticipantId;
use crate::message::{Arguments, Message};
use crate::tool::ToolTable;

/// Core participant trait.
///
/// Participants are supplied fully constructed; the orchestrator only
/// addresses them and never changes their identity or tool set.
///
/// # Example
///
/// ```rust
/// use parley_core::{Message, Participant, ParticipantId};
///
/// struct Echo {
///     id: ParticipantId,
/// }
///
/// impl Participant for Echo {
///     fn id(&self) -> &ParticipantId {
///         &self.id
///     }
///
///     fn generate_reply(&mut self, message: &Message, _sender: &ParticipantId) -> Message {
///         Message::plain(message.render().into_owned())
///     }
/// }
///
/// let mut echo = Echo { id: ParticipantId::parse("Echo").unwrap() };
/// let sender = ParticipantId::parse("Admin").unwrap();
/// assert_eq!(echo.generate_reply(&Message::plain("hi"), &sender), Message::plain("hi"));
/// ```
pub trait Participant: Send {
    /// Stable identifier used in chat records
    fn id(&self) -> &ParticipantId;

    /// Produce a reply to `message` sent by `sender`.
    ///
    /// Total from the orchestrator's point of view: backend failures must be
    /// turned into a plain text reply by the implementation.
    fn generate_reply(&mut self, message: &Message, sender: &ParticipantId) -> Message;

    /// Retain a message in the participant's own history without replying.
    ///
    /// Used when a participant's reply is recorded as sent to itself.
    fn remember(&mut self, _message: &Message, _sender: &ParticipantId) {}

    /// Tool table, if the participant exposes tools
    fn tools(&self) -> Option<&ToolTable> {
        None
    }

    /// Execute one of this participant's tools on its own behalf.
    ///
    /// The default implementation looks the tool up in [`Participant::tools`]
    /// and wraps its output in a [`Message::ToolResult`].
    ///
    /// # Errors
    ///
    /// [`ToolError::NotFound`] if the participant has no such tool, or the
    /// tool's own error.
    fn resolve_tool(&mut self, tool_name: &str, arguments: &Arguments) -> ToolResult<Message> {
        let tools = self.tools().ok_or_else(|| ToolError::NotFound {
            name: tool_name.to_string(),
        })?;
        let content = tools.invoke(tool_name, arguments)?;
        Ok(Message::tool_result(tool_name, content))
    }

    /// Whether the participant exposes at least one tool
    fn is_tool_capable(&self) -> bool {
        self.tools().is_some_and(|tools| !tools.is_empty())
    }

    /// Whether the participant exposes a tool named `tool_name`
    fn exposes_tool(&self, tool_name: &str) -> bool {
        self.tools().is_some_and(|tools| tools.contains(tool_name))
    }
}

impl<P: Participant + ?Sized> Participant for Box<P> {
    fn id(&self) -> &ParticipantId {
        (**self).id()
    }

    fn generate_reply(&mut self, message: &Message, sender: &ParticipantId) -> Message {
        (**self).generate_reply(message, sender)
    }

    fn remember(&mut self, message: &Message, sender: &ParticipantId) {
        (**self).remember(message, sender)
    }

    fn tools(&self) -> Option<&ToolTable> {
        (**self).tools()
    }

    fn resolve_tool(&mut self, tool_name: &str, arguments: &Arguments) -> ToolResult<Message> {
        (**self).resolve_tool(tool_name, arguments)
    }

    fn is_tool_capable(&self) -> bool {
        (**self).is_tool_capable()
    }

    fn exposes_tool(&self, tool_name: &str) -> bool {
        (**self).exposes_tool(tool_name)
    }
}

/// Participant that stands in for a human operator.
///
/// Never consults a model: it answers every message with a fixed auto-reply
/// and may still expose tools that are executed on its behalf.
#[derive(Debug, Clone)]
pub struct ProxyParticipant {
    id: ParticipantId,
    auto_reply: String,
    tools: Option<ToolTable>,
}

impl ProxyParticipant {
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            auto_reply: String::new(),
            tools: None,
        }
    }

    pub fn with_auto_reply(mut self, reply: impl Into<String>) -> Self {
        self.auto_reply = reply.into();
        self
    }

    pub fn with_tools(mut self, tools: ToolTable) -> Self {
        self.tools = Some(tools);
        self
    }
}

impl Participant for ProxyParticipant {
    fn id(&self) -> &ParticipantId {
        &self.id
    }

    fn generate_reply(&mut self, _message: &Message, _sender: &ParticipantId) -> Message {
        Message::plain(self.auto_reply.clone())
    }

    fn tools(&self) -> Option<&ToolTable> {
        self.tools.as_ref()
    }
}
