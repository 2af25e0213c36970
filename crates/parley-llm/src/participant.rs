//! Model-backed participant

use std::fmt;
use std::sync::Arc;

use parley_core::{
    Arguments, Message, Participant, ParticipantId, ToolError, ToolResult, ToolTable,
};
use tracing::warn;

use crate::client::ChatBackend;
use crate::wire::{ChatMessage, FunctionDefinition};

/// Participant whose replies come from a chat model.
///
/// Keeps its own history: every message it receives, remembers or sends is
/// appended and replayed after the system message on the next call. Backend
/// failures never escape; they become a plain text reply starting with
/// `ERROR:`.
pub struct LlmParticipant {
    id: ParticipantId,
    system_message: String,
    backend: Arc<dyn ChatBackend>,
    history: Vec<ChatMessage>,
    tools: Option<ToolTable>,
    functions: Vec<FunctionDefinition>,
}

impl LlmParticipant {
    pub fn new(
        id: ParticipantId,
        system_message: impl Into<String>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            id,
            system_message: system_message.into(),
            backend,
            history: Vec::new(),
            tools: None,
            functions: Vec::new(),
        }
    }

    /// Expose `tools` and advertise them to the model as functions
    pub fn with_tools(mut self, tools: ToolTable) -> Self {
        self.functions = FunctionDefinition::from_tools(&tools);
        self.tools = Some(tools);
        self
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    fn prompt(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::system(self.system_message.as_str()));
        messages.extend(self.history.iter().cloned());
        messages
    }
}

impl Participant for LlmParticipant {
    fn id(&self) -> &ParticipantId {
        &self.id
    }

    fn generate_reply(&mut self, message: &Message, sender: &ParticipantId) -> Message {
        self.history.push(ChatMessage::incoming(message, sender));

        let reply = match self.backend.complete(&self.prompt(), &self.functions) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(participant = %self.id, error = %e, "Model call failed");
                Message::plain(format!("ERROR: {e}"))
            }
        };

        self.history.push(ChatMessage::outgoing(&reply));
        reply
    }

    fn remember(&mut self, message: &Message, sender: &ParticipantId) {
        self.history.push(ChatMessage::incoming(message, sender));
    }

    fn tools(&self) -> Option<&ToolTable> {
        self.tools.as_ref()
    }

    fn resolve_tool(&mut self, tool_name: &str, arguments: &Arguments) -> ToolResult<Message> {
        let tools = self.tools.as_ref().ok_or_else(|| ToolError::NotFound {
            name: tool_name.to_string(),
        })?;
        let result = Message::tool_result(tool_name, tools.invoke(tool_name, arguments)?);
        self.history.push(ChatMessage::outgoing(&result));
        Ok(result)
    }
}

impl fmt::Debug for LlmParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmParticipant")
            .field("id", &self.id)
            .field("history", &self.history.len())
            .field("functions", &self.functions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LlmError, LlmResult};
    use crate::wire::Role;
    use parley_core::FnTool;
    use std::sync::Mutex;

    /// Replays queued replies and records every prompt it sees.
    #[derive(Default)]
    struct QueuedBackend {
        replies: Mutex<Vec<LlmResult<Message>>>,
        prompts: Mutex<Vec<(Vec<ChatMessage>, usize)>>,
    }

    impl QueuedBackend {
        fn with_replies(replies: Vec<LlmResult<Message>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                prompts: Mutex::default(),
            })
        }
    }

    impl ChatBackend for QueuedBackend {
        fn complete(
            &self,
            messages: &[ChatMessage],
            functions: &[FunctionDefinition],
        ) -> LlmResult<Message> {
            self.prompts
                .lock()
                .unwrap()
                .push((messages.to_vec(), functions.len()));
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Message::plain("")))
        }
    }

    fn id(name: &str) -> ParticipantId {
        ParticipantId::new_unchecked(name)
    }

    fn sql_tools() -> ToolTable {
        ToolTable::new()
            .try_with_tool(Arc::new(FnTool::new("run_sql", |args: &Arguments| {
                Ok(format!("ran {}", args.get("sql").cloned().unwrap_or_default()))
            })))
            .unwrap()
    }

    #[test]
    fn replays_system_message_and_history() {
        let backend = QueuedBackend::with_replies(vec![
            Ok(Message::plain("first")),
            Ok(Message::plain("second")),
        ]);
        let mut engineer = LlmParticipant::new(id("Engineer"), "You write SQL.", backend.clone());

        engineer.generate_reply(&Message::plain("q1"), &id("Admin"));
        let reply = engineer.generate_reply(&Message::plain("q2"), &id("Admin"));
        assert_eq!(reply, Message::plain("second"));

        let prompts = backend.prompts.lock().unwrap();
        let (last, functions) = &prompts[1];
        assert_eq!(*functions, 0);
        assert_eq!(last.len(), 4);
        assert_eq!(last[0], ChatMessage::system("You write SQL."));
        assert_eq!(last[1].role, Role::User);
        assert_eq!(last[2].role, Role::Assistant);
        assert_eq!(last[3].content.as_deref(), Some("q2"));
    }

    #[test]
    fn backend_failure_becomes_error_text() {
        let backend = QueuedBackend::with_replies(vec![Err(LlmError::EmptyResponse)]);
        let mut analyst = LlmParticipant::new(id("Analyst"), "x", backend);

        let reply = analyst.generate_reply(&Message::plain("hi"), &id("Admin"));
        assert_eq!(
            reply,
            Message::plain("ERROR: Response contained no choices")
        );
        assert_eq!(analyst.history().len(), 2);
    }

    #[test]
    fn tools_are_advertised_and_resolved() {
        let backend = QueuedBackend::with_replies(vec![]);
        let mut engineer =
            LlmParticipant::new(id("Engineer"), "x", backend.clone()).with_tools(sql_tools());
        assert!(engineer.is_tool_capable());
        assert!(engineer.exposes_tool("run_sql"));

        engineer.generate_reply(&Message::plain("go"), &id("Admin"));
        assert_eq!(backend.prompts.lock().unwrap()[0].1, 1);

        let mut arguments = Arguments::new();
        arguments.insert("sql".into(), "SELECT 1".into());
        let result = engineer.resolve_tool("run_sql", &arguments).unwrap();
        assert_eq!(result, Message::tool_result("run_sql", "ran SELECT 1"));

        let last = engineer.history().last().unwrap();
        assert_eq!(last.role, Role::Function);
        assert_eq!(last.name.as_deref(), Some("run_sql"));
    }

    #[test]
    fn resolving_without_tools_is_not_found() {
        let mut analyst = LlmParticipant::new(id("Analyst"), "x", QueuedBackend::with_replies(vec![]));
        let err = analyst
            .resolve_tool("run_sql", &Arguments::new())
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
    }

    #[test]
    fn remember_appends_without_calling_backend() {
        let backend = QueuedBackend::with_replies(vec![]);
        let mut manager = LlmParticipant::new(id("Product_Manager"), "x", backend.clone());

        manager.remember(&Message::plain("note"), &id("Product_Manager"));
        assert_eq!(manager.history().len(), 1);
        assert!(backend.prompts.lock().unwrap().is_empty());
    }
}
