//! Scripted participants.

use parley_core::{Message, Participant, ParticipantId, Tool, ToolTable};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared, append-only record of `(sender, message)` pairs.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    entries: Arc<Mutex<Vec<(ParticipantId, Message)>>>,
}

impl Inbox {
    fn push(&self, sender: &ParticipantId, message: &Message) {
        self.entries
            .lock()
            .unwrap()
            .push((sender.clone(), message.clone()));
    }

    /// Everything recorded so far, in order
    pub fn messages(&self) -> Vec<(ParticipantId, Message)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Participant that answers from a queue of scripted replies.
///
/// Once the script runs out it answers `"<id> acknowledges"`. Everything it is
/// addressed with goes to its [`Inbox`]; everything it is asked to remember
/// goes to a separate memories inbox.
pub struct ScriptedParticipant {
    id: ParticipantId,
    script: VecDeque<Message>,
    tools: Option<ToolTable>,
    inbox: Inbox,
    memories: Inbox,
}

impl ScriptedParticipant {
    /// # Panics
    ///
    /// If `id` is not a valid participant identifier.
    pub fn new(id: &str) -> Self {
        Self {
            id: ParticipantId::parse(id).unwrap(),
            script: VecDeque::new(),
            tools: None,
            inbox: Inbox::default(),
            memories: Inbox::default(),
        }
    }

    /// Queue a plain text reply
    pub fn replying(self, body: impl Into<String>) -> Self {
        self.replying_with(Message::plain(body))
    }

    /// Queue an arbitrary reply
    pub fn replying_with(mut self, message: Message) -> Self {
        self.script.push_back(message);
        self
    }

    /// Expose `tool`
    ///
    /// # Panics
    ///
    /// If a tool with the same name was already added.
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools
            .get_or_insert_with(ToolTable::new)
            .register(Arc::new(tool))
            .unwrap();
        self
    }

    /// Handle on the messages this participant is addressed with
    pub fn inbox(&self) -> Inbox {
        self.inbox.clone()
    }

    /// Handle on the messages this participant was asked to remember
    pub fn memories(&self) -> Inbox {
        self.memories.clone()
    }
}

impl Participant for ScriptedParticipant {
    fn id(&self) -> &ParticipantId {
        &self.id
    }

    fn generate_reply(&mut self, message: &Message, sender: &ParticipantId) -> Message {
        self.inbox.push(sender, message);
        self.script
            .pop_front()
            .unwrap_or_else(|| Message::plain(format!("{} acknowledges", self.id)))
    }

    fn remember(&mut self, message: &Message, sender: &ParticipantId) {
        self.memories.push(sender, message);
    }

    fn tools(&self) -> Option<&ToolTable> {
        self.tools.as_ref()
    }
}
