//! Outcome of a conversation run.

use parley_core::{ChatRecord, Message};
use serde::Serialize;

use crate::cost::CostEstimate;

/// Immutable record of how a conversation ended.
///
/// Built exactly once, after the validator has run and the chat log has been
/// priced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationResult {
    success: bool,
    error_message: String,
    transcript: Vec<Message>,
    chat_log: Vec<ChatRecord>,
    cost: f64,
    tokens: usize,
    last_message_text: String,
    skipped_steps: Vec<usize>,
}

impl ConversationResult {
    pub(crate) fn new(
        success: bool,
        error_message: String,
        transcript: Vec<Message>,
        chat_log: Vec<ChatRecord>,
        estimate: CostEstimate,
        skipped_steps: Vec<usize>,
    ) -> Self {
        let last_message_text = transcript
            .last()
            .map(|message| message.render().into_owned())
            .unwrap_or_default();

        Self {
            success,
            error_message,
            transcript,
            chat_log,
            cost: estimate.cost,
            tokens: estimate.tokens,
            last_message_text,
            skipped_steps,
        }
    }

    /// Verdict of the validator
    pub fn success(&self) -> bool {
        self.success
    }

    /// Validator diagnostic, empty on success
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn chat_log(&self) -> &[ChatRecord] {
        &self.chat_log
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn tokens(&self) -> usize {
        self.tokens
    }

    /// Rendered text of the final transcript entry
    pub fn last_message_text(&self) -> &str {
        &self.last_message_text
    }

    /// Indices of steps where no exchange applied
    pub fn skipped_steps(&self) -> &[usize] {
        &self.skipped_steps
    }
}
