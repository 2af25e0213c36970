//! Conversation state and the exchanges protocols are built from.
//!
//! An [`Orchestrator`] owns the participants, the routing transcript, and the
//! audited chat log for exactly one conversation. Protocols consume it.

use parley_core::{
    Arguments, ChatRecord, Message, Participant, ParticipantId, Roster, ValidationResult,
};
use tracing::{debug, info, warn};

use crate::audit::AuditSink;
use crate::cost::CostEstimator;
use crate::error::{ConversationError, OrchestratorResult};
use crate::result::ConversationResult;

/// Drives one conversation between a fixed list of participants.
///
/// # Example
///
/// ```rust
/// use parley_core::{Participant, ParticipantId, ProxyParticipant, Validation};
/// use parley_orchestrator::Orchestrator;
///
/// let team: Vec<Box<dyn Participant>> = vec![
///     Box::new(ProxyParticipant::new(ParticipantId::parse("Admin").unwrap())),
///     Box::new(
///         ProxyParticipant::new(ParticipantId::parse("Engineer").unwrap())
///             .with_auto_reply("On it."),
///     ),
/// ];
///
/// let result = Orchestrator::new("demo", team)
///     .unwrap()
///     .sequential_conversation("hello", || Ok(Validation::passed()))
///     .unwrap();
///
/// assert!(result.success());
/// assert_eq!(result.last_message_text(), "On it.");
/// ```
pub struct Orchestrator {
    name: String,
    participants: Roster<Box<dyn Participant>>,
    transcript: Vec<Message>,
    chat_log: Vec<ChatRecord>,
    estimator: CostEstimator,
    audit: Option<Box<dyn AuditSink>>,
    skipped_steps: Vec<usize>,
}

impl Orchestrator {
    /// Create an orchestrator for one conversation.
    ///
    /// # Errors
    ///
    /// [`ConversationError::Roster`] when fewer than two participants are
    /// supplied.
    pub fn new(
        name: impl Into<String>,
        participants: Vec<Box<dyn Participant>>,
    ) -> OrchestratorResult<Self> {
        let participants = Roster::new(participants)?;
        Ok(Self {
            name: name.into(),
            participants,
            transcript: Vec::new(),
            chat_log: Vec::new(),
            estimator: CostEstimator::default(),
            audit: None,
            skipped_steps: Vec::new(),
        })
    }

    /// Persist the chat log to `sink` after every exchange
    pub fn with_audit_sink(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    pub fn with_cost_estimator(mut self, estimator: CostEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn participant_ids(&self) -> Vec<&ParticipantId> {
        self.participants.iter().map(|p| p.id()).collect()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn chat_log(&self) -> &[ChatRecord] {
        &self.chat_log
    }

    pub(crate) fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub(crate) fn is_tool_capable(&self, index: usize) -> bool {
        self.participants[index].is_tool_capable()
    }

    pub(crate) fn seed(&mut self, prompt: String) {
        info!(
            conversation = %self.name,
            participants = self.participants.len(),
            "Starting conversation"
        );
        self.transcript.push(Message::plain(prompt));
    }

    /// Latest transcript entry. The transcript is never empty after seeding.
    pub(crate) fn latest(&self) -> Message {
        self.transcript
            .last()
            .cloned()
            .unwrap_or_else(|| Message::plain(""))
    }

    pub(crate) fn sender(&self, index: usize) -> &dyn Participant {
        self.participants[index].as_ref()
    }

    fn id_of(&self, index: usize) -> ParticipantId {
        self.participants[index].id().clone()
    }

    fn record(&mut self, from: ParticipantId, to: ParticipantId, content: Message) {
        self.chat_log.push(ChatRecord::new(from, to, content));
    }

    fn persist(&mut self) -> OrchestratorResult<()> {
        if let Some(sink) = self.audit.as_mut() {
            sink.persist(&self.chat_log)?;
        }
        Ok(())
    }

    /// `from` addresses `to` with `message`; the reply is appended to the
    /// transcript whatever its shape.
    pub(crate) fn basic_exchange(
        &mut self,
        from: usize,
        to: usize,
        message: Message,
    ) -> OrchestratorResult<()> {
        let from_id = self.id_of(from);
        let to_id = self.id_of(to);
        debug!(from = %from_id, to = %to_id, "Basic exchange");

        self.record(from_id.clone(), to_id.clone(), message.clone());
        let reply = self.participants[to].generate_reply(&message, &from_id);
        self.record(to_id, from_id, reply.clone());
        self.transcript.push(reply);
        self.persist()
    }

    /// Like a basic exchange, but the receiver also keeps its reply as a
    /// message sent to itself.
    pub(crate) fn memory_exchange(
        &mut self,
        from: usize,
        to: usize,
        message: Message,
    ) -> OrchestratorResult<()> {
        let from_id = self.id_of(from);
        let to_id = self.id_of(to);
        debug!(from = %from_id, to = %to_id, "Memory exchange");

        self.record(from_id.clone(), to_id.clone(), message.clone());
        let reply = self.participants[to].generate_reply(&message, &from_id);
        self.participants[to].remember(&reply, &to_id);

        self.record(to_id.clone(), from_id, reply.clone());
        self.record(to_id.clone(), to_id, reply.clone());
        self.transcript.push(reply);
        self.persist()
    }

    /// `sender` addresses itself with a tool request, the tool runs, and the
    /// resulting content is relayed to `receiver` in a basic exchange.
    pub(crate) fn tool_resolution(
        &mut self,
        step: usize,
        sender: usize,
        receiver: usize,
        tool_name: &str,
        arguments: &Arguments,
    ) -> OrchestratorResult<()> {
        let sender_id = self.id_of(sender);
        debug!(participant = %sender_id, tool = tool_name, step, "Resolving tool request");

        let request = Message::tool_request(tool_name, arguments.clone());
        self.record(sender_id.clone(), sender_id.clone(), request);
        let result = self.participants[sender].resolve_tool(tool_name, arguments)?;
        self.record(sender_id.clone(), sender_id.clone(), result.clone());
        self.transcript.push(result.clone());
        self.persist()?;

        if result.text().is_none_or(str::is_empty) {
            return Err(ConversationError::MissingContent {
                participant: sender_id,
                step,
            });
        }

        self.basic_exchange(sender, receiver, result)
    }

    /// The participant at `index` addresses itself with the latest message.
    ///
    /// A tool request it can execute is resolved; anything else is answered
    /// with an ordinary reply. Either way the outcome is appended without
    /// being forwarded.
    pub(crate) fn self_invocation(&mut self, index: usize) -> OrchestratorResult<()> {
        let id = self.id_of(index);
        let latest = self.latest();
        debug!(participant = %id, "Terminal self-invocation");

        self.record(id.clone(), id.clone(), latest.clone());
        let outcome = match &latest {
            Message::ToolInvocationRequest {
                tool_name,
                arguments,
            } if self.participants[index].exposes_tool(tool_name) => {
                self.participants[index].resolve_tool(tool_name, arguments)?
            }
            _ => self.participants[index].generate_reply(&latest, &id),
        };
        self.record(id.clone(), id, outcome.clone());
        self.transcript.push(outcome);
        self.persist()
    }

    pub(crate) fn skip_step(&mut self, step: usize, latest: &Message) {
        warn!(
            conversation = %self.name,
            step,
            message = %latest.render(),
            "No exchange applies to the latest message, skipping step"
        );
        self.skipped_steps.push(step);
    }

    /// Validate, price the chat log, and build the result.
    pub(crate) fn finish<V>(
        self,
        steps: usize,
        validate: V,
    ) -> OrchestratorResult<ConversationResult>
    where
        V: FnOnce() -> ValidationResult,
    {
        let verdict = validate()?;
        let estimate = self.estimator.estimate_chat_log(&self.chat_log);

        info!(
            conversation = %self.name,
            participants = self.participants.len(),
            steps,
            skipped = self.skipped_steps.len(),
            tokens = estimate.tokens,
            cost = estimate.cost,
            success = verdict.success,
            "Conversation finished"
        );

        Ok(ConversationResult::new(
            verdict.success,
            verdict.message,
            self.transcript,
            self.chat_log,
            estimate,
            self.skipped_steps,
        ))
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("name", &self.name)
            .field("participants", &self.participant_ids())
            .field("transcript", &self.transcript.len())
            .field("chat_log", &self.chat_log.len())
            .finish_non_exhaustive()
    }
}
