//! Broadcast: `p[0]` briefs every other participant with the same prompt.

use parley_core::{Message, ValidationResult};
use tracing::debug;

use crate::error::OrchestratorResult;
use crate::orchestrator::Orchestrator;
use crate::result::ConversationResult;
use crate::route::Route;

const BROADCASTER: usize = 0;

impl Orchestrator {
    /// Send the original prompt from `p[0]` to each of `p[1..]`.
    ///
    /// For every `p[k]`, while the latest message is plain text the
    /// broadcaster addresses `p[k]` with the original prompt and `p[k]` keeps
    /// its reply as a memory. A tool request that `p[k]` exposes is then
    /// resolved by `p[k]` on its own behalf. Participants never address each
    /// other.
    ///
    /// # Errors
    ///
    /// Tool, validation, and audit failures abort the conversation.
    pub fn broadcast_conversation<V>(
        mut self,
        prompt: impl Into<String>,
        validate: V,
    ) -> OrchestratorResult<ConversationResult>
    where
        V: FnOnce() -> ValidationResult,
    {
        let prompt = Message::plain(prompt);
        self.seed(prompt.render().into_owned());

        let receivers = self.participant_count() - 1;
        for receiver in 1..=receivers {
            let step = receiver - 1;
            debug!(step, receiver, "Broadcast step");

            let mut acted = false;

            let latest = self.latest();
            if let Route::Exchange(_) = Route::for_text(&latest) {
                self.memory_exchange(BROADCASTER, receiver, prompt.clone())?;
                acted = true;
            }

            let latest = self.latest();
            if let Route::ResolveTool {
                tool_name,
                arguments,
            } = Route::for_tool(&latest, self.sender(receiver))
            {
                self.tool_resolution(step, receiver, receiver, tool_name, arguments)?;
                acted = true;
            }

            if !acted {
                self.skip_step(step, &latest);
            }
        }

        self.finish(receivers, validate)
    }
}
