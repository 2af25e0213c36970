//! Sequential relay: `p[0] -> p[1] -> ... -> p[N-1]`.

use parley_core::ValidationResult;
use tracing::debug;

use crate::error::OrchestratorResult;
use crate::orchestrator::Orchestrator;
use crate::result::ConversationResult;
use crate::route::Route;

impl Orchestrator {
    /// Relay the prompt down the participant list.
    ///
    /// For every adjacent pair `(p[i], p[i + 1])`:
    ///
    /// 1. plain text is relayed from `p[i]` to `p[i + 1]`, whose reply is
    ///    appended whatever its shape;
    /// 2. then, a tool request that `p[i]` exposes is executed by `p[i]` and
    ///    the result relayed to `p[i + 1]`.
    ///
    /// At the final pair a tool-capable `p[N-1]` additionally addresses itself
    /// with the latest message. Exactly `N - 1` steps run; a step where neither
    /// check applies is skipped and reported in the result.
    ///
    /// # Errors
    ///
    /// Tool, validation, and audit failures abort the conversation.
    pub fn sequential_conversation<V>(
        mut self,
        prompt: impl Into<String>,
        validate: V,
    ) -> OrchestratorResult<ConversationResult>
    where
        V: FnOnce() -> ValidationResult,
    {
        self.seed(prompt.into());

        let steps = self.participant_count() - 1;
        for step in 0..steps {
            let (sender, receiver) = (step, step + 1);
            debug!(step, sender, receiver, "Sequential step");

            let mut acted = false;

            let latest = self.latest();
            if let Route::Exchange(_) = Route::for_text(&latest) {
                self.basic_exchange(sender, receiver, latest)?;
                acted = true;
            }

            let latest = self.latest();
            if let Route::ResolveTool {
                tool_name,
                arguments,
            } = Route::for_tool(&latest, self.sender(sender))
            {
                self.tool_resolution(step, sender, receiver, tool_name, arguments)?;
                acted = true;
            }

            if !acted {
                self.skip_step(step, &latest);
            }

            if receiver == steps && self.is_tool_capable(receiver) {
                self.self_invocation(receiver)?;
            }
        }

        self.finish(steps, validate)
    }
}
