//! Structural routing of the latest transcript entry.

use parley_core::{Arguments, Message, Participant};

/// What the orchestrator does with the latest message at a given check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Plain text: relay it in a basic (or memory) exchange
    Exchange(&'a str),
    /// A tool request the current sender can execute
    ResolveTool {
        tool_name: &'a str,
        arguments: &'a Arguments,
    },
    /// Nothing applies
    None,
}

impl<'a> Route<'a> {
    /// Route for the first check of a step: plain text only.
    pub fn for_text(latest: &'a Message) -> Self {
        match latest {
            Message::PlainText { body } => Route::Exchange(body),
            _ => Route::None,
        }
    }

    /// Route for the second check of a step: a tool request that `sender`
    /// exposes.
    pub fn for_tool<P>(latest: &'a Message, sender: &P) -> Self
    where
        P: Participant + ?Sized,
    {
        match latest {
            Message::ToolInvocationRequest {
                tool_name,
                arguments,
            } if sender.exposes_tool(tool_name) => Route::ResolveTool {
                tool_name,
                arguments,
            },
            _ => Route::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{FnTool, ParticipantId, ProxyParticipant, ToolTable};
    use std::sync::Arc;

    fn runner() -> ProxyParticipant {
        let tools = ToolTable::new()
            .try_with_tool(Arc::new(FnTool::new("run_sql", |_: &Arguments| {
                Ok("done".to_string())
            })))
            .unwrap();
        ProxyParticipant::new(ParticipantId::new_unchecked("Runner")).with_tools(tools)
    }

    #[test]
    fn plain_text_routes_to_exchange() {
        let message = Message::plain("hello");
        assert_eq!(Route::for_text(&message), Route::Exchange("hello"));
        assert_eq!(Route::for_tool(&message, &runner()), Route::None);
    }

    #[test]
    fn tool_request_routes_only_when_sender_exposes_tool() {
        let known = Message::tool_request("run_sql", Arguments::new());
        let unknown = Message::tool_request("write_file", Arguments::new());

        assert_eq!(Route::for_text(&known), Route::None);
        assert!(matches!(
            Route::for_tool(&known, &runner()),
            Route::ResolveTool { tool_name: "run_sql", .. }
        ));
        assert_eq!(Route::for_tool(&unknown, &runner()), Route::None);
    }

    #[test]
    fn tool_result_routes_nowhere() {
        let message = Message::tool_result("run_sql", "done");
        assert_eq!(Route::for_text(&message), Route::None);
        assert_eq!(Route::for_tool(&message, &runner()), Route::None);
    }
}
