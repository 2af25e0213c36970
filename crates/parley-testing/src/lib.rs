//! # Parley Testing
//!
//! Test doubles for conversations: participants that reply from a script and
//! record what they were sent, tools that return canned output and count
//! their calls, and validators that record how often they ran.
//!
//! ```rust
//! use parley_core::{Arguments, Message, Participant, ParticipantId};
//! use parley_testing::{MockTool, ScriptedParticipant};
//!
//! let tool = MockTool::new("run_sql").returning("ok");
//! let mut analyst = ScriptedParticipant::new("Analyst")
//!     .replying_with(Message::tool_request("run_sql", Arguments::new()))
//!     .with_tool(tool.clone());
//!
//! let admin = ParticipantId::parse("Admin").unwrap();
//! let reply = analyst.generate_reply(&Message::plain("go"), &admin);
//! assert!(reply.is_tool_request());
//! assert!(analyst.exposes_tool("run_sql"));
//! ```

pub mod mock_tools;
pub mod participants;
pub mod validators;

pub use mock_tools::MockTool;
pub use participants::{Inbox, ScriptedParticipant};
pub use validators::RecordingValidator;
