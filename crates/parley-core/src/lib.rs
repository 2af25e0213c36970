//! # Parley Core
//!
//! Core traits and types for the Parley conversation engine: identifiers, the
//! message model and chat records, tools and tool tables, the participant
//! trait, and the participant roster.

pub mod collections;
pub mod error;
pub mod identifiers;
pub mod message;
pub mod participant;
pub mod tool;
pub mod validation;

pub use collections::{MIN_PARTICIPANTS, Roster};
pub use error::{CoreError, CoreResult, RosterError, ToolError, ToolResult};
pub use identifiers::{IdValidationError, ParticipantId, ToolId};
pub use message::{Arguments, ChatRecord, Message};
pub use participant::{Participant, ProxyParticipant};
pub use tool::{FnTool, Tool, ToolTable};
pub use validation::{Validation, ValidationError, ValidationResult};
