//! # Parley
//!
//! Parley runs conversations between participants (model-backed assistants
//! and proxies) to turn a natural-language request into validated tool
//! actions. Every exchange is audited, the conversation is checked by a
//! validator, and the chat log is priced.
//!
//! ## Crates
//!
//! - **`core`**: messages, chat records, tools, participants, roster
//! - **`orchestrator`**: sequential and broadcast protocols, cost, audit sinks
//! - **`tools`**: `run_sql`, file writers, sessions, validators
//! - **`context`**: schema context selection and prompt assembly
//! - **`llm`**: chat-completions and embeddings adapters
//!
//! ## Quick Start
//!
//! ```rust
//! use parley::{Message, Orchestrator, Participant, ParticipantId, ProxyParticipant, Validation};
//!
//! let team: Vec<Box<dyn Participant>> = vec![
//!     Box::new(ProxyParticipant::new(ParticipantId::parse("Admin").unwrap())),
//!     Box::new(
//!         ProxyParticipant::new(ParticipantId::parse("Engineer").unwrap())
//!             .with_auto_reply("SELECT 1"),
//!     ),
//! ];
//!
//! let result = Orchestrator::new("demo", team)
//!     .unwrap()
//!     .sequential_conversation("count users", || Ok(Validation::passed()))
//!     .unwrap();
//!
//! assert!(result.success());
//! assert_eq!(result.transcript().last(), Some(&Message::plain("SELECT 1")));
//! ```

pub use parley_context as context;
pub use parley_core as core;
pub use parley_llm as llm;
pub use parley_orchestrator as orchestrator;
pub use parley_tools as tools;

pub use parley_core::{
    Arguments, ChatRecord, Message, Participant, ParticipantId, ProxyParticipant, Tool, ToolTable,
    Validation, ValidationResult,
};
pub use parley_orchestrator::{ConversationError, ConversationResult, Orchestrator, Protocol};
