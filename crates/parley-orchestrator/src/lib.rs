//! # Parley Orchestrator
//!
//! Drives a conversation between participants, resolves tool requests, keeps
//! the audited chat log, and prices the result.
//!
//! ## Protocols
//!
//! - **Sequential**: each participant relays to the next
//! - **Broadcast**: the first participant briefs all others with the prompt
//!
//! ## Example
//!
//! ```rust
//! use parley_core::{Participant, ParticipantId, ProxyParticipant, Validation};
//! use parley_orchestrator::{MemorySink, Orchestrator};
//!
//! let team: Vec<Box<dyn Participant>> = ["Admin", "Text_Report_Analyst", "JSON_Report_Analyst"]
//!     .into_iter()
//!     .map(|name| {
//!         Box::new(ProxyParticipant::new(ParticipantId::parse(name).unwrap()).with_auto_reply("done"))
//!             as Box<dyn Participant>
//!     })
//!     .collect();
//!
//! let sink = MemorySink::new();
//! let result = Orchestrator::new("data_report", team)
//!     .unwrap()
//!     .with_audit_sink(Box::new(sink.clone()))
//!     .broadcast_conversation("summarize", || Ok(Validation::passed()))
//!     .unwrap();
//!
//! assert_eq!(result.transcript().len(), 3);
//! assert_eq!(sink.records().len(), result.chat_log().len());
//! ```

pub mod audit;
pub mod cost;
pub mod error;
pub mod orchestrator;
pub mod protocols;
pub mod result;
pub mod route;

pub use audit::{AuditSink, JsonFileSink, MemorySink};
#[cfg(feature = "hf-tokenizer")]
pub use cost::HfTokenizer;
pub use cost::{CostEstimate, CostEstimator, DEFAULT_RATE_PER_1K, HeuristicTokenizer, Tokenizer};
pub use error::{AuditError, ConversationError, OrchestratorResult, TokenizerError};
pub use orchestrator::Orchestrator;
pub use protocols::Protocol;
pub use result::ConversationResult;
pub use route::Route;
