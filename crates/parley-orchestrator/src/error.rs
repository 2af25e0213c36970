//! Error types for conversation runs

use parley_core::{ParticipantId, RosterError, ToolError, ValidationError};
use thiserror::Error;

/// Result type for orchestrator operations
pub type OrchestratorResult<T> = Result<T, ConversationError>;

/// Errors that abort a conversation
#[derive(Error, Debug)]
pub enum ConversationError {
    /// The participant list cannot carry a conversation
    #[error("Invalid configuration: {0}")]
    Roster(#[from] RosterError),

    /// A tool raised during resolution
    #[error("Tool execution failed: {0}")]
    Tool(#[from] ToolError),

    /// The validation check could not run
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The chat log could not be persisted
    #[error("Audit sink failed: {0}")]
    Audit(#[from] AuditError),

    /// Tool resolution produced no textual content to relay
    #[error("Participant '{participant}' produced no content at step {step}")]
    MissingContent {
        participant: ParticipantId,
        step: usize,
    },
}

/// Errors raised by audit sinks
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Chat log serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised when loading a tokenizer
#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Tokenizer could not be loaded from {path}: {message}")]
    Load { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_error_converts() {
        let err: ConversationError = RosterError::TooFewParticipants {
            required: 2,
            found: 1,
        }
        .into();
        assert!(matches!(err, ConversationError::Roster(_)));
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn missing_content_names_participant() {
        let err = ConversationError::MissingContent {
            participant: ParticipantId::new_unchecked("Sr_Data_Analyst"),
            step: 2,
        };
        assert_eq!(
            err.to_string(),
            "Participant 'Sr_Data_Analyst' produced no content at step 2"
        );
    }
}
