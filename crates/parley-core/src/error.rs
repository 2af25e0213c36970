//! Error Types
//!
//! Domain errors for the core building blocks. Tool errors are propagated to
//! the caller of a conversation untouched; roster errors surface when a
//! conversation is configured with too few participants.

use thiserror::Error;

use crate::identifiers::IdValidationError;

/// Errors that can occur while registering or invoking tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with the requested name is registered.
    #[error("Tool '{name}' not found")]
    NotFound { name: String },

    /// The tool name is not a valid identifier.
    #[error("Invalid tool name '{attempted_name}': {source}")]
    InvalidName {
        attempted_name: String,
        #[source]
        source: IdValidationError,
    },

    /// A tool with the same name is already registered.
    #[error("Tool '{name}' is already registered")]
    DuplicateName { name: String },

    /// A required argument was not supplied.
    #[error("Tool '{tool}' is missing required argument '{argument}'")]
    MissingArgument { tool: String, argument: String },

    /// The arguments were present but unusable.
    #[error("Tool '{tool}' received invalid input: {reason}")]
    InvalidInput { tool: String, reason: String },

    /// The tool ran and failed.
    #[error("Tool '{tool}' execution failed: {message}")]
    ExecutionFailed { tool: String, message: String },

    /// Filesystem failure inside a tool.
    #[error("Tool '{tool}' I/O error: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub fn missing_argument(tool: impl Into<String>, argument: impl Into<String>) -> Self {
        ToolError::MissingArgument {
            tool: tool.into(),
            argument: argument.into(),
        }
    }

    pub fn invalid_input(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::InvalidInput {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    pub fn execution_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::ExecutionFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn io(tool: impl Into<String>, source: std::io::Error) -> Self {
        ToolError::Io {
            tool: tool.into(),
            source,
        }
    }

    /// Name of the tool the error refers to, if known.
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            ToolError::NotFound { name } | ToolError::DuplicateName { name } => Some(name),
            ToolError::InvalidName { .. } => None,
            ToolError::MissingArgument { tool, .. }
            | ToolError::InvalidInput { tool, .. }
            | ToolError::ExecutionFailed { tool, .. }
            | ToolError::Io { tool, .. } => Some(tool),
        }
    }
}

/// Result type for tool operations
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors raised when building a participant roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("A conversation requires at least {required} participants, got {found}")]
    TooFewParticipants { required: usize, found: usize },
}

/// Top-level error for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Id(#[from] IdValidationError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

pub type CoreResult<T> = Result<T, CoreError>;
