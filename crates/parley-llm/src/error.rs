//! Error types for model backends

use thiserror::Error;

/// Errors raised while talking to a model backend
#[derive(Error, Debug)]
pub enum LlmError {
    /// Transport or decoding failure inside reqwest
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The completion contained no choices
    #[error("Response contained no choices")]
    EmptyResponse,

    /// A function call carried arguments that are not a JSON object
    #[error("Malformed arguments for function '{function}': {source}")]
    FunctionArguments {
        function: String,
        #[source]
        source: serde_json::Error,
    },

    /// The embeddings endpoint returned no vector
    #[error("Response contained no embedding")]
    EmptyEmbedding,

    #[error("Failed to create async runtime: {0}")]
    Runtime(String),
}

pub type LlmResult<T> = Result<T, LlmError>;
