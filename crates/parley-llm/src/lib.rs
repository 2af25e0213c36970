//! # Parley LLM
//!
//! Adapters between Parley participants and OpenAI-compatible HTTP APIs.
//!
//! - [`ChatCompletionsClient`] posts chat histories to `/chat/completions`
//!   and converts each reply into a [`parley_core::Message`] at the edge.
//! - [`LlmParticipant`] keeps a per-participant history and advertises its
//!   tools to the model as callable functions.
//! - [`EmbeddingsClient`] implements [`parley_context::Embedder`] against
//!   `/embeddings`.

pub mod client;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod participant;
mod runtime;
pub mod wire;

pub use client::{ChatBackend, ChatCompletionsClient};
pub use config::{
    DEFAULT_API_BASE, DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, LlmConfig,
};
pub use embeddings::EmbeddingsClient;
pub use error::{LlmError, LlmResult};
pub use participant::LlmParticipant;
pub use wire::{ChatMessage, FunctionCall, FunctionDefinition, ResponseMessage, Role};
