//! # Parley Context
//!
//! Picks the schema context relevant to a request before a conversation
//! starts, and assembles the seed prompt around it.
//!
//! ```rust
//! use parley_context::{ContextSelector, Corpus, WordMatchSelector};
//!
//! let corpus: Corpus = [
//!     ("users", "CREATE TABLE users (id INTEGER);"),
//!     ("jobs", "CREATE TABLE jobs (id INTEGER);"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let names = WordMatchSelector.select("how many users?", &corpus).unwrap();
//! assert_eq!(corpus.definitions_for(&names), "CREATE TABLE users (id INTEGER);");
//! ```

pub mod corpus;
pub mod prompt;
pub mod selector;

pub use corpus::Corpus;
pub use prompt::{RESPONSE_FORMAT_CAP_REF, TABLE_DEFINITIONS_CAP_REF, add_cap_ref, database_prompt};
pub use selector::{
    CombinedSelector, ContextError, ContextResult, ContextSelector, DEFAULT_TOP_N, Embedder,
    EmbeddingSelector, WordMatchSelector, cosine_similarity,
};
