//! Context selectors
//!
//! A selector picks the corpus entries relevant to a natural-language query.
//! Only the selected names leave this module; callers turn them into seed
//! text with [`Corpus::definitions_for`].

use thiserror::Error;
use tracing::debug;

use crate::corpus::Corpus;

/// Errors raised while selecting context
#[derive(Error, Debug)]
pub enum ContextError {
    /// The embedding backend failed
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Embeddings of different lengths cannot be compared
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type ContextResult<T> = Result<T, ContextError>;

/// Picks relevant corpus entries for a query.
pub trait ContextSelector {
    /// Names of the selected entries, most relevant first, without duplicates
    fn select(&self, query: &str, corpus: &Corpus) -> ContextResult<Vec<String>>;
}

/// Selects every entry whose name occurs in the query, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordMatchSelector;

impl ContextSelector for WordMatchSelector {
    fn select(&self, query: &str, corpus: &Corpus) -> ContextResult<Vec<String>> {
        let query = query.to_lowercase();
        let matches: Vec<String> = corpus
            .names()
            .filter(|name| query.contains(&name.to_lowercase()))
            .map(String::from)
            .collect();
        debug!(?matches, "Word match selection");
        Ok(matches)
    }
}

/// Turns text into a dense vector.
pub trait Embedder {
    fn embed(&self, text: &str) -> ContextResult<Vec<f32>>;
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn embed(&self, text: &str) -> ContextResult<Vec<f32>> {
        (**self).embed(text)
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed(&self, text: &str) -> ContextResult<Vec<f32>> {
        (**self).embed(text)
    }
}

/// Cosine similarity of two vectors of equal length.
///
/// Zero vectors have similarity `0.0` with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> ContextResult<f32> {
    if a.len() != b.len() {
        return Err(ContextError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

/// Default number of entries returned by [`EmbeddingSelector`]
pub const DEFAULT_TOP_N: usize = 3;

/// Ranks entries by cosine similarity between the query and each
/// definition, keeping the top `n`.
#[derive(Debug, Clone)]
pub struct EmbeddingSelector<E> {
    embedder: E,
    top_n: usize,
}

impl<E: Embedder> EmbeddingSelector<E> {
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

impl<E: Embedder> ContextSelector for EmbeddingSelector<E> {
    fn select(&self, query: &str, corpus: &Corpus) -> ContextResult<Vec<String>> {
        let query_embedding = self.embedder.embed(query)?;

        let mut scored = Vec::with_capacity(corpus.len());
        for (name, definition) in corpus.iter() {
            let embedding = self.embedder.embed(definition)?;
            scored.push((name, cosine_similarity(&query_embedding, &embedding)?));
        }

        // Stable sort keeps corpus order among equal scores
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let ranked: Vec<String> = scored
            .into_iter()
            .take(self.top_n)
            .map(|(name, _)| name.to_string())
            .collect();
        debug!(?ranked, top_n = self.top_n, "Embedding selection");
        Ok(ranked)
    }
}

/// Runs several selectors in turn and merges their picks, keeping the first
/// occurrence of each name.
#[derive(Default)]
pub struct CombinedSelector {
    selectors: Vec<Box<dyn ContextSelector>>,
}

impl CombinedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selector(mut self, selector: impl ContextSelector + 'static) -> Self {
        self.selectors.push(Box::new(selector));
        self
    }

    /// Embedding ranking followed by word matches
    pub fn embedding_then_word_match<E>(embedder: E, top_n: usize) -> Self
    where
        E: Embedder + 'static,
    {
        Self::new()
            .with_selector(EmbeddingSelector::new(embedder).with_top_n(top_n))
            .with_selector(WordMatchSelector)
    }
}

impl ContextSelector for CombinedSelector {
    fn select(&self, query: &str, corpus: &Corpus) -> ContextResult<Vec<String>> {
        let mut merged: Vec<String> = Vec::new();
        for selector in &self.selectors {
            for name in selector.select(query, corpus)? {
                if !merged.contains(&name) {
                    merged.push(name);
                }
            }
        }
        Ok(merged)
    }
}

impl std::fmt::Debug for CombinedSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedSelector")
            .field("selectors", &self.selectors.len())
            .finish()
    }
}
