//! Token counting and cost estimation.
//!
//! The estimator is a pure function of its input text: tokenize, then price
//! at a fixed rate per thousand tokens rounded to cents.

use parley_core::ChatRecord;
use serde::{Deserialize, Serialize};

/// Default price per 1000 tokens
pub const DEFAULT_RATE_PER_1K: f64 = 0.06;

/// Counts tokens in text.
pub trait Tokenizer: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
}

/// Character-based approximation: one token per four characters, rounded up.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenizer;

impl HeuristicTokenizer {
    pub const CHARS_PER_TOKEN: usize = 4;
}

impl Tokenizer for HeuristicTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(Self::CHARS_PER_TOKEN)
    }
}

/// Tokenizer backed by a HuggingFace `tokenizer.json`.
#[cfg(feature = "hf-tokenizer")]
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

#[cfg(feature = "hf-tokenizer")]
impl HfTokenizer {
    pub fn from_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::error::TokenizerError> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            crate::error::TokenizerError::Load {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "hf-tokenizer")]
impl std::fmt::Debug for HfTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfTokenizer")
            .field("vocab_size", &self.inner.get_vocab_size(true))
            .finish()
    }
}

#[cfg(feature = "hf-tokenizer")]
impl Tokenizer for HfTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        match self.inner.encode(text, false) {
            Ok(encoding) => encoding.get_ids().len(),
            Err(e) => {
                tracing::warn!(error = %e, "Tokenizer failed, falling back to heuristic count");
                HeuristicTokenizer.count_tokens(text)
            }
        }
    }
}

/// Estimated price of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub cost: f64,
    pub tokens: usize,
}

/// Prices text at a fixed rate per 1000 tokens.
pub struct CostEstimator {
    tokenizer: Box<dyn Tokenizer>,
    rate_per_1k: f64,
}

impl CostEstimator {
    pub fn new(tokenizer: Box<dyn Tokenizer>, rate_per_1k: f64) -> Self {
        Self {
            tokenizer,
            rate_per_1k,
        }
    }

    pub fn with_rate(mut self, rate_per_1k: f64) -> Self {
        self.rate_per_1k = rate_per_1k;
        self
    }

    pub fn rate_per_1k(&self) -> f64 {
        self.rate_per_1k
    }

    /// Estimate `(cost, tokens)` for `text`.
    ///
    /// `cost = round(tokens / 1000 * rate, 2)`.
    pub fn estimate(&self, text: &str) -> CostEstimate {
        let tokens = self.tokenizer.count_tokens(text);
        CostEstimate {
            cost: self.price(tokens),
            tokens,
        }
    }

    /// Price a token count, rounded to two decimal places.
    pub fn price(&self, tokens: usize) -> f64 {
        let raw = tokens as f64 / 1000.0 * self.rate_per_1k;
        (raw * 100.0).round() / 100.0
    }

    /// Estimate the cost of a whole chat log.
    ///
    /// Record contents are concatenated in order without separators; empty
    /// contributions are skipped.
    pub fn estimate_chat_log(&self, records: &[ChatRecord]) -> CostEstimate {
        self.estimate(&concatenate(records))
    }
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new(Box::new(HeuristicTokenizer), DEFAULT_RATE_PER_1K)
    }
}

impl std::fmt::Debug for CostEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostEstimator")
            .field("rate_per_1k", &self.rate_per_1k)
            .finish_non_exhaustive()
    }
}

fn concatenate(records: &[ChatRecord]) -> String {
    records
        .iter()
        .map(|record| record.content.render())
        .filter(|content| !content.is_empty())
        .collect()
}
