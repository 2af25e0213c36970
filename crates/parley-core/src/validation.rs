//! Outcome of a post-conversation validation check.
//!
//! A validator runs once after a protocol completes, takes no arguments, and
//! inspects whatever side effects the conversation was supposed to produce.
//! A negative verdict is a [`Validation`] with `success == false`; an error
//! means the check itself could not run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Verdict returned by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub success: bool,
    /// Diagnostic text, empty on success
    pub message: String,
}

impl Validation {
    pub fn passed() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<bool> for Validation {
    fn from(success: bool) -> Self {
        Self {
            success,
            message: String::new(),
        }
    }
}

impl From<(bool, String)> for Validation {
    fn from((success, message): (bool, String)) -> Self {
        Self { success, message }
    }
}

/// Failure of the validation check itself.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation failed to run: {0}")]
    Failed(String),
}

pub type ValidationResult = Result<Validation, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(Validation::passed(), Validation::from(true));
        let failed = Validation::failed("File out/run_sql_results.json is empty");
        assert!(!failed.success);
        assert_eq!(failed.message, "File out/run_sql_results.json is empty");
    }

    #[test]
    fn from_tuple() {
        let v: Validation = (false, "nope".to_string()).into();
        assert_eq!(v, Validation::failed("nope"));
    }

    #[test]
    fn io_errors_convert() {
        let err: ValidationError = std::io::Error::other("disk gone").into();
        assert!(err.to_string().contains("disk gone"));
    }
}
