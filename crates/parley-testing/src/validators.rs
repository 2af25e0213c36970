//! Validators that record their invocations.

use parley_core::{Validation, ValidationError, ValidationResult};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Outcome {
    Verdict(Validation),
    Error(String),
}

/// Validator returning a fixed outcome and counting how often it ran.
#[derive(Debug, Clone)]
pub struct RecordingValidator {
    outcome: Outcome,
    calls: Arc<Mutex<usize>>,
}

impl RecordingValidator {
    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn passing() -> Self {
        Self::with_outcome(Outcome::Verdict(Validation::passed()))
    }

    /// Negative verdict carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Verdict(Validation::failed(message)))
    }

    /// The check itself fails with [`ValidationError::Failed`]
    pub fn erroring(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Error(message.into()))
    }

    /// Run the check once
    pub fn validate(&self) -> ValidationResult {
        *self.calls.lock().unwrap() += 1;
        match &self.outcome {
            Outcome::Verdict(verdict) => Ok(verdict.clone()),
            Outcome::Error(message) => Err(ValidationError::Failed(message.clone())),
        }
    }

    /// Closure sharing this validator's call counter
    pub fn as_fn(&self) -> impl FnOnce() -> ValidationResult + use<> {
        let validator = self.clone();
        move || validator.validate()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}
