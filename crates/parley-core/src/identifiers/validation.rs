//! Identifier validation rules

use thiserror::Error;

/// Maximum length for all identifier types
pub const MAX_ID_LENGTH: usize = 128;

/// Error type for identifier validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdValidationError {
    /// The identifier string is empty
    #[error("Identifier cannot be empty")]
    Empty,
    /// The identifier contains only whitespace
    #[error("Identifier cannot be whitespace-only")]
    WhitespaceOnly,
    /// The identifier has leading or trailing whitespace
    #[error("Identifier cannot have leading or trailing whitespace")]
    LeadingTrailingWhitespace,
    /// The identifier contains invalid characters
    #[error(
        "Identifier can only contain alphanumeric characters, hyphens, underscores, and dots"
    )]
    InvalidCharacters,
    /// The identifier exceeds the maximum length
    #[error("Identifier too long ({length} chars, max {max})")]
    TooLong { length: usize, max: usize },
}

/// Validator for identifier strings
pub struct IdValidator;

impl IdValidator {
    /// Validate an identifier string.
    ///
    /// # Validation Rules
    ///
    /// - Non-empty, at most [`MAX_ID_LENGTH`] characters
    /// - No leading or trailing whitespace
    /// - Only alphanumeric characters, hyphens (`-`), underscores (`_`), and dots (`.`)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use parley_core::identifiers::IdValidator;
    ///
    /// assert!(IdValidator::validate("Sr_Data_Analyst").is_ok());
    /// assert!(IdValidator::validate("run_sql").is_ok());
    /// assert!(IdValidator::validate("").is_err());
    /// assert!(IdValidator::validate("two words").is_err());
    /// ```
    pub fn validate(id: &str) -> Result<&str, IdValidationError> {
        if id.is_empty() {
            return Err(IdValidationError::Empty);
        }

        if id.trim().is_empty() {
            return Err(IdValidationError::WhitespaceOnly);
        }

        if id != id.trim() {
            return Err(IdValidationError::LeadingTrailingWhitespace);
        }

        let length = id.chars().count();
        if length > MAX_ID_LENGTH {
            return Err(IdValidationError::TooLong {
                length,
                max: MAX_ID_LENGTH,
            });
        }

        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(IdValidationError::InvalidCharacters);
        }

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Admin")]
    #[case("Sr_Data_Analyst")]
    #[case("write-json-file")]
    #[case("team.member.1")]
    fn accepts_valid_identifiers(#[case] id: &str) {
        assert_eq!(IdValidator::validate(id), Ok(id));
    }

    #[rstest]
    #[case("", IdValidationError::Empty)]
    #[case("   ", IdValidationError::WhitespaceOnly)]
    #[case(" Admin", IdValidationError::LeadingTrailingWhitespace)]
    #[case("Product Manager", IdValidationError::InvalidCharacters)]
    #[case("a/b", IdValidationError::InvalidCharacters)]
    fn rejects_invalid_identifiers(#[case] id: &str, #[case] expected: IdValidationError) {
        assert_eq!(IdValidator::validate(id), Err(expected));
    }

    #[test]
    fn rejects_overlong_identifiers() {
        let id = "x".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            IdValidator::validate(&id),
            Err(IdValidationError::TooLong { length, max }) if length == MAX_ID_LENGTH + 1 && max == MAX_ID_LENGTH
        ));
    }
}
