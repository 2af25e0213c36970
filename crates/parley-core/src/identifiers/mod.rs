//! Identifier types for participants and tools
//!
//! Routing in a conversation is keyed on stable, comparable identifiers rather
//! than on participant objects, so chat records stay meaningful after the
//! participants that produced them are dropped.
//!
//! # Examples
//!
//! ```rust
//! use parley_core::identifiers::{ParticipantId, ToolId};
//!
//! let analyst = ParticipantId::parse("Sr_Data_Analyst").unwrap();
//! let tool = ToolId::parse("run_sql").unwrap();
//!
//! assert_eq!(analyst.as_str(), "Sr_Data_Analyst");
//! assert!(ParticipantId::parse("Product Manager").is_err());
//! # let _ = tool;
//! ```

mod validation;

pub use validation::{IdValidationError, IdValidator, MAX_ID_LENGTH};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a conversation participant
///
/// Used as the sender/receiver key of every chat record and as the
/// self-addressing key in tool-resolution and memory exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Parse and validate a participant ID
    pub fn parse(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
        IdValidator::validate(id.as_ref()).map(|s| Self(s.to_string()))
    }

    /// Get the participant ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a participant ID without validation (for testing only)
    #[doc(hidden)]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ParticipantId {
    type Err = IdValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<ParticipantId> for String {
    fn from(id: ParticipantId) -> Self {
        id.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = IdValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a tool within a participant's tool table
///
/// Tool names are unique per participant; the same name may be exposed by
/// several participants with different implementations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolId(String);

impl ToolId {
    /// Parse and validate a tool ID
    pub fn parse(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
        IdValidator::validate(id.as_ref()).map(|s| Self(s.to_string()))
    }

    /// Get the tool ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a tool ID without validation (for testing only)
    #[doc(hidden)]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ToolId {
    type Err = IdValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<ToolId> for String {
    fn from(id: ToolId) -> Self {
        id.0
    }
}

impl TryFrom<String> for ToolId {
    type Error = IdValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<str> for ToolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_id_round_trips_through_serde() {
        let id = ParticipantId::parse("Product_Manager").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Product_Manager\"");

        let back: ParticipantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserializing_invalid_participant_id_fails() {
        let result: Result<ParticipantId, _> = serde_json::from_str("\"bad id\"");
        assert!(result.is_err());
    }

    #[test]
    fn tool_id_parses_from_str() {
        let id: ToolId = "write_json_file".parse().unwrap();
        assert_eq!(id.to_string(), "write_json_file");
        assert!("".parse::<ToolId>().is_err());
    }
}
