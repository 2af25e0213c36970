//! Conversation protocols.
//!
//! Both protocols seed the transcript with the prompt, walk the roster once,
//! run the validator exactly once, and price the chat log. They differ in who
//! addresses whom:
//!
//! - [`sequential`]: each participant relays to the next one in line
//! - [`broadcast`]: the first participant briefs every other participant with
//!   the original prompt

pub mod broadcast;
pub mod sequential;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conversation topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Sequential,
    Broadcast,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Sequential => "sequential",
            Protocol::Broadcast => "broadcast",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Protocol::Sequential),
            "broadcast" => Ok(Protocol::Broadcast),
            other => Err(format!("unknown protocol '{other}'")),
        }
    }
}
