//! Collections with size guarantees enforced at construction.

pub mod roster;

pub use roster::{MIN_PARTICIPANTS, Roster};
