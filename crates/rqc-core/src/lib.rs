//! Core types for the regex entity query card
//!
//! This crate provides the fundamental types shared by the pattern, matcher,
//! and sorter crates: Entity, the snapshot map, MatchRecord, SortValue,
//! CardError, and the card configuration bundle.

mod config;
mod entity;
pub mod entity_id;
mod error;
mod match_record;

pub use config::{CardConfig, DisplayType, SecondaryInfo, SortBy, SortOrder};
pub use entity::{state_map, Entity, StateMap};
pub use error::{CardError, ErrorKind};
pub use match_record::{MatchRecord, SortValue};

/// State values that mark an entity as unavailable.
///
/// Compared against the case-folded state string.
pub const UNAVAILABLE_STATES: &[&str] = &["unavailable", "unknown", "none", ""];

/// Check whether a state string represents an unavailable entity
pub fn is_unavailable_state(state: &str) -> bool {
    UNAVAILABLE_STATES.contains(&state.to_lowercase().as_str())
}
