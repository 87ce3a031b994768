//! Structured errors surfaced to the card UI

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a card error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Bad, unsafe, or too-complex regular expression
    Pattern,
    /// Malformed snapshot entry (recovered locally, never fatal)
    Entity,
    /// Host snapshot/live-update channel unavailable
    Connection,
    /// Invalid sort/limit configuration
    Config,
}

/// A user-facing error with an optional technical detail string
///
/// The message is always a plain-language sentence; raw engine text goes to
/// `details`. The matching/sorting/validation surfaces never return these by
/// panicking or aborting an aggregate operation; they are carried inside
/// result values.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct CardError {
    /// Error category
    pub kind: ErrorKind,
    /// Plain-language message shown to the user
    pub message: String,
    /// Optional technical details (e.g., the raw engine message)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CardError {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Shorthand for a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Pattern, message)
    }

    /// Shorthand for a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Attach a technical details string
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
