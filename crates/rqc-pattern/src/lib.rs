//! Pattern validation for the regex entity query card
//!
//! Turns untrusted pattern strings into compiled matchers or structured,
//! user-actionable errors. The safety checks here are heuristic guards
//! against pathological input, not a sandbox; the pattern is never executed
//! or interpreted as code.

mod suggest;
mod validator;

pub use suggest::{
    glob_to_regex, pattern_suggestions, PatternExample, COMMON_PATTERNS, PATTERN_EXAMPLES,
};
pub use validator::{test_pattern, validate_pattern, validate_patterns, PatternTest};
