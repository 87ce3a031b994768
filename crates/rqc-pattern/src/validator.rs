//! Validation of user-supplied regular expression patterns

use std::panic::{catch_unwind, AssertUnwindSafe};

use regex::{Regex, RegexBuilder};
use rqc_core::CardError;
use tracing::debug;

/// Maximum pattern length in characters
const MAX_PATTERN_LENGTH: usize = 500;

/// Maximum parenthesis nesting depth before a pattern is rejected
const MAX_NESTING_DEPTH: usize = 10;

/// Fixed probe input used to exercise a freshly compiled pattern once
const PROBE_INPUT: &str = "test.entity_id";

/// Lower-cased fragments that mark a pattern as potentially unsafe.
///
/// A heuristic safety net against code-injection attempts via pattern
/// syntax (inline comments, inline-code constructs, script fragments).
/// It is not a sandbox: the pattern is never executed as code anyway.
const UNSAFE_FRAGMENTS: &[&str] = &["(?#", "(?{", "eval(", "function(", "<script"];

/// Validate a pattern string and compile it case-insensitively
///
/// Every failure path returns a structured error; this function never
/// panics. Callers check the result rather than catching anything.
pub fn validate_pattern(pattern: &str) -> Result<Regex, CardError> {
    if pattern.trim().is_empty() {
        return Err(CardError::pattern("Pattern cannot be empty")
            .with_details("Please provide a valid regular expression pattern"));
    }

    let lower = pattern.to_lowercase();
    if UNSAFE_FRAGMENTS.iter().any(|frag| lower.contains(frag)) {
        return Err(
            CardError::pattern("Pattern contains potentially unsafe content").with_details(
                "Regular expressions cannot contain code execution patterns for security reasons",
            ),
        );
    }

    if pattern.chars().count() > MAX_PATTERN_LENGTH {
        return Err(CardError::pattern("Pattern is too long").with_details(
            "Regular expression patterns should be under 500 characters for performance reasons",
        ));
    }

    // Deep group nesting is a proxy for catastrophic-backtracking risk,
    // not a guarantee.
    if nesting_depth(pattern) > MAX_NESTING_DEPTH {
        return Err(CardError::pattern("Pattern is too complex").with_details(
            "Regular expression has too many nested groups which could cause performance issues",
        ));
    }

    let compiled = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| {
            let raw = err.to_string();
            debug!(pattern, error = %raw, "pattern failed to compile");
            CardError::pattern(readable_message(&raw)).with_details(raw)
        })?;

    // Run the matcher once so a pattern that only fails at evaluation time
    // is surfaced here, as its own error, rather than during a scan.
    let probe = catch_unwind(AssertUnwindSafe(|| compiled.is_match(PROBE_INPUT)));
    if probe.is_err() {
        return Err(CardError::pattern("Pattern causes runtime error")
            .with_details("The pattern fails during execution"));
    }

    Ok(compiled)
}

/// Validate an include pattern and, if present, an exclude pattern
///
/// The include pattern is validated first and short-circuits on failure. A
/// failing non-blank exclude pattern is reported with its message wrapped as
/// "Exclude pattern error: ...". On success the compiled include matcher is
/// returned; callers needing the exclude matcher call [`validate_pattern`]
/// on it directly.
pub fn validate_patterns(include: &str, exclude: Option<&str>) -> Result<Regex, CardError> {
    let include_regex = validate_pattern(include)?;

    if let Some(exclude) = exclude {
        if !exclude.trim().is_empty() {
            if let Err(err) = validate_pattern(exclude) {
                let wrapped =
                    CardError::pattern(format!("Exclude pattern error: {}", err.message));
                return Err(match err.details {
                    Some(details) => wrapped.with_details(details),
                    None => wrapped,
                });
            }
        }
    }

    Ok(include_regex)
}

/// Outcome of testing a pattern against sample entity ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTest {
    /// Ids the pattern matched
    pub matches: Vec<String>,
    /// Ids the pattern did not match (or failed to evaluate against)
    pub non_matches: Vec<String>,
    /// Validation error, if the pattern was rejected
    pub error: Option<String>,
}

/// Partition sample entity ids by whether the pattern matches them
///
/// An invalid pattern puts every id in `non_matches` and reports the
/// validation message. A per-id evaluation failure counts as a non-match,
/// failing open toward exclusion.
pub fn test_pattern(pattern: &str, sample_ids: &[&str]) -> PatternTest {
    let compiled = match validate_pattern(pattern) {
        Ok(regex) => regex,
        Err(err) => {
            return PatternTest {
                matches: Vec::new(),
                non_matches: sample_ids.iter().map(|id| id.to_string()).collect(),
                error: Some(err.message),
            }
        }
    };

    let mut matches = Vec::new();
    let mut non_matches = Vec::new();
    for id in sample_ids {
        let matched = catch_unwind(AssertUnwindSafe(|| compiled.is_match(id))).unwrap_or(false);
        if matched {
            matches.push(id.to_string());
        } else {
            non_matches.push(id.to_string());
        }
    }

    PatternTest {
        matches,
        non_matches,
        error: None,
    }
}

/// Maximum parenthesis nesting depth of a pattern
///
/// Tracks escape state character by character; a backslash-escaped character
/// never opens or closes anything, and parentheses inside `[...]` character
/// classes are ignored.
fn nesting_depth(pattern: &str) -> usize {
    let mut max_depth = 0usize;
    let mut depth = 0usize;
    let mut in_class = false;
    let mut escaped = false;

    for c in pattern.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ')' if !in_class => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max_depth
}

/// Map a raw engine compile error to a fixed readable phrasing
fn readable_message(raw: &str) -> String {
    let raw = raw.to_lowercase();

    let message = if raw.contains("unclosed character class")
        || raw.contains("unterminated character class")
    {
        "Unclosed character class - missing closing bracket ]"
    } else if raw.contains("unclosed group") || raw.contains("unterminated group") {
        "Unclosed group - missing closing parenthesis )"
    } else if raw.contains("unopened group") || raw.contains("invalid group") {
        "Invalid group syntax - check parentheses and group modifiers"
    } else if raw.contains("unrecognized escape") || raw.contains("invalid escape") {
        "Invalid escape sequence - check backslash usage"
    } else if raw.contains("repetition operator missing expression")
        || raw.contains("nothing to repeat")
    {
        "Quantifier has nothing to repeat - check placement of *, +, ?"
    } else if raw.contains("invalid repetition") || raw.contains("invalid quantifier") {
        "Invalid quantifier - check usage of *, +, ?, {n,m}"
    } else if raw.contains("invalid character class range") || raw.contains("invalid range") {
        "Invalid character range in character class - check [a-z] syntax"
    } else {
        "Invalid regular expression syntax"
    };

    message.to_string()
}
