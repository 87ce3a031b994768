//! Helpers for working with `domain.object_id` entity id strings
//!
//! Snapshot keys are plain strings because patterns match against arbitrary
//! ids; these helpers extract the parts without forcing a parse.

/// The domain part of an entity id (the prefix before the first `.`)
///
/// Returns the whole string when there is no separator.
pub fn domain(entity_id: &str) -> &str {
    entity_id.split('.').next().unwrap_or(entity_id)
}

/// The object_id part of an entity id (everything after the first `.`)
pub fn object_id(entity_id: &str) -> &str {
    match entity_id.split_once('.') {
        Some((_, rest)) => rest,
        None => "",
    }
}

/// Check whether a string has the canonical `domain.object_id` shape
///
/// Domain: lowercase letters and underscores. Object id: lowercase
/// alphanumeric and underscores. Exactly one separator.
pub fn is_valid_entity_id(entity_id: &str) -> bool {
    let Some((domain, object_id)) = entity_id.split_once('.') else {
        return false;
    };
    if domain.is_empty() || object_id.is_empty() || object_id.contains('.') {
        return false;
    }
    domain.chars().all(|c| c.is_ascii_lowercase() || c == '_')
        && object_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
