//! Match records: the projection of one matched entity handed to the renderer

use std::sync::Arc;

use crate::{Entity, SortBy};

/// A sort key value computed for one record
///
/// `Missing` exists for records whose key could not be derived; it always
/// sorts after any defined value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Textual sort key
    Text(String),
    /// Numeric sort key (timestamps, coerced states)
    Number(f64),
    /// No sort key could be derived
    Missing,
}

impl SortValue {
    /// Textual form of the value, for mixed-type comparisons
    pub fn as_text(&self) -> String {
        match self {
            SortValue::Text(s) => s.clone(),
            SortValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            SortValue::Missing => String::new(),
        }
    }
}

/// A matched entity plus its display and sort metadata
///
/// Created fresh per match operation and owned by the caller. The `entity`
/// field is a shared reference back into the snapshot; holding a record past
/// the next snapshot swap may observe stale entity data.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    /// Copy of the entity's id
    pub entity_id: String,
    /// Shared reference to the snapshotted entity (never mutated here)
    pub entity: Arc<Entity>,
    /// Computed display name (friendly_name or reformatted id)
    pub display_name: String,
    /// Scratch field recomputed by the sorter for the active sort key
    pub sort_value: SortValue,
}

impl MatchRecord {
    /// Build a record for a matched entity
    ///
    /// The default sort value is the lower-cased display name.
    pub fn new(entity_id: impl Into<String>, entity: Arc<Entity>) -> Self {
        let display_name = entity.display_name();
        let sort_value = SortValue::Text(display_name.to_lowercase());
        Self {
            entity_id: entity_id.into(),
            entity,
            display_name,
            sort_value,
        }
    }

    /// Compute the sort value for a given sort key
    ///
    /// name: lower-cased display name; state: raw state string, case
    /// preserved; last_changed: millisecond timestamp.
    pub fn sort_value_for(&self, sort_by: SortBy) -> SortValue {
        match sort_by {
            SortBy::Name => SortValue::Text(self.display_name.to_lowercase()),
            SortBy::State => SortValue::Text(self.entity.state.clone()),
            SortBy::LastChanged => {
                SortValue::Number(self.entity.last_changed.timestamp_millis() as f64)
            }
        }
    }
}
