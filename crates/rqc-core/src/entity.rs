//! Entity type and the snapshot map handed over by the host

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::is_unavailable_state;

/// A named state object owned by the host
///
/// The core only ever reads entities; the host mutates them and delivers a
/// fresh snapshot on every change. The attribute bag is open-ended, so it is
/// kept as a string-keyed map of JSON values rather than a fixed record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// The entity id, `domain.object_id`
    pub entity_id: String,

    /// The state value (e.g., "on", "off", "23.5", "unavailable")
    pub state: String,

    /// Additional attributes associated with the state
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,

    /// When the state was last changed (different from previous state)
    pub last_changed: DateTime<Utc>,

    /// When the state was last updated (even if value didn't change)
    pub last_updated: DateTime<Utc>,
}

impl Entity {
    /// Create a new entity with current timestamps
    pub fn new(
        entity_id: impl Into<String>,
        state: impl Into<String>,
        attributes: HashMap<String, serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes,
            last_changed: now,
            last_updated: now,
        }
    }

    /// Check if the state value marks this entity as unavailable
    pub fn is_unavailable(&self) -> bool {
        is_unavailable_state(&self.state)
    }

    /// Get an attribute value by key, deserialized into the requested type
    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// The `friendly_name` attribute, if present and a string
    pub fn friendly_name(&self) -> Option<&str> {
        self.attributes.get("friendly_name").and_then(|v| v.as_str())
    }

    /// Human-readable name for display
    ///
    /// Prefers the `friendly_name` attribute. Otherwise the entity id is
    /// reformatted: split on `.`, underscores replaced with spaces, the first
    /// letter of each part capitalized, parts joined with `" - "`.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.friendly_name() {
            return name.to_string();
        }

        self.entity_id
            .split('.')
            .map(|part| {
                let part = part.replace('_', " ");
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => part,
                }
            })
            .collect::<Vec<String>>()
            .join(" - ")
    }
}

/// The full point-in-time snapshot of all entities, keyed by entity id
///
/// An insertion-ordered map so that match results preserve the snapshot's
/// encounter order before sorting. Values are shared references back into
/// the snapshot; the core never mutates them.
pub type StateMap = IndexMap<String, Arc<Entity>>;

/// Build a snapshot map from a sequence of entities
pub fn state_map(entities: impl IntoIterator<Item = Entity>) -> StateMap {
    entities
        .into_iter()
        .map(|e| (e.entity_id.clone(), Arc::new(e)))
        .collect()
}
