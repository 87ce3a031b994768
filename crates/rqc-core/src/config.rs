//! Card configuration bundle delivered by the host configuration layer
//!
//! Presentation fields (display_type, columns, show_*) are carried for the
//! renderer but never interpreted by the matching/sorting core. Range and
//! enum validation of those fields happens in the host's config-acceptance
//! layer before this bundle is handed over.

use serde::{Deserialize, Serialize};

/// How matched entities are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    List,
    Grid,
}

/// Sort key for matched entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Name,
    State,
    LastChanged,
}

impl SortBy {
    /// All accepted configuration values
    pub const VALUES: &'static [&'static str] = &["name", "state", "last_changed"];

    /// Parse a configuration string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortBy::Name),
            "state" => Some(SortBy::State),
            "last_changed" => Some(SortBy::LastChanged),
            _ => None,
        }
    }

    /// The configuration string for this key
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::State => "state",
            SortBy::LastChanged => "last_changed",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// All accepted configuration values
    pub const VALUES: &'static [&'static str] = &["asc", "desc"];

    /// Parse a configuration string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    /// The configuration string for this direction
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Secondary line shown under an entity in the list renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryInfo {
    EntityId,
    LastChanged,
    LastUpdated,
    #[default]
    None,
}

fn default_true() -> bool {
    true
}

fn default_columns() -> u8 {
    3
}

/// The full card configuration as authored in YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    /// Include pattern matched against entity ids
    pub pattern: String,

    /// Optional exclude pattern; matching ids are dropped after inclusion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_pattern: Option<String>,

    #[serde(default)]
    pub display_type: DisplayType,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub sort_order: SortOrder,

    /// Cap on rendered entities; the host validates the 1..=1000 range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entities: Option<usize>,

    #[serde(default = "default_true")]
    pub show_name: bool,

    #[serde(default = "default_true")]
    pub show_state: bool,

    #[serde(default = "default_true")]
    pub show_icon: bool,

    /// Grid column count; the host validates the 1..=6 range
    #[serde(default = "default_columns")]
    pub columns: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub secondary_info: SecondaryInfo,
}

impl CardConfig {
    /// Minimal config with only the include pattern set
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            exclude_pattern: None,
            display_type: DisplayType::default(),
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            max_entities: None,
            show_name: true,
            show_state: true,
            show_icon: true,
            columns: default_columns(),
            title: None,
            secondary_info: SecondaryInfo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_config_deserializes_with_defaults() {
        let config: CardConfig = serde_json::from_value(json!({
            "pattern": "^sensor\\."
        }))
        .unwrap();
        assert_eq!(config.pattern, "^sensor\\.");
        assert_eq!(config.display_type, DisplayType::List);
        assert_eq!(config.sort_by, SortBy::Name);
        assert_eq!(config.sort_order, SortOrder::Asc);
        assert_eq!(config.max_entities, None);
        assert!(config.show_name && config.show_state && config.show_icon);
        assert_eq!(config.columns, 3);
        assert_eq!(config.secondary_info, SecondaryInfo::None);
    }

    #[test]
    fn test_full_config_roundtrip() {
        let config: CardConfig = serde_json::from_value(json!({
            "pattern": "^light\\.",
            "exclude_pattern": ".*_group$",
            "display_type": "grid",
            "sort_by": "last_changed",
            "sort_order": "desc",
            "max_entities": 20,
            "columns": 4,
            "title": "Lights",
            "secondary_info": "last_changed"
        }))
        .unwrap();
        assert_eq!(config.sort_by, SortBy::LastChanged);
        assert_eq!(config.sort_order, SortOrder::Desc);
        assert_eq!(config.secondary_info, SecondaryInfo::LastChanged);

        let value = serde_json::to_value(&config).unwrap();
        let back: CardConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_sort_enums_parse() {
        assert_eq!(SortBy::parse("last_changed"), Some(SortBy::LastChanged));
        assert_eq!(SortBy::parse("bogus"), None);
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("descending"), None);
    }
}
