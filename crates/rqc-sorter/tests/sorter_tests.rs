//! Integration tests for the sort/limit/group pipeline

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rqc_core::{Entity, MatchRecord, SortBy, SortOrder};
use rqc_sorter::{
    group_and_sort, intelligent_limit, multi_level_sort, optimized_sort_config, sort_and_limit,
    validate_sort_config, GroupBy, RawSortConfig, SortConfig, SortLevel, SortOverrides,
};
use serde_json::json;

fn record(id: &str, state: &str) -> MatchRecord {
    MatchRecord::new(id, Arc::new(Entity::new(id, state, HashMap::new())))
}

fn record_changed_secs_ago(id: &str, state: &str, secs: i64) -> MatchRecord {
    let mut entity = Entity::new(id, state, HashMap::new());
    entity.last_changed = Utc::now() - Duration::seconds(secs);
    MatchRecord::new(id, Arc::new(entity))
}

fn record_in_area(id: &str, state: &str, area: Option<&str>) -> MatchRecord {
    let mut attributes = HashMap::new();
    if let Some(area) = area {
        attributes.insert("area_id".to_string(), json!(area));
    }
    MatchRecord::new(id, Arc::new(Entity::new(id, state, attributes)))
}

fn ids(records: &[MatchRecord]) -> Vec<&str> {
    records.iter().map(|r| r.entity_id.as_str()).collect()
}

#[test]
fn test_name_sort_ascending() {
    let result = sort_and_limit(
        vec![
            record("light.kitchen", "on"),
            record("light.attic", "off"),
            record("light.bedroom", "on"),
        ],
        &SortConfig::new(SortBy::Name, SortOrder::Asc),
    );
    assert_eq!(
        ids(&result.entities),
        ["light.attic", "light.bedroom", "light.kitchen"]
    );
    assert_eq!(result.total_count, 3);
    assert_eq!(result.limited_count, 3);
}

#[test]
fn test_name_sort_descending_is_exact_reverse() {
    let records = vec![
        record("light.kitchen", "on"),
        record("light.attic", "off"),
        record("light.bedroom", "on"),
    ];
    let asc = sort_and_limit(records.clone(), &SortConfig::new(SortBy::Name, SortOrder::Asc));
    let desc = sort_and_limit(records, &SortConfig::new(SortBy::Name, SortOrder::Desc));

    let mut reversed = ids(&desc.entities);
    reversed.reverse();
    assert_eq!(ids(&asc.entities), reversed);
}

#[test]
fn test_name_sort_is_numeric_aware() {
    let result = sort_and_limit(
        vec![
            record("sensor.item10", "1"),
            record("sensor.item2", "1"),
            record("sensor.item1", "1"),
        ],
        &SortConfig::new(SortBy::Name, SortOrder::Asc),
    );
    assert_eq!(
        ids(&result.entities),
        ["sensor.item1", "sensor.item2", "sensor.item10"]
    );
}

#[test]
fn test_state_sort_ascending_sentinel_order() {
    // Coercion: 22.5 numeric, off=0, on=1, unavailable=-999. The sentinel
    // puts unavailable first under ascending order; pinned behavior.
    let result = sort_and_limit(
        vec![
            record("sensor.temp", "22.5"),
            record("light.a", "off"),
            record("light.b", "on"),
            record("sensor.broken", "unavailable"),
        ],
        &SortConfig::new(SortBy::State, SortOrder::Asc),
    );
    assert_eq!(
        ids(&result.entities),
        ["sensor.broken", "light.a", "light.b", "sensor.temp"]
    );
}

#[test]
fn test_last_changed_sort_is_chronological() {
    let result = sort_and_limit(
        vec![
            record_changed_secs_ago("sensor.a", "1", 10),
            record_changed_secs_ago("sensor.b", "1", 300),
            record_changed_secs_ago("sensor.c", "1", 60),
        ],
        &SortConfig::new(SortBy::LastChanged, SortOrder::Asc),
    );

    assert_eq!(ids(&result.entities), ["sensor.b", "sensor.c", "sensor.a"]);
    let stamps: Vec<i64> = result
        .entities
        .iter()
        .map(|r| r.entity.last_changed.timestamp_millis())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_max_entities_caps_output() {
    let result = sort_and_limit(
        vec![
            record("light.c", "on"),
            record("light.a", "on"),
            record("light.b", "on"),
        ],
        &SortConfig {
            max_entities: Some(2),
            ..SortConfig::new(SortBy::Name, SortOrder::Asc)
        },
    );
    assert_eq!(ids(&result.entities), ["light.a", "light.b"]);
    assert_eq!(result.total_count, 3);
    assert_eq!(result.limited_count, 2);
}

#[test]
fn test_zero_max_entities_means_unlimited() {
    let result = sort_and_limit(
        vec![record("light.a", "on"), record("light.b", "on")],
        &SortConfig {
            max_entities: Some(0),
            ..SortConfig::new(SortBy::Name, SortOrder::Asc)
        },
    );
    assert_eq!(result.limited_count, 2);
}

#[test]
fn test_custom_sort_overrides_direction_entirely() {
    // Custom comparator sorts ascending by id even though the config says
    // descending; the sorter must not negate on top of it.
    let result = sort_and_limit(
        vec![
            record("light.c", "on"),
            record("light.a", "on"),
            record("light.b", "on"),
        ],
        &SortConfig {
            custom_sort: Some(Arc::new(|a, b| a.entity_id.cmp(&b.entity_id))),
            ..SortConfig::new(SortBy::Name, SortOrder::Desc)
        },
    );
    assert_eq!(ids(&result.entities), ["light.a", "light.b", "light.c"]);
}

#[test]
fn test_panicking_comparator_degrades_to_input_order() {
    let result = sort_and_limit(
        vec![
            record("light.c", "on"),
            record("light.a", "on"),
            record("light.b", "on"),
        ],
        &SortConfig {
            max_entities: Some(2),
            custom_sort: Some(Arc::new(|_, _| panic!("broken comparator"))),
            ..SortConfig::new(SortBy::Name, SortOrder::Asc)
        },
    );
    // Original order, still truncated.
    assert_eq!(ids(&result.entities), ["light.c", "light.a"]);
    assert_eq!(result.total_count, 3);
}

#[test]
fn test_multi_level_sort_breaks_ties() {
    // Primary key (state) ties for the two "on" lights; the secondary name
    // key decides their order.
    let comparator = multi_level_sort(
        SortLevel::new(SortBy::State, SortOrder::Desc),
        Some(SortLevel::new(SortBy::Name, SortOrder::Asc)),
        None,
    );
    let result = sort_and_limit(
        vec![
            record("light.kitchen", "on"),
            record("light.attic", "off"),
            record("light.bedroom", "on"),
        ],
        &SortConfig {
            custom_sort: Some(comparator),
            ..SortConfig::new(SortBy::State, SortOrder::Desc)
        },
    );
    assert_eq!(
        ids(&result.entities),
        ["light.bedroom", "light.kitchen", "light.attic"]
    );
}

#[test]
fn test_intelligent_limit_prefers_available() {
    let limited = intelligent_limit(
        vec![
            record("sensor.a", "unavailable"),
            record("sensor.b", "1"),
            record("sensor.c", "unknown"),
            record("sensor.d", "2"),
            record("sensor.e", "3"),
        ],
        2,
        true,
    );
    // Fewer slots than available entities: only available ones are used.
    assert_eq!(ids(&limited), ["sensor.b", "sensor.d"]);
}

#[test]
fn test_intelligent_limit_backfills_with_unavailable() {
    let limited = intelligent_limit(
        vec![
            record("sensor.a", "unavailable"),
            record("sensor.b", "1"),
            record("sensor.c", "unknown"),
        ],
        2,
        true,
    );
    assert_eq!(ids(&limited), ["sensor.b", "sensor.a"]);
}

#[test]
fn test_intelligent_limit_plain_head_when_not_prioritizing() {
    let limited = intelligent_limit(
        vec![
            record("sensor.a", "unavailable"),
            record("sensor.b", "1"),
            record("sensor.c", "2"),
        ],
        2,
        false,
    );
    assert_eq!(ids(&limited), ["sensor.a", "sensor.b"]);
}

#[test]
fn test_intelligent_limit_noop_when_under_limit() {
    let records = vec![record("sensor.a", "unavailable"), record("sensor.b", "1")];
    let limited = intelligent_limit(records.clone(), 5, true);
    assert_eq!(ids(&limited), ids(&records));
}

#[test]
fn test_group_by_domain_sorts_each_group() {
    let groups = group_and_sort(
        vec![
            record("light.kitchen", "on"),
            record("sensor.humidity", "45"),
            record("light.attic", "off"),
            record("sensor.temperature", "22.5"),
        ],
        GroupBy::Domain,
        &SortConfig::new(SortBy::Name, SortOrder::Asc),
    );

    assert_eq!(groups.len(), 2);
    assert_eq!(ids(&groups["light"]), ["light.attic", "light.kitchen"]);
    assert_eq!(
        ids(&groups["sensor"]),
        ["sensor.humidity", "sensor.temperature"]
    );
}

#[test]
fn test_group_limit_caps_each_group_not_the_total() {
    let groups = group_and_sort(
        vec![
            record("light.a", "on"),
            record("light.b", "on"),
            record("sensor.a", "1"),
            record("sensor.b", "2"),
        ],
        GroupBy::Domain,
        &SortConfig {
            max_entities: Some(1),
            ..SortConfig::new(SortBy::Name, SortOrder::Asc)
        },
    );
    assert_eq!(groups["light"].len(), 1);
    assert_eq!(groups["sensor"].len(), 1);
}

#[test]
fn test_group_by_area_uses_sentinel_for_missing() {
    let groups = group_and_sort(
        vec![
            record_in_area("light.a", "on", Some("kitchen")),
            record_in_area("light.b", "on", None),
        ],
        GroupBy::Area,
        &SortConfig::new(SortBy::Name, SortOrder::Asc),
    );
    assert!(groups.contains_key("kitchen"));
    assert_eq!(ids(&groups["no_area"]), ["light.b"]);
}

#[test]
fn test_validate_sort_config_accepts_good_input() {
    let check = validate_sort_config(&RawSortConfig {
        sort_by: "last_changed".to_string(),
        sort_order: "desc".to_string(),
        max_entities: Some(100),
    });
    assert!(check.valid);
    assert!(check.errors.is_empty());
}

#[test]
fn test_validate_sort_config_rejects_bad_enums() {
    let check = validate_sort_config(&RawSortConfig {
        sort_by: "entity_id".to_string(),
        sort_order: "descending".to_string(),
        max_entities: None,
    });
    assert!(!check.valid);
    assert_eq!(check.errors.len(), 2);
    assert!(check.errors[0].contains("sort_by"));
    assert!(check.errors[1].contains("sort_order"));
}

#[test]
fn test_validate_sort_config_rejects_bad_limits() {
    let negative = validate_sort_config(&RawSortConfig {
        sort_by: "name".to_string(),
        sort_order: "asc".to_string(),
        max_entities: Some(-1),
    });
    assert!(!negative.valid);

    // Exceeding the performance ceiling is a hard error, not a warning.
    let too_large = validate_sort_config(&RawSortConfig {
        sort_by: "name".to_string(),
        sort_order: "asc".to_string(),
        max_entities: Some(1001),
    });
    assert!(!too_large.valid);
    assert!(too_large.errors[0].contains("1000"));
}

#[test]
fn test_raw_sort_config_defaults_from_yaml() {
    let raw: RawSortConfig = serde_json::from_value(json!({})).unwrap();
    assert_eq!(raw.sort_by, "name");
    assert_eq!(raw.sort_order, "asc");
    assert_eq!(raw.max_entities, None);
    assert!(validate_sort_config(&raw).valid);
}

#[test]
fn test_optimized_sort_config_thresholds() {
    assert_eq!(optimized_sort_config(50), SortOverrides::default());
    assert_eq!(
        optimized_sort_config(200),
        SortOverrides {
            sort_by: None,
            max_entities: Some(200),
        }
    );
    assert_eq!(
        optimized_sort_config(501),
        SortOverrides {
            sort_by: Some(SortBy::Name),
            max_entities: Some(100),
        }
    );
}

#[test]
fn test_overrides_merge_explicitly() {
    let mut config = SortConfig::new(SortBy::State, SortOrder::Desc);
    optimized_sort_config(501).apply_to(&mut config);
    assert_eq!(config.sort_by, SortBy::Name);
    assert_eq!(config.max_entities, Some(100));
    assert_eq!(config.sort_order, SortOrder::Desc);
}
