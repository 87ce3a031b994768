//! Sorting, limiting, and grouping of matched entities
//!
//! Deterministically orders and caps match records. Sorting failure degrades
//! to returning the input order rather than propagating; the renderer always
//! gets something to show.

use std::cmp::Ordering;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use rqc_core::{entity_id, MatchRecord, SortBy, SortOrder};
use serde::Deserialize;
use tracing::{error, warn};

pub mod compare;

use compare::compare_records;

/// A caller-supplied comparator that fully replaces the built-in logic
///
/// The sorter does not apply `sort_order` on top of a custom function; the
/// function owns the direction too.
pub type SortFn = Arc<dyn Fn(&MatchRecord, &MatchRecord) -> Ordering + Send + Sync>;

/// Configuration for one sort operation
#[derive(Clone, Default)]
pub struct SortConfig {
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// Cap applied after sorting; `None` or zero means unlimited
    pub max_entities: Option<usize>,
    /// Full override of the built-in comparator, direction included
    pub custom_sort: Option<SortFn>,
}

impl SortConfig {
    pub fn new(sort_by: SortBy, sort_order: SortOrder) -> Self {
        Self {
            sort_by,
            sort_order,
            max_entities: None,
            custom_sort: None,
        }
    }
}

impl fmt::Debug for SortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortConfig")
            .field("sort_by", &self.sort_by)
            .field("sort_order", &self.sort_order)
            .field("max_entities", &self.max_entities)
            .field("custom_sort", &self.custom_sort.is_some())
            .finish()
    }
}

/// Timing data for one sort operation
#[derive(Debug, Clone, PartialEq)]
pub struct SortMetrics {
    /// Elapsed sorting time in milliseconds
    pub sorting_time: f64,
    /// Input size before limiting
    pub original_count: usize,
}

/// The outcome of one sort operation
#[derive(Debug, Clone, PartialEq)]
pub struct SortResult {
    /// Ordered entities, possibly truncated
    pub entities: Vec<MatchRecord>,
    /// Input size before limiting
    pub total_count: usize,
    /// Size after limiting
    pub limited_count: usize,
    pub sorted_by: SortBy,
    pub sort_order: SortOrder,
    pub performance_metrics: SortMetrics,
}

/// Sort and cap match records according to the configuration
///
/// Sort values are recomputed for the active key before ordering. When the
/// (custom) comparator panics, the original unsorted order is returned
/// instead, still capped by `max_entities`.
pub fn sort_and_limit(entities: Vec<MatchRecord>, config: &SortConfig) -> SortResult {
    let start = Instant::now();
    let total_count = entities.len();

    let keyed: Vec<MatchRecord> = entities
        .iter()
        .cloned()
        .map(|mut record| {
            record.sort_value = record.sort_value_for(config.sort_by);
            record
        })
        .collect();

    let config_for_sort = config.clone();
    let sorted = catch_unwind(AssertUnwindSafe(move || {
        let mut records = keyed;
        match &config_for_sort.custom_sort {
            Some(custom) => records.sort_by(|a, b| custom(a, b)),
            None => records.sort_by(|a, b| {
                let ord = compare_records(a, b, config_for_sort.sort_by);
                match config_for_sort.sort_order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            }),
        }
        records
    }));

    let mut result = match sorted {
        Ok(records) => records,
        Err(_) => {
            error!("sorting failed; returning entities unsorted");
            entities
        }
    };

    if let Some(max) = config.max_entities {
        if max > 0 {
            result.truncate(max);
        }
    }

    let limited_count = result.len();
    SortResult {
        entities: result,
        total_count,
        limited_count,
        sorted_by: config.sort_by,
        sort_order: config.sort_order,
        performance_metrics: SortMetrics {
            sorting_time: start.elapsed().as_secs_f64() * 1000.0,
            original_count: total_count,
        },
    }
}

/// One level of a compound sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortLevel {
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl SortLevel {
    pub fn new(sort_by: SortBy, sort_order: SortOrder) -> Self {
        Self { sort_by, sort_order }
    }
}

/// Build a comparator that falls through secondary and tertiary keys on ties
///
/// Each level recomputes its own sort value and applies its own direction.
/// The result plugs into [`SortConfig::custom_sort`]; this is the only path
/// offering compound ordering.
pub fn multi_level_sort(
    primary: SortLevel,
    secondary: Option<SortLevel>,
    tertiary: Option<SortLevel>,
) -> SortFn {
    Arc::new(move |a, b| {
        for level in [Some(primary), secondary, tertiary].into_iter().flatten() {
            let keyed_a = rekey(a, level.sort_by);
            let keyed_b = rekey(b, level.sort_by);
            let mut ord = compare_records(&keyed_a, &keyed_b, level.sort_by);
            if level.sort_order == SortOrder::Desc {
                ord = ord.reverse();
            }
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    })
}

fn rekey(record: &MatchRecord, sort_by: SortBy) -> MatchRecord {
    let mut keyed = record.clone();
    keyed.sort_value = keyed.sort_value_for(sort_by);
    keyed
}

/// Cap a list, preferring available entities when over the limit
///
/// When prioritizing, the available partition fills the result first and
/// unavailable/unknown entities backfill the remaining slots. Order is
/// stable within each partition, not across the whole list.
pub fn intelligent_limit(
    entities: Vec<MatchRecord>,
    max_entities: usize,
    prioritize_available: bool,
) -> Vec<MatchRecord> {
    if entities.len() <= max_entities {
        return entities;
    }

    if !prioritize_available {
        let mut head = entities;
        head.truncate(max_entities);
        return head;
    }

    let (available, unavailable): (Vec<MatchRecord>, Vec<MatchRecord>) =
        entities.into_iter().partition(|record| {
            let state = record.entity.state.to_lowercase();
            state != "unavailable" && state != "unknown"
        });

    let mut result: Vec<MatchRecord> = available.into_iter().take(max_entities).collect();
    let remaining = max_entities - result.len();
    result.extend(unavailable.into_iter().take(remaining));
    result
}

/// Grouping criteria for [`group_and_sort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// The entity id prefix before the first `.`
    Domain,
    /// The raw state string
    State,
    /// The `area_id` attribute, or "no_area" when absent
    Area,
}

/// Group records, then run the full sort pipeline per group
///
/// `max_entities` in the config caps each group independently, not the
/// total. Groups appear in encounter order.
pub fn group_and_sort(
    entities: Vec<MatchRecord>,
    group_by: GroupBy,
    config: &SortConfig,
) -> IndexMap<String, Vec<MatchRecord>> {
    let mut groups: IndexMap<String, Vec<MatchRecord>> = IndexMap::new();

    for record in entities {
        let key = match group_by {
            GroupBy::Domain => entity_id::domain(&record.entity_id).to_string(),
            GroupBy::State => record.entity.state.clone(),
            GroupBy::Area => record
                .entity
                .attribute::<String>("area_id")
                .unwrap_or_else(|| "no_area".to_string()),
        };
        groups.entry(key).or_insert_with(Vec::new).push(record);
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let sorted = sort_and_limit(members, config);
            (key, sorted.entities)
        })
        .collect()
}

/// A sort configuration as authored in raw card YAML, before parsing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawSortConfig {
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    #[serde(default)]
    pub max_entities: Option<i64>,
}

fn default_sort_by() -> String {
    "name".to_string()
}

fn default_sort_order() -> String {
    "asc".to_string()
}

/// Outcome of sort-config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfigCheck {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validate a raw sort configuration
///
/// Exceeding the 1000-entity performance ceiling is a hard validation
/// error, same in kind as a bad enum value.
pub fn validate_sort_config(config: &RawSortConfig) -> SortConfigCheck {
    let mut errors = Vec::new();

    if SortBy::parse(&config.sort_by).is_none() {
        errors.push(format!(
            "Invalid sort_by value: {}. Must be one of: {}",
            config.sort_by,
            SortBy::VALUES.join(", ")
        ));
    }

    if SortOrder::parse(&config.sort_order).is_none() {
        errors.push(format!(
            "Invalid sort_order value: {}. Must be one of: {}",
            config.sort_order,
            SortOrder::VALUES.join(", ")
        ));
    }

    if let Some(max) = config.max_entities {
        if max < 0 {
            errors.push("max_entities must be a non-negative integer".to_string());
        }
        if max > 1000 {
            errors.push("max_entities should not exceed 1000 for performance reasons".to_string());
        }
    }

    if !errors.is_empty() {
        warn!(?errors, "sort configuration rejected");
    }

    SortConfigCheck {
        valid: errors.is_empty(),
        errors,
    }
}

/// Advisory sort overrides for large entity sets
///
/// Never self-applies; callers merge it explicitly via
/// [`SortOverrides::apply_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOverrides {
    pub sort_by: Option<SortBy>,
    pub max_entities: Option<usize>,
}

impl SortOverrides {
    /// Merge these overrides into a sort configuration
    pub fn apply_to(&self, config: &mut SortConfig) {
        if let Some(sort_by) = self.sort_by {
            config.sort_by = sort_by;
        }
        if let Some(max) = self.max_entities {
            config.max_entities = Some(max);
        }
    }
}

/// Performance-minded overrides keyed on entity count
///
/// Over 500 entities: force name sorting (the cheapest key) and cap at 100.
/// Over 100: cap at 200. Small sets need nothing.
pub fn optimized_sort_config(entity_count: usize) -> SortOverrides {
    if entity_count > 500 {
        SortOverrides {
            sort_by: Some(SortBy::Name),
            max_entities: Some(100),
        }
    } else if entity_count > 100 {
        SortOverrides {
            sort_by: None,
            max_entities: Some(200),
        }
    } else {
        SortOverrides::default()
    }
}
