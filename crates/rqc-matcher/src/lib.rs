//! Entity matching for the regex entity query card
//!
//! The EntityMatcher owns the current entity snapshot and produces filtered,
//! cache-accelerated views of it for a given pattern configuration. All
//! failure modes are captured in the returned result; nothing here panics or
//! aborts an aggregate operation. The matching entry points are `async` only
//! so callers can await them uniformly alongside genuinely asynchronous host
//! calls; no suspension happens inside.

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use regex::Regex;
use rqc_core::{entity_id, Entity, MatchRecord, StateMap};
use rqc_pattern::validate_pattern;
use tracing::{debug, instrument, trace, warn};

mod cache;

use cache::{CacheKey, ResultCache};

/// Options for one match operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOptions {
    /// Include pattern matched against entity ids
    pub pattern: String,
    /// Optional exclude pattern; matching ids are dropped after inclusion
    pub exclude_pattern: Option<String>,
    /// Keep entities whose state marks them unavailable
    pub include_unavailable: bool,
    /// Cap on returned entities; does not affect `matched_count`.
    /// `None` and `Some(0)` both mean no limit.
    pub max_results: Option<usize>,
}

impl MatchOptions {
    /// Options with only the include pattern set
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }
}

/// Timing data for one match operation
#[derive(Debug, Clone, PartialEq)]
pub struct MatchMetrics {
    /// Elapsed matching time in milliseconds
    pub matching_time: f64,
    /// Number of snapshot entities considered
    pub entity_count: usize,
}

/// The outcome of one match operation
///
/// Invariants: `total_count >= matched_count >= entities.len()`. When
/// `error` is set, `entities` is empty and both counts are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Matched entities in snapshot encounter order, possibly truncated
    pub entities: Vec<MatchRecord>,
    /// Snapshot size before filtering
    pub total_count: usize,
    /// Match count before truncation
    pub matched_count: usize,
    /// Failure message, when the operation could not run
    pub error: Option<String>,
    pub performance_metrics: MatchMetrics,
}

/// Snapshot-wide entity statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityStats {
    pub total_entities: usize,
    pub available_entities: usize,
    /// Entity count per domain, in snapshot encounter order
    pub domains: IndexMap<String, usize>,
}

/// Live preview of a pattern pair while editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternPreview {
    /// Up to ten matching ids
    pub sample_matches: Vec<String>,
    /// Full match count
    pub total_matches: usize,
    pub error: Option<String>,
}

/// A suggested pattern derived from the domains present in the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSuggestion {
    pub pattern: String,
    pub description: String,
    pub match_count: usize,
}

/// Matches entities from the host snapshot against regex patterns
pub struct EntityMatcher {
    states: StateMap,
    cache: ResultCache,
}

impl EntityMatcher {
    /// Create a matcher over an initial snapshot
    pub fn new(states: StateMap) -> Self {
        Self {
            states,
            cache: ResultCache::new(),
        }
    }

    /// Replace the snapshot wholesale
    ///
    /// The snapshot is always a full replacement, never a partial patch, and
    /// swapping it unconditionally clears the result cache.
    pub fn update_states(&mut self, states: StateMap) {
        self.states = states;
        self.cache.clear();
    }

    /// Match snapshot entities against the configured patterns
    ///
    /// Returns a result for every input: invalid patterns and any other
    /// failure mode land in [`MatchResult::error`] with empty entities.
    /// Results are cached for a short window keyed by the full option set
    /// plus the snapshot entry count.
    #[instrument(skip(self, options), fields(pattern = %options.pattern))]
    pub async fn match_entities(&mut self, options: &MatchOptions) -> MatchResult {
        let start = Instant::now();

        let key = self.cache_key(options);
        if let Some(hit) = self.cache.get(&key) {
            trace!("returning cached match result");
            return hit;
        }

        let include = match validate_pattern(&options.pattern) {
            Ok(regex) => regex,
            Err(err) => return Self::error_result(err.message, start),
        };

        let exclude = match options.exclude_pattern.as_deref() {
            Some(pattern) if !pattern.trim().is_empty() => match validate_pattern(pattern) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    return Self::error_result(
                        format!("Exclude pattern error: {}", err.message),
                        start,
                    )
                }
            },
            _ => None,
        };

        let all_entities = self.all_entities();
        let total_count = all_entities.len();
        debug!(total_count, "matching pattern against snapshot");

        let matched = Self::filter_entities(
            all_entities,
            &include,
            exclude.as_ref(),
            options.include_unavailable,
        );
        let matched_count = matched.len();
        debug!(matched_count, "pattern matches found");

        let mut entities = matched;
        match options.max_results {
            // Zero means no limit, matching the cache key's treatment of it.
            Some(max) if max > 0 => entities.truncate(max),
            _ => {}
        }

        let result = MatchResult {
            entities,
            total_count,
            matched_count,
            error: None,
            performance_metrics: MatchMetrics {
                matching_time: elapsed_ms(start),
                entity_count: total_count,
            },
        };

        self.cache.insert(key, result.clone());
        result
    }

    /// Uncached statistics over the current snapshot
    pub fn entity_stats(&self) -> EntityStats {
        let mut stats = EntityStats {
            total_entities: 0,
            available_entities: 0,
            domains: IndexMap::new(),
        };

        for (id, entity) in self.all_entities() {
            stats.total_entities += 1;
            if !entity.is_unavailable() {
                stats.available_entities += 1;
            }
            *stats
                .domains
                .entry(entity_id::domain(id).to_string())
                .or_insert(0) += 1;
        }

        stats
    }

    /// Preview a pattern pair against the snapshot while editing
    pub async fn test_patterns(
        &mut self,
        pattern: &str,
        exclude_pattern: Option<&str>,
    ) -> PatternPreview {
        let result = self
            .match_entities(&MatchOptions {
                pattern: pattern.to_string(),
                exclude_pattern: exclude_pattern.map(str::to_string),
                include_unavailable: false,
                max_results: Some(10),
            })
            .await;

        if let Some(error) = result.error {
            return PatternPreview {
                sample_matches: Vec::new(),
                total_matches: 0,
                error: Some(error),
            };
        }

        PatternPreview {
            sample_matches: result.entities.iter().map(|e| e.entity_id.clone()).collect(),
            total_matches: result.matched_count,
            error: None,
        }
    }

    /// Suggested domain patterns, most common domains first (at most eight)
    pub fn suggested_patterns(&self) -> Vec<PatternSuggestion> {
        let stats = self.entity_stats();

        let mut suggestions: Vec<PatternSuggestion> = stats
            .domains
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(domain, count)| PatternSuggestion {
                pattern: format!("^{domain}\\."),
                description: format!("All {domain} entities"),
                match_count: *count,
            })
            .collect();

        suggestions.sort_by(|a, b| b.match_count.cmp(&a.match_count));
        suggestions.truncate(8);
        suggestions
    }

    /// Drop all cached results
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of cached results
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Snapshot entries as (id, entity) pairs, skipping malformed ones
    fn all_entities(&self) -> Vec<(&String, &Arc<Entity>)> {
        self.states
            .iter()
            .filter(|(id, entity)| {
                if entity.entity_id.is_empty() {
                    warn!(id = %id, "skipping snapshot entry without an entity id");
                    return false;
                }
                true
            })
            .collect()
    }

    /// Apply availability and pattern filters, building match records
    ///
    /// A problem with one entity only ever skips that entity; the scan as a
    /// whole always completes.
    fn filter_entities(
        entities: Vec<(&String, &Arc<Entity>)>,
        include: &Regex,
        exclude: Option<&Regex>,
        include_unavailable: bool,
    ) -> Vec<MatchRecord> {
        let mut matches = Vec::new();

        for (id, entity) in entities {
            if !include_unavailable && entity.is_unavailable() {
                continue;
            }
            if !include.is_match(id) {
                continue;
            }
            if let Some(exclude) = exclude {
                if exclude.is_match(id) {
                    continue;
                }
            }
            matches.push(MatchRecord::new(id.clone(), Arc::clone(entity)));
        }

        matches
    }

    fn cache_key(&self, options: &MatchOptions) -> CacheKey {
        CacheKey {
            pattern: options.pattern.clone(),
            exclude_pattern: options.exclude_pattern.clone().unwrap_or_default(),
            include_unavailable: options.include_unavailable,
            max_results: options.max_results.unwrap_or(0),
            state_count: self.states.len(),
        }
    }

    fn error_result(message: String, start: Instant) -> MatchResult {
        MatchResult {
            entities: Vec::new(),
            total_count: 0,
            matched_count: 0,
            error: Some(message),
            performance_metrics: MatchMetrics {
                matching_time: elapsed_ms(start),
                entity_count: 0,
            },
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
