//! Bounded result cache for match operations
//!
//! A small FIFO cache: at most ten entries, oldest-inserted evicted first.
//! Expiration is checked against the single most recent write time shared by
//! all entries, not per entry. An entry inserted long ago therefore stays
//! valid as long as any entry was written recently. That global-timeout
//! behavior is intentional and observably different from a per-entry TTL.

use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::MatchResult;

/// How long cached results stay valid after the most recent write
pub(crate) const CACHE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Maximum number of cached results
pub(crate) const MAX_CACHE_ENTRIES: usize = 10;

/// Composite key covering the full request parameter set
///
/// `state_count` is a cheap snapshot fingerprint: the number of entries, not
/// a content hash. `max_results` of zero stands for "no limit".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub pattern: String,
    pub exclude_pattern: String,
    pub include_unavailable: bool,
    pub max_results: usize,
    pub state_count: usize,
}

#[derive(Debug)]
pub(crate) struct ResultCache {
    entries: IndexMap<CacheKey, MatchResult>,
    last_write: Option<Instant>,
    timeout: Duration,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_timeout(CACHE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            entries: IndexMap::new(),
            last_write: None,
            timeout,
        }
    }

    /// Look up a cached result, dropping it when the cache has gone stale
    pub fn get(&mut self, key: &CacheKey) -> Option<MatchResult> {
        if !self.entries.contains_key(key) {
            return None;
        }

        let stale = self
            .last_write
            .map_or(true, |written| written.elapsed() > self.timeout);
        if stale {
            self.entries.shift_remove(key);
            return None;
        }

        self.entries.get(key).cloned()
    }

    /// Store a result, evicting the oldest-inserted entry past capacity
    pub fn insert(&mut self, key: CacheKey, result: MatchResult) {
        self.last_write = Some(Instant::now());
        self.entries.insert(key, result);

        if self.entries.len() > MAX_CACHE_ENTRIES {
            self.entries.shift_remove_index(0);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
