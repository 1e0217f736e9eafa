use crate::judge::ConvergenceResult;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Bounded memo of convergence results.
///
/// Keyed by `(file_id, iteration_count, last_timestamp_ms)`: appending an
/// iteration changes the key, so stale snapshots can never be served for a
/// grown history. Eviction is capacity-bounded LRU combined with a
/// wall-clock TTL checked on read.
///
/// Interior mutex makes the cache safe to share across worker threads.
pub struct ConvergenceCache {
    state: Mutex<CacheState>,
    ttl: Duration,
}

struct CacheState {
    entries: LruCache<CacheKey, CacheEntry>,
    hits: u64,
    misses: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    file_id: String,
    iteration_count: usize,
    last_timestamp_ms: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: ConvergenceResult,
    created: Instant,
}

/// Hit/miss counters for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}

impl ConvergenceCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity clamped to >= 1");
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
            ttl,
        }
    }

    pub fn get(
        &self,
        file_id: &str,
        iteration_count: usize,
        last_timestamp_ms: u64,
    ) -> Option<ConvergenceResult> {
        let key = CacheKey {
            file_id: file_id.to_string(),
            iteration_count,
            last_timestamp_ms,
        };
        let mut state = self.state.lock().expect("convergence cache mutex poisoned");

        let entry = state.entries.get(&key).cloned();
        match entry {
            None => {
                state.misses += 1;
                None
            }
            Some(entry) if entry.created.elapsed() > self.ttl => {
                state.entries.pop(&key);
                state.misses += 1;
                None
            }
            Some(entry) => {
                state.hits += 1;
                Some(entry.result)
            }
        }
    }

    pub fn insert(
        &self,
        file_id: &str,
        iteration_count: usize,
        last_timestamp_ms: u64,
        result: ConvergenceResult,
    ) {
        let key = CacheKey {
            file_id: file_id.to_string(),
            iteration_count,
            last_timestamp_ms,
        };
        let mut state = self.state.lock().expect("convergence cache mutex poisoned");
        state.entries.put(
            key,
            CacheEntry {
                result,
                created: Instant::now(),
            },
        );
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock().expect("convergence cache mutex poisoned");
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            len: state.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::judge;
    use crate::scorers::ComponentScores;
    use crate::weights::Weights;
    use pretty_assertions::assert_eq;

    fn result() -> ConvergenceResult {
        let components = ComponentScores {
            confidence: 0.9,
            stability: 0.9,
            type_consistency: 0.9,
            category_alignment: 0.9,
            improvement: 0.9,
        };
        judge(components, &Weights::default(), 3, 100)
    }

    #[test]
    fn hit_after_insert() {
        let cache = ConvergenceCache::new(10, Duration::from_secs(60));
        cache.insert("a.md", 3, 100, result());

        assert_eq!(cache.get("a.md", 3, 100), Some(result()));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn grown_history_misses() {
        let cache = ConvergenceCache::new(10, Duration::from_secs(60));
        cache.insert("a.md", 3, 100, result());

        assert_eq!(cache.get("a.md", 4, 150), None);
        assert_eq!(cache.get("a.md", 3, 150), None);
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = ConvergenceCache::new(10, Duration::ZERO);
        cache.insert("a.md", 3, 100, result());

        assert_eq!(cache.get("a.md", 3, 100), None);
        assert_eq!(cache.stats().len, 0);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let cache = ConvergenceCache::new(2, Duration::from_secs(60));
        cache.insert("a.md", 2, 1, result());
        cache.insert("b.md", 2, 1, result());
        cache.insert("c.md", 2, 1, result());

        assert_eq!(cache.stats().len, 2);
        assert_eq!(cache.get("a.md", 2, 1), None);
        assert!(cache.get("c.md", 2, 1).is_some());
    }
}
