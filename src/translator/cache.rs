//! Translation Result Cache
//!
//! Bounded LRU keyed by `(source_lang, target_lang, mode, text)` with a
//! per-entry TTL. Expiry is lazy: stale entries are dropped when read, no
//! background sweep. A single mutex serializes writers, which is all the
//! concurrency the façade needs.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use super::{TranslateMode, TranslationResult};

/// Composite cache key. The source language is the resolved one: auto-detect
/// and an explicit source code for the same pair share the entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source_lang: String,
    pub target_lang: String,
    pub mode: TranslateMode,
    pub text: String,
}

struct CachedEntry {
    result: TranslationResult,
    stored_at: Instant,
}

pub struct TranslationCache {
    inner: Mutex<LruCache<CacheKey, CachedEntry>>,
    ttl: Duration,
}

impl TranslationCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("non-zero capacity");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Fetch a live entry, cloned with `from_cache` flipped on. Expired
    /// entries are evicted and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<TranslationResult> {
        let mut cache = self.inner.lock().expect("cache lock");
        let stale = match cache.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                let mut result = entry.result.clone();
                result.from_cache = true;
                return Some(result);
            }
            Some(_) => true,
            None => false,
        };
        if stale {
            tracing::debug!("evicting expired cache entry");
            cache.pop(key);
        }
        None
    }

    pub fn put(&self, key: CacheKey, result: TranslationResult) {
        let mut cache = self.inner.lock().expect("cache lock");
        cache.put(
            key,
            CachedEntry {
                result,
                stored_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock").len()
    }
}
