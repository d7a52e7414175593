use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::results::ResultSet;

struct CacheEntry {
    set: Arc<ResultSet>,
    created_at: Instant,
}

/// Result sets keyed by resolved provider query.
///
/// When an insertion would push the entry count past `max_entries` the whole
/// map is cleared first (full flush, not LRU). Stored sets are never replaced.
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    max_entries: usize,
    ttl: Option<Duration>,
}

impl ResultCache {
    pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl.is_some_and(|ttl| entry.created_at.elapsed() >= ttl)
    }

    pub fn get(&self, key: &str) -> Option<Arc<ResultSet>> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if !self.is_expired(entry) => return Some(Arc::clone(&entry.set)),
            Some(_) => {}
            None => return None,
        }
        debug!(key, "cache entry expired");
        entries.remove(key);
        None
    }

    /// Returns the cached set for `key`, or runs `compute` and stores its result.
    /// The lock is not held while `compute` runs; a failed computation stores nothing.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<Arc<ResultSet>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResultSet, E>>,
    {
        if let Some(set) = self.get(key) {
            debug!(key, "cache hit");
            return Ok(set);
        }

        debug!(key, "cache miss");
        let set = Arc::new(compute().await?);
        Ok(self.insert(key, set))
    }

    fn insert(&self, key: &str, set: Arc<ResultSet>) -> Arc<ResultSet> {
        let mut entries = self.lock();

        if let Some(existing) = entries.get(key)
            && !self.is_expired(existing)
        {
            return Arc::clone(&existing.set);
        }

        if !entries.contains_key(key) && entries.len() + 1 > self.max_entries {
            info!(entries = entries.len(), max = self.max_entries, "result cache full, flushing");
            entries.clear();
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                set: Arc::clone(&set),
                created_at: Instant::now(),
            },
        );
        set
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
