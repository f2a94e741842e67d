use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time-bounded memo of breed lookups.
///
/// Maps a normalized query to the canonical breed name (`Some`) or to a known
/// miss (`None`). Entries whose age reaches the TTL are treated as absent, and
/// are dropped whenever a fresh list is stored.
#[derive(Clone, Debug)]
pub struct BreedCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

#[derive(Debug)]
struct CacheEntry {
    breed: Option<String>,
    inserted_at: Instant,
}

impl BreedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Cached answer for `key`. The outer `None` means "not cached".
    pub fn get(&self, key: &str) -> Option<Option<String>> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<Option<String>> {
        let entries = self.entries.lock().expect("breed cache lock poisoned");
        entries
            .get(key)
            .filter(|entry| now.saturating_duration_since(entry.inserted_at) < self.ttl)
            .map(|entry| entry.breed.clone())
    }

    #[cfg(test)]
    fn insert_at(&self, key: String, breed: Option<String>, now: Instant) {
        let mut entries = self.entries.lock().expect("breed cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                breed,
                inserted_at: now,
            },
        );
    }

    /// Store a freshly fetched reference list and return the answer for `query`.
    ///
    /// Every listed breed becomes a positive entry. `query` is recorded as a miss
    /// when the list does not contain it.
    pub fn store_list(&self, names: &[String], query: &str) -> Option<String> {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("breed cache lock poisoned");
        let purged = self.purge_expired(&mut entries, now);
        if purged > 0 {
            tracing::debug!(purged, "Dropped expired breed cache entries");
        }

        let mut found = None;
        for name in names {
            let canonical = name.trim();
            if canonical.is_empty() {
                continue;
            }
            let key = super::normalize(canonical);
            if key == query {
                found = Some(canonical.to_string());
            }
            entries.insert(
                key,
                CacheEntry {
                    breed: Some(canonical.to_string()),
                    inserted_at: now,
                },
            );
        }

        if found.is_none() {
            entries.insert(
                query.to_string(),
                CacheEntry {
                    breed: None,
                    inserted_at: now,
                },
            );
        }

        found
    }

    /// Drop expired entries, returning how many were removed.
    fn purge_expired(&self, entries: &mut HashMap<String, CacheEntry>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("breed cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
