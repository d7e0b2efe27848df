use std::{
    collections::{HashMap, VecDeque},
    future::Future,
    sync::Arc,
};

use shared::error::DexError;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

/// Trimmed, ASCII-lowercased cache key.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

struct CacheEntries<T> {
    values: HashMap<String, Arc<T>>,
    insertion_order: VecDeque<String>,
    in_flight: HashMap<String, Arc<OnceCell<Arc<T>>>>,
}

impl<T> CacheEntries<T> {
    fn store(&mut self, kind: &str, capacity: Option<usize>, key: String, value: Arc<T>) {
        if self.values.insert(key.clone(), value).is_some() {
            return;
        }
        self.insertion_order.push_back(key);

        if let Some(capacity) = capacity {
            while self.values.len() > capacity {
                let Some(oldest) = self.insertion_order.pop_front() else {
                    break;
                };
                self.values.remove(&oldest);
                debug!("cache: evicted kind={kind} key={oldest}");
            }
        }
    }
}

/// Session-lifetime key/value cache for one record kind.
///
/// Records are immutable reference data, so entries are never invalidated. With a
/// capacity set, the oldest inserted key is evicted first. Concurrent misses on one
/// key share a single fetch.
pub struct ResponseCache<T> {
    kind: &'static str,
    key_fn: fn(&str) -> String,
    capacity: Option<usize>,
    entries: Mutex<CacheEntries<T>>,
}

impl<T> ResponseCache<T>
where
    T: Send + Sync,
{
    pub fn new(kind: &'static str, capacity: Option<usize>) -> Self {
        Self::with_key_fn(kind, capacity, normalize_key)
    }

    pub fn with_key_fn(
        kind: &'static str,
        capacity: Option<usize>,
        key_fn: fn(&str) -> String,
    ) -> Self {
        Self {
            kind,
            key_fn,
            capacity: capacity.filter(|cap| *cap > 0),
            entries: Mutex::new(CacheEntries {
                values: HashMap::new(),
                insertion_order: VecDeque::new(),
                in_flight: HashMap::new(),
            }),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<T>> {
        let key = (self.key_fn)(key);
        self.entries.lock().await.values.get(&key).cloned()
    }

    pub async fn insert(&self, key: &str, value: Arc<T>) {
        let key = (self.key_fn)(key);
        self.entries
            .lock()
            .await
            .store(self.kind, self.capacity, key, value);
    }

    /// Stores `value` under each alias that is not cached yet.
    pub async fn insert_aliases(&self, aliases: &[&str], value: &Arc<T>) {
        for alias in aliases {
            if self.get(alias).await.is_none() {
                self.insert(alias, Arc::clone(value)).await;
            }
        }
    }

    /// Returns the cached record for `key`, or runs `fetch` with the caller's key and
    /// caches its success under the normalized key. Callers that miss while a fetch
    /// for the same key is running wait for it instead of fetching again. Failures
    /// are not cached.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Arc<T>, DexError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, DexError>>,
    {
        let normalized = (self.key_fn)(key);
        let cell = {
            let mut entries = self.entries.lock().await;
            if let Some(hit) = entries.values.get(&normalized) {
                debug!("cache: hit kind={} key={normalized}", self.kind);
                return Ok(Arc::clone(hit));
            }
            Arc::clone(entries.in_flight.entry(normalized.clone()).or_default())
        };

        let request = key.to_string();
        let result = cell
            .get_or_try_init(|| async move {
                debug!("cache: miss kind={} key={request}", self.kind);
                fetch(request).await.map(Arc::new)
            })
            .await
            .map(Arc::clone);

        let mut entries = self.entries.lock().await;
        if entries
            .in_flight
            .get(&normalized)
            .is_some_and(|current| Arc::ptr_eq(current, &cell))
        {
            entries.in_flight.remove(&normalized);
        }
        if let Ok(value) = &result {
            if !entries.values.contains_key(&normalized) {
                entries.store(self.kind, self.capacity, normalized, Arc::clone(value));
            }
        }
        result
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.values.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
