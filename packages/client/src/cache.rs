use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::key::QueryKey;

/// How long a fetched entry is served without refetching.
pub const STALE_TIME: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct Entry<V> {
    value: V,
    fetched_at: Instant,
}

/// Query results keyed by [`QueryKey`], each stamped with its fetch time.
#[derive(Debug)]
pub struct QueryCache<V> {
    entries: HashMap<QueryKey, Entry<V>>,
    stale_time: Duration,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> QueryCache<V> {
    pub fn new() -> Self {
        Self::with_stale_time(STALE_TIME)
    }

    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_time,
        }
    }

    pub fn insert(&mut self, key: QueryKey, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// The cached value, however old.
    pub fn get(&self, key: &QueryKey) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// The cached value if it was fetched within the stale time.
    pub fn get_fresh(&self, key: &QueryKey) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|e| e.fetched_at.elapsed() < self.stale_time)
            .map(|e| &e.value)
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.get_fresh(key).is_some()
    }

    /// Drop every entry under `prefix`. Returns how many were removed.
    pub fn invalidate(&mut self, prefix: &QueryKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
