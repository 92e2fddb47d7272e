use std::{
    collections::{HashMap, VecDeque},
    fmt,
    future::Future,
};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

/// SHA-256 digest of an input identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hashes each part with a length prefix so that `("ab", "c")` and `("a", "bc")` differ.
    pub fn from_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        CacheKey(format!("{:x}", hasher.finalize()))
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_parts(&[text.as_bytes()])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct Entries<V> {
    values: HashMap<CacheKey, V>,
    order: VecDeque<CacheKey>,
}

/// Bounded memo table keyed by content digest. The oldest insertion is evicted
/// once `capacity` is reached.
pub struct ContentCache<V> {
    name: &'static str,
    capacity: usize,
    entries: RwLock<Entries<V>>,
}

impl<V: Clone> ContentCache<V> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity: capacity.max(1),
            entries: RwLock::new(Entries {
                values: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        self.entries.read().await.values.get(key).cloned()
    }

    pub async fn insert(&self, key: CacheKey, value: V) {
        let mut entries = self.entries.write().await;
        if entries.values.insert(key.clone(), value).is_some() {
            return;
        }

        entries.order.push_back(key);
        while entries.order.len() > self.capacity {
            if let Some(evicted) = entries.order.pop_front() {
                entries.values.remove(&evicted);
                log::debug!("{} cache evicted {}", self.name, evicted);
            }
        }
    }

    pub async fn invalidate(&self, key: &CacheKey) -> Option<V> {
        let mut entries = self.entries.write().await;
        entries.order.retain(|k| k != key);
        entries.values.remove(key)
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.values.clear();
        entries.order.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.values.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns the cached value for `key`, or runs `init` and caches its `Ok` result.
    /// Errors are returned as-is and never cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: CacheKey, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            log::debug!("{} cache hit {}", self.name, key);
            return Ok(value);
        }

        log::debug!("{} cache miss {}", self.name, key);
        let value = init().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }
}
