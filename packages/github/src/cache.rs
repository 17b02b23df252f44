use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

/// Successful upstream bodies keyed by request URL, valid for a fixed TTL.
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    body: Vec<u8>,
    stored_at: Instant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

impl ResponseCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.body.clone())
    }

    pub async fn insert(&self, key: String, body: Vec<u8>) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        entries.insert(
            key,
            CacheEntry {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();

        CacheStats {
            size: entries.len(),
            keys,
        }
    }
}
