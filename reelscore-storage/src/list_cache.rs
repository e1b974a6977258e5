//! List cache trait, URL-hash keying, and in-memory implementation.

use async_trait::async_trait;
use chrono::Utc;
use reelscore_core::{CachedList, ListResult, StoreError};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;

/// Normalize a list URL for consistent cache keying: lowercase, strip
/// trailing slashes, and cut common tracking parameters.
pub fn normalize_url(url: &str) -> String {
    let mut normalized = url.to_lowercase();
    for param in ["?ref=", "&ref=", "?utm_", "&utm_"] {
        if let Some(idx) = normalized.find(param) {
            normalized.truncate(idx);
        }
    }
    normalized.trim_end_matches('/').to_string()
}

/// sha256 hex digest of the normalized URL; the list-cache key.
pub fn hash_url(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_url(url).as_bytes());
    hex::encode(hasher.finalize())
}

/// Cache gateway for scraped lists, keyed by URL hash.
#[async_trait]
pub trait ListCache: Send + Sync {
    /// Look up the cached list for a source URL.
    async fn get(&self, url: &str) -> Result<Option<CachedList>, StoreError>;

    /// Insert or refresh a scraped list, returning the stored entry.
    async fn upsert(&self, result: &ListResult) -> Result<CachedList, StoreError>;
}

/// In-memory list cache for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryListCache {
    entries: RwLock<HashMap<String, CachedList>>,
}

impl InMemoryListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry directly, bypassing the upsert timestamping. Useful for
    /// staging stale entries in tests.
    pub fn insert_entry(&self, entry: CachedList) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(entry.url_hash.clone(), entry);
        }
    }
}

#[async_trait]
impl ListCache for InMemoryListCache {
    async fn get(&self, url: &str) -> Result<Option<CachedList>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Unavailable {
            reason: "list cache lock poisoned".to_string(),
        })?;
        Ok(entries.get(&hash_url(url)).cloned())
    }

    async fn upsert(&self, result: &ListResult) -> Result<CachedList, StoreError> {
        let entry = CachedList {
            url_hash: hash_url(&result.source_url),
            source_url: result.source_url.clone(),
            title: result.title.clone(),
            movies: result.movies.clone(),
            cached_at: Utc::now(),
        };
        let mut entries = self.entries.write().map_err(|_| StoreError::Unavailable {
            reason: "list cache lock poisoned".to_string(),
        })?;
        entries.insert(entry.url_hash.clone(), entry.clone());
        Ok(entry)
    }
}
