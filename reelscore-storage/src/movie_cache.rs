//! Movie cache trait and in-memory implementation.

use async_trait::async_trait;
use chrono::Utc;
use reelscore_core::{CachedMovie, MovieData, StoreError, TitleId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Cache gateway for movie records.
///
/// `get_batch` is the bulk entry point used by the batch pipeline and MUST be
/// one round trip to the backing store, never N. `upsert` is the write-back
/// path after a successful fetch.
#[async_trait]
pub trait MovieCache: Send + Sync {
    /// Look up a single cached record.
    async fn get(&self, id: &TitleId) -> Result<Option<CachedMovie>, StoreError>;

    /// Look up many records in one store round trip. Ids without an entry
    /// are simply absent from the returned map.
    async fn get_batch(
        &self,
        ids: &[TitleId],
    ) -> Result<HashMap<TitleId, CachedMovie>, StoreError>;

    /// Insert or refresh a record, returning the stored entry.
    async fn upsert(&self, id: &TitleId, data: &MovieData) -> Result<CachedMovie, StoreError>;
}

/// In-memory movie cache for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryMovieCache {
    entries: RwLock<HashMap<TitleId, CachedMovie>>,
}

impl InMemoryMovieCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry directly, bypassing the upsert timestamping. Useful for
    /// staging stale entries in tests.
    pub fn insert_entry(&self, entry: CachedMovie) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(entry.imdb_id.clone(), entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MovieCache for InMemoryMovieCache {
    async fn get(&self, id: &TitleId) -> Result<Option<CachedMovie>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Unavailable {
            reason: "movie cache lock poisoned".to_string(),
        })?;
        Ok(entries.get(id).cloned())
    }

    async fn get_batch(
        &self,
        ids: &[TitleId],
    ) -> Result<HashMap<TitleId, CachedMovie>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Unavailable {
            reason: "movie cache lock poisoned".to_string(),
        })?;
        Ok(ids
            .iter()
            .filter_map(|id| entries.get(id).map(|e| (id.clone(), e.clone())))
            .collect())
    }

    async fn upsert(&self, id: &TitleId, data: &MovieData) -> Result<CachedMovie, StoreError> {
        let entry = CachedMovie::from_data(id.clone(), data.clone(), Utc::now());
        let mut entries = self.entries.write().map_err(|_| StoreError::Unavailable {
            reason: "movie cache lock poisoned".to_string(),
        })?;
        entries.insert(id.clone(), entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelscore_core::RtSlug;

    fn sample_data(slug: &str) -> MovieData {
        MovieData {
            rt_slug: RtSlug(slug.to_string()),
            title: "Example".to_string(),
            year: Some(2008),
            critic_score: Some(94),
            audience_score: None,
            critic_rating: None,
            audience_rating: None,
            consensus: None,
        }
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let cache = InMemoryMovieCache::new();
        let id = TitleId::parse("tt0468569").unwrap();

        let stored = cache.upsert(&id, &sample_data("m/the_dark_knight")).await.unwrap();
        let fetched = cache.get(&id).await.unwrap().unwrap();

        assert_eq!(stored, fetched);
        assert_eq!(fetched.rt_url, "https://www.rottentomatoes.com/m/the_dark_knight");
    }

    #[tokio::test]
    async fn upsert_replaces_existing_entry() {
        let cache = InMemoryMovieCache::new();
        let id = TitleId::parse("tt0468569").unwrap();

        cache.upsert(&id, &sample_data("m/old_slug")).await.unwrap();
        cache.upsert(&id, &sample_data("m/new_slug")).await.unwrap();

        let entry = cache.get(&id).await.unwrap().unwrap();
        assert_eq!(entry.rt_slug.as_str(), "m/new_slug");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn get_batch_returns_only_present_ids() {
        let cache = InMemoryMovieCache::new();
        let hit = TitleId::parse("tt0468569").unwrap();
        let miss = TitleId::parse("tt9999999").unwrap();
        cache.upsert(&hit, &sample_data("m/the_dark_knight")).await.unwrap();

        let map = cache.get_batch(&[hit.clone(), miss.clone()]).await.unwrap();

        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&hit));
        assert!(!map.contains_key(&miss));
    }

    #[tokio::test]
    async fn get_batch_on_empty_input_is_empty() {
        let cache = InMemoryMovieCache::new();
        let map = cache.get_batch(&[]).await.unwrap();
        assert!(map.is_empty());
    }
}
