//! List resolution: cache-first with stale fallback, mirroring the movie
//! policy table at list granularity.

use crate::error::{ApiError, ApiResult};
use chrono::{Duration, Utc};
use reelscore_core::{CachedList, ListResponse};
use reelscore_pipeline::StageLimits;
use reelscore_providers::ListFetcher;
use reelscore_storage::{is_fresh, ListCache};
use std::sync::Arc;

/// Cache-backed list scraping service.
///
/// List page fetches draw from the SAME fetch semaphore as movie page
/// fetches: Rotten Tomatoes has one rate budget, not one per feature.
pub struct ListService {
    cache: Arc<dyn ListCache>,
    fetcher: Arc<dyn ListFetcher>,
    limits: Arc<StageLimits>,
    cache_ttl_days: i64,
}

impl ListService {
    pub fn new(
        cache: Arc<dyn ListCache>,
        fetcher: Arc<dyn ListFetcher>,
        limits: Arc<StageLimits>,
        cache_ttl_days: i64,
    ) -> Self {
        Self { cache, fetcher, limits, cache_ttl_days }
    }

    /// Resolve a list URL: fresh cache, else scrape and cache, else stale
    /// fallback, else 502.
    pub async fn get_list(&self, url: &str) -> ApiResult<ListResponse> {
        let cached = self.cache.get(url).await?;

        if let Some(entry) = &cached {
            if is_fresh(entry.cached_at, Utc::now(), Duration::days(self.cache_ttl_days)) {
                tracing::debug!(%url, "List cache hit");
                return Ok(entry.clone().into());
            }
        }

        tracing::info!(%url, stale = cached.is_some(), "List cache miss, scraping");

        match self.scrape(url).await {
            Some(result) => {
                let stored = self.cache.upsert(&result).await?;
                Ok(stored.into())
            }
            None => self.stale_fallback(cached, url),
        }
    }

    async fn scrape(&self, url: &str) -> Option<reelscore_core::ListResult> {
        let Ok(_permit) = self.limits.fetch.acquire().await else {
            return None;
        };
        match self.fetcher.fetch_list(url).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(%url, error = %err, "List scrape failed");
                None
            }
        }
    }

    fn stale_fallback(&self, cached: Option<CachedList>, url: &str) -> ApiResult<ListResponse> {
        match cached {
            Some(entry) => {
                tracing::warn!(%url, "List scrape failed, returning stale cache");
                Ok(entry.into())
            }
            None => Err(ApiError::upstream_failed(format!("Failed to fetch list: {}", url))),
        }
    }
}
