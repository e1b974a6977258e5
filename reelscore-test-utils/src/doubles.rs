//! Scripted doubles for the cache store and the two remote stages.

use async_trait::async_trait;
use reelscore_core::{
    CachedMovie, MovieData, ProviderError, RtSlug, StoreError, TitleId,
};
use reelscore_providers::{PageFetcher, SlugResolver};
use reelscore_storage::MovieCache;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// CONCURRENCY PROBE
// ============================================================================

/// Records the number of in-flight calls and the highest value it ever
/// reached. Used to assert the stage semaphore bounds.
#[derive(Debug, Default)]
pub struct ConcurrencyProbe {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyProbe {
    /// Mark a call as started; the guard marks it finished on drop.
    pub fn enter(&self) -> ProbeGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        ProbeGuard { probe: self }
    }

    /// Calls currently in flight.
    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous calls observed.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct ProbeGuard<'a> {
    probe: &'a ConcurrencyProbe,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.probe.current.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// SCRIPTED RESOLVER
// ============================================================================

/// A `SlugResolver` backed by a fixed id-to-slug table.
///
/// Ids absent from the table resolve to `Ok(None)`; ids in the error set
/// return a transport error. An optional per-call delay forces calls to
/// overlap so the probe can observe real concurrency.
#[derive(Default)]
pub struct ScriptedResolver {
    slugs: HashMap<TitleId, RtSlug>,
    errors: HashSet<TitleId>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    pub probe: Arc<ConcurrencyProbe>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slug(mut self, id: &TitleId, slug: &str) -> Self {
        self.slugs.insert(id.clone(), RtSlug(slug.to_string()));
        self
    }

    pub fn with_error(mut self, id: &TitleId) -> Self {
        self.errors.insert(id.clone());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SlugResolver for ScriptedResolver {
    async fn resolve(&self, id: &TitleId) -> Result<Option<RtSlug>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _guard = self.probe.enter();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.errors.contains(id) {
            return Err(ProviderError::RequestFailed {
                provider: "scripted-resolver",
                message: format!("scripted failure for {}", id),
            });
        }
        Ok(self.slugs.get(id).cloned())
    }
}

// ============================================================================
// SCRIPTED FETCHER
// ============================================================================

/// A `PageFetcher` backed by a fixed slug-to-payload table.
///
/// Slugs absent from the table fetch as `Ok(None)`; slugs in the error set
/// return a transport error.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<RtSlug, MovieData>,
    errors: HashSet<RtSlug>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    pub probe: Arc<ConcurrencyProbe>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, data: MovieData) -> Self {
        self.pages.insert(data.rt_slug.clone(), data);
        self
    }

    pub fn with_error(mut self, slug: &str) -> Self {
        self.errors.insert(RtSlug(slug.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_movie(&self, slug: &RtSlug) -> Result<Option<MovieData>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _guard = self.probe.enter();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.errors.contains(slug) {
            return Err(ProviderError::RequestFailed {
                provider: "scripted-fetcher",
                message: format!("scripted failure for {}", slug),
            });
        }
        Ok(self.pages.get(slug).cloned())
    }
}

// ============================================================================
// FAILING CACHE
// ============================================================================

/// A `MovieCache` whose reads succeed (backed by an in-memory store) but
/// whose upserts fail, for write-back-failure paths.
#[derive(Debug, Default)]
pub struct ReadOnlyMovieCache {
    pub inner: reelscore_storage::InMemoryMovieCache,
}

#[async_trait]
impl MovieCache for ReadOnlyMovieCache {
    async fn get(&self, id: &TitleId) -> Result<Option<CachedMovie>, StoreError> {
        self.inner.get(id).await
    }

    async fn get_batch(
        &self,
        ids: &[TitleId],
    ) -> Result<HashMap<TitleId, CachedMovie>, StoreError> {
        self.inner.get_batch(ids).await
    }

    async fn upsert(&self, _id: &TitleId, _data: &MovieData) -> Result<CachedMovie, StoreError> {
        Err(StoreError::QueryFailed { reason: "scripted write failure".to_string() })
    }
}

/// A `MovieCache` whose every operation fails, for store-outage paths.
#[derive(Debug, Default)]
pub struct FailingMovieCache;

#[async_trait]
impl MovieCache for FailingMovieCache {
    async fn get(&self, _id: &TitleId) -> Result<Option<CachedMovie>, StoreError> {
        Err(StoreError::Unavailable { reason: "scripted outage".to_string() })
    }

    async fn get_batch(
        &self,
        _ids: &[TitleId],
    ) -> Result<HashMap<TitleId, CachedMovie>, StoreError> {
        Err(StoreError::Unavailable { reason: "scripted outage".to_string() })
    }

    async fn upsert(&self, _id: &TitleId, _data: &MovieData) -> Result<CachedMovie, StoreError> {
        Err(StoreError::Unavailable { reason: "scripted outage".to_string() })
    }
}
