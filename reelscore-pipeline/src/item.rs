//! Per-title resolution state machine.
//!
//! Policy table, entered once per title:
//! - fresh cache hit: short-circuit, no remote work
//! - stale hit: attempt a refresh, degrade to the stale payload on any
//!   remote failure
//! - miss: no fallback; resolver misses surface `not_found`, fetch
//!   failures surface `scrape_failed`

use crate::batch::Pipeline;
use chrono::Utc;
use reelscore_core::{
    CachedMovie, FailureKind, Provenance, ResolutionOutcome, RtSlug, TitleId,
};
use reelscore_storage::is_fresh;

/// Drive one title to a terminal outcome.
///
/// `cached` is this title's row from the batch cache lookup (or a single
/// lookup on the one-title path). Stage semaphore permits are held only for
/// the duration of the remote call they gate.
pub(crate) async fn resolve_title(
    pipeline: &Pipeline,
    id: TitleId,
    cached: Option<CachedMovie>,
) -> ResolutionOutcome {
    if let Some(entry) = &cached {
        if is_fresh(entry.cached_at, Utc::now(), pipeline.config.cache_ttl()) {
            tracing::debug!(imdb_id = %id, "Cache hit");
            return ResolutionOutcome::Resolved {
                movie: entry.clone(),
                provenance: Provenance::Cached,
            };
        }
    }

    tracing::info!(imdb_id = %id, stale = cached.is_some(), "Cache miss, resolving RT slug");

    let Some(slug) = resolve_stage(pipeline, &id).await else {
        return stale_or_failed(
            cached,
            id.clone(),
            FailureKind::NotFound,
            format!("Movie not found in Wikidata: {}", id),
        );
    };

    let Some(data) = fetch_stage(pipeline, &id, &slug).await else {
        return stale_or_failed(
            cached,
            id.clone(),
            FailureKind::ScrapeFailed,
            format!("Failed to scrape Rotten Tomatoes for {}", id),
        );
    };

    match pipeline.cache.upsert(&id, &data).await {
        Ok(movie) => {
            tracing::info!(imdb_id = %id, "Cached RT data");
            ResolutionOutcome::Resolved { movie, provenance: Provenance::Fetched }
        }
        Err(err) => {
            // The record is in hand; a cache write-back failure must not
            // turn a successful fetch into an error.
            tracing::warn!(imdb_id = %id, error = %err, "Cache write-back failed");
            ResolutionOutcome::Resolved {
                movie: CachedMovie::from_data(id, data, Utc::now()),
                provenance: Provenance::Fetched,
            }
        }
    }
}

/// Resolution stage under the resolve semaphore. Transport errors fold into
/// a miss: both leave the title without a locator.
async fn resolve_stage(pipeline: &Pipeline, id: &TitleId) -> Option<RtSlug> {
    let Ok(_permit) = pipeline.limits.resolve.acquire().await else {
        return None;
    };
    match pipeline.resolver.resolve(id).await {
        Ok(slug) => slug,
        Err(err) => {
            tracing::error!(imdb_id = %id, error = %err, "Slug resolution failed");
            None
        }
    }
}

/// Fetch stage under the fetch semaphore.
async fn fetch_stage(
    pipeline: &Pipeline,
    id: &TitleId,
    slug: &RtSlug,
) -> Option<reelscore_core::MovieData> {
    let Ok(_permit) = pipeline.limits.fetch.acquire().await else {
        return None;
    };
    match pipeline.fetcher.fetch_movie(slug).await {
        Ok(data) => data,
        Err(err) => {
            tracing::error!(imdb_id = %id, slug = %slug, error = %err, "RT fetch failed");
            None
        }
    }
}

fn stale_or_failed(
    cached: Option<CachedMovie>,
    id: TitleId,
    kind: FailureKind,
    message: String,
) -> ResolutionOutcome {
    match cached {
        Some(movie) => {
            tracing::warn!(imdb_id = %id, "Remote refresh failed, returning stale cache");
            ResolutionOutcome::Resolved { movie, provenance: Provenance::Stale }
        }
        None => ResolutionOutcome::Failed { imdb_id: id, kind, message },
    }
}
