//! Reelscore Providers - Remote Stage Interfaces
//!
//! Capability traits for the two remote stages of the resolution pipeline
//! (id-to-locator resolution and page fetching), plus the production
//! implementations: a Wikidata SPARQL client and a Rotten Tomatoes page
//! client. The pipeline depends only on the traits, so tests substitute
//! deterministic stand-ins without touching the orchestrator.

pub mod rottentomatoes;
pub mod wikidata;

use async_trait::async_trait;
use reelscore_core::{ListResult, MovieData, ProviderError, RtSlug, TitleId};

// ============================================================================
// STAGE TRAITS
// ============================================================================

/// Resolution stage: map an IMDb id to a Rotten Tomatoes page locator.
///
/// `Ok(None)` means the id has no known locator; transport failures surface
/// as `Err` and are treated by callers the same as a miss.
#[async_trait]
pub trait SlugResolver: Send + Sync {
    async fn resolve(&self, id: &TitleId) -> Result<Option<RtSlug>, ProviderError>;
}

/// Fetch stage: retrieve and extract the full detail record for a locator.
///
/// `Ok(None)` means the page was retrieved but yielded no usable record.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_movie(&self, slug: &RtSlug) -> Result<Option<MovieData>, ProviderError>;
}

/// List fetch: retrieve and extract an editorial or browse list page.
#[async_trait]
pub trait ListFetcher: Send + Sync {
    async fn fetch_list(&self, url: &str) -> Result<Option<ListResult>, ProviderError>;
}

pub use rottentomatoes::{RtClient, UrlKind};
pub use wikidata::WikidataClient;
