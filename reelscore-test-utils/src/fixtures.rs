//! Canned domain values for tests.

use reelscore_core::{CachedMovie, MovieData, RtSlug, Timestamp, TitleId};

/// Parse a known-good title id, panicking on typos in test code.
pub fn title_id(raw: &str) -> TitleId {
    TitleId::parse(raw).expect("test fixture id must be valid")
}

/// A complete scraped payload for the given slug.
pub fn movie_data(slug: &str, title: &str) -> MovieData {
    MovieData {
        rt_slug: RtSlug(slug.to_string()),
        title: title.to_string(),
        year: Some(2008),
        critic_score: Some(94),
        audience_score: Some(94),
        critic_rating: Some("certified_fresh".to_string()),
        audience_rating: Some("upright".to_string()),
        consensus: Some("Dark, complex, and unforgettable.".to_string()),
    }
}

/// A cache entry with an explicit timestamp, for staging fresh or stale
/// rows.
pub fn cached_movie(id: &str, slug: &str, title: &str, cached_at: Timestamp) -> CachedMovie {
    CachedMovie::from_data(title_id(id), movie_data(slug, title), cached_at)
}
