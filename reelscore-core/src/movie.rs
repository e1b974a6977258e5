//! Movie payloads: scraped data, cache entries, and the wire response shape.

use crate::title::TitleId;
use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL for Rotten Tomatoes pages.
pub const RT_BASE_URL: &str = "https://www.rottentomatoes.com";

/// A Rotten Tomatoes page locator (e.g. `m/the_dark_knight`), produced by
/// the resolver stage and consumed by the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct RtSlug(pub String);

impl RtSlug {
    /// Full page URL for this slug.
    pub fn url(&self) -> String {
        format!("{}/{}", RT_BASE_URL, self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RtSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Score data extracted from a Rotten Tomatoes movie page.
///
/// Every field except the slug and title is optional: extraction is
/// best-effort and pages frequently omit one score or the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieData {
    pub rt_slug: RtSlug,
    pub title: String,
    pub year: Option<i32>,
    pub critic_score: Option<i32>,
    pub audience_score: Option<i32>,
    /// Critic state: `certified_fresh`, `fresh`, or `rotten`.
    pub critic_rating: Option<String>,
    /// Audience state: `upright` or `spilled`.
    pub audience_rating: Option<String>,
    pub consensus: Option<String>,
}

/// A cached movie record as stored by the cache gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedMovie {
    pub imdb_id: TitleId,
    pub rt_slug: RtSlug,
    pub title: String,
    pub year: Option<i32>,
    pub critic_score: Option<i32>,
    pub audience_score: Option<i32>,
    pub critic_rating: Option<String>,
    pub audience_rating: Option<String>,
    pub consensus: Option<String>,
    pub rt_url: String,
    pub cached_at: Timestamp,
}

impl CachedMovie {
    /// Build a cache entry from freshly scraped data.
    pub fn from_data(imdb_id: TitleId, data: MovieData, cached_at: Timestamp) -> Self {
        let rt_url = data.rt_slug.url();
        Self {
            imdb_id,
            rt_slug: data.rt_slug,
            title: data.title,
            year: data.year,
            critic_score: data.critic_score,
            audience_score: data.audience_score,
            critic_rating: data.critic_rating,
            audience_rating: data.audience_rating,
            consensus: data.consensus,
            rt_url,
            cached_at,
        }
    }
}

/// Public JSON shape of a movie record (camelCase, matching the service's
/// original wire contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub imdb_id: TitleId,
    pub rt_url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critic_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critic_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus: Option<String>,
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

impl From<CachedMovie> for MovieResponse {
    fn from(movie: CachedMovie) -> Self {
        Self {
            imdb_id: movie.imdb_id,
            rt_url: movie.rt_url,
            title: movie.title,
            year: movie.year,
            critic_score: movie.critic_score,
            audience_score: movie.audience_score,
            critic_rating: movie.critic_rating,
            audience_rating: movie.audience_rating,
            consensus: movie.consensus,
            cached_at: movie.cached_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_data() -> MovieData {
        MovieData {
            rt_slug: RtSlug("m/the_dark_knight".to_string()),
            title: "The Dark Knight".to_string(),
            year: Some(2008),
            critic_score: Some(94),
            audience_score: Some(94),
            critic_rating: Some("certified_fresh".to_string()),
            audience_rating: Some("upright".to_string()),
            consensus: Some("Dark, complex, and unforgettable.".to_string()),
        }
    }

    #[test]
    fn slug_url_joins_base() {
        let slug = RtSlug("m/get_out".to_string());
        assert_eq!(slug.url(), "https://www.rottentomatoes.com/m/get_out");
    }

    #[test]
    fn from_data_derives_rt_url() {
        let id = TitleId::parse("tt0468569").unwrap();
        let entry = CachedMovie::from_data(id, sample_data(), Utc::now());
        assert_eq!(entry.rt_url, "https://www.rottentomatoes.com/m/the_dark_knight");
        assert_eq!(entry.title, "The Dark Knight");
    }

    #[test]
    fn response_uses_camel_case_fields() {
        let id = TitleId::parse("tt0468569").unwrap();
        let entry = CachedMovie::from_data(id, sample_data(), Utc::now());
        let json = serde_json::to_string(&MovieResponse::from(entry)).unwrap();

        assert!(json.contains("\"imdbId\":\"tt0468569\""));
        assert!(json.contains("\"criticScore\":94"));
        assert!(json.contains("\"cachedAt\""));
        assert!(!json.contains("critic_score"));
    }

    #[test]
    fn response_omits_absent_fields() {
        let id = TitleId::parse("tt0000001").unwrap();
        let data = MovieData {
            rt_slug: RtSlug("m/unknown".to_string()),
            title: "Unknown".to_string(),
            year: None,
            critic_score: None,
            audience_score: None,
            critic_rating: None,
            audience_rating: None,
            consensus: None,
        };
        let entry = CachedMovie::from_data(id, data, Utc::now());
        let json = serde_json::to_string(&MovieResponse::from(entry)).unwrap();

        assert!(!json.contains("criticScore"));
        assert!(!json.contains("consensus"));
    }
}
