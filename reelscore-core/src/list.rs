//! Editorial / browse list payloads.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// One movie row in a scraped list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ListMovie {
    pub rt_slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// The result of scraping an editorial or browse page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult {
    pub source_url: String,
    pub title: String,
    pub movies: Vec<ListMovie>,
}

/// A cached list as stored by the list cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedList {
    /// sha256 of the normalized source URL; the cache key.
    pub url_hash: String,
    pub source_url: String,
    pub title: String,
    pub movies: Vec<ListMovie>,
    pub cached_at: Timestamp,
}

/// Public JSON shape of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub title: String,
    pub source_url: String,
    pub movie_count: usize,
    pub movies: Vec<ListMovie>,
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

impl From<CachedList> for ListResponse {
    fn from(list: CachedList) -> Self {
        Self {
            title: list.title,
            source_url: list.source_url,
            movie_count: list.movies.len(),
            movies: list.movies,
            cached_at: list.cached_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn response_reports_movie_count() {
        let cached = CachedList {
            url_hash: "abc".to_string(),
            source_url: "https://editorial.rottentomatoes.com/guide/best-horror-movies-of-all-time/"
                .to_string(),
            title: "Best Horror Movies".to_string(),
            movies: vec![
                ListMovie { rt_slug: "m/get_out".to_string(), title: "Get Out".to_string(), year: Some(2017) },
                ListMovie { rt_slug: "m/the_exorcist".to_string(), title: "The Exorcist".to_string(), year: Some(1973) },
            ],
            cached_at: Utc::now(),
        };

        let response = ListResponse::from(cached);
        assert_eq!(response.movie_count, 2);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"movieCount\":2"));
        assert!(json.contains("\"rtSlug\":\"m/get_out\""));
        assert!(json.contains("\"sourceUrl\""));
    }
}
