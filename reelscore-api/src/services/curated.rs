//! Registry of known Rotten Tomatoes editorial lists.

use crate::types::CuratedListInfo;

/// One curated editorial list.
#[derive(Debug, Clone, Copy)]
pub struct CuratedList {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
}

/// Curated editorial lists - add more as needed.
pub const CURATED_LISTS: &[CuratedList] = &[
    CuratedList {
        slug: "best-horror",
        title: "Best Horror Movies of All Time",
        description: "RT's definitive ranking of the greatest horror films",
        url: "https://editorial.rottentomatoes.com/guide/best-horror-movies-of-all-time/",
    },
    CuratedList {
        slug: "best-2024",
        title: "Best Movies of 2024",
        description: "The top-rated films of 2024",
        url: "https://editorial.rottentomatoes.com/guide/best-movies-of-2024/",
    },
    CuratedList {
        slug: "best-comedies",
        title: "Best Comedies of All Time",
        description: "The funniest movies ever made according to critics",
        url: "https://editorial.rottentomatoes.com/guide/best-comedies/",
    },
    CuratedList {
        slug: "best-action",
        title: "Best Action Movies of All Time",
        description: "The greatest action films ranked",
        url: "https://editorial.rottentomatoes.com/guide/best-action-movies/",
    },
    CuratedList {
        slug: "best-sci-fi",
        title: "Best Sci-Fi Movies of All Time",
        description: "The greatest science fiction films",
        url: "https://editorial.rottentomatoes.com/guide/best-sci-fi-movies/",
    },
    CuratedList {
        slug: "best-animated",
        title: "Best Animated Movies of All Time",
        description: "The greatest animated films ranked",
        url: "https://editorial.rottentomatoes.com/guide/best-animated-movies/",
    },
];

/// Look up a curated list by slug.
pub fn get_curated_list(slug: &str) -> Option<&'static CuratedList> {
    CURATED_LISTS.iter().find(|list| list.slug == slug)
}

/// All curated lists as wire infos (without the scrape URLs).
pub fn all_curated_lists() -> Vec<CuratedListInfo> {
    CURATED_LISTS
        .iter()
        .map(|list| CuratedListInfo {
            slug: list.slug.to_string(),
            title: list.title.to_string(),
            description: list.description.to_string(),
        })
        .collect()
}
