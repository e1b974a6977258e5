//! Editorial and browse list extraction.

use super::extract::strip_tags;
use once_cell::sync::Lazy;
use reelscore_core::{ListMovie, ListResult};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

static H1_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<h1[^>]*>(.*?)</h1>").expect("hard-coded pattern compiles"));

static MOVIE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*href="[^"]*/m/([A-Za-z0-9_\-]+)[^"]*"[^>]*>(.*?)</a>"#)
        .expect("hard-coded pattern compiles")
});

static YEAR_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d{4})\)").expect("hard-coded pattern compiles"));

static ITEMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""items"\s*:\s*(\[[^\]]*\])"#).expect("hard-coded pattern compiles"));

/// Kinds of supported list URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Editorial,
    Browse,
    Unknown,
}

/// Classify a Rotten Tomatoes list URL.
pub fn detect_url_kind(url: &str) -> UrlKind {
    let lower = url.to_lowercase();
    if lower.contains("editorial.rottentomatoes.com") || lower.contains("/guide/") {
        UrlKind::Editorial
    } else if lower.contains("/browse/") {
        UrlKind::Browse
    } else {
        UrlKind::Unknown
    }
}

/// Extract an editorial guide page: unique `/m/{slug}` links with their
/// titles, a `(year)` suffix becoming the year field.
pub fn extract_editorial_list(html: &str, url: &str) -> Option<ListResult> {
    let title = H1_RE
        .captures(html)
        .map(|c| strip_tags(&c[1]))
        .unwrap_or_default();

    let mut movies = Vec::new();
    let mut seen = HashSet::new();

    for cap in MOVIE_LINK_RE.captures_iter(html) {
        let slug = cap[1].to_string();
        if !seen.insert(slug.clone()) {
            continue;
        }

        let mut movie_title = strip_tags(&cap[2]);
        let year = YEAR_SUFFIX_RE
            .captures(&movie_title)
            .and_then(|c| c[1].parse().ok());
        if year.is_some() {
            movie_title = YEAR_SUFFIX_RE.replace(&movie_title, "").trim().to_string();
        }

        if movie_title.len() >= 2 {
            movies.push(ListMovie {
                rt_slug: format!("m/{}", slug),
                title: movie_title,
                year,
            });
        }
    }

    if movies.is_empty() {
        tracing::warn!(%url, "No movies found in editorial list");
        return None;
    }

    Some(ListResult { source_url: url.to_string(), title, movies })
}

/// Extract a browse page: movie rows live in embedded `"items"` JSON
/// arrays, with plain `/m/` links as a fallback.
pub fn extract_browse_list(html: &str, url: &str) -> Option<ListResult> {
    let title = browse_title_from_url(url);
    let mut movies = Vec::new();

    for cap in ITEMS_RE.captures_iter(html) {
        let Ok(items) = serde_json::from_str::<Vec<Value>>(&cap[1]) else {
            continue;
        };
        for item in items {
            let Some(obj) = item.as_object() else { continue };
            let slug = obj
                .get("mediaUrl")
                .and_then(Value::as_str)
                .map(|u| u.trim_start_matches("/m/").to_string())
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    obj.get("slug")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .filter(|s| !s.is_empty())
                });
            let item_title = obj.get("title").and_then(Value::as_str).unwrap_or_default();
            let year = obj
                .get("releaseYear")
                .or_else(|| obj.get("year"))
                .and_then(Value::as_i64)
                .map(|y| y as i32);

            if let Some(slug) = slug {
                if !item_title.is_empty() {
                    let rt_slug = if slug.starts_with("m/") { slug } else { format!("m/{}", slug) };
                    movies.push(ListMovie { rt_slug, title: item_title.to_string(), year });
                }
            }
        }
    }

    if movies.is_empty() {
        let mut seen = HashSet::new();
        for cap in MOVIE_LINK_RE.captures_iter(html) {
            let slug = cap[1].to_string();
            if !seen.insert(slug.clone()) {
                continue;
            }
            let movie_title = {
                let text = strip_tags(&cap[2]);
                if text.len() > 2 { text } else { title_case(&slug.replace('_', " ")) }
            };
            movies.push(ListMovie { rt_slug: format!("m/{}", slug), title: movie_title, year: None });
        }
    }

    if movies.is_empty() {
        tracing::warn!(%url, "No movies found in browse page");
        return None;
    }

    Some(ListResult { source_url: url.to_string(), title, movies })
}

/// Build a readable title from the browse URL's filter segments, e.g.
/// `/browse/movies_at_home/critics:certified_fresh` becomes
/// "Movies At Home - Certified Fresh".
fn browse_title_from_url(url: &str) -> String {
    let Some(path) = url.split("/browse/").nth(1) else {
        return "Browse Results".to_string();
    };

    let parts: Vec<String> = path
        .split('/')
        .filter(|p| !p.is_empty())
        .map(|part| {
            let value = part.split_once(':').map(|(_, v)| v).unwrap_or(part);
            title_case(&value.replace('_', " "))
        })
        .collect();

    if parts.is_empty() {
        "Browse Results".to_string()
    } else {
        parts.join(" - ")
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_url_kinds() {
        assert_eq!(
            detect_url_kind("https://editorial.rottentomatoes.com/guide/best-horror-movies-of-all-time/"),
            UrlKind::Editorial
        );
        assert_eq!(
            detect_url_kind("https://www.rottentomatoes.com/browse/movies_at_home/critics:certified_fresh"),
            UrlKind::Browse
        );
        assert_eq!(detect_url_kind("https://www.google.com/"), UrlKind::Unknown);
    }

    #[test]
    fn editorial_extraction_dedupes_and_reads_years() {
        let html = r#"
            <h1>Best Horror Movies</h1>
            <a href="https://www.rottentomatoes.com/m/get_out">Get Out (2017)</a>
            <a href="/m/get_out">Get Out again</a>
            <a href="/m/the_exorcist">The Exorcist (1973)</a>
        "#;
        let url = "https://editorial.rottentomatoes.com/guide/best-horror/";

        let result = extract_editorial_list(html, url).unwrap();
        assert_eq!(result.title, "Best Horror Movies");
        assert_eq!(result.movies.len(), 2);
        assert_eq!(result.movies[0].rt_slug, "m/get_out");
        assert_eq!(result.movies[0].title, "Get Out");
        assert_eq!(result.movies[0].year, Some(2017));
        assert_eq!(result.movies[1].year, Some(1973));
    }

    #[test]
    fn editorial_with_no_links_is_none() {
        assert!(extract_editorial_list("<h1>Empty</h1>", "https://editorial.example/guide/x").is_none());
    }

    #[test]
    fn browse_extraction_reads_items_json() {
        let html = r#"
            <script>
            {"items": [
                {"mediaUrl": "/m/get_out", "title": "Get Out", "releaseYear": 2017},
                {"slug": "the_exorcist", "title": "The Exorcist", "year": 1973}
            ]}
            </script>
        "#;
        let url = "https://www.rottentomatoes.com/browse/movies_at_home/genres:horror";

        let result = extract_browse_list(html, url).unwrap();
        assert_eq!(result.movies.len(), 2);
        assert_eq!(result.movies[0].rt_slug, "m/get_out");
        assert_eq!(result.movies[1].rt_slug, "m/the_exorcist");
        assert_eq!(result.movies[1].year, Some(1973));
    }

    #[test]
    fn browse_extraction_falls_back_to_links() {
        let html = r#"<a href="/m/some_film"><span>Some Film</span></a>"#;
        let url = "https://www.rottentomatoes.com/browse/movies_at_home";

        let result = extract_browse_list(html, url).unwrap();
        assert_eq!(result.movies.len(), 1);
        assert_eq!(result.movies[0].title, "Some Film");
    }

    #[test]
    fn browse_title_is_built_from_filters() {
        assert_eq!(
            browse_title_from_url(
                "https://www.rottentomatoes.com/browse/movies_at_home/critics:certified_fresh"
            ),
            "Movies At Home - Certified Fresh"
        );
        assert_eq!(browse_title_from_url("https://example.com/nope"), "Browse Results");
    }
}
