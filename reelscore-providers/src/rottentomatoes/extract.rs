//! Movie-page extraction.
//!
//! Pages are mined, not parsed: a JSON-LD `Movie` block is the primary
//! source (title, year, critic score), then the score-board element's
//! attributes and the critics-consensus text fill in the rest. Absent
//! fields stay `None`.

use once_cell::sync::Lazy;
use reelscore_core::{MovieData, RtSlug};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

static JSON_LD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<script[^>]*type="application/ld\+json"[^>]*>(.*?)</script>"#)
        .expect("hard-coded pattern compiles")
});

static SCORE_BOARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:media-scorecard|score-board)\b[^>]*>").expect("hard-coded pattern compiles")
});

static ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([a-zA-Z-]+)="([^"]*)""#).expect("hard-coded pattern compiles"));

static TITLE_H1_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<h1[^>]*data-qa="score-panel-title"[^>]*>(.*?)</h1>"#)
        .expect("hard-coded pattern compiles")
});

static SUBTITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<span[^>]*data-qa="score-panel-subtitle"[^>]*>(.*?)</span>"#)
        .expect("hard-coded pattern compiles")
});

static CRITICS_BUTTON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<rt-button[^>]*slot="criticsScore"[^>]*>(.*?)</rt-button>"#)
        .expect("hard-coded pattern compiles")
});

static AUDIENCE_BUTTON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<rt-button[^>]*slot="audienceScore"[^>]*>(.*?)</rt-button>"#)
        .expect("hard-coded pattern compiles")
});

static CONSENSUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<(?:span|p)[^>]*data-qa="critics-consensus"[^>]*>(.*?)</(?:span|p)>"#)
        .expect("hard-coded pattern compiles")
});

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("hard-coded pattern compiles"));

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("hard-coded pattern compiles"));

/// Extract a movie record from a page.
///
/// Returns `None` when the page yields neither a title nor any score.
pub fn extract_movie(html: &str, slug: &RtSlug) -> Option<MovieData> {
    let mut data = parse_json_ld(html, slug).unwrap_or_else(|| parse_title_block(html, slug));
    enrich_from_score_board(html, &mut data);

    if data.title.is_empty() && data.critic_score.is_none() && data.audience_score.is_none() {
        return None;
    }
    Some(data)
}

/// JSON-LD structured data is the most reliable source when present.
fn parse_json_ld(html: &str, slug: &RtSlug) -> Option<MovieData> {
    for cap in JSON_LD_RE.captures_iter(html) {
        let Ok(value) = serde_json::from_str::<Value>(cap[1].trim()) else {
            continue;
        };

        let movie = if let Value::Array(items) = &value {
            items.iter().find(|d| is_movie(d)).cloned()
        } else if is_movie(&value) {
            Some(value)
        } else {
            None
        };

        if let Some(movie) = movie {
            let rating = movie.get("aggregateRating");
            return Some(MovieData {
                rt_slug: slug.clone(),
                title: movie
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                year: movie
                    .get("datePublished")
                    .and_then(Value::as_str)
                    .and_then(extract_year),
                critic_score: rating
                    .and_then(|r| r.get("ratingValue"))
                    .and_then(safe_int),
                audience_score: None,
                critic_rating: None,
                audience_rating: None,
                consensus: None,
            });
        }
    }
    None
}

fn is_movie(value: &Value) -> bool {
    value.get("@type").and_then(Value::as_str) == Some("Movie")
}

/// Fallback when no JSON-LD block exists: title and year from the score
/// panel heading.
fn parse_title_block(html: &str, slug: &RtSlug) -> MovieData {
    let title = TITLE_H1_RE
        .captures(html)
        .map(|c| strip_tags(&c[1]))
        .unwrap_or_default();
    let year = SUBTITLE_RE
        .captures(html)
        .and_then(|c| extract_year(&strip_tags(&c[1])));

    MovieData {
        rt_slug: slug.clone(),
        title,
        year,
        critic_score: None,
        audience_score: None,
        critic_rating: None,
        audience_rating: None,
        consensus: None,
    }
}

/// Fill missing fields from the score-board element and consensus text.
fn enrich_from_score_board(html: &str, data: &mut MovieData) {
    if let Some(tag) = SCORE_BOARD_RE.find(html) {
        let attrs = tag_attrs(tag.as_str());

        if data.critic_score.is_none() {
            data.critic_score = attrs.get("tomatometerscore").and_then(|v| parse_score(v));
        }
        if data.audience_score.is_none() {
            data.audience_score = attrs.get("audiencescore").and_then(|v| parse_score(v));
        }
        if data.critic_rating.is_none() {
            data.critic_rating = attrs
                .get("tomatometerstate")
                .filter(|v| !v.is_empty())
                .map(|v| v.to_lowercase().replace('-', "_"));
        }
        if data.audience_rating.is_none() {
            data.audience_rating = attrs
                .get("audiencestate")
                .filter(|v| !v.is_empty())
                .map(|v| v.to_lowercase());
        }
    }

    // Newer page layouts expose the scores as slotted buttons instead.
    if data.critic_score.is_none() {
        data.critic_score = CRITICS_BUTTON_RE
            .captures(html)
            .and_then(|c| parse_score(&strip_tags(&c[1])));
    }
    if data.audience_score.is_none() {
        data.audience_score = AUDIENCE_BUTTON_RE
            .captures(html)
            .and_then(|c| parse_score(&strip_tags(&c[1])));
    }

    if data.consensus.is_none() {
        data.consensus = CONSENSUS_RE
            .captures(html)
            .map(|c| strip_tags(&c[1]))
            .filter(|s| !s.is_empty());
    }
}

fn tag_attrs(tag: &str) -> HashMap<String, String> {
    ATTR_RE
        .captures_iter(tag)
        .map(|c| (c[1].to_lowercase(), c[2].to_string()))
        .collect()
}

pub(crate) fn strip_tags(fragment: &str) -> String {
    TAG_RE.replace_all(fragment, "").trim().to_string()
}

pub(crate) fn extract_year(text: &str) -> Option<i32> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Parse a score like `94` or `"94%"`.
fn parse_score(raw: &str) -> Option<i32> {
    let cleaned = raw.replace('%', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().map(|v| v as i32)
}

fn safe_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as i32),
        Value::String(s) => parse_score(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug() -> RtSlug {
        RtSlug("m/the_dark_knight".to_string())
    }

    const JSON_LD_PAGE: &str = r#"
        <html><head>
        <script type="application/ld+json">
        {"@type": "Movie", "name": "The Dark Knight", "datePublished": "2008-07-18",
         "aggregateRating": {"ratingValue": "94"}}
        </script>
        </head><body>
        <media-scorecard audiencescore="94" tomatometerscore="94"
            tomatometerstate="certified-fresh" audiencestate="upright"></media-scorecard>
        <span data-qa="critics-consensus">Dark, complex, and unforgettable.</span>
        </body></html>
    "#;

    #[test]
    fn extracts_from_json_ld_and_score_board() {
        let data = extract_movie(JSON_LD_PAGE, &slug()).unwrap();

        assert_eq!(data.title, "The Dark Knight");
        assert_eq!(data.year, Some(2008));
        assert_eq!(data.critic_score, Some(94));
        assert_eq!(data.audience_score, Some(94));
        assert_eq!(data.critic_rating.as_deref(), Some("certified_fresh"));
        assert_eq!(data.audience_rating.as_deref(), Some("upright"));
        assert_eq!(data.consensus.as_deref(), Some("Dark, complex, and unforgettable."));
    }

    #[test]
    fn extracts_from_json_ld_array() {
        let page = r#"
            <script type="application/ld+json">
            [{"@type": "Organization"}, {"@type": "Movie", "name": "Get Out", "datePublished": "2017"}]
            </script>
        "#;
        let data = extract_movie(page, &slug()).unwrap();
        assert_eq!(data.title, "Get Out");
        assert_eq!(data.year, Some(2017));
    }

    #[test]
    fn falls_back_to_title_heading() {
        let page = r#"
            <h1 data-qa="score-panel-title">Some Film</h1>
            <span data-qa="score-panel-subtitle">1999, Drama</span>
        "#;
        let data = extract_movie(page, &slug()).unwrap();
        assert_eq!(data.title, "Some Film");
        assert_eq!(data.year, Some(1999));
        assert_eq!(data.critic_score, None);
    }

    #[test]
    fn reads_scores_from_slotted_buttons() {
        let page = r#"
            <h1 data-qa="score-panel-title">Some Film</h1>
            <rt-button slot="criticsScore">87%</rt-button>
            <rt-button slot="audienceScore"><span>91%</span></rt-button>
        "#;
        let data = extract_movie(page, &slug()).unwrap();
        assert_eq!(data.critic_score, Some(87));
        assert_eq!(data.audience_score, Some(91));
    }

    #[test]
    fn unusable_page_yields_none() {
        assert!(extract_movie("<html><body>nothing here</body></html>", &slug()).is_none());
    }

    #[test]
    fn ignores_malformed_json_ld() {
        let page = r#"
            <script type="application/ld+json">{not json}</script>
            <h1 data-qa="score-panel-title">Recovered</h1>
        "#;
        let data = extract_movie(page, &slug()).unwrap();
        assert_eq!(data.title, "Recovered");
    }

    #[test]
    fn score_parsing_handles_percent_strings() {
        assert_eq!(parse_score("94%"), Some(94));
        assert_eq!(parse_score(" 94 "), Some(94));
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("n/a"), None);
    }
}
