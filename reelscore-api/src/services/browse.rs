//! Browse filter options for Rotten Tomatoes browse pages.

use crate::types::BrowseOptionsResponse;
use reelscore_core::RT_BASE_URL;
use serde::Deserialize;

// Valid filter values - these map to RT's URL parameters.
pub const CERTIFICATIONS: &[&str] = &["certified_fresh", "fresh", "rotten"];

pub const GENRES: &[&str] = &[
    "action",
    "adventure",
    "animation",
    "anime",
    "biography",
    "comedy",
    "crime",
    "documentary",
    "drama",
    "fantasy",
    "history",
    "horror",
    "music",
    "mystery",
    "romance",
    "sci_fi",
    "sport",
    "thriller",
    "war",
    "western",
];

pub const AFFILIATES: &[&str] = &[
    "netflix",
    "amazon_prime",
    "hulu",
    "max",
    "disney_plus",
    "paramount_plus",
    "apple_tv_plus",
    "peacock",
];

pub const SORTS: &[&str] = &[
    "popular",
    "newest",
    "a_z",
    "critic_highest",
    "critic_lowest",
    "audience_highest",
    "audience_lowest",
];

pub const TYPES: &[&str] = &["movies_at_home", "movies_in_theaters", "movies_coming_soon"];

pub const AUDIENCE_RATINGS: &[&str] = &["upright", "spilled"];

/// Query parameters accepted by the browse endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseParams {
    pub certification: Option<String>,
    pub genre: Option<String>,
    pub affiliate: Option<String>,
    pub sort: Option<String>,
    #[serde(rename = "type")]
    pub browse_type: Option<String>,
    pub audience: Option<String>,
}

/// All available browse filter options.
pub fn browse_options() -> BrowseOptionsResponse {
    let owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
    BrowseOptionsResponse {
        certifications: owned(CERTIFICATIONS),
        genres: owned(GENRES),
        affiliates: owned(AFFILIATES),
        sorts: owned(SORTS),
        types: owned(TYPES),
        audience_ratings: owned(AUDIENCE_RATINGS),
    }
}

/// Validate browse parameters against the known filter values.
///
/// Returns the first offending parameter as an error message.
pub fn validate_browse_params(params: &BrowseParams) -> Result<(), String> {
    check("certification", params.certification.as_deref(), CERTIFICATIONS)?;
    check("genre", params.genre.as_deref(), GENRES)?;
    check("affiliate", params.affiliate.as_deref(), AFFILIATES)?;
    check("sort", params.sort.as_deref(), SORTS)?;
    check("type", params.browse_type.as_deref(), TYPES)?;
    check("audience", params.audience.as_deref(), AUDIENCE_RATINGS)?;
    Ok(())
}

fn check(name: &str, value: Option<&str>, valid: &[&str]) -> Result<(), String> {
    match value {
        Some(v) if !valid.contains(&v) => {
            Err(format!("Invalid {}: {}. Valid: {:?}", name, v, valid))
        }
        _ => Ok(()),
    }
}

/// Build an RT browse URL from filter parameters.
///
/// Example output:
/// `https://www.rottentomatoes.com/browse/movies_at_home/critics:certified_fresh/genres:horror/sort:popular`
pub fn build_browse_url(params: &BrowseParams) -> String {
    let browse_type = params.browse_type.as_deref().unwrap_or("movies_at_home");
    let base = format!("{}/browse/{}", RT_BASE_URL, browse_type);

    let mut filters = Vec::new();
    if let Some(certification) = &params.certification {
        filters.push(format!("critics:{}", certification));
    }
    if let Some(audience) = &params.audience {
        filters.push(format!("audience:{}", audience));
    }
    if let Some(genre) = &params.genre {
        filters.push(format!("genres:{}", genre));
    }
    if let Some(affiliate) = &params.affiliate {
        filters.push(format!("affiliates:{}", affiliate));
    }
    if let Some(sort) = &params.sort {
        filters.push(format!("sort:{}", sort));
    }

    if filters.is_empty() {
        base
    } else {
        format!("{}/{}", base, filters.join("/"))
    }
}
