//! List Endpoints
//!
//! - `GET /api/v1/lists/curated` - registry of curated editorial lists
//! - `GET /api/v1/lists/curated/{slug}` - one curated list, scraped on demand
//! - `GET /api/v1/lists/browse/options` - valid browse filter values
//! - `GET /api/v1/lists/browse` - browse RT by filters
//! - `GET /api/v1/list?url=` - any supported RT list URL

use axum::{
    extract::{Path, Query, State},
    Json,
};
use reelscore_core::ListResponse;
use reelscore_providers::rottentomatoes::lists::detect_url_kind;
use reelscore_providers::UrlKind;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::services::browse::{build_browse_url, validate_browse_params, BrowseParams};
use crate::services::curated::{all_curated_lists, get_curated_list};
use crate::services::{browse, ListService};
use crate::types::{BrowseOptionsResponse, CuratedListsResponse};

/// GET /api/v1/lists/curated - All known curated lists
#[utoipa::path(
    get,
    path = "/api/v1/lists/curated",
    tag = "Lists",
    responses(
        (status = 200, description = "Curated list registry", body = CuratedListsResponse),
    ),
    security(("api_key" = [])),
)]
pub async fn curated_lists() -> Json<CuratedListsResponse> {
    Json(CuratedListsResponse { lists: all_curated_lists() })
}

/// GET /api/v1/lists/curated/{slug} - Movies on one curated list
#[utoipa::path(
    get,
    path = "/api/v1/lists/curated/{slug}",
    tag = "Lists",
    params(
        ("slug" = String, Path, description = "Curated list slug (e.g. best-horror)"),
    ),
    responses(
        (status = 200, description = "List contents", body = ListResponse),
        (status = 404, description = "Unknown curated list", body = ApiError),
        (status = 502, description = "Failed to fetch the list", body = ApiError),
    ),
    security(("api_key" = [])),
)]
pub async fn curated_list_by_slug(
    State(lists): State<Arc<ListService>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ListResponse>> {
    let Some(curated) = get_curated_list(&slug) else {
        return Err(ApiError::list_not_found(format!("Unknown curated list: {}", slug)));
    };

    lists.get_list(curated.url).await.map(Json)
}

/// GET /api/v1/lists/browse/options - Valid browse filter values
#[utoipa::path(
    get,
    path = "/api/v1/lists/browse/options",
    tag = "Lists",
    responses(
        (status = 200, description = "Browse filter options", body = BrowseOptionsResponse),
    ),
    security(("api_key" = [])),
)]
pub async fn browse_options() -> Json<BrowseOptionsResponse> {
    Json(browse::browse_options())
}

/// GET /api/v1/lists/browse - Browse RT by filters
#[utoipa::path(
    get,
    path = "/api/v1/lists/browse",
    tag = "Lists",
    params(
        ("certification" = Option<String>, Query, description = "certified_fresh | fresh | rotten"),
        ("genre" = Option<String>, Query, description = "Genre filter"),
        ("affiliate" = Option<String>, Query, description = "Streaming service filter"),
        ("sort" = Option<String>, Query, description = "Sort order"),
        ("type" = Option<String>, Query, description = "Browse page type"),
        ("audience" = Option<String>, Query, description = "upright | spilled"),
    ),
    responses(
        (status = 200, description = "Browse results", body = ListResponse),
        (status = 400, description = "Invalid filter value", body = ApiError),
        (status = 502, description = "Failed to fetch the browse page", body = ApiError),
    ),
    security(("api_key" = [])),
)]
pub async fn browse_lists(
    State(lists): State<Arc<ListService>>,
    Query(params): Query<BrowseParams>,
) -> ApiResult<Json<ListResponse>> {
    validate_browse_params(&params).map_err(ApiError::invalid_input)?;

    let url = build_browse_url(&params);
    lists.get_list(&url).await.map(Json)
}

#[derive(Debug, Deserialize)]
pub struct ListByUrlQuery {
    pub url: String,
}

/// GET /api/v1/list?url= - Any supported RT list URL
#[utoipa::path(
    get,
    path = "/api/v1/list",
    tag = "Lists",
    params(
        ("url" = String, Query, description = "Editorial or browse URL on rottentomatoes.com"),
    ),
    responses(
        (status = 200, description = "List contents", body = ListResponse),
        (status = 400, description = "Unsupported URL", body = ApiError),
        (status = 502, description = "Failed to fetch the list", body = ApiError),
    ),
    security(("api_key" = [])),
)]
pub async fn list_by_url(
    State(lists): State<Arc<ListService>>,
    Query(query): Query<ListByUrlQuery>,
) -> ApiResult<Json<ListResponse>> {
    if detect_url_kind(&query.url) == UrlKind::Unknown {
        return Err(ApiError::invalid_input(format!(
            "Unsupported list URL: {}. Expected an editorial or browse page on rottentomatoes.com",
            query.url
        )));
    }

    lists.get_list(&query.url).await.map(Json)
}
