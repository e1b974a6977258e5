//! OpenAPI documentation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ApiError, ErrorCode};
use crate::types::{
    ApiKeyResponse, BatchRequest, BrowseOptionsResponse, CreateKeyRequest, CuratedListInfo,
    CuratedListsResponse, HealthResponse, InfoResponse, KeysResponse, MessageResponse,
};
use reelscore_core::{BatchSummary, FailureKind, ListMovie, ListResponse, MovieResponse, Provenance};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelscore API",
        description = "A personal API for fetching Rotten Tomatoes movie data",
    ),
    paths(
        crate::routes::health::health,
        crate::routes::health::readiness,
        crate::routes::movie::get_movie,
        crate::routes::movie::batch_movies,
        crate::routes::list::curated_lists,
        crate::routes::list::curated_list_by_slug,
        crate::routes::list::browse_options,
        crate::routes::list::browse_lists,
        crate::routes::list::list_by_url,
        crate::routes::admin::create_key,
        crate::routes::admin::list_keys,
        crate::routes::admin::delete_key,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        ApiKeyResponse,
        BatchRequest,
        BatchSummary,
        BrowseOptionsResponse,
        CreateKeyRequest,
        CuratedListInfo,
        CuratedListsResponse,
        FailureKind,
        HealthResponse,
        InfoResponse,
        KeysResponse,
        ListMovie,
        ListResponse,
        MessageResponse,
        MovieResponse,
        Provenance,
    )),
    modifiers(&ApiKeySecurity),
    tags(
        (name = "Movies", description = "Single-title lookup and batch streaming"),
        (name = "Lists", description = "Curated and browse lists"),
        (name = "Admin", description = "API key management"),
        (name = "Health", description = "Health checks"),
    )
)]
pub struct ApiDoc;

/// Registers the `X-API-Key` header scheme.
struct ApiKeySecurity;

impl Modify for ApiKeySecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}
