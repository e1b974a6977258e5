//! REST API Routes Module
//!
//! Route handlers organized by concern:
//! - Movie lookup and batch SSE streaming
//! - Curated / browse list endpoints
//! - API-key administration
//! - Health checks (no auth)
//! - CORS support for browser-based clients

pub mod admin;
pub mod health;
pub mod list;
pub mod movie;

use axum::{
    http::{header, header::HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::middleware::auth_middleware;
use crate::state::AppState;
use crate::types::InfoResponse;

#[cfg(feature = "openapi")]
use crate::openapi::ApiDoc;
#[cfg(feature = "openapi")]
use utoipa::OpenApi;

// ============================================================================
// ROOT / OPENAPI HANDLERS
// ============================================================================

/// GET / - API info document.
async fn root_info() -> impl IntoResponse {
    Json(InfoResponse {
        name: "Reelscore API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/swagger-ui".to_string(),
        health: "/api/v1/health".to_string(),
    })
}

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Build the complete application router.
///
/// Health endpoints are public; everything else under `/api/v1` goes
/// through the API-key middleware.
pub fn create_api_router(state: AppState) -> Router {
    let authed = Router::new()
        .route("/movie/:imdb_id", get(movie::get_movie))
        .route("/movies/batch", post(movie::batch_movies))
        .route("/lists/curated", get(list::curated_lists))
        .route("/lists/curated/:slug", get(list::curated_list_by_slug))
        .route("/lists/browse/options", get(list::browse_options))
        .route("/lists/browse", get(list::browse_lists))
        .route("/list", get(list::list_by_url))
        .route("/admin/keys", post(admin::create_key).get(admin::list_keys))
        .route("/admin/keys/:id", delete(admin::delete_key))
        .layer(from_fn_with_state(state.auth.clone(), auth_middleware));

    let api_v1 = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(authed);

    let mut router = Router::new().route("/", get(root_info)).nest("/api/v1", api_v1);

    #[cfg(feature = "openapi")]
    {
        router = router.route("/openapi.json", get(openapi_json));
    }

    #[cfg(feature = "swagger-ui")]
    {
        use utoipa_swagger_ui::SwaggerUi;
        router = router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()));
    }

    let cors = build_cors_layer(&state.config);

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// Empty origins (dev mode) allows all; otherwise only the configured
/// origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-api-key"),
        ]);

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!("CORS: allowing origins: {:?}", config.cors_origins);
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}
