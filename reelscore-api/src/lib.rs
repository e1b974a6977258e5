//! Reelscore API - REST Transport Layer
//!
//! Axum HTTP surface over the resolution pipeline: single-title lookup,
//! SSE batch streaming, list endpoints, API-key auth, and the Postgres
//! cache/key store.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod macros;
pub mod middleware;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use auth::{generate_api_key, validate_api_key, ApiKey, AuthConfig, KeyValidation};
pub use config::ApiConfig;
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::{auth_middleware, AuthContext, AuthExtractor, AuthState};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;
pub use types::*;
