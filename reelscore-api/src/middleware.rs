//! Axum Middleware for Authentication
//!
//! Validates the `X-API-Key` header against the key store, enforces per-key
//! hourly rate limits, and injects the authenticated key into request
//! extensions:
//! - missing header or unknown/inactive key: 401
//! - key over its hourly budget: 429 with `Retry-After`
//! - otherwise the request proceeds with an `AuthContext` attached

use crate::auth::{validate_api_key, ApiKey, AuthConfig, KeyValidation};
use crate::db::DbClient;
use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::RETRY_AFTER, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

// ============================================================================
// MIDDLEWARE STATE
// ============================================================================

/// Shared state for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    pub db: DbClient,
    pub auth_config: Arc<AuthConfig>,
}

impl AuthState {
    pub fn new(db: DbClient, auth_config: AuthConfig) -> Self {
        Self { db, auth_config: Arc::new(auth_config) }
    }
}

// ============================================================================
// AUTH CONTEXT
// ============================================================================

/// The authenticated key, attached to request extensions.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub api_key: ApiKey,
}

impl AuthContext {
    /// Require admin privileges for the current request.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.api_key.is_admin {
            Ok(())
        } else {
            Err(ApiError::forbidden("Admin access required"))
        }
    }
}

/// Extractor pulling the `AuthContext` injected by the middleware.
pub struct AuthExtractor(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for AuthExtractor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthExtractor)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

// ============================================================================
// MIDDLEWARE FUNCTION
// ============================================================================

/// Authentication middleware applied to every `/api/v1` route except the
/// health endpoints.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(presented) = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
    else {
        return ApiError::unauthorized("Missing X-API-Key header").into_response();
    };

    match validate_api_key(&state.db, &state.auth_config, &presented).await {
        Ok(KeyValidation::Valid(api_key)) => {
            request.extensions_mut().insert(AuthContext { api_key });
            next.run(request).await
        }
        Ok(KeyValidation::RateLimited) => {
            let mut response = ApiError::too_many_requests().into_response();
            if let Ok(retry) = "3600".parse() {
                response.headers_mut().insert(RETRY_AFTER, retry);
            }
            response
        }
        Ok(KeyValidation::Invalid) => {
            ApiError::unauthorized("Invalid or inactive API key").into_response()
        }
        Err(err) => err.into_response(),
    }
}
