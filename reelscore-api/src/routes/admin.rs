//! Admin Endpoints - API Key Management
//!
//! All routes require an admin key (403 otherwise):
//! - `POST /api/v1/admin/keys` - create a key (full key returned once)
//! - `GET /api/v1/admin/keys` - list keys (masked)
//! - `DELETE /api/v1/admin/keys/{id}` - revoke a key; `?permanent=true`
//!   deletes the row instead

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::generate_api_key;
use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthExtractor;
use crate::types::{ApiKeyResponse, CreateKeyRequest, KeysResponse, MessageResponse};

/// POST /api/v1/admin/keys - Create a new API key
#[utoipa::path(
    post,
    path = "/api/v1/admin/keys",
    tag = "Admin",
    request_body = CreateKeyRequest,
    responses(
        (status = 200, description = "Key created; the full key is only returned here", body = ApiKeyResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 403, description = "Admin access required", body = ApiError),
    ),
    security(("api_key" = [])),
)]
pub async fn create_key(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    Json(request): Json<CreateKeyRequest>,
) -> ApiResult<Json<ApiKeyResponse>> {
    auth.require_admin()?;

    if request.name.trim().is_empty() {
        return Err(ApiError::invalid_input("name is required"));
    }
    if let Some(limit) = request.rate_limit {
        if limit <= 0 {
            return Err(ApiError::invalid_input("rateLimit must be positive"));
        }
    }

    let key = generate_api_key();
    let stored = db
        .api_key_insert(&key, request.name.trim(), request.is_admin, request.rate_limit)
        .await?;

    tracing::info!(key_id = stored.id, name = %stored.name, "API key created");
    Ok(Json(ApiKeyResponse::with_key(stored)))
}

/// GET /api/v1/admin/keys - List all API keys (masked)
#[utoipa::path(
    get,
    path = "/api/v1/admin/keys",
    tag = "Admin",
    responses(
        (status = 200, description = "All keys, masked", body = KeysResponse),
        (status = 403, description = "Admin access required", body = ApiError),
    ),
    security(("api_key" = [])),
)]
pub async fn list_keys(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
) -> ApiResult<Json<KeysResponse>> {
    auth.require_admin()?;

    let keys = db.api_key_list().await?;
    Ok(Json(KeysResponse { keys: keys.into_iter().map(ApiKeyResponse::masked).collect() }))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteKeyQuery {
    /// Delete the row instead of deactivating it.
    #[serde(default)]
    pub permanent: bool,
}

/// DELETE /api/v1/admin/keys/{id} - Revoke (or permanently delete) a key
#[utoipa::path(
    delete,
    path = "/api/v1/admin/keys/{id}",
    tag = "Admin",
    params(
        ("id" = i64, Path, description = "Key id"),
        ("permanent" = Option<bool>, Query, description = "Delete the row instead of revoking"),
    ),
    responses(
        (status = 200, description = "Key revoked or deleted", body = MessageResponse),
        (status = 403, description = "Admin access required", body = ApiError),
        (status = 404, description = "Unknown key id", body = ApiError),
    ),
    security(("api_key" = [])),
)]
pub async fn delete_key(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<i64>,
    Query(query): Query<DeleteKeyQuery>,
) -> ApiResult<Json<MessageResponse>> {
    auth.require_admin()?;

    let (found, message) = if query.permanent {
        (db.api_key_delete(id).await?, "API key deleted")
    } else {
        (db.api_key_revoke(id).await?, "API key revoked")
    };

    if !found {
        return Err(ApiError::api_key_not_found(id));
    }

    tracing::info!(key_id = id, permanent = query.permanent, "API key removed");
    Ok(Json(MessageResponse { message: message.to_string() }))
}
