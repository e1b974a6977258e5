//! Request and response types for the REST API.
//!
//! Wire types use camelCase field names, matching the service's public
//! JSON contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{mask_key, ApiKey};

// ============================================================================
// BATCH TYPES
// ============================================================================

/// Request body for `POST /api/v1/movies/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    /// IMDb ids to resolve, at most 50. Duplicates are permitted.
    pub imdb_ids: Vec<String>,
}

// ============================================================================
// HEALTH / INFO TYPES
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Root endpoint info document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub docs: String,
    pub health: String,
}

/// Generic message response (e.g. key revocation confirmations).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// ADMIN / API KEY TYPES
// ============================================================================

/// Request body for `POST /api/v1/admin/keys`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyRequest {
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Hourly request budget; the configured default applies when absent.
    #[serde(default)]
    pub rate_limit: Option<i32>,
}

/// An API key on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub is_admin: bool,
    pub rate_limit: Option<i32>,
    pub requests_count: i32,
    pub requests_reset_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ApiKeyResponse {
    /// Full representation, including the key itself. Only returned once,
    /// at creation time.
    pub fn with_key(key: ApiKey) -> Self {
        Self {
            id: key.id,
            key: key.key,
            name: key.name,
            is_admin: key.is_admin,
            rate_limit: key.rate_limit,
            requests_count: key.requests_count,
            requests_reset_at: key.requests_reset_at,
            is_active: key.is_active,
            created_at: key.created_at,
        }
    }

    /// Listing representation with the key masked to `first8...last4`.
    pub fn masked(key: ApiKey) -> Self {
        let masked = mask_key(&key.key);
        Self { key: masked, ..Self::with_key(key) }
    }
}

/// Response body for `GET /api/v1/admin/keys`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct KeysResponse {
    pub keys: Vec<ApiKeyResponse>,
}

// ============================================================================
// LIST TYPES
// ============================================================================

/// One entry in the curated-list registry, as listed on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CuratedListInfo {
    pub slug: String,
    pub title: String,
    pub description: String,
}

/// Response body for `GET /api/v1/lists/curated`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CuratedListsResponse {
    pub lists: Vec<CuratedListInfo>,
}

/// Response body for `GET /api/v1/lists/browse/options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BrowseOptionsResponse {
    pub certifications: Vec<String>,
    pub genres: Vec<String>,
    pub affiliates: Vec<String>,
    pub sorts: Vec<String>,
    pub types: Vec<String>,
    pub audience_ratings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_request_uses_imdb_ids_key() {
        let request: BatchRequest =
            serde_json::from_str(r#"{"imdbIds": ["tt0468569", "tt0111161"]}"#).unwrap();
        assert_eq!(request.imdb_ids.len(), 2);
    }

    #[test]
    fn create_key_request_defaults() {
        let request: CreateKeyRequest = serde_json::from_str(r#"{"name": "New Key"}"#).unwrap();
        assert_eq!(request.name, "New Key");
        assert!(!request.is_admin);
        assert!(request.rate_limit.is_none());
    }

    #[test]
    fn api_key_response_masks_key_in_listings() {
        let key = ApiKey {
            id: 1,
            key: "abcdefgh0123456789deadbeefdeadbeefdeadbeefdeadbeefdeadbeef9999".to_string(),
            name: "Test".to_string(),
            is_admin: false,
            rate_limit: Some(500),
            requests_count: 0,
            requests_reset_at: Utc::now(),
            is_active: true,
            created_at: Utc::now(),
        };

        let masked = ApiKeyResponse::masked(key.clone());
        assert!(masked.key.starts_with("abcdefgh"));
        assert!(masked.key.contains("..."));
        assert!(masked.key.ends_with("9999"));

        let full = ApiKeyResponse::with_key(key);
        assert!(!full.key.contains("..."));
    }

    #[test]
    fn health_response_shape() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"version\""));
    }
}
