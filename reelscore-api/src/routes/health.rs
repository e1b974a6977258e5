//! Health Check Endpoints
//!
//! - `/api/v1/health` - simple liveness check
//! - `/api/v1/health/ready` - database connectivity check
//!
//! No authentication required for health endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::db::DbClient;
use crate::types::HealthResponse;

/// GET /api/v1/health - Liveness check
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = HealthResponse),
    ),
)]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::healthy()))
}

/// GET /api/v1/health/ready - Readiness check (database connectivity)
#[utoipa::path(
    get,
    path = "/api/v1/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse),
    ),
)]
pub async fn readiness(State(db): State<DbClient>) -> impl IntoResponse {
    match db.health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(err) => {
            tracing::error!(error = %err, "Readiness check failed");
            let response = HealthResponse {
                status: "unhealthy".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_response_shape() {
        let response = HealthResponse::healthy();
        assert_eq!(response.status, "healthy");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
