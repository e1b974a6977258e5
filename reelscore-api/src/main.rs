//! Reelscore API Server Entry Point
//!
//! Bootstraps configuration, initializes the database schema, and starts
//! the Axum HTTP server.

use std::net::SocketAddr;

use axum::Router;
use reelscore_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, AuthConfig, DbClient, DbConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    reelscore_api::telemetry::init_tracing();

    let db_config = DbConfig::from_env();
    let db = DbClient::from_config(&db_config)?;
    db.init_schema().await?;

    let api_config = ApiConfig::from_env();
    let auth_config = AuthConfig::from_env();

    let state = AppState::new(db, api_config, auth_config)?;
    let app: Router = create_api_router(state);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting Reelscore API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("REELSCORE_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("REELSCORE_API_PORT").ok())
        .unwrap_or_else(|| "8000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
