//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use reelscore_pipeline::{Pipeline, StageLimits};
use reelscore_providers::{RtClient, WikidataClient};

use crate::auth::AuthConfig;
use crate::config::ApiConfig;
use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthState;
use crate::services::ListService;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Raw database client (cache store + API-key store).
    pub db: DbClient,
    /// The batch/single-title resolution pipeline. Holds the two stage
    /// semaphores, so remote rate budgets are global to this instance.
    pub pipeline: Pipeline,
    /// List scraping service (shares the pipeline's fetch budget).
    pub lists: Arc<ListService>,
    /// Auth middleware state.
    pub auth: AuthState,
    pub config: ApiConfig,
    pub start_time: Instant,
}

impl AppState {
    /// Wire up providers, limits, pipeline, and services.
    pub fn new(db: DbClient, config: ApiConfig, auth_config: AuthConfig) -> ApiResult<Self> {
        let limits = Arc::new(StageLimits::default());

        let wikidata = Arc::new(
            WikidataClient::new(config.request_timeout)
                .map_err(|e| ApiError::internal_error(format!("Wikidata client: {}", e)))?,
        );
        let rt = Arc::new(
            RtClient::new(config.request_timeout, config.rt_request_delay)
                .map_err(|e| ApiError::internal_error(format!("RT client: {}", e)))?,
        );

        let pipeline = Pipeline::new(
            Arc::new(db.clone()),
            wikidata,
            rt.clone(),
            Arc::clone(&limits),
            config.pipeline_config(),
        );

        let lists = Arc::new(ListService::new(
            Arc::new(db.clone()),
            rt,
            limits,
            config.cache_ttl_days,
        ));

        let auth = AuthState::new(db.clone(), auth_config);

        Ok(Self { db, pipeline, lists, auth, config, start_time: Instant::now() })
    }
}

// Use macro to reduce boilerplate for FromRef implementations
crate::impl_from_ref!(DbClient, db);
crate::impl_from_ref!(Pipeline, pipeline);
crate::impl_from_ref!(Arc<ListService>, lists);
crate::impl_from_ref!(AuthState, auth);
crate::impl_from_ref!(ApiConfig, config);
crate::impl_from_ref!(Instant, start_time);
