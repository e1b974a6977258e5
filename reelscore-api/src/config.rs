//! API Configuration Module
//!
//! Configuration for CORS, remote-request pacing, and cache/batch tuning.
//! Loaded from environment variables with sensible defaults for
//! development.

use reelscore_pipeline::PipelineConfig;
use std::time::Duration;

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    // ========================================================================
    // Remote request pacing
    // ========================================================================
    /// Per-request timeout for remote calls (Wikidata, Rotten Tomatoes).
    pub request_timeout: Duration,

    /// Polite delay after each Rotten Tomatoes request.
    pub rt_request_delay: Duration,

    // ========================================================================
    // Cache / batch tuning
    // ========================================================================
    /// Cache freshness TTL in days.
    pub cache_ttl_days: i64,

    /// Maximum ids per batch request.
    pub max_batch_size: usize,

    /// Wall-clock budget for one batch run.
    pub batch_deadline: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            request_timeout: Duration::from_secs(30),
            rt_request_delay: Duration::from_secs(1),
            cache_ttl_days: 7,
            max_batch_size: 50,
            batch_deadline: Duration::from_secs(60),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `REELSCORE_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `REELSCORE_REQUEST_TIMEOUT_SECS`: Remote request timeout (default: 30)
    /// - `REELSCORE_RT_REQUEST_DELAY_MS`: Delay between RT requests (default: 1000)
    /// - `REELSCORE_CACHE_TTL_DAYS`: Cache freshness TTL (default: 7)
    /// - `REELSCORE_MAX_BATCH_SIZE`: Batch size cap (default: 50)
    /// - `REELSCORE_BATCH_DEADLINE_SECS`: Batch wall-clock budget (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_origins = std::env::var("REELSCORE_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let request_timeout = env_u64("REELSCORE_REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let rt_request_delay = env_u64("REELSCORE_RT_REQUEST_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.rt_request_delay);

        let cache_ttl_days = std::env::var("REELSCORE_CACHE_TTL_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cache_ttl_days);

        let max_batch_size = std::env::var("REELSCORE_MAX_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_batch_size);

        let batch_deadline = env_u64("REELSCORE_BATCH_DEADLINE_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.batch_deadline);

        Self {
            cors_origins,
            request_timeout,
            rt_request_delay,
            cache_ttl_days,
            max_batch_size,
            batch_deadline,
        }
    }

    /// The pipeline knobs carried by this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_batch_size: self.max_batch_size,
            deadline: self.batch_deadline,
            cache_ttl_days: self.cache_ttl_days,
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.rt_request_delay, Duration::from_secs(1));
        assert_eq!(config.cache_ttl_days, 7);
        assert_eq!(config.max_batch_size, 50);
        assert_eq!(config.batch_deadline, Duration::from_secs(60));
    }

    #[test]
    fn test_pipeline_config_carries_tuning() {
        let config = ApiConfig { cache_ttl_days: 3, max_batch_size: 10, ..ApiConfig::default() };
        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.cache_ttl_days, 3);
        assert_eq!(pipeline.max_batch_size, 10);
        assert_eq!(pipeline.deadline, Duration::from_secs(60));
    }
}
