//! Pipeline tuning knobs.

use std::time::Duration;

/// Configuration for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum ids per batch request.
    pub max_batch_size: usize,
    /// Wall-clock budget for a whole batch run; in-flight titles are
    /// abandoned when it expires.
    pub deadline: Duration,
    /// Cache entries older than this are stale and only used as fallback.
    pub cache_ttl_days: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 50,
            deadline: Duration::from_secs(60),
            cache_ttl_days: 7,
        }
    }
}

impl PipelineConfig {
    /// The freshness TTL as a chrono duration.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.cache_ttl_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_batch_size, 50);
        assert_eq!(config.deadline, Duration::from_secs(60));
        assert_eq!(config.cache_ttl(), chrono::Duration::days(7));
    }
}
