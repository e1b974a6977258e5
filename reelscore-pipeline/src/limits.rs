//! Stage concurrency limits.
//!
//! The two remote dependencies have distinct rate budgets, so each stage is
//! gated by its own counting semaphore. The budgets are global per
//! deployment instance, not per request: one `StageLimits` is created at
//! startup and shared by every batch and single-title resolution.

use tokio::sync::Semaphore;

/// Permits for concurrent Wikidata resolutions.
pub const RESOLVE_CONCURRENCY: usize = 5;

/// Permits for concurrent Rotten Tomatoes page fetches.
pub const FETCH_CONCURRENCY: usize = 2;

/// The two independent stage semaphores. A stall in one never consumes
/// permits from the other.
#[derive(Debug)]
pub struct StageLimits {
    pub resolve: Semaphore,
    pub fetch: Semaphore,
}

impl StageLimits {
    pub fn new(resolve_permits: usize, fetch_permits: usize) -> Self {
        Self {
            resolve: Semaphore::new(resolve_permits),
            fetch: Semaphore::new(fetch_permits),
        }
    }
}

impl Default for StageLimits {
    fn default() -> Self {
        Self::new(RESOLVE_CONCURRENCY, FETCH_CONCURRENCY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_permit_counts() {
        let limits = StageLimits::default();
        assert_eq!(limits.resolve.available_permits(), RESOLVE_CONCURRENCY);
        assert_eq!(limits.fetch.available_permits(), FETCH_CONCURRENCY);
    }

    #[tokio::test]
    async fn stages_are_independent() {
        let limits = StageLimits::new(1, 1);
        // Exhausting the resolve stage leaves the fetch stage untouched.
        let _resolve_permit = limits.resolve.acquire().await.unwrap();
        assert_eq!(limits.resolve.available_permits(), 0);
        assert_eq!(limits.fetch.available_permits(), 1);
    }
}
