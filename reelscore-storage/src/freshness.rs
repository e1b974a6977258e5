//! Cache freshness: a pure function of the entry timestamp and the clock.

use chrono::Duration;
use reelscore_core::Timestamp;

/// Whether an entry cached at `cached_at` is still fresh at `now`.
///
/// Entries exactly at the TTL boundary are stale, matching `now - cached_at
/// < ttl`. Taking `now` as a parameter keeps the check deterministic in
/// tests; call sites pass `Utc::now()`.
pub fn is_fresh(cached_at: Timestamp, now: Timestamp, ttl: Duration) -> bool {
    now.signed_duration_since(cached_at) < ttl
}
