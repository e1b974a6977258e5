//! Authentication Module
//!
//! API-key authentication with per-key hourly rate limiting. Keys live in
//! the `api_keys` table; an additional admin key may be supplied through
//! the environment and is never rate limited.

use crate::db::DbClient;
use crate::error::ApiResult;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};

/// Length of a generated key in hex characters.
const KEY_LENGTH: usize = 64;

/// Rate-limit window length.
fn window() -> Duration {
    Duration::hours(1)
}

// ============================================================================
// TYPES
// ============================================================================

/// An API key row.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiKey {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub is_admin: bool,
    /// Hourly request budget; `None` falls back to the configured default.
    pub rate_limit: Option<i32>,
    pub requests_count: i32,
    pub requests_reset_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Synthetic admin key backed by the environment, not the database.
    fn env_admin(key: &str) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            key: key.to_string(),
            name: "Admin (ENV)".to_string(),
            is_admin: true,
            rate_limit: None,
            requests_count: 0,
            requests_reset_at: now,
            is_active: true,
            created_at: now,
        }
    }
}

/// Outcome of validating a presented key.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValidation {
    /// Key is valid and within budget; usage has been counted.
    Valid(ApiKey),
    /// Key is valid but exhausted its hourly budget.
    RateLimited,
    /// Key is unknown or inactive.
    Invalid,
}

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Admin key from the environment; bypasses the database entirely.
    pub admin_api_key: Option<SecretString>,
    /// Hourly budget for keys without an explicit limit.
    pub default_rate_limit: i32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { admin_api_key: None, default_rate_limit: 500 }
    }
}

impl AuthConfig {
    /// Load from `REELSCORE_ADMIN_API_KEY` and
    /// `REELSCORE_DEFAULT_RATE_LIMIT`.
    pub fn from_env() -> Self {
        let admin_api_key = std::env::var("REELSCORE_ADMIN_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(SecretString::from);

        let default_rate_limit = std::env::var("REELSCORE_DEFAULT_RATE_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(500);

        Self { admin_api_key, default_rate_limit }
    }
}

// ============================================================================
// KEY GENERATION / MASKING
// ============================================================================

/// Generate a secure random API key (64 hex characters).
pub fn generate_api_key() -> String {
    const CHARSET: &[u8] = b"0123456789abcdef";

    let mut rng = rand::rng();
    (0..KEY_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Mask a key for listings: `first8...last4`.
pub fn mask_key(key: &str) -> String {
    if key.len() <= 12 {
        return "...".to_string();
    }
    format!("{}...{}", &key[..8], &key[key.len() - 4..])
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate a presented API key and account for its usage.
///
/// The environment admin key short-circuits the database. For database
/// keys: inactive or unknown keys are `Invalid`; admin keys skip rate
/// limiting; otherwise the hourly window is reset when lapsed, and the
/// request is counted against the key's budget.
pub async fn validate_api_key(
    db: &DbClient,
    config: &AuthConfig,
    presented: &str,
) -> ApiResult<KeyValidation> {
    if let Some(admin_key) = &config.admin_api_key {
        if presented == admin_key.expose_secret() {
            return Ok(KeyValidation::Valid(ApiKey::env_admin(presented)));
        }
    }

    let Some(mut api_key) = db.api_key_find(presented).await? else {
        return Ok(KeyValidation::Invalid);
    };

    if api_key.is_admin {
        return Ok(KeyValidation::Valid(api_key));
    }

    let now = Utc::now();
    let rate_limit = api_key.rate_limit.unwrap_or(config.default_rate_limit);

    if now >= api_key.requests_reset_at {
        // Window lapsed: start a fresh one with this request counted.
        let reset_at = now + window();
        db.api_key_start_window(api_key.id, reset_at).await?;
        api_key.requests_count = 1;
        api_key.requests_reset_at = reset_at;
        return Ok(KeyValidation::Valid(api_key));
    }

    if api_key.requests_count >= rate_limit {
        tracing::warn!(key_id = api_key.id, "API key over its hourly budget");
        return Ok(KeyValidation::RateLimited);
    }

    db.api_key_increment(api_key.id).await?;
    api_key.requests_count += 1;
    Ok(KeyValidation::Valid(api_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_hex_and_unique() {
        let a = generate_api_key();
        let b = generate_api_key();

        assert_eq!(a.len(), KEY_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn mask_key_keeps_ends_only() {
        let masked = mask_key("abcdefgh-middle-part-9999");
        assert_eq!(masked, "abcdefgh...9999");
    }

    #[test]
    fn mask_key_handles_short_keys() {
        assert_eq!(mask_key("short"), "...");
    }

    #[test]
    fn env_admin_key_is_admin_and_unlimited() {
        let key = ApiKey::env_admin("secret");
        assert!(key.is_admin);
        assert!(key.rate_limit.is_none());
        assert_eq!(key.id, 0);
    }

    #[test]
    fn default_rate_limit() {
        assert_eq!(AuthConfig::default().default_rate_limit, 500);
    }
}
