//! Error types shared across the workspace.

use crate::title::InvalidTitleId;
use thiserror::Error;

/// Cache store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("store connection unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("stored row for {key} is malformed: {reason}")]
    CorruptEntry { key: String, reason: String },
}

/// Remote provider errors (Wikidata resolution, Rotten Tomatoes fetches).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request to {provider} failed: {message}")]
    RequestFailed { provider: &'static str, message: String },

    #[error("{provider} returned HTTP status {status}")]
    UnexpectedStatus { provider: &'static str, status: u16 },

    #[error("invalid response from {provider}: {reason}")]
    InvalidResponse { provider: &'static str, reason: String },
}

/// Request-level batch rejections, raised before any per-title work starts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchRequestError {
    #[error("batch of {len} ids exceeds the maximum of {max}")]
    TooLarge { len: usize, max: usize },

    #[error(transparent)]
    InvalidId(#[from] InvalidTitleId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::title::TitleId;

    #[test]
    fn batch_error_reports_size() {
        let err = BatchRequestError::TooLarge { len: 51, max: 50 };
        assert_eq!(err.to_string(), "batch of 51 ids exceeds the maximum of 50");
    }

    #[test]
    fn invalid_id_passes_through() {
        let parse_err = TitleId::parse("nope").unwrap_err();
        let err = BatchRequestError::from(parse_err);
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn provider_error_names_provider() {
        let err = ProviderError::UnexpectedStatus { provider: "wikidata", status: 503 };
        assert_eq!(err.to_string(), "wikidata returned HTTP status 503");
    }
}
