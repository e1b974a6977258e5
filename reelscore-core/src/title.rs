//! IMDb title identifiers and their syntactic validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// IMDb id pattern: `tt` followed by 7-8 digits.
static TITLE_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^tt[0-9]{7,8}$").expect("hard-coded pattern compiles"));

/// A syntactically valid IMDb title identifier (e.g. `tt0468569`).
///
/// Construction always goes through [`TitleId::parse`], so holding a
/// `TitleId` is proof the id matched the pattern. Input is ASCII-lowercased
/// before matching, mirroring the service's public contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct TitleId(String);

impl TitleId {
    /// Parse a raw string into a validated title id.
    ///
    /// # Errors
    /// Returns [`InvalidTitleId`] when the (lowercased) input does not match
    /// `tt` + 7-8 digits.
    pub fn parse(raw: &str) -> Result<Self, InvalidTitleId> {
        let normalized = raw.trim().to_ascii_lowercase();
        if TITLE_ID_PATTERN.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(InvalidTitleId(raw.to_string()))
        }
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TitleId {
    type Err = InvalidTitleId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TitleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Rejection for an identifier that does not match the IMDb id pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid IMDb id format: {0}. Expected format: tt0000000")]
pub struct InvalidTitleId(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_seven_and_eight_digit_ids() {
        assert!(TitleId::parse("tt0468569").is_ok());
        assert!(TitleId::parse("tt12345678").is_ok());
    }

    #[test]
    fn lowercases_input() {
        let id = TitleId::parse("TT0468569").unwrap();
        assert_eq!(id.as_str(), "tt0468569");
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in ["", "0468569", "tt123456", "tt123456789", "tt04685a9", "nm0000001"] {
            assert!(TitleId::parse(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn error_carries_original_input() {
        let err = TitleId::parse("BOGUS").unwrap_err();
        assert_eq!(err.0, "BOGUS");
        assert!(err.to_string().contains("BOGUS"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TitleId::parse("tt0111161").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"tt0111161\"");
    }

    proptest! {
        #[test]
        fn any_numeric_suffix_of_valid_length_parses(n in 0u32..100_000_000u32, eight in proptest::bool::ANY) {
            let raw = if eight {
                format!("tt{:08}", n)
            } else {
                format!("tt{:07}", n % 10_000_000)
            };
            prop_assert!(TitleId::parse(&raw).is_ok());
        }

        #[test]
        fn suffixes_of_wrong_length_fail(n in 0u32..1_000_000u32) {
            let raw = format!("tt{:06}", n);
            prop_assert!(TitleId::parse(&raw).is_err());
        }
    }
}
