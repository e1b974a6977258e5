//! Request-level batch validation.

use reelscore_core::{BatchRequestError, TitleId};

/// Validate a raw batch before any cache or network work.
///
/// All-or-nothing: an oversized batch, or the first malformed id, rejects
/// the whole request. Duplicates are permitted and preserved; an empty
/// batch is valid and produces an empty list.
pub fn validate_batch(raw: &[String], max: usize) -> Result<Vec<TitleId>, BatchRequestError> {
    if raw.len() > max {
        return Err(BatchRequestError::TooLarge { len: raw.len(), max });
    }

    raw.iter()
        .map(|s| TitleId::parse(s).map_err(BatchRequestError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("tt{:07}", i)).collect()
    }

    #[test]
    fn accepts_full_batch_at_cap() {
        let validated = validate_batch(&ids(50), 50).unwrap();
        assert_eq!(validated.len(), 50);
    }

    #[test]
    fn rejects_batch_over_cap() {
        let err = validate_batch(&ids(51), 50).unwrap_err();
        assert!(matches!(err, BatchRequestError::TooLarge { len: 51, max: 50 }));
    }

    #[test]
    fn accepts_empty_batch() {
        let validated = validate_batch(&[], 50).unwrap();
        assert!(validated.is_empty());
    }

    #[test]
    fn first_malformed_id_rejects_whole_request() {
        let raw = vec![
            "tt0468569".to_string(),
            "bogus".to_string(),
            "tt0111161".to_string(),
        ];
        let err = validate_batch(&raw, 50).unwrap_err();
        match err {
            BatchRequestError::InvalidId(inner) => assert_eq!(inner.0, "bogus"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicates_are_preserved() {
        let raw = vec!["tt0468569".to_string(), "tt0468569".to_string()];
        let validated = validate_batch(&raw, 50).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[0], validated[1]);
    }

    #[test]
    fn size_check_runs_before_syntax_check() {
        let mut raw = vec!["bogus".to_string()];
        raw.extend(ids(50));
        let err = validate_batch(&raw, 50).unwrap_err();
        assert!(matches!(err, BatchRequestError::TooLarge { .. }));
    }

    proptest! {
        #[test]
        fn well_formed_batches_validate(n in 0usize..=50) {
            prop_assert!(validate_batch(&ids(n), 50).is_ok());
        }
    }
}
