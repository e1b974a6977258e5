//! Reelscore Core - Domain Types
//!
//! Pure data structures shared by every other crate: title identifiers,
//! movie payloads, cache entries, resolution outcomes, and error enums.
//! No I/O and no business logic beyond validation lives here.

pub mod error;
pub mod list;
pub mod movie;
pub mod outcome;
pub mod title;

pub use error::{BatchRequestError, ProviderError, StoreError};
pub use list::{CachedList, ListMovie, ListResponse, ListResult};
pub use movie::{CachedMovie, MovieData, MovieResponse, RtSlug, RT_BASE_URL};
pub use outcome::{BatchSummary, FailureKind, Provenance, ResolutionOutcome};
pub use title::{InvalidTitleId, TitleId};

/// Timestamp type used across the workspace (UTC).
pub type Timestamp = chrono::DateTime<chrono::Utc>;
