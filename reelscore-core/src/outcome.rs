//! Per-title resolution outcomes and the batch summary.

use crate::movie::CachedMovie;
use crate::title::TitleId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a resolved payload was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Fresh cache hit; no remote work was done.
    Cached,
    /// Stale cache entry returned after a failed refresh attempt.
    Stale,
    /// Freshly fetched from Rotten Tomatoes and written back to the cache.
    Fetched,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Provenance::Cached => "cached",
            Provenance::Stale => "stale",
            Provenance::Fetched => "fetched",
        };
        f.write_str(s)
    }
}

/// Terminal failure kinds for a single title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The identifier does not match the IMDb id pattern.
    InvalidId,
    /// No Rotten Tomatoes locator exists for the id and no stale entry to
    /// fall back on.
    NotFound,
    /// The page fetch failed and no stale entry exists.
    ScrapeFailed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::InvalidId => "invalid_id",
            FailureKind::NotFound => "not_found",
            FailureKind::ScrapeFailed => "scrape_failed",
        };
        f.write_str(s)
    }
}

/// The terminal state of one title's resolution.
///
/// Exactly one outcome is produced per input title that reaches a terminal
/// state; outcomes are independent of each other.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Resolved {
        movie: CachedMovie,
        provenance: Provenance,
    },
    Failed {
        imdb_id: TitleId,
        kind: FailureKind,
        message: String,
    },
}

impl ResolutionOutcome {
    /// The title this outcome belongs to.
    pub fn imdb_id(&self) -> &TitleId {
        match self {
            ResolutionOutcome::Resolved { movie, .. } => &movie.imdb_id,
            ResolutionOutcome::Failed { imdb_id, .. } => imdb_id,
        }
    }
}

/// Counters reported in the terminal `done` event of a batch stream.
///
/// Tallied over outcomes actually emitted: titles abandoned at the deadline
/// never reach a counter. Stale results count toward `cached`, keeping
/// `cached + fetched + errors == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BatchSummary {
    pub total: u32,
    pub cached: u32,
    pub fetched: u32,
    pub errors: u32,
}

impl BatchSummary {
    /// Fold one emitted outcome into the counters.
    pub fn record(&mut self, outcome: &ResolutionOutcome) {
        self.total += 1;
        match outcome {
            ResolutionOutcome::Resolved {
                provenance: Provenance::Cached | Provenance::Stale,
                ..
            } => self.cached += 1,
            ResolutionOutcome::Resolved {
                provenance: Provenance::Fetched,
                ..
            } => self.fetched += 1,
            ResolutionOutcome::Failed { .. } => self.errors += 1,
        }
    }

    /// Counter arithmetic invariant: the three buckets partition the total.
    pub fn is_consistent(&self) -> bool {
        self.cached + self.fetched + self.errors == self.total
    }
}
