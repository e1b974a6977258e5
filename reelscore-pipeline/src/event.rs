//! Typed stream events emitted by a batch run.
//!
//! The wire order is: zero or more `movie` / `error` events in completion
//! order, then exactly one `done` event. A stream that ends without `done`
//! must be treated as incomplete by the caller.

use reelscore_core::{
    BatchSummary, FailureKind, MovieResponse, Provenance, ResolutionOutcome, TitleId,
};
use serde::Serialize;

/// One successfully resolved title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieEvent {
    #[serde(flatten)]
    pub movie: MovieResponse,
    /// How the payload was obtained: `cached`, `stale`, or `fetched`.
    pub status: Provenance,
}

/// One failed title. Failures are per-title and never abort the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    pub imdb_id: TitleId,
    pub error: FailureKind,
    pub message: String,
}

/// A single event on the batch stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchEvent {
    Movie(MovieEvent),
    Error(ErrorEvent),
    Done(BatchSummary),
}

impl BatchEvent {
    /// The SSE event name for this event.
    pub fn name(&self) -> &'static str {
        match self {
            BatchEvent::Movie(_) => "movie",
            BatchEvent::Error(_) => "error",
            BatchEvent::Done(_) => "done",
        }
    }

    /// Map a terminal resolution outcome to its stream event.
    pub fn from_outcome(outcome: ResolutionOutcome) -> Self {
        match outcome {
            ResolutionOutcome::Resolved { movie, provenance } => BatchEvent::Movie(MovieEvent {
                movie: MovieResponse::from(movie),
                status: provenance,
            }),
            ResolutionOutcome::Failed { imdb_id, kind, message } => {
                BatchEvent::Error(ErrorEvent { imdb_id, error: kind, message })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reelscore_core::{CachedMovie, MovieData, RtSlug};

    fn outcome_for(id: &str) -> ResolutionOutcome {
        let imdb_id = TitleId::parse(id).unwrap();
        let data = MovieData {
            rt_slug: RtSlug("m/the_dark_knight".to_string()),
            title: "The Dark Knight".to_string(),
            year: Some(2008),
            critic_score: Some(94),
            audience_score: Some(94),
            critic_rating: Some("certified_fresh".to_string()),
            audience_rating: Some("upright".to_string()),
            consensus: None,
        };
        ResolutionOutcome::Resolved {
            movie: CachedMovie::from_data(imdb_id, data, Utc::now()),
            provenance: Provenance::Fetched,
        }
    }

    #[test]
    fn movie_event_flattens_response_fields() {
        let event = BatchEvent::from_outcome(outcome_for("tt0468569"));
        assert_eq!(event.name(), "movie");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["imdbId"], "tt0468569");
        assert_eq!(json["status"], "fetched");
        assert_eq!(json["criticScore"], 94);
    }

    #[test]
    fn error_event_carries_kind_and_message() {
        let event = BatchEvent::Error(ErrorEvent {
            imdb_id: TitleId::parse("tt9999999").unwrap(),
            error: FailureKind::NotFound,
            message: "Movie not found in Wikidata: tt9999999".to_string(),
        });
        assert_eq!(event.name(), "error");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["imdbId"], "tt9999999");
        assert_eq!(json["error"], "not_found");
        assert!(json["message"].as_str().unwrap().contains("tt9999999"));
    }

    #[test]
    fn done_event_serializes_counters() {
        let event = BatchEvent::Done(BatchSummary { total: 3, cached: 1, fetched: 1, errors: 1 });
        assert_eq!(event.name(), "done");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["cached"], 1);
        assert_eq!(json["fetched"], 1);
        assert_eq!(json["errors"], 1);
    }
}
