//! Movie Endpoints
//!
//! - `GET /api/v1/movie/{imdb_id}` - single-title lookup
//! - `POST /api/v1/movies/batch` - batch resolution streamed over SSE
//!
//! The batch response is a `text/event-stream` of `movie` and `error`
//! events in completion order, closed by exactly one `done` summary event.
//! A stream that ends without `done` is incomplete and must not be trusted
//! by the caller.

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use reelscore_core::{FailureKind, MovieResponse, ResolutionOutcome, TitleId};
use reelscore_pipeline::Pipeline;
use tokio_stream::{Stream, StreamExt};

use crate::error::{ApiError, ApiResult};
use crate::types::BatchRequest;

/// GET /api/v1/movie/{imdb_id} - Rotten Tomatoes data for one title
#[utoipa::path(
    get,
    path = "/api/v1/movie/{imdb_id}",
    tag = "Movies",
    params(
        ("imdb_id" = String, Path, description = "IMDb id (e.g. tt0468569)"),
    ),
    responses(
        (status = 200, description = "Movie data", body = MovieResponse),
        (status = 400, description = "Invalid IMDb id format", body = ApiError),
        (status = 404, description = "Movie not found", body = ApiError),
        (status = 502, description = "Failed to fetch RT data", body = ApiError),
    ),
    security(("api_key" = [])),
)]
pub async fn get_movie(
    State(pipeline): State<Pipeline>,
    Path(imdb_id): Path<String>,
) -> ApiResult<Json<MovieResponse>> {
    let id = TitleId::parse(&imdb_id).map_err(|e| ApiError::invalid_format(e.to_string()))?;

    match pipeline.resolve_single(&id).await? {
        ResolutionOutcome::Resolved { movie, .. } => Ok(Json(MovieResponse::from(movie))),
        ResolutionOutcome::Failed { kind, message, .. } => Err(match kind {
            FailureKind::NotFound => ApiError::movie_not_found(message),
            FailureKind::ScrapeFailed => ApiError::upstream_failed(message),
            FailureKind::InvalidId => ApiError::invalid_format(message),
        }),
    }
}

/// POST /api/v1/movies/batch - Resolve up to 50 titles, streaming results
#[utoipa::path(
    post,
    path = "/api/v1/movies/batch",
    tag = "Movies",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "SSE stream of movie/error events plus a terminal done summary"),
        (status = 400, description = "Malformed id or oversized batch", body = ApiError),
    ),
    security(("api_key" = [])),
)]
pub async fn batch_movies(
    State(pipeline): State<Pipeline>,
    Json(request): Json<BatchRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let stream = pipeline.run_batch(&request.imdb_ids).await?;

    let events = stream.map(|event| Event::default().event(event.name()).json_data(&event));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
