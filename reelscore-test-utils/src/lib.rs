//! Test utilities: fixtures and scripted doubles for the resolution
//! pipeline.
//!
//! The doubles implement the storage and provider traits with scripted,
//! deterministic behavior and record call counts plus concurrency
//! high-water marks, so pipeline tests can assert both outcomes and the
//! stage-limit properties without any network.

pub mod doubles;
pub mod fixtures;

pub use doubles::{
    ConcurrencyProbe, FailingMovieCache, ReadOnlyMovieCache, ScriptedFetcher, ScriptedResolver,
};
pub use fixtures::{cached_movie, movie_data, title_id};
