//! Reelscore Storage - Cache Store Traits and In-Memory Implementations
//!
//! Defines the cache abstraction consumed by the resolution pipeline. The
//! production Postgres implementation lives in `reelscore-api`; the in-memory
//! stores here back tests and local development.

pub mod freshness;
pub mod list_cache;
pub mod movie_cache;

pub use freshness::is_fresh;
pub use list_cache::{hash_url, normalize_url, InMemoryListCache, ListCache};
pub use movie_cache::{InMemoryMovieCache, MovieCache};
