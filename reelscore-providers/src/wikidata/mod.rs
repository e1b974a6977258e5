//! Wikidata SPARQL provider for IMDb-id to Rotten Tomatoes slug resolution.

pub mod client;
pub mod types;

pub use client::WikidataClient;
