//! Rotten Tomatoes provider: page client and extraction.

pub mod client;
pub mod extract;
pub mod lists;

pub use client::RtClient;
pub use lists::UrlKind;
