//! Wikidata SPARQL HTTP client.

use super::types::SparqlResponse;
use crate::SlugResolver;
use async_trait::async_trait;
use reelscore_core::{ProviderError, RtSlug, TitleId};
use reqwest::Client;
use std::time::Duration;

const PROVIDER: &str = "wikidata";
const SPARQL_URL: &str = "https://query.wikidata.org/sparql";
const USER_AGENT: &str = "Reelscore/0.3 (Personal movie data service)";

/// SPARQL query joining the IMDb id property (P345) to the Rotten Tomatoes
/// id property (P1258). The id placeholder is safe to splice: a `TitleId`
/// is always `tt` + digits.
const SPARQL_QUERY: &str = r#"SELECT ?rtId WHERE {
  ?film wdt:P345 "{imdb_id}" .
  ?film wdt:P1258 ?rtId .
}"#;

/// Client for the Wikidata SPARQL endpoint.
#[derive(Debug, Clone)]
pub struct WikidataClient {
    client: Client,
    endpoint: String,
}

impl WikidataClient {
    /// Create a client against the public SPARQL endpoint.
    pub fn new(request_timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_endpoint(SPARQL_URL, request_timeout)
    }

    /// Create a client against a custom endpoint (tests point this at a
    /// local stub).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed {
                provider: PROVIDER,
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    fn build_query(id: &TitleId) -> String {
        SPARQL_QUERY.replace("{imdb_id}", id.as_str())
    }
}

#[async_trait]
impl SlugResolver for WikidataClient {
    async fn resolve(&self, id: &TitleId) -> Result<Option<RtSlug>, ProviderError> {
        let query = Self::build_query(id);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query.as_str()), ("format", "json")])
            .header("Accept", "application/sparql-results+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body: SparqlResponse =
            response.json().await.map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER,
                reason: e.to_string(),
            })?;

        match body.results.bindings.into_iter().find_map(|b| b.rt_id) {
            Some(binding) => {
                tracing::info!(imdb_id = %id, slug = %binding.value, "Resolved RT slug");
                Ok(Some(RtSlug(binding.value)))
            }
            None => {
                tracing::warn!(imdb_id = %id, "No RT slug found in Wikidata");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_splices_id() {
        let id = TitleId::parse("tt0468569").unwrap();
        let query = WikidataClient::build_query(&id);
        assert!(query.contains(r#"wdt:P345 "tt0468569""#));
        assert!(query.contains("wdt:P1258"));
        assert!(!query.contains("{imdb_id}"));
    }
}
