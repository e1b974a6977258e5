//! Rotten Tomatoes HTTP client.

use super::extract::extract_movie;
use super::lists::{detect_url_kind, extract_browse_list, extract_editorial_list, UrlKind};
use crate::{ListFetcher, PageFetcher};
use async_trait::async_trait;
use reelscore_core::{ListResult, MovieData, ProviderError, RtSlug, RT_BASE_URL};
use reqwest::Client;
use std::time::Duration;

const PROVIDER: &str = "rottentomatoes";

// RT serves a degraded page to obvious bots; present a browser UA.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Client for Rotten Tomatoes movie and list pages.
///
/// Sleeps `request_delay` after each page to stay polite; the caller-side
/// fetch semaphore bounds how many requests run at once.
#[derive(Debug, Clone)]
pub struct RtClient {
    client: Client,
    base_url: String,
    request_delay: Duration,
}

impl RtClient {
    /// Create a client against the public site.
    pub fn new(request_timeout: Duration, request_delay: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(RT_BASE_URL, request_timeout, request_delay)
    }

    /// Create a client against a custom base URL (tests point this at a
    /// local stub).
    pub fn with_base_url(
        base_url: impl Into<String>,
        request_timeout: Duration,
        request_delay: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed {
                provider: PROVIDER,
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, base_url: base_url.into(), request_delay })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", ACCEPT)
            .header("Accept-Language", ACCEPT_LANGUAGE)
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

        let html = response.text().await.map_err(|e| ProviderError::InvalidResponse {
            provider: PROVIDER,
            reason: e.to_string(),
        })?;

        // Polite delay between requests.
        tokio::time::sleep(self.request_delay).await;

        Ok(html)
    }
}

#[async_trait]
impl PageFetcher for RtClient {
    async fn fetch_movie(&self, slug: &RtSlug) -> Result<Option<MovieData>, ProviderError> {
        let url = format!("{}/{}", self.base_url, slug);
        tracing::debug!(%url, "Fetching RT movie page");

        let html = self.fetch_page(&url).await?;
        match extract_movie(&html, slug) {
            Some(data) => Ok(Some(data)),
            None => {
                tracing::warn!(%slug, "RT page yielded no usable movie data");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ListFetcher for RtClient {
    async fn fetch_list(&self, url: &str) -> Result<Option<ListResult>, ProviderError> {
        let kind = detect_url_kind(url);
        if kind == UrlKind::Unknown {
            tracing::error!(%url, "Unsupported RT list URL");
            return Ok(None);
        }

        tracing::debug!(%url, ?kind, "Fetching RT list page");
        let html = self.fetch_page(url).await?;

        let result = match kind {
            UrlKind::Editorial => extract_editorial_list(&html, url),
            UrlKind::Browse => extract_browse_list(&html, url),
            UrlKind::Unknown => None,
        };
        Ok(result)
    }
}
