//! HTTP client for the case store's read-only TV feed
//!
//! `GET {base_url}/tv/cases` returns `{ "generated_at": ..., "cases": [...] }`
//! with archived cases already removed and an unreviewed colleague task count
//! on every case.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::error::{Error, Result};
use crate::types::CaseSummary;

use super::{cases_from_document, CaseSource};

/// Path of the TV feed relative to the case store's base URL.
pub const TV_FEED_PATH: &str = "/tv/cases";

/// Async client for the TV feed
struct FeedClient {
    http_client: reqwest::Client,
    feed_url: String,
}

impl FeedClient {
    fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "case store url must start with http:// or https://, got {:?}",
                base_url
            )));
        }

        let feed_url = if base_url.ends_with(TV_FEED_PATH) {
            base_url.to_string()
        } else {
            format!("{}{}", base_url, TV_FEED_PATH)
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            feed_url,
        })
    }

    async fn fetch(&self) -> Result<serde_json::Value> {
        let response = self
            .http_client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| Error::Feed(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| Error::Feed(format!("failed to parse response: {}", e)))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Feed(format!("API error ({}): {}", status, error_text)))
        }
    }
}

/// Blocking [`CaseSource`] over the TV feed.
///
/// Owns a current-thread runtime so the single-threaded board loop can call
/// it directly. A call blocks for at most the configured timeout.
pub struct HttpCaseSource {
    inner: FeedClient,
    runtime: tokio::runtime::Runtime,
}

impl HttpCaseSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let inner = FeedClient::new(base_url, timeout)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Feed(format!("failed to create runtime: {}", e)))?;

        Ok(Self { inner, runtime })
    }

    /// Fully resolved feed URL.
    pub fn feed_url(&self) -> &str {
        &self.inner.feed_url
    }
}

impl CaseSource for HttpCaseSource {
    fn describe(&self) -> String {
        self.inner.feed_url.clone()
    }

    fn list_cases(&self) -> Result<Vec<CaseSummary>> {
        let document = self.runtime.block_on(self.inner.fetch())?;
        Ok(cases_from_document(document, self.feed_url()))
    }
}
