//! Upstream Fetch Module
//!
//! The expensive operation wrapped by the resource cache. `HttpFetcher` is the
//! production implementation; tests plug in their own `Fetcher`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

// == Fetch Error ==
/// Failure of an upstream fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Any other fetcher-specific failure
    #[error("{0}")]
    Other(String),
}

// == Fetcher Trait ==
/// Fetches the content of a resource.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, resource_id: &str) -> Result<String, FetchError>;
}

// == HTTP Fetcher ==
/// Fetches web pages with a GET request and returns the body as text.
///
/// The body is returned whatever the response status, so error pages are
/// cached like any other content. Only transport failures are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, resource_id: &str) -> Result<String, FetchError> {
        debug!(url = resource_id, "fetching upstream");

        let response = self.client.get(resource_id).send().await?;
        debug!(url = resource_id, status = %response.status(), "upstream responded");

        Ok(response.text().await?)
    }
}
