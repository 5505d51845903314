//! Fetcher trait for retrieving update descriptors from remote sources

#[cfg(test)]
use mockall::automock;

use crate::version::error::FetchError;

/// Trait for fetching the raw text of an update descriptor
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the body at `url` as text
    ///
    /// # Returns
    /// * `Ok(String)` - The response body, never blank
    /// * `Err(FetchError)` - Timeout, network failure, non-2xx status or empty body
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}
