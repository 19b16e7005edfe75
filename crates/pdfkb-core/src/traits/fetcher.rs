//! Document fetcher trait.

use async_trait::async_trait;

use crate::error::Result;

/// Retrieves the raw bytes of a document.
///
/// One request per call, no retries. Implementations map network
/// failures and non-2xx statuses to `PdfKbError::Fetch`.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetcher name for logs.
    fn name(&self) -> &str;

    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
