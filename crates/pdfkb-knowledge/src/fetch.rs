//! HTTP document fetcher.

use async_trait::async_trait;
use pdfkb_core::config::FetchConfig;
use pdfkb_core::error::{PdfKbError, Result};
use pdfkb_core::traits::DocumentFetcher;
use std::time::{Duration, Instant};

/// Fetches documents over plain HTTP(S) GET.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PdfKbError::Fetch(format!("Client error: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        check_scheme(url)?;

        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PdfKbError::Fetch(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PdfKbError::Fetch(format!("HTTP {status} for {url}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PdfKbError::Fetch(format!("Read body failed: {e}")))?;

        tracing::debug!(
            "📥 GET {url} → {status} ({} bytes, {:.0}ms)",
            bytes.len(),
            start.elapsed().as_millis()
        );
        Ok(bytes.to_vec())
    }
}

/// Only http and https are fetchable.
fn check_scheme(url: &str) -> Result<()> {
    let lower = url.trim().to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err(PdfKbError::Fetch(format!("Unsupported URL scheme: {url}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_scheme() {
        assert!(check_scheme("https://example.com/a.pdf").is_ok());
        assert!(check_scheme("HTTP://example.com/a.pdf").is_ok());
        assert!(check_scheme("ftp://example.com/a.pdf").is_err());
        assert!(check_scheme("/tmp/a.pdf").is_err());
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_fetch_error() {
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let err = fetcher.fetch("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, PdfKbError::Fetch(_)));
    }
}
