//! Text extractor trait.

use crate::error::Result;

/// Converts raw document bytes into linear text, page by page.
pub trait TextExtractor: Send + Sync {
    /// Extractor name for logs.
    fn name(&self) -> &str;

    /// Extract all pages in document order, each followed by `\n`.
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}
