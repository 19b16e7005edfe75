//! Collaborator traits the ingestion pipeline is assembled from.

pub mod extractor;
pub mod fetcher;
pub mod index;

pub use extractor::TextExtractor;
pub use fetcher::DocumentFetcher;
pub use index::VectorIndex;
