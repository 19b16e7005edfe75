//! # PdfKb Core
//!
//! Shared building blocks for the PdfKb knowledge base:
//! configuration, the error taxonomy, and the collaborator traits
//! (document fetcher, text extractor, external vector index) that
//! the ingestion pipeline is wired from.

pub mod config;
pub mod error;
pub mod traits;

pub use config::PdfKbConfig;
pub use error::{PdfKbError, Result};
pub use traits::{DocumentFetcher, TextExtractor, VectorIndex};
