//! Error taxonomy for PdfKb.

use thiserror::Error;

/// Every failure the ingestion pipeline can produce.
///
/// `Fetch`, `Extraction` and `DebugWrite` are caught per URL inside
/// `KnowledgeBase::load` and never reach the caller of `load`.
#[derive(Debug, Error)]
pub enum PdfKbError {
    /// Network failure or non-2xx HTTP status.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Malformed or unsupported document.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Local I/O failure while writing the debug artifact.
    #[error("Debug write error: {0}")]
    DebugWrite(String),

    /// External vector index rejected an operation.
    #[error("Index error: {0}")]
    Index(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfKbError {
    /// Short stage label used in logs and load reports.
    pub fn stage(&self) -> &'static str {
        match self {
            PdfKbError::Fetch(_) => "fetch",
            PdfKbError::Extraction(_) => "extract",
            PdfKbError::DebugWrite(_) => "debug",
            PdfKbError::Index(_) => "index",
            PdfKbError::Config(_) => "config",
            PdfKbError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfKbError>;
