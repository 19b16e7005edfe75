//! # PdfKb Knowledge Base
//!
//! Lightweight in-memory knowledge base over remotely hosted PDFs.
//! No embeddings here: text is matched exactly first, then approximately.
//!
//! ## Design
//! - **Fetch** — one HTTP GET per URL, explicit timeout, no retries
//! - **Extract** — page-by-page text, a broken page costs only itself
//! - **Debug sink** — extracted text dumped to `debug_extracted_text_<name>.txt`
//! - **Entities** — fixed vocabulary, substring membership, first-seen order
//! - **Search** — substring hit with a snippet, else up to 3 close words
//!
//! ## How it works
//! ```text
//! urls ─▶ fetch ─▶ extract ─┬─▶ debug file
//!                           ├─▶ KnowledgeStore (source, content)
//!                           ├─▶ VectorIndex (optional, external)
//!                           └─▶ EntityRegistry
//!
//! "list all the dishes" ─▶ "- Som Tum", "- Tom Kha Gai"
//! "galangal"            ─▶ "Match found in PDF from <url>:", "<snippet>..."
//! ```

pub mod base;
pub mod debug;
pub mod entities;
pub mod extract;
pub mod fetch;
pub mod search;
pub mod similarity;
pub mod store;

pub use base::{IngestOutcome, KnowledgeBase, LoadReport};
pub use debug::DebugSink;
pub use entities::EntityRegistry;
pub use extract::PdfTextExtractor;
pub use fetch::HttpFetcher;
pub use search::{QueryEngine, SearchHit, SearchResult};
pub use similarity::{CloseMatcher, NormalizedLevenshtein, RatcliffObershelp, Similarity, SorensenDice};
pub use store::{KnowledgeRecord, KnowledgeStore};
