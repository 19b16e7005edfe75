//! Knowledge base — owns the store and entity registry, runs ingestion
//! and answers queries.

use pdfkb_core::config::PdfKbConfig;
use pdfkb_core::error::{PdfKbError, Result};
use pdfkb_core::traits::{DocumentFetcher, TextExtractor, VectorIndex};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use crate::debug::DebugSink;
use crate::entities::EntityRegistry;
use crate::extract::PdfTextExtractor;
use crate::fetch::HttpFetcher;
use crate::search::{QueryEngine, SearchResult};
use crate::store::{KnowledgeRecord, KnowledgeStore};

/// What happened to one URL during `load`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    Loaded {
        source: String,
        chars: usize,
        debug_file: Option<PathBuf>,
        entities_found: Vec<String>,
        /// Non-fatal problems (debug write, vector index).
        warnings: Vec<String>,
    },
    Skipped {
        source: String,
        stage: String,
        reason: String,
    },
}

impl IngestOutcome {
    pub fn source(&self) -> &str {
        match self {
            IngestOutcome::Loaded { source, .. } | IngestOutcome::Skipped { source, .. } => source,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, IngestOutcome::Loaded { .. })
    }
}

/// Per-URL outcomes of one `load` call, in URL order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub recreated: bool,
    pub outcomes: Vec<IngestOutcome>,
    pub elapsed_ms: u128,
}

impl LoadReport {
    pub fn loaded(&self) -> impl Iterator<Item = &IngestOutcome> {
        self.outcomes.iter().filter(|o| o.is_loaded())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &IngestOutcome> {
        self.outcomes.iter().filter(|o| !o.is_loaded())
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }
}

pub struct KnowledgeBase {
    urls: Vec<String>,
    fetcher: Box<dyn DocumentFetcher>,
    extractor: Box<dyn TextExtractor>,
    debug_sink: Option<DebugSink>,
    index: Option<Box<dyn VectorIndex>>,
    engine: QueryEngine,
    store: KnowledgeStore,
    entities: EntityRegistry,
}

impl KnowledgeBase {
    pub fn new(
        urls: Vec<String>,
        fetcher: Box<dyn DocumentFetcher>,
        extractor: Box<dyn TextExtractor>,
        vocabulary: Vec<String>,
        engine: QueryEngine,
    ) -> Self {
        tracing::info!("📚 Knowledge base initialized with {} URL(s)", urls.len());
        Self {
            urls,
            fetcher,
            extractor,
            debug_sink: None,
            index: None,
            engine,
            store: KnowledgeStore::new(),
            entities: EntityRegistry::new(vocabulary),
        }
    }

    /// HTTP fetcher, PDF extractor and debug sink as configured.
    pub fn from_config(config: &PdfKbConfig) -> Result<Self> {
        config.validate()?;
        let knowledge = &config.knowledge;
        let engine = QueryEngine::from_config(knowledge, &config.search)?;
        let mut kb = Self::new(
            knowledge.urls.clone(),
            Box::new(HttpFetcher::new(&config.fetch)?),
            Box::new(PdfTextExtractor::new()),
            knowledge.entities.clone(),
            engine,
        );
        if knowledge.debug_enabled {
            kb = kb.with_debug_sink(DebugSink::new(&knowledge.debug_dir_path()));
        }
        Ok(kb)
    }

    pub fn with_debug_sink(mut self, sink: DebugSink) -> Self {
        self.debug_sink = Some(sink);
        self
    }

    pub fn with_vector_index(mut self, index: Box<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Ingest every configured URL in order. A failing URL is skipped and
    /// recorded in the report; it never stops the remaining ones.
    pub async fn load(&mut self, recreate: bool, upsert: bool) -> LoadReport {
        let start = Instant::now();

        if recreate {
            tracing::info!("♻️ Recreating the knowledge base...");
            if let Some(index) = &self.index {
                if let Err(e) = index.clear().await {
                    tracing::warn!("⚠️ Failed to clear vector index '{}': {e}", index.name());
                }
            }
            self.store.clear();
            self.entities.clear();
        }

        let urls = self.urls.clone();
        let mut outcomes = Vec::with_capacity(urls.len());
        for url in &urls {
            tracing::info!("📄 Processing PDF from URL: {url}");
            let outcome = match self.ingest(url, upsert).await {
                Ok(outcome) => {
                    tracing::info!("✅ Successfully processed PDF: {url}");
                    outcome
                }
                Err(e) => {
                    tracing::warn!("❌ Failed to process PDF at {url}: {e}");
                    IngestOutcome::Skipped {
                        source: url.clone(),
                        stage: e.stage().to_string(),
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        tracing::info!(
            "Knowledge base loading complete: {} record(s), {} entit(ies): {:?}",
            self.store.len(),
            self.entities.len(),
            self.entities.entities()
        );

        LoadReport {
            recreated: recreate,
            outcomes,
            elapsed_ms: start.elapsed().as_millis(),
        }
    }

    /// fetch → extract → debug → store → index → entities.
    /// Only fetch and extraction failures skip the URL.
    async fn ingest(&mut self, url: &str, upsert: bool) -> Result<IngestOutcome> {
        let bytes = self.fetcher.fetch(url).await?;
        let text = self.extractor.extract(&bytes)?;
        let mut warnings = Vec::new();

        let debug_file = match &self.debug_sink {
            Some(sink) => match sink.write(url, &text) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("⚠️ {e}");
                    warnings.push(e.to_string());
                    None
                }
            },
            None => None,
        };

        let chars = text.chars().count();
        self.store.push(KnowledgeRecord::new(url, text.clone()));

        if let Some(index) = &self.index {
            if let Err(e) = index.insert(text.clone(), upsert).await {
                let e = if matches!(e, PdfKbError::Index(_)) {
                    e
                } else {
                    PdfKbError::Index(e.to_string())
                };
                tracing::warn!("⚠️ Vector index '{}': {e}", index.name());
                warnings.push(e.to_string());
            }
        }

        let entities_found = self.entities.extract(&text);

        Ok(IngestOutcome::Loaded {
            source: url.to_string(),
            chars,
            debug_file,
            entities_found,
            warnings,
        })
    }

    /// Structured query result.
    pub fn query(&self, query: &str) -> SearchResult {
        self.engine.query(query, &self.store, &self.entities)
    }

    /// Query rendered as display lines. Never fails.
    pub fn search(&self, query: &str) -> Vec<String> {
        tracing::debug!("Searching knowledge base for query: {query}");
        self.engine.search(query, &self.store, &self.entities)
    }
}
