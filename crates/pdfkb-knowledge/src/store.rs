//! In-memory knowledge store — extracted text per source, in load order.

/// One successfully processed document. Never mutated after insertion.
#[derive(Debug, Clone)]
pub struct KnowledgeRecord {
    /// Origin URL.
    pub source: String,
    /// Full extracted text, pages in order.
    pub content: String,
}

impl KnowledgeRecord {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }
}

/// Ordered sequence of records; insertion order is processing order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    records: Vec<KnowledgeRecord>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: KnowledgeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Total characters across all records.
    pub fn total_chars(&self) -> usize {
        self.records.iter().map(|r| r.content.chars().count()).sum()
    }
}
