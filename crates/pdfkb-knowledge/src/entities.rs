//! Entity extraction against a fixed vocabulary.
//!
//! Plain substring membership on lower-cased text, not word-boundary
//! aware: "som tum" is found inside "handsom tumbler".

/// Discovered entity names, deduplicated, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    vocabulary: Vec<String>,
    found: Vec<String>,
}

impl EntityRegistry {
    pub fn new(vocabulary: Vec<String>) -> Self {
        Self {
            vocabulary,
            found: Vec::new(),
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Scan `text` and record every vocabulary entry it contains.
    /// Returns the names newly added by this call, in vocabulary order.
    pub fn extract(&mut self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        let mut added = Vec::new();
        for candidate in &self.vocabulary {
            let name = candidate.trim();
            if name.is_empty() || !text.contains(&candidate.to_lowercase()) {
                continue;
            }
            if self.found.iter().any(|f| f == name) {
                continue;
            }
            tracing::info!("🍜 Entity found and added: {name}");
            self.found.push(name.to_string());
            added.push(name.to_string());
        }
        added
    }

    pub fn entities(&self) -> &[String] {
        &self.found
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    pub fn len(&self) -> usize {
        self.found.len()
    }

    /// Forget discovered entities; the vocabulary stays.
    pub fn clear(&mut self) {
        self.found.clear();
    }
}
