//! Query engine — entity listing intent, exact substring search with
//! snippets, then fuzzy word matching for records that did not match.
//!
//! ```text
//! query ─┬─ list phrase? ──▶ "- <entity>" lines
//!        └─ per record (store order)
//!             ├─ substring hit ──▶ header + snippet
//!             └─ else close words ──▶ "Close match ...: a, b, c"
//! ```

use pdfkb_core::config::{KnowledgeConfig, SearchConfig};
use pdfkb_core::error::Result;
use serde::Serialize;

use crate::entities::EntityRegistry;
use crate::similarity::{CloseMatcher, similarity_from_name};
use crate::store::KnowledgeStore;

pub const NO_RESULTS: &str = "No results found in the knowledge base.";
pub const NO_SNIPPET: &str = "No snippet available.";
const ELLIPSIS: &str = "...";

/// One record's contribution to a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchHit {
    Exact { source: String, snippet: String },
    Close { source: String, tokens: Vec<String> },
}

/// Structured result of a query, before rendering to lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum SearchResult {
    Entities(Vec<String>),
    NoEntities,
    Hits(Vec<SearchHit>),
    NoResults,
}

pub struct QueryEngine {
    list_phrases: Vec<String>,
    entity_label: String,
    snippet_radius: usize,
    matcher: CloseMatcher,
}

impl QueryEngine {
    pub fn new(
        list_phrases: &[String],
        entity_label: &str,
        snippet_radius: usize,
        matcher: CloseMatcher,
    ) -> Self {
        Self {
            list_phrases: list_phrases.iter().map(|p| p.trim().to_lowercase()).collect(),
            entity_label: entity_label.to_string(),
            snippet_radius,
            matcher,
        }
    }

    pub fn from_config(knowledge: &KnowledgeConfig, search: &SearchConfig) -> Result<Self> {
        let matcher = CloseMatcher::new(
            similarity_from_name(&search.similarity)?,
            search.close_match_cutoff,
            search.max_close_matches,
        );
        Ok(Self::new(
            &knowledge.list_phrases,
            &knowledge.entity_label,
            search.snippet_radius,
            matcher,
        ))
    }

    /// Whether the query asks to enumerate known entities.
    pub fn is_list_intent(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        self.list_phrases.iter().any(|p| *p == q)
    }

    pub fn no_entities_message(&self) -> String {
        format!("No {} found in the knowledge base.", self.entity_label)
    }

    pub fn query(&self, query: &str, store: &KnowledgeStore, entities: &EntityRegistry) -> SearchResult {
        if self.is_list_intent(query) {
            return if entities.is_empty() {
                SearchResult::NoEntities
            } else {
                SearchResult::Entities(entities.entities().to_vec())
            };
        }

        let query_lower = query.to_lowercase();
        let mut hits = Vec::new();
        for record in store.iter() {
            if let Some(at) = find_case_insensitive(&record.content, query) {
                hits.push(SearchHit::Exact {
                    source: record.source.clone(),
                    snippet: snippet_at(&record.content, at, self.snippet_radius),
                });
                continue;
            }

            let content_lower = record.content.to_lowercase();
            let tokens = self
                .matcher
                .close_matches(&query_lower, content_lower.split_whitespace());
            if !tokens.is_empty() {
                hits.push(SearchHit::Close {
                    source: record.source.clone(),
                    tokens,
                });
            }
        }

        tracing::debug!("🔎 '{query}' → {} hit(s) over {} record(s)", hits.len(), store.len());
        if hits.is_empty() {
            SearchResult::NoResults
        } else {
            SearchResult::Hits(hits)
        }
    }

    /// Run a query and render it as display lines. Never fails.
    pub fn search(&self, query: &str, store: &KnowledgeStore, entities: &EntityRegistry) -> Vec<String> {
        self.render(self.query(query, store, entities))
    }

    pub fn render(&self, result: SearchResult) -> Vec<String> {
        match result {
            SearchResult::Entities(names) => names.into_iter().map(|n| format!("- {n}")).collect(),
            SearchResult::NoEntities => vec![self.no_entities_message()],
            SearchResult::NoResults => vec![NO_RESULTS.to_string()],
            SearchResult::Hits(hits) => {
                let mut lines = Vec::with_capacity(hits.len() * 2);
                for hit in hits {
                    match hit {
                        SearchHit::Exact { source, snippet } => {
                            lines.push(format!("Match found in PDF from {source}:"));
                            lines.push(snippet);
                        }
                        SearchHit::Close { source, tokens } => {
                            lines.push(format!(
                                "Close match found in PDF from {source}: {}",
                                tokens.join(", ")
                            ));
                        }
                    }
                }
                lines
            }
        }
    }
}

/// Char index in `content` of the first case-insensitive occurrence of `query`.
///
/// Lower-casing can change a character's length, so the match is located in
/// the lowered text and mapped back to the originating character.
pub fn find_case_insensitive(content: &str, query: &str) -> Option<usize> {
    let needle = fold_sigma(query.to_lowercase());
    if needle.is_empty() {
        return Some(0);
    }

    let mut lowered = String::with_capacity(content.len());
    // (byte offset in `lowered`, char index in `content`)
    let mut origin: Vec<(usize, usize)> = Vec::with_capacity(content.len());
    for (idx, c) in content.chars().enumerate() {
        for lc in c.to_lowercase() {
            origin.push((lowered.len(), idx));
            lowered.push(if lc == 'ς' { 'σ' } else { lc });
        }
    }

    let byte = lowered.find(&needle)?;
    let pos = origin.partition_point(|(start, _)| *start < byte);
    origin.get(pos).map(|(_, idx)| *idx)
}

/// Final sigma lower-cases by position, so "ΟΔΟΣ" and "οδος" only meet
/// once both forms are folded to 'σ'.
fn fold_sigma(s: String) -> String {
    if s.contains('ς') { s.replace('ς', "σ") } else { s }
}

/// Window of `radius` chars either side of the first match start, plus "...".
pub fn snippet(content: &str, query: &str, radius: usize) -> String {
    match find_case_insensitive(content, query) {
        Some(at) => snippet_at(content, at, radius),
        None => NO_SNIPPET.to_string(),
    }
}

fn snippet_at(content: &str, at: usize, radius: usize) -> String {
    let len = content.chars().count();
    let start = at.saturating_sub(radius);
    let end = (at + radius).min(len);
    let mut out: String = content.chars().skip(start).take(end.saturating_sub(start)).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KnowledgeRecord;

    fn engine() -> QueryEngine {
        QueryEngine::from_config(&KnowledgeConfig::default(), &SearchConfig::default()).unwrap()
    }

    fn store(records: &[(&str, &str)]) -> KnowledgeStore {
        let mut store = KnowledgeStore::new();
        for (source, content) in records {
            store.push(KnowledgeRecord::new(*source, *content));
        }
        store
    }

    fn registry(found: &[&str]) -> EntityRegistry {
        let mut reg = EntityRegistry::new(found.iter().map(|s| s.to_string()).collect());
        reg.extract(&found.join(" "));
        reg
    }

    #[test]
    fn test_list_intent_returns_entities_in_order() {
        let e = engine();
        let reg = registry(&["Som Tum", "Tom Kha Gai"]);
        let lines = e.search("  List All The Dishes ", &KnowledgeStore::new(), &reg);
        assert_eq!(lines, vec!["- Som Tum", "- Tom Kha Gai"]);
    }

    #[test]
    fn test_list_intent_empty_registry() {
        let e = engine();
        let reg = EntityRegistry::default();
        let lines = e.search("show me all dishes", &store(&[("u", "show me all dishes")]), &reg);
        assert_eq!(lines, vec!["No dishes found in the knowledge base."]);
    }

    #[test]
    fn test_exact_match_header_and_snippet() {
        let e = engine();
        let s = store(&[("https://x/a.pdf", "...the quick brown fox...")]);
        let lines = e.search("brown", &s, &EntityRegistry::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Match found in PDF from https://x/a.pdf:");
        assert!(lines[1].contains("brown"));
        assert!(lines[1].chars().count() <= 103);
        assert!(lines[1].ends_with("..."));
    }

    #[test]
    fn test_case_insensitive_results_identical() {
        let e = engine();
        let s = store(&[("a", "The Quick Brown Fox"), ("b", "nothing relevant")]);
        let reg = EntityRegistry::default();
        assert_eq!(e.search("BROWN", &s, &reg), e.search("brown", &s, &reg));
    }

    #[test]
    fn test_exact_suppresses_close_and_follows_store_order() {
        let e = engine();
        let s = store(&[
            ("first", "a bowl of currry"),
            ("second", "green curry paste, curry again"),
        ]);
        let lines = e.search("curry", &s, &EntityRegistry::default());
        assert_eq!(
            lines,
            vec![
                "Close match found in PDF from first: currry".to_string(),
                "Match found in PDF from second:".to_string(),
                "green curry paste, curry again...".to_string(),
            ]
        );
    }

    #[test]
    fn test_close_match_capped_at_three() {
        let e = engine();
        let s = store(&[("menu", "mat bat hat rat cast")]);
        let lines = e.search("cat", &s, &EntityRegistry::default());
        assert_eq!(lines, vec!["Close match found in PDF from menu: cast, rat, mat"]);
    }

    #[test]
    fn test_close_match_keeps_repeated_words() {
        let e = engine();
        let s = store(&[("menu", "currry currry currry currry")]);
        let lines = e.search("curry", &s, &EntityRegistry::default());
        assert_eq!(lines, vec!["Close match found in PDF from menu: currry, currry, currry"]);
    }

    #[test]
    fn test_no_results() {
        let e = engine();
        let s = store(&[("a", "the quick brown fox")]);
        let reg = EntityRegistry::default();
        assert_eq!(e.search("zzzzzz", &s, &reg), vec![NO_RESULTS]);
        assert_eq!(e.search("anything", &KnowledgeStore::new(), &reg), vec![NO_RESULTS]);
    }

    #[test]
    fn test_blank_query_matches_every_record_at_start() {
        let e = engine();
        let s = store(&[("u", "abc def"), ("v", "ghi")]);
        let reg = EntityRegistry::default();
        let expected = vec![
            "Match found in PDF from u:",
            "abc def...",
            "Match found in PDF from v:",
            "ghi...",
        ];
        assert_eq!(e.search(" ", &s, &reg), expected);
        assert_eq!(e.search("", &s, &reg), expected);
    }

    #[test]
    fn test_greek_final_sigma_matches_either_case() {
        assert_eq!(find_case_insensitive("ΟΔΟΣ", "οδος"), Some(0));
        assert_eq!(find_case_insensitive("στην οδός", "ΟΔΌΣ"), Some(5));
        assert_eq!(find_case_insensitive("ΣΑΣ", "σας"), Some(0));

        let e = engine();
        let s = store(&[("gr", "ΟΔΟΣ")]);
        let lines = e.search("οδος", &s, &EntityRegistry::default());
        assert_eq!(lines, vec!["Match found in PDF from gr:", "ΟΔΟΣ..."]);
    }

    #[test]
    fn test_snippet_window_in_chars() {
        let content = format!("{}needle{}", "a".repeat(80), "b".repeat(80));
        let snip = snippet(&content, "NEEDLE", 50);
        assert_eq!(snip, format!("{}needle{}...", "a".repeat(50), "b".repeat(44)));
    }

    #[test]
    fn test_snippet_clamped_at_edges() {
        assert_eq!(snippet("Som Tum", "tum", 50), "Som Tum...");
    }

    #[test]
    fn test_snippet_missing_query_placeholder() {
        assert_eq!(snippet("pad thai", "curry", 50), NO_SNIPPET);
    }

    #[test]
    fn test_snippet_counts_multibyte_chars() {
        let content = format!("{}ผัดไทย", "ต้ม".repeat(30));
        let snip = snippet(&content, "ผัดไทย", 3);
        assert_eq!(snip, "ต้มผัด...");
    }

    #[test]
    fn test_find_case_insensitive_maps_expanding_lowercase() {
        // 'İ' lower-cases to two chars; the index is still counted in content chars
        assert_eq!(find_case_insensitive("İx brown", "brown"), Some(3));
        assert_eq!(find_case_insensitive("abc", ""), Some(0));
        assert_eq!(find_case_insensitive("abc", "d"), None);
    }

    #[test]
    fn test_serializes_hits() {
        let hit = SearchHit::Close {
            source: "a".into(),
            tokens: vec!["x".into()],
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["kind"], "close");
        assert_eq!(json["tokens"][0], "x");
    }
}
