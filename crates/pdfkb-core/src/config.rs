//! PdfKb configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PdfKbError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfKbConfig {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl PdfKbConfig {
    /// Load config from the default path (~/.pdfkb/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PdfKbError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| PdfKbError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| PdfKbError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the PdfKb home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pdfkb")
    }

    /// Reject values the search engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let cutoff = self.search.close_match_cutoff;
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(PdfKbError::Config(format!(
                "search.close_match_cutoff must be within [0, 1], got {cutoff}"
            )));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(PdfKbError::Config("fetch.timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}

/// What to ingest and how to recognize entities in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Document URLs, ingested in this order.
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,
    /// Known entity vocabulary, matched in this order.
    #[serde(default = "default_entities")]
    pub entities: Vec<String>,
    /// Plural noun used in entity listing messages.
    #[serde(default = "default_entity_label")]
    pub entity_label: String,
    /// Queries that mean "enumerate known entities" (compared case-insensitively).
    #[serde(default = "default_list_phrases")]
    pub list_phrases: Vec<String>,
    /// Directory receiving `debug_extracted_text_<name>.txt` files.
    #[serde(default = "default_debug_dir")]
    pub debug_dir: String,
    #[serde(default = "bool_true")]
    pub debug_enabled: bool,
}

fn bool_true() -> bool { true }
fn default_urls() -> Vec<String> {
    vec!["https://phi-public.s3.amazonaws.com/recipes/ThaiRecipes.pdf".into()]
}
fn default_entities() -> Vec<String> {
    ["Pad Thai Goong Sod", "Tom Kha Gai", "Som Tum", "Massaman Gai", "Tom Yum Goong"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_entity_label() -> String { "dishes".into() }
fn default_list_phrases() -> Vec<String> {
    ["list down all the dishes", "list all the dishes", "show me all dishes"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_debug_dir() -> String { ".".into() }

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            urls: default_urls(),
            entities: default_entities(),
            entity_label: default_entity_label(),
            list_phrases: default_list_phrases(),
            debug_dir: default_debug_dir(),
            debug_enabled: true,
        }
    }
}

impl KnowledgeConfig {
    /// Debug directory with `~` expanded.
    pub fn debug_dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.debug_dir).to_string())
    }
}

/// HTTP fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 { 30 }
fn default_user_agent() -> String { "PdfKb/0.1".into() }

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Query engine tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Characters kept on each side of a match start.
    #[serde(default = "default_snippet_radius")]
    pub snippet_radius: usize,
    #[serde(default = "default_max_close_matches")]
    pub max_close_matches: usize,
    #[serde(default = "default_close_match_cutoff")]
    pub close_match_cutoff: f64,
    /// "levenshtein", "sorensen_dice" or "ratcliff_obershelp".
    #[serde(default = "default_similarity")]
    pub similarity: String,
}

fn default_snippet_radius() -> usize { 50 }
fn default_max_close_matches() -> usize { 3 }
fn default_close_match_cutoff() -> f64 { 0.6 }
fn default_similarity() -> String { "levenshtein".into() }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            snippet_radius: default_snippet_radius(),
            max_close_matches: default_max_close_matches(),
            close_match_cutoff: default_close_match_cutoff(),
            similarity: default_similarity(),
        }
    }
}
