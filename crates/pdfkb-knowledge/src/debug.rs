//! Debug sink — extracted text saved for offline inspection.
//! One file per source, named from the URL's last path segment,
//! overwritten on every load.

use pdfkb_core::error::{PdfKbError, Result};
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "debug_extracted_text_";

/// Writes `debug_extracted_text_<segment>.txt` files into a directory.
pub struct DebugSink {
    dir: PathBuf,
}

impl DebugSink {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Deterministic artifact path for a source URL.
    pub fn path_for(&self, source: &str) -> PathBuf {
        self.dir.join(file_name_for(source))
    }

    /// Write the text as UTF-8, replacing any previous artifact.
    pub fn write(&self, source: &str, text: &str) -> Result<PathBuf> {
        let path = self.path_for(source);
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| PdfKbError::DebugWrite(format!("{}: {e}", self.dir.display())))?;
        std::fs::write(&path, text)
            .map_err(|e| PdfKbError::DebugWrite(format!("{}: {e}", path.display())))?;
        tracing::info!("💾 Extracted text saved to {}", path.display());
        Ok(path)
    }
}

/// `debug_extracted_text_<last segment>.txt`, with characters that are
/// unsafe in file names replaced by `_`.
pub fn file_name_for(source: &str) -> String {
    let segment = source.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    let cleaned: String = segment
        .chars()
        .map(|c| match c {
            '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "document".to_string()
    } else {
        cleaned
    };
    format!("{FILE_PREFIX}{stem}.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_uses_last_segment() {
        assert_eq!(
            file_name_for("https://phi-public.s3.amazonaws.com/recipes/ThaiRecipes.pdf"),
            "debug_extracted_text_ThaiRecipes.pdf.txt"
        );
    }

    #[test]
    fn test_file_name_sanitized() {
        assert_eq!(
            file_name_for("https://example.com/menu.pdf?v=2"),
            "debug_extracted_text_menu.pdf_v=2.txt"
        );
        assert_eq!(file_name_for("https://example.com/docs/"), "debug_extracted_text_docs.txt");
        assert_eq!(file_name_for(""), "debug_extracted_text_document.txt");
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DebugSink::new(dir.path());
        let url = "https://example.com/a.pdf";

        let first = sink.write(url, "first run").unwrap();
        let second = sink.write(url, "second run").unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "second run");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_failure_is_debug_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let sink = DebugSink::new(&blocker);
        let err = sink.write("https://example.com/a.pdf", "text").unwrap_err();
        assert!(matches!(err, PdfKbError::DebugWrite(_)));
    }
}
