//! PDF text extraction — line-oriented, best-effort.
//!
//! Pages are extracted one at a time with `lopdf` so a single broken page
//! costs only its own text. When no page yields anything (unusual font
//! encodings), the whole document is retried through `pdf-extract`.

use pdfkb_core::error::{PdfKbError, Result};
use pdfkb_core::traits::TextExtractor;

/// PDF magic header.
const PDF_MAGIC: &[u8] = b"%PDF-";

pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Text of every page in document order. Failed pages are empty strings.
    pub fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        if !is_pdf(bytes) {
            return Err(PdfKbError::Extraction("Not a PDF document".into()));
        }

        let doc = guarded(|| lopdf::Document::load_mem(bytes))
            .ok_or_else(|| PdfKbError::Extraction("PDF parser panicked".into()))?
            .map_err(|e| PdfKbError::Extraction(format!("Failed to parse PDF: {e}")))?;

        let pages = guarded(|| doc.get_pages())
            .ok_or_else(|| PdfKbError::Extraction("PDF page tree is corrupt".into()))?;
        if pages.is_empty() {
            return Err(PdfKbError::Extraction("PDF has no pages".into()));
        }

        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match guarded(|| doc.extract_text(&[*page_number])) {
                Some(Ok(text)) => texts.push(text.trim_end_matches('\n').to_string()),
                Some(Err(e)) => {
                    tracing::warn!("⚠️ Page {page_number} yielded no text: {e}");
                    texts.push(String::new());
                }
                None => {
                    tracing::warn!("⚠️ Page {page_number} panicked during extraction");
                    texts.push(String::new());
                }
            }
        }

        if texts.iter().all(|t| t.trim().is_empty()) {
            if let Some(text) = fallback_extract(bytes) {
                tracing::debug!("Page-level extraction empty, using pdf-extract fallback");
                return Ok(vec![text]);
            }
        }

        Ok(texts)
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfTextExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let pages = self.extract_pages(bytes)?;
        Ok(join_pages(&pages))
    }
}

/// Each page followed by a newline, in order.
pub fn join_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}

/// Magic-byte check, tolerating leading whitespace before the header.
pub fn is_pdf(head: &[u8]) -> bool {
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    head[start..].starts_with(PDF_MAGIC)
}

/// Run a parser call, turning a panic into `None`. Both lopdf and
/// pdf-extract assert on some malformed font and xref tables.
fn guarded<T>(f: impl FnOnce() -> T) -> Option<T> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).ok()
}

/// Whole-document extraction via pdf-extract.
fn fallback_extract(bytes: &[u8]) -> Option<String> {
    match guarded(|| pdf_extract::extract_text_from_mem(bytes)) {
        Some(Ok(text)) if !text.trim().is_empty() => Some(text.trim_end_matches('\n').to_string()),
        Some(Ok(_)) => None,
        Some(Err(e)) => {
            tracing::warn!("⚠️ pdf-extract fallback failed: {e}");
            None
        }
        None => {
            tracing::warn!("⚠️ pdf-extract fallback panicked");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a minimal PDF with one text line per page.
    pub(crate) fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let pages: Vec<Option<&str>> = pages.iter().copied().map(Some).collect();
        build_pdf_pages(&pages)
    }

    /// Like `build_pdf`, but a `None` page's `Contents` points at an object
    /// that was never written.
    pub(crate) fn build_pdf_pages(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let content_id = match page {
                Some(text) => {
                    let content = Content {
                        operations: vec![
                            Operation::new("BT", vec![]),
                            Operation::new("Tf", vec!["F1".into(), 24.into()]),
                            Operation::new("Td", vec![72.into(), 700.into()]),
                            Operation::new("Tj", vec![Object::string_literal(*text)]),
                            Operation::new("ET", vec![]),
                        ],
                    };
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
                }
                None => doc.new_object_id(),
            };
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(is_pdf(b"\n  %PDF-1.4"));
        assert!(!is_pdf(b"<html>"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn test_join_pages_terminates_each_page() {
        let pages = vec!["one".to_string(), String::new(), "three".to_string()];
        assert_eq!(join_pages(&pages), "one\n\nthree\n");
    }

    #[test]
    fn test_non_pdf_is_extraction_error() {
        let err = PdfTextExtractor::new().extract(b"plain text, not a pdf").unwrap_err();
        assert!(matches!(err, PdfKbError::Extraction(_)));
    }

    #[test]
    fn test_truncated_pdf_is_extraction_error() {
        let err = PdfTextExtractor::new().extract(b"%PDF-1.5\n%garbage").unwrap_err();
        assert!(matches!(err, PdfKbError::Extraction(_)));
    }

    #[test]
    fn test_extracts_pages_in_order() {
        let bytes = build_pdf(&["Tom Kha Gai soup", "Som Tum salad"]);
        let text = PdfTextExtractor::new().extract(&bytes).unwrap();

        let first = text.find("Tom Kha Gai").expect("first page text");
        let second = text.find("Som Tum").expect("second page text");
        assert!(first < second);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_broken_page_leaves_empty_segment() {
        let bytes = build_pdf_pages(&[Some("Alpha page"), None, Some("Gamma page")]);
        let extractor = PdfTextExtractor::new();

        let pages = extractor.extract_pages(&bytes).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("Alpha page"));
        assert!(pages[1].trim().is_empty());
        assert!(pages[2].contains("Gamma page"));

        let text = extractor.extract(&bytes).unwrap();
        let alpha = text.find("Alpha page").unwrap();
        let gamma = text.find("Gamma page").unwrap();
        assert!(alpha < gamma);
        assert!(text[alpha..gamma].contains("\n\n"));
    }

    #[test]
    fn test_guarded_catches_panic() {
        assert_eq!(guarded(|| 7), Some(7));
        assert_eq!(guarded(|| -> u8 { panic!("bad font table") }), None);
    }

    #[test]
    fn test_mutated_pdfs_never_panic() {
        let original = build_pdf(&["Tom Kha Gai soup", "Som Tum salad"]);
        let extractor = PdfTextExtractor::new();
        let mut seed: u64 = 0x5eed_1234_abcd_0001;
        let mut next = move || {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (seed >> 33) as usize
        };

        for _ in 0..500 {
            let mut bytes = original.clone();
            for _ in 0..1 + next() % 4 {
                let at = next() % bytes.len();
                bytes[at] = next() as u8;
            }
            match extractor.extract(&bytes) {
                Ok(_) | Err(PdfKbError::Extraction(_)) => {}
                Err(other) => panic!("unexpected error kind: {other}"),
            }
        }
    }
}
