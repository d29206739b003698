//! Document text extraction for uploaded résumés.
//!
//! `extract_document_text` never fails: parse problems come back as a
//! user-facing warning next to an empty string, and callers must check
//! `ExtractedText::is_blank` before going any further.

pub mod pdf;

use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a document yields no text at all. Messages are shown to the user.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("The uploaded file is not a PDF document.")]
    NotPdf,

    #[error("The PDF is encrypted. Please upload an unprotected copy.")]
    Encrypted,

    #[error("The PDF could not be read ({0}). Please upload a different file.")]
    Parse(String),

    #[error("The PDF contains no pages.")]
    NoPages,
}

/// Result of extracting a document: the concatenated page text plus a warning
/// when extraction failed outright.
#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
    /// Pages that contributed no text (scanned images, blank pages, page-level failures).
    pub empty_pages: usize,
    pub warning: Option<String>,
}

impl ExtractedText {
    fn from_pages(pages: Vec<Option<String>>) -> Self {
        let page_count = pages.len();
        let empty_pages = pages
            .iter()
            .filter(|p| p.as_deref().map_or(true, |t| t.trim().is_empty()))
            .count();
        Self {
            text: join_pages(pages),
            page_count,
            empty_pages,
            warning: None,
        }
    }

    fn failed(error: &ExtractionError) -> Self {
        Self {
            warning: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// True when there is nothing worth sending for analysis.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Concatenates page text in page order. A page without extractable text
/// contributes the empty string; no separator is inserted.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    pages.into_iter().flatten().collect()
}

/// Extracts the text of every page of a PDF payload. CPU-bound: call it from
/// `spawn_blocking` inside async code.
pub fn extract_document_text(bytes: &[u8]) -> ExtractedText {
    match pdf::extract_pages(bytes) {
        Ok(pages) => {
            let extracted = ExtractedText::from_pages(pages);
            debug!(
                "Extracted {} chars from {} pages ({} empty)",
                extracted.text.len(),
                extracted.page_count,
                extracted.empty_pages
            );
            extracted
        }
        Err(e) => {
            warn!("Document extraction failed: {e:?}");
            ExtractedText::failed(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_encrypted_test_pdf, make_test_pdf};

    #[test]
    fn test_join_pages_in_order() {
        let pages = vec![
            Some("First page. ".to_string()),
            Some("Second page. ".to_string()),
            Some("Third page.".to_string()),
        ];
        assert_eq!(join_pages(pages), "First page. Second page. Third page.");
    }

    #[test]
    fn test_join_pages_unextractable_page_contributes_nothing() {
        let pages = vec![Some("alpha".to_string()), None, Some("omega".to_string())];
        assert_eq!(join_pages(pages), "alphaomega");
    }

    #[test]
    fn test_join_pages_all_empty() {
        let pages: Vec<Option<String>> = vec![None, Some(String::new())];
        assert_eq!(join_pages(pages), "");
    }

    #[test]
    fn test_from_pages_counts_empty_pages() {
        let extracted = ExtractedText::from_pages(vec![
            Some("text".to_string()),
            None,
            Some("   \n".to_string()),
        ]);
        assert_eq!(extracted.page_count, 3);
        assert_eq!(extracted.empty_pages, 2);
        assert!(extracted.warning.is_none());
        assert!(!extracted.is_blank());
    }

    #[test]
    fn test_whitespace_only_is_blank() {
        let extracted = ExtractedText::from_pages(vec![Some(" \n\t ".to_string())]);
        assert!(extracted.is_blank());
    }

    #[test]
    fn test_non_pdf_payload_warns_and_returns_empty() {
        let extracted = extract_document_text(b"PK\x03\x04 definitely a zip file");
        assert_eq!(extracted.text, "");
        assert_eq!(
            extracted.warning.as_deref(),
            Some("The uploaded file is not a PDF document.")
        );
        assert!(extracted.is_blank());
    }

    #[test]
    fn test_corrupt_pdf_warns_instead_of_failing() {
        let extracted = extract_document_text(b"%PDF-1.4\nthis is not a real body\n%%EOF");
        assert_eq!(extracted.text, "");
        assert!(extracted.warning.is_some());
    }

    #[test]
    fn test_extracts_text_from_single_page_pdf() {
        let pdf = make_test_pdf(&[Some("Experienced Python developer")]);
        let extracted = extract_document_text(&pdf);
        assert!(extracted.warning.is_none(), "warning: {:?}", extracted.warning);
        assert_eq!(extracted.page_count, 1);
        assert!(
            extracted.text.contains("Python"),
            "expected extracted text to mention Python, got: {:?}",
            extracted.text
        );
    }

    #[test]
    fn test_blank_page_is_tolerated() {
        let pdf = make_test_pdf(&[Some("Skills Rust"), None, Some("Experience Backend")]);
        let pages = pdf::extract_pages(&pdf).unwrap();
        assert_eq!(pages.len(), 3);
        let page_text = |i: usize| pages[i].clone().unwrap_or_default();
        assert!(page_text(0).contains("Skills"));
        assert!(page_text(1).trim().is_empty());
        assert!(page_text(2).contains("Experience"));

        let extracted = extract_document_text(&pdf);
        assert!(extracted.warning.is_none());
        assert_eq!(extracted.page_count, 3);
        assert_eq!(extracted.empty_pages, 1);
        assert_eq!(
            extracted.text,
            format!("{}{}{}", page_text(0), page_text(1), page_text(2))
        );
    }

    #[test]
    fn test_encrypted_pdf_warns_and_returns_empty() {
        let pdf = make_encrypted_test_pdf(&[Some("Confidential resume")]);
        let extracted = extract_document_text(&pdf);
        assert_eq!(extracted.text, "");
        assert_eq!(
            extracted.warning.as_deref(),
            Some("The PDF is encrypted. Please upload an unprotected copy.")
        );
        assert!(extracted.is_blank());
    }

    #[test]
    fn test_image_only_document_is_blank() {
        let pdf = make_test_pdf(&[None, None]);
        let extracted = extract_document_text(&pdf);
        assert!(extracted.is_blank());
        assert_eq!(extracted.page_count, 2);
    }
}
