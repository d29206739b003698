use std::panic::{catch_unwind, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, warn};

use super::ExtractionError;

/// Extracts per-page text. `None` marks a page whose text could not be read.
///
/// `pdf-extract` handles most digital PDFs well but fails on the whole
/// document when a single page trips it up, and can panic on malformed
/// input. On any failure the document is re-read with `lopdf` one page at a
/// time so the readable pages still come through.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<Option<String>>, ExtractionError> {
    if !has_pdf_header(bytes) {
        return Err(ExtractionError::NotPdf);
    }

    match catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(Ok(pages)) if !pages.is_empty() => {
            return Ok(pages.into_iter().map(Some).collect());
        }
        Ok(Ok(_)) => debug!("pdf-extract found no pages, trying per-page fallback"),
        Ok(Err(e)) => debug!("pdf-extract failed ({e}), trying per-page fallback"),
        Err(_) => warn!("pdf-extract panicked, trying per-page fallback"),
    }

    extract_pages_individually(bytes)
}

fn extract_pages_individually(bytes: &[u8]) -> Result<Vec<Option<String>>, ExtractionError> {
    let doc = catch_unwind(|| Document::load_mem(bytes))
        .map_err(|_| ExtractionError::Parse("malformed document structure".to_string()))?
        .map_err(|e| ExtractionError::Parse(e.to_string()))?;

    if doc.is_encrypted() {
        return Err(ExtractionError::Encrypted);
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(ExtractionError::NoPages);
    }

    let pages = page_numbers
        .into_iter()
        .map(|number| {
            match catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[number]))) {
                Ok(Ok(text)) => Some(text),
                Ok(Err(e)) => {
                    debug!("Page {number} has no extractable text: {e}");
                    None
                }
                Err(_) => {
                    warn!("Page {number} panicked during extraction");
                    None
                }
            }
        })
        .collect();

    Ok(pages)
}

/// PDF files start with `%PDF-`, though some writers put junk before it.
fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(1024)];
    window.windows(5).any(|w| w == b"%PDF-")
}
