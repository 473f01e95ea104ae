//! PDF byte-to-text decoding.
//!
//! Thin wrapper over `pdf-extract`. Extraction is CPU-bound and synchronous;
//! callers run it on a blocking task. Layout reconstruction (tables,
//! columns) is out of scope: the extractor's reading-order text is handed
//! straight to normalization.

use pdf_extract::OutputError;

/// Extract the concatenated page text from an in-memory PDF.
pub fn extract_text(bytes: &[u8]) -> Result<String, OutputError> {
    pdf_extract::extract_text_from_mem(bytes)
}

/// Sanity-check a downloaded body before attempting extraction.
///
/// Mirrors the download guard this pipeline has always used: reject only
/// when the response neither declares a PDF content type nor carries enough
/// bytes to plausibly be one.
pub fn looks_like_pdf(content_type: Option<&str>, body_len: usize) -> bool {
    let declared_pdf = content_type
        .map(|t| t.to_lowercase().contains("pdf"))
        .unwrap_or(false);
    declared_pdf || body_len >= 1000
}
