//! Whitespace normalization for raw extracted text.
//!
//! PDF page text and HTML-extracted paragraphs arrive with inconsistent
//! line-break and whitespace artifacts. [`normalize`] canonicalizes them in
//! a fixed, order-significant sequence of passes so that downstream
//! segmentation always sees the same paragraph-separated shape.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PAGE_ARTIFACTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x0c\r]").unwrap());
static BLANK_LINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Collapse whitespace and line-break variants into canonical form.
///
/// Passes, in order:
/// 1. collapse every whitespace run (including newlines) to a single space
/// 2. convert remaining form-feed/carriage-return artifacts to newlines
/// 3. collapse runs of blank lines down to exactly one blank line
/// 4. trim leading and trailing whitespace
///
/// The function is idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let text = WHITESPACE_RUNS.replace_all(raw, " ");
    let text = PAGE_ARTIFACTS.replace_all(&text, "\n");
    let text = BLANK_LINE_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}
