//! Data models shared across the scraping and rendering pipeline.
//!
//! This module defines the core value types used throughout the application:
//! - [`PdfCandidate`]: A discovered newsletter-PDF link with its computed
//!   relevance score
//! - [`Section`] / [`SegmentedDocument`]: The output of text segmentation
//! - [`Article`] / [`ArticleKind`]: A scraped newsroom article
//! - [`DigestMeta`]: Header metadata attached to every synthesized digest
//!
//! All types are plain owned values created fresh per scan invocation; no
//! shared state survives a run.

use serde::{Deserialize, Serialize};

/// A discovered PDF link that may be the latest newsletter edition.
///
/// Candidates are produced by link discovery on the newsletter listing page
/// and handed to [`crate::ranking::score_and_rank`], which fills in `score`.
/// The score is always computed, never supplied by the discovery step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfCandidate {
    /// Absolute URL of the linked PDF.
    pub url: String,
    /// The link's visible text, trimmed.
    pub display_text: String,
    /// The link's `title` attribute, or empty when absent.
    pub title_attr: String,
    /// Relevance score assigned by the ranker.
    pub score: i64,
}

impl PdfCandidate {
    /// Create an unscored candidate from discovered link data.
    pub fn new(
        url: impl Into<String>,
        display_text: impl Into<String>,
        title_attr: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            display_text: display_text.into(),
            title_attr: title_attr.into(),
            score: 0,
        }
    }
}

/// A named, ordered group of paragraphs within a segmented document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section name, title-cased as first matched.
    pub name: String,
    /// Paragraphs accumulated into this section, in input order.
    pub paragraphs: Vec<String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paragraphs: Vec::new(),
        }
    }
}

/// An ordered collection of named sections produced by segmentation.
///
/// Sections appear in the order they were first created; concatenating every
/// section's paragraphs in that order reproduces the input paragraphs that
/// survived the minimum-length filter, in their original order. Sections
/// that accumulated no paragraphs are dropped before the document is
/// returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentedDocument {
    pub sections: Vec<Section>,
}

impl SegmentedDocument {
    /// Total number of paragraphs across all sections.
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }

    /// True when no section holds any content.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// The kind of a scraped newsroom item, derived from its URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleKind {
    News,
    Media,
    Event,
}

impl ArticleKind {
    /// Plural display label used for grouped headings ("Media Releases").
    pub fn group_label(&self) -> &'static str {
        match self {
            ArticleKind::News => "News",
            ArticleKind::Media => "Media Releases",
            ArticleKind::Event => "Events",
        }
    }

    /// Singular display label ("Media").
    pub fn label(&self) -> &'static str {
        match self {
            ArticleKind::News => "News",
            ArticleKind::Media => "Media",
            ArticleKind::Event => "Event",
        }
    }
}

/// A scraped newsroom article.
///
/// `date` and `summary` are best-effort; absent values simply omit their
/// lines in the rendered output. `kind` is present only for sources that
/// distinguish item types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub date: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    pub kind: Option<ArticleKind>,
}

/// Header metadata for a synthesized Markdown digest.
#[derive(Debug, Clone)]
pub struct DigestMeta {
    /// Document title rendered as the top-level heading.
    pub title: String,
    /// The URL the content was fetched from.
    pub source_url: String,
    /// The listing page the source was auto-discovered from, when any.
    pub discovered_from: Option<String>,
    /// Local generation timestamp, `YYYY-MM-DD HH:MM`.
    pub generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_starts_unscored() {
        let c = PdfCandidate::new("https://example.com/a.pdf", "August edition", "");
        assert_eq!(c.score, 0);
        assert_eq!(c.display_text, "August edition");
    }

    #[test]
    fn paragraph_count_sums_sections() {
        let doc = SegmentedDocument {
            sections: vec![
                Section {
                    name: "General News".into(),
                    paragraphs: vec!["a".into(), "b".into()],
                },
                Section {
                    name: "Council News".into(),
                    paragraphs: vec!["c".into()],
                },
            ],
        };
        assert_eq!(doc.paragraph_count(), 3);
        assert!(!doc.is_empty());
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ArticleKind::Media.group_label(), "Media Releases");
        assert_eq!(ArticleKind::Event.label(), "Event");
    }

    #[test]
    fn kind_serde_is_lowercase() {
        let json = serde_json::to_string(&ArticleKind::Event).unwrap();
        assert_eq!(json, "\"event\"");
        let kind: ArticleKind = serde_json::from_str("\"media\"").unwrap();
        assert_eq!(kind, ArticleKind::Media);
    }
}
