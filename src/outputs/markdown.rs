//! Markdown synthesis for segmented documents and scraped article lists.
//!
//! Both modes emit the same canonical shape: a header block with source and
//! generation metadata, an anchor-linked table of contents, then the content
//! itself. Anchors come from [`crate::utils::anchor`] and are derived purely
//! from names; duplicate names produce colliding anchors, which is accepted
//! rather than suffixed away.
//!
//! Synthesis is a pure rendering pass: it never fails, and absent optional
//! fields simply omit their lines.

use crate::models::{Article, ArticleKind, DigestMeta, SegmentedDocument};
use crate::utils::{anchor, is_all_caps, title_case};
use std::fmt::Write;

/// How paragraph roles are classified when rendering sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Three-way classification: sub-heading, emphasis line, body.
    #[default]
    Rich,
    /// Single short-line-without-trailing-period heading rule.
    Minimal,
}

/// The rendering role assigned to one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphRole {
    SubHeading,
    Emphasis,
    Body,
}

/// Classify a paragraph for rendering.
///
/// Rich style: a short, period-less, fully upper-case paragraph is a
/// sub-heading; a short, period-less paragraph with few words is an
/// emphasis line; anything else is body text. Minimal style folds the first
/// two cases into one heading rule.
fn classify(paragraph: &str, style: RenderStyle) -> ParagraphRole {
    let length = paragraph.chars().count();
    let no_trailing_period = !paragraph.ends_with('.');
    match style {
        RenderStyle::Minimal => {
            if length < 100 && no_trailing_period {
                ParagraphRole::SubHeading
            } else {
                ParagraphRole::Body
            }
        }
        RenderStyle::Rich => {
            if length < 100 && no_trailing_period && is_all_caps(paragraph) {
                ParagraphRole::SubHeading
            } else if length < 80 && no_trailing_period && paragraph.matches(' ').count() < 10 {
                ParagraphRole::Emphasis
            } else {
                ParagraphRole::Body
            }
        }
    }
}

/// Render a segmented newsletter document to Markdown.
///
/// Emits the header block, a table of contents linking every section in
/// document order, then each section with its paragraphs rendered according
/// to the per-paragraph classification.
pub fn newsletter_markdown(
    document: &SegmentedDocument,
    meta: &DigestMeta,
    style: RenderStyle,
) -> String {
    let mut md = String::new();

    writeln!(md, "# {}", meta.title).unwrap();
    writeln!(md, "*Automatically generated on {}*\n", meta.generated_at).unwrap();
    writeln!(md, "**Source PDF:** {}\n", meta.source_url).unwrap();
    if let Some(listing) = &meta.discovered_from {
        writeln!(md, "**Auto-discovered from:** {listing}\n").unwrap();
    }
    md.push_str("---\n\n");

    md.push_str("## Table of Contents\n\n");
    for section in &document.sections {
        writeln!(md, "- [{}](#{})", section.name, anchor(&section.name)).unwrap();
    }
    md.push_str("\n---\n\n");

    for section in &document.sections {
        writeln!(md, "## {}\n", section.name).unwrap();
        for paragraph in &section.paragraphs {
            match classify(paragraph, style) {
                ParagraphRole::SubHeading => match style {
                    RenderStyle::Rich => writeln!(md, "### {}\n", title_case(paragraph)).unwrap(),
                    RenderStyle::Minimal => writeln!(md, "### {paragraph}\n").unwrap(),
                },
                ParagraphRole::Emphasis => writeln!(md, "**{paragraph}**\n").unwrap(),
                ParagraphRole::Body => writeln!(md, "{paragraph}\n").unwrap(),
            }
        }
        md.push_str("---\n\n");
    }

    md
}

/// Distinct article kinds in first-seen order, when every article has one.
fn grouping_kinds(articles: &[Article]) -> Option<Vec<ArticleKind>> {
    if articles.is_empty() || articles.iter().any(|a| a.kind.is_none()) {
        return None;
    }
    let mut kinds: Vec<ArticleKind> = Vec::new();
    for article in articles {
        if let Some(kind) = article.kind {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
    }
    Some(kinds)
}

/// Render a flat list of scraped articles to Markdown.
///
/// When every article carries a kind the output is grouped by kind in
/// first-seen order, with a statistics block and per-group table of
/// contents. Otherwise articles are rendered as one numbered list.
pub fn articles_markdown(articles: &[Article], meta: &DigestMeta) -> String {
    let mut md = String::new();

    writeln!(md, "# {}", meta.title).unwrap();
    writeln!(md, "*Scraped on {}*\n", meta.generated_at).unwrap();
    writeln!(md, "Source: {}\n", meta.source_url).unwrap();
    writeln!(md, "Total articles: {}\n", articles.len()).unwrap();
    md.push_str("---\n\n");

    match grouping_kinds(articles) {
        Some(kinds) => {
            md.push_str("## Statistics\n\n");
            for kind in &kinds {
                let count = articles.iter().filter(|a| a.kind == Some(*kind)).count();
                writeln!(md, "- {}: {}", kind.group_label(), count).unwrap();
            }
            md.push('\n');

            md.push_str("## Table of Contents\n\n");
            for kind in &kinds {
                writeln!(md, "### {}\n", kind.group_label()).unwrap();
                let mut index = 0usize;
                for article in articles.iter().filter(|a| a.kind == Some(*kind)) {
                    index += 1;
                    writeln!(md, "{index}. [{}](#{})", article.title, anchor(&article.title))
                        .unwrap();
                }
                md.push('\n');
            }
            md.push_str("---\n\n");

            for kind in &kinds {
                writeln!(md, "## {}\n", kind.group_label()).unwrap();
                for article in articles.iter().filter(|a| a.kind == Some(*kind)) {
                    writeln!(md, "### {}\n", article.title).unwrap();
                    write_article_body(&mut md, article, "####");
                }
            }
        }
        None => {
            md.push_str("## Table of Contents\n\n");
            for (index, article) in articles.iter().enumerate() {
                writeln!(
                    md,
                    "{}. [{}](#{})",
                    index + 1,
                    article.title,
                    anchor(&article.title)
                )
                .unwrap();
            }
            md.push_str("\n---\n\n");

            for (index, article) in articles.iter().enumerate() {
                writeln!(md, "## {}. {}\n", index + 1, article.title).unwrap();
                write_article_body(&mut md, article, "###");
            }
        }
    }

    md
}

/// Shared per-article metadata and content block.
fn write_article_body(md: &mut String, article: &Article, content_heading: &str) {
    if let Some(date) = &article.date {
        writeln!(md, "**Date:** {date}\n").unwrap();
    }
    if let Some(kind) = article.kind {
        writeln!(md, "**Type:** {}\n", kind.label()).unwrap();
    }
    writeln!(md, "**Source:** [{0}]({0})\n", article.url).unwrap();
    if let Some(summary) = &article.summary {
        writeln!(md, "**Summary:** {summary}\n").unwrap();
    }
    writeln!(md, "{content_heading} Content\n").unwrap();
    for paragraph in article.content.split("\n\n") {
        let paragraph = paragraph.trim();
        if !paragraph.is_empty() {
            writeln!(md, "{paragraph}\n").unwrap();
        }
    }
    md.push_str("---\n\n");
}
