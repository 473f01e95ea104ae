//! Living in Brisbane newsletter scanner.
//!
//! The council publishes its newsletter as a PDF linked from a listing page
//! that also carries regional variants and archive editions. This module
//! discovers every PDF link on that page, ranks them with the candidate
//! scorer to pick the latest edition, downloads and decodes it, and runs
//! the text through normalization, segmentation, and synthesis.
//!
//! When discovery or ranking comes up empty the scanner falls back to a
//! configured last-known-good PDF URL rather than failing the run.

use crate::config::ScanConfig;
use crate::fetch::Fetcher;
use crate::models::{DigestMeta, PdfCandidate};
use crate::normalize::normalize;
use crate::outputs::markdown::{newsletter_markdown, RenderStyle};
use crate::ranking::{score_and_rank, ScanDate};
use crate::pdf;
use crate::segment::{segment, SegmenterConfig};
use chrono::Local;
use itertools::Itertools;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Layered PDF-link selectors, most specific first.
const PDF_SELECTORS: [&str; 7] = [
    r#"a[href$=".pdf"]"#,
    r#"a[href*=".pdf"]"#,
    r#"a[href*="living-in-brisbane"]"#,
    r#"a[href*="newsletter"]"#,
    ".download-link a",
    ".pdf-link",
    ".document-link a",
];

/// A link must mention one of these to count as a newsletter candidate.
const CANDIDATE_KEYWORDS: [&str; 3] = ["living-in-brisbane", "newsletter", "brisbane"];

/// Discover newsletter-PDF candidates on the listing page.
///
/// Hrefs are resolved against `page_url`; only links whose URL contains
/// `.pdf` survive. Links matching a candidate keyword are preferred; when
/// none match, every PDF link on the page is taken instead. Duplicates are
/// dropped in first-seen order.
pub fn discover_candidates(html: &str, page_url: &str) -> Vec<PdfCandidate> {
    let document = Html::parse_document(html);
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(e) => {
            warn!(%page_url, error = %e, "Listing page URL failed to parse");
            return Vec::new();
        }
    };

    let mut keyword_matches = Vec::new();
    let mut all_pdfs = Vec::new();

    for selector_source in PDF_SELECTORS {
        let Ok(selector) = Selector::parse(selector_source) else {
            continue;
        };
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if !href.to_lowercase().contains(".pdf") {
                continue;
            }
            let Ok(resolved) = base.join(href) else {
                continue;
            };
            let url = resolved.to_string();
            let display_text = element.text().collect::<Vec<_>>().join(" ").trim().to_string();
            let title_attr = element.value().attr("title").unwrap_or_default().to_string();
            let candidate = PdfCandidate::new(url.clone(), display_text, title_attr);

            if CANDIDATE_KEYWORDS.iter().any(|k| url.to_lowercase().contains(k)) {
                keyword_matches.push(candidate);
            } else {
                all_pdfs.push(candidate);
            }
        }
    }

    let chosen = if keyword_matches.is_empty() {
        all_pdfs
    } else {
        keyword_matches
    };
    chosen
        .into_iter()
        .unique_by(|c| c.url.clone())
        .collect()
}

/// Pick the newsletter PDF URL: best-ranked candidate or the fallback.
fn select_pdf_url(candidates: Vec<PdfCandidate>, config: &ScanConfig) -> String {
    let ranked = score_and_rank(
        candidates,
        ScanDate::now(),
        &config.weights,
        &config.sources.canonical_keyword,
    );
    match ranked.into_iter().next() {
        Some(best) => {
            info!(
                score = best.score,
                url = %best.url,
                text = %best.display_text,
                title = %best.title_attr,
                "Selected newsletter PDF"
            );
            best.url
        }
        None => {
            warn!(fallback = %config.sources.fallback_pdf_url, "No PDF candidates; using fallback URL");
            config.sources.fallback_pdf_url.clone()
        }
    }
}

/// Run the full newsletter scan and return the synthesized Markdown.
#[instrument(level = "info", skip_all)]
pub async fn scan(
    fetcher: &Fetcher,
    config: &ScanConfig,
    segmenter: &SegmenterConfig,
    style: RenderStyle,
) -> Result<String, Box<dyn Error>> {
    let page_url = config.sources.newsletter_page_url.clone();

    let pdf_url = match fetcher.get_text(&page_url).await {
        Ok(html) => {
            let candidates = discover_candidates(&html, &page_url);
            info!(count = candidates.len(), "Discovered PDF candidates");
            debug!(urls = ?candidates.iter().map(|c| &c.url).collect::<Vec<_>>(), "Candidate URLs");
            select_pdf_url(candidates, config)
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch newsletter listing; using fallback URL");
            config.sources.fallback_pdf_url.clone()
        }
    };

    let (bytes, content_type) = fetcher.get_bytes(&pdf_url).await?;
    if !pdf::looks_like_pdf(content_type.as_deref(), bytes.len()) {
        return Err("downloaded file does not appear to be a valid PDF".into());
    }
    info!(bytes = bytes.len(), url = %pdf_url, "Downloaded newsletter PDF");

    let raw_text = tokio::task::spawn_blocking(move || pdf::extract_text(&bytes)).await??;
    let text = normalize(&raw_text);
    let document = segment(&text, segmenter);
    info!(
        sections = document.sections.len(),
        paragraphs = document.paragraph_count(),
        "Segmented newsletter"
    );

    let meta = DigestMeta {
        title: "Brisbane Newsletter Summary".to_string(),
        source_url: pdf_url,
        discovered_from: Some(page_url),
        generated_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
    };
    Ok(newsletter_markdown(&document, &meta, style))
}
