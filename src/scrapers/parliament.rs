//! Australian Parliament House news and events scraper.
//!
//! The APH landing page mixes news stories, media releases, and event
//! notices; each item's kind is recoverable from its URL path. Link
//! discovery sweeps both direct item selectors and common content areas,
//! and per-page extraction falls back to harvesting long text lines when no
//! recognizable content container exists.

use crate::config::ScanConfig;
use crate::fetch::Fetcher;
use crate::models::{Article, ArticleKind};
use crate::utils::ellipsis_snippet;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{info, instrument, warn};
use url::Url;

const LINK_SELECTORS: [&str; 19] = [
    r#"a[href*="/News/"]"#,
    r#"a[href*="/news/"]"#,
    r#"a[href*="/Media/"]"#,
    r#"a[href*="/media/"]"#,
    r#"a[href*="/Events/"]"#,
    r#"a[href*="/events/"]"#,
    ".news-item a",
    ".media-release a",
    ".event-item a",
    ".article-link",
    ".news-title a",
    ".event-title a",
    "h2 a",
    "h3 a",
    "h4 a",
    r#"div[class*="news"] a"#,
    r#"div[class*="media"] a"#,
    r#"div[class*="event"] a"#,
    // Catch-all; the keyword filter below does the real work.
    "a",
];

/// Path keywords identifying scrapeable items.
const PATH_KEYWORDS: [&str; 5] = [
    "/news/",
    "/media/",
    "/events/",
    "/parliamentary_business/",
    "/about_parliament/",
];

/// Looser keywords for press-release style links.
const RELEASE_KEYWORDS: [&str; 4] = ["press", "release", "statement", "announcement"];

const TITLE_SELECTORS: [&str; 7] = [
    "h1",
    ".page-title",
    ".article-title",
    ".news-title",
    ".event-title",
    ".media-title",
    "title",
];

const DATE_SELECTORS: [&str; 8] = [
    ".date",
    ".publish-date",
    ".article-date",
    ".event-date",
    ".media-date",
    "time",
    r#"[class*="date"]"#,
    ".metadata .date",
];

const CONTENT_SELECTORS: [&str; 8] = [
    ".article-content",
    ".news-content",
    ".event-content",
    ".media-content",
    ".content",
    ".article-body",
    ".main-content",
    "main",
];

/// Phrases marking navigation chrome in the whole-page fallback.
const NAV_PHRASES: [&str; 4] = ["navigation", "menu", "skip to", "breadcrumb"];

const MIN_PARAGRAPH_CHARS: usize = 30;
const MIN_FALLBACK_LINE_CHARS: usize = 50;
const MAX_FALLBACK_LINES: usize = 10;
const SUMMARY_CHARS: usize = 250;

static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(Published|Date):?\s*").unwrap());
static INNER_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Derive an item's kind from its URL path.
pub fn kind_from_url(url: &str) -> ArticleKind {
    let lower = url.to_lowercase();
    if lower.contains("/events/") {
        ArticleKind::Event
    } else if lower.contains("/media/") {
        ArticleKind::Media
    } else {
        ArticleKind::News
    }
}

/// Extract item links from the landing page, de-duplicated in first-seen
/// order.
pub fn extract_item_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    let site_host = base.host_str().unwrap_or_default().to_string();

    let mut links = Vec::new();
    for selector_source in LINK_SELECTORS {
        let Ok(selector) = Selector::parse(selector_source) else {
            continue;
        };
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(resolved) = base.join(href) else {
                continue;
            };
            if resolved.host_str() != Some(site_host.as_str()) {
                continue;
            }
            let url = resolved.to_string();
            let lower = url.to_lowercase();
            if PATH_KEYWORDS.iter().any(|k| lower.contains(k))
                || RELEASE_KEYWORDS.iter().any(|k| lower.contains(k))
            {
                links.push(url);
            }
        }
    }
    links.into_iter().unique().collect()
}

fn select_first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_source in selectors {
        let Ok(selector) = Selector::parse(selector_source) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = element.text().collect::<Vec<_>>().join(" ").trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Page title, rejecting the site-wide banner and too-short strings.
fn extract_title(document: &Html) -> Option<String> {
    for selector_source in TITLE_SELECTORS {
        let Ok(selector) = Selector::parse(selector_source) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = element.text().collect::<Vec<_>>().join(" ");
            let text = INNER_WHITESPACE.replace_all(text.trim(), " ").to_string();
            if text.chars().count() > 10 && !text.contains("Parliament of Australia") {
                return Some(text);
            }
        }
    }
    None
}

fn extract_date(document: &Html) -> Option<String> {
    select_first_text(document, &DATE_SELECTORS)
        .map(|d| DATE_PREFIX.replace(&d, "").trim().to_string())
        .filter(|d| !d.is_empty() && d.chars().count() < 50)
}

fn collect_paragraphs(document: &Html) -> Vec<String> {
    let Ok(p_selector) = Selector::parse("p") else {
        return Vec::new();
    };
    for selector_source in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_source) else {
            continue;
        };
        if let Some(container) = document.select(&selector).next() {
            let paragraphs: Vec<String> = container
                .select(&p_selector)
                .map(|p| {
                    let text = p.text().collect::<Vec<_>>().join(" ");
                    INNER_WHITESPACE.replace_all(text.trim(), " ").to_string()
                })
                .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
                .collect();
            if !paragraphs.is_empty() {
                return paragraphs;
            }
        }
    }
    Vec::new()
}

/// Whole-page harvest used when no content container matched: long text
/// lines that don't look like navigation chrome.
fn fallback_lines(document: &Html) -> Vec<String> {
    document
        .root_element()
        .text()
        .flat_map(|chunk| chunk.split('\n'))
        .map(|line| line.trim().to_string())
        .filter(|line| line.chars().count() > MIN_FALLBACK_LINE_CHARS)
        .filter(|line| {
            let lower = line.to_lowercase();
            !NAV_PHRASES.iter().any(|phrase| lower.contains(phrase))
        })
        .take(MAX_FALLBACK_LINES)
        .collect()
}

/// Parse one item page into a typed [`Article`].
pub fn parse_item(html: &str, url: &str) -> Option<Article> {
    let document = Html::parse_document(html);

    let title = extract_title(&document)?;
    let date = extract_date(&document);

    let mut paragraphs = collect_paragraphs(&document);
    if paragraphs.is_empty() {
        paragraphs = fallback_lines(&document);
    }
    if paragraphs.is_empty() {
        return None;
    }
    let summary = ellipsis_snippet(&paragraphs[0], SUMMARY_CHARS);

    Some(Article {
        url: url.to_string(),
        title,
        date,
        summary: Some(summary),
        content: paragraphs.join("\n\n"),
        kind: Some(kind_from_url(url)),
    })
}

/// Scrape the landing page and each discovered item.
#[instrument(level = "info", skip_all)]
pub async fn scrape(fetcher: &Fetcher, config: &ScanConfig) -> Result<Vec<Article>, Box<dyn Error>> {
    let base_url = &config.sources.parliament_url;
    let max_articles = config.limits.max_parliament_articles;

    let html = fetcher.get_text(base_url).await?;
    let links = extract_item_links(&html, base_url);
    info!(count = links.len(), "Found potential item links");

    let articles: Vec<Article> = stream::iter(links.iter().take(max_articles).enumerate())
        .then(|(index, link)| async move {
            fetcher.polite_pause().await;
            match fetcher.get_text(link).await {
                Ok(page) => match parse_item(&page, link) {
                    Some(article) => {
                        info!(index, kind = article.kind.map(|k| k.label()), title = %article.title, "Scraped item");
                        Some(article)
                    }
                    None => {
                        warn!(index, url = %link, "No usable content extracted");
                        None
                    }
                },
                Err(e) => {
                    warn!(index, url = %link, error = %e, "Item fetch failed");
                    None
                }
            }
        })
        .filter_map(|opt| std::future::ready(opt))
        .collect()
        .await;
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.aph.gov.au/News_and_Events";

    #[test]
    fn kinds_derive_from_url_path() {
        assert_eq!(kind_from_url("https://x/Events/open-day"), ArticleKind::Event);
        assert_eq!(kind_from_url("https://x/Media/release-12"), ArticleKind::Media);
        assert_eq!(kind_from_url("https://x/News/sitting-dates"), ArticleKind::News);
    }

    #[test]
    fn links_keep_same_host_and_known_paths() {
        let html = r#"
            <html><body>
              <h2><a href="/News/budget-hearing">Budget hearing</a></h2>
              <a href="/Events/open-day">Open day</a>
              <a href="https://elsewhere.example.com/news/other">External</a>
              <a href="/visit/cafe">Cafe</a>
              <a href="/About_Parliament/press-gallery-statement">Statement</a>
            </body></html>
        "#;
        let links = extract_item_links(html, BASE);
        assert_eq!(
            links,
            [
                "https://www.aph.gov.au/News/budget-hearing",
                "https://www.aph.gov.au/Events/open-day",
                "https://www.aph.gov.au/About_Parliament/press-gallery-statement",
            ]
        );
    }

    #[test]
    fn site_banner_title_is_rejected() {
        let html = r#"
            <html><head><title>Parliament of Australia</title></head>
            <body>
              <h1>Senate estimates hearings announced</h1>
              <div class="content"><p>The Senate will hold estimates hearings across two weeks in October.</p></div>
            </body></html>
        "#;
        let article = parse_item(html, "https://www.aph.gov.au/News/estimates").unwrap();
        assert_eq!(article.title, "Senate estimates hearings announced");
        assert_eq!(article.kind, Some(ArticleKind::News));
    }

    #[test]
    fn short_paragraphs_are_dropped() {
        let html = r#"
            <html><body>
              <h1>Committee membership changes</h1>
              <div class="content">
                <p>Read more</p>
                <p>Three committees received new members following the latest round of appointments.</p>
              </div>
            </body></html>
        "#;
        let article = parse_item(html, "https://www.aph.gov.au/News/committees").unwrap();
        assert_eq!(article.content.split("\n\n").count(), 1);
    }

    #[test]
    fn fallback_harvests_long_lines_when_no_container_matches() {
        let html = r#"
            <html><body>
              <h1>Parliamentary schedule for the spring sittings</h1>
              <span>Skip to main navigation menu links for this site</span>
              <span>The spring sitting calendar includes fourteen days across September and October.</span>
            </body></html>
        "#;
        let article = parse_item(html, "https://www.aph.gov.au/News/schedule").unwrap();
        assert!(article
            .content
            .contains("The spring sitting calendar includes fourteen days"));
        assert!(!article.content.to_lowercase().contains("navigation"));
    }

    #[test]
    fn date_is_cleaned_and_bounded() {
        let html = r#"
            <html><body>
              <h1>Budget hearing scheduled today</h1>
              <span class="date">Date: 12 September 2025</span>
              <div class="content"><p>The hearing will examine departmental spending in detail.</p></div>
            </body></html>
        "#;
        let article = parse_item(html, "https://www.aph.gov.au/News/budget").unwrap();
        assert_eq!(article.date.as_deref(), Some("12 September 2025"));
    }

    #[test]
    fn summary_is_capped_at_250_characters() {
        let lead = "b".repeat(400);
        let html = format!(
            r#"<html><body><h1>A sufficiently long title</h1><div class="content"><p>{lead}</p></div></body></html>"#
        );
        let article = parse_item(&html, "https://www.aph.gov.au/News/long").unwrap();
        assert_eq!(article.summary.unwrap().chars().count(), 253);
    }
}
