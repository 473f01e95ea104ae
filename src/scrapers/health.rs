//! Queensland Health newsroom scraper.
//!
//! Scrapes the newsroom listing for article links, then each article page
//! for title, date, and body paragraphs. The newsroom intermittently blocks
//! scripted clients, so when the listing yields nothing the scraper probes
//! the site's known RSS endpoints instead and builds articles from feed
//! items.
//!
//! Articles come back kind-less; the synthesizer renders them as one
//! numbered list.

use crate::config::ScanConfig;
use crate::fetch::Fetcher;
use crate::models::Article;
use crate::utils::ellipsis_snippet;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{info, instrument, warn};
use url::Url;

const LINK_SELECTORS: [&str; 6] = [
    r#"a[href*="/news/"]"#,
    ".news-item a",
    ".article-link",
    ".news-title a",
    "h3 a",
    "h2 a",
];

const TITLE_SELECTORS: [&str; 5] = ["h1", ".page-title", ".article-title", ".news-title", "title"];

const DATE_SELECTORS: [&str; 6] = [
    ".date",
    ".publish-date",
    ".article-date",
    "time",
    ".news-date",
    r#"[class*="date"]"#,
];

const CONTENT_SELECTORS: [&str; 6] = [
    ".article-content",
    ".news-content",
    ".content",
    ".article-body",
    "main",
    ".main-content",
];

/// RSS endpoints probed when the listing cannot be scraped.
const RSS_URLS: [&str; 4] = [
    "https://www.health.qld.gov.au/news/rss",
    "https://www.health.qld.gov.au/newsroom/rss",
    "https://www.health.qld.gov.au/feed",
    "https://www.health.qld.gov.au/rss.xml",
];

/// Body paragraphs shorter than this are navigation debris, not content.
const MIN_PARAGRAPH_CHARS: usize = 20;

const SUMMARY_CHARS: usize = 200;

static PUBLISHED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Published:?\s*").unwrap());

/// Extract article links from the newsroom listing page.
///
/// Layered selectors with a `/news/` path filter; duplicates collapse in
/// first-seen order.
pub fn extract_article_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };

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
            let url = resolved.to_string();
            if url.contains("/news/") {
                links.push(url);
            }
        }
    }
    links.into_iter().unique().collect()
}

/// First non-empty text for any selector in the list.
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

/// Collect body paragraphs from the first matching content container,
/// falling back to every `<p>` on the page.
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
                .map(|p| p.text().collect::<Vec<_>>().join(" ").trim().to_string())
                .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
                .collect();
            if !paragraphs.is_empty() {
                return paragraphs;
            }
        }
    }

    document
        .select(&p_selector)
        .map(|p| p.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect()
}

/// Parse one article page. Returns `None` when no usable title or content
/// was found; such pages are skipped, never fatal.
pub fn parse_article(html: &str, url: &str) -> Option<Article> {
    let document = Html::parse_document(html);

    let title = select_first_text(&document, &TITLE_SELECTORS)?;
    let date = select_first_text(&document, &DATE_SELECTORS)
        .map(|d| PUBLISHED_PREFIX.replace(&d, "").trim().to_string())
        .filter(|d| !d.is_empty());

    let paragraphs = collect_paragraphs(&document);
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
        kind: None,
    })
}

/// Strip markup from an RSS description, keeping the visible text.
fn strip_tags(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    parsed
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse `<item>` elements from an RSS feed body.
pub fn parse_rss_items(xml: &str) -> Vec<Article> {
    #[derive(Default)]
    struct ItemFields {
        title: String,
        link: String,
        pub_date: String,
        description: String,
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut articles = Vec::new();
    let mut item: Option<ItemFields> = None;
    let mut field: Option<&'static str> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                match e.local_name().as_ref() {
                    b"item" => item = Some(ItemFields::default()),
                    b"title" => field = Some("title"),
                    b"link" => field = Some("link"),
                    b"pubDate" => field = Some("pubDate"),
                    b"description" => field = Some("description"),
                    _ => field = None,
                }
                text.clear();
            }
            Ok(Event::Text(t)) => {
                if let Ok(decoded) = t.decode() {
                    text.push_str(&decoded);
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if let Ok(Some(ch)) = r.resolve_char_ref() {
                    text.push(ch);
                } else if let Ok(name) = r.decode() {
                    if let Some(resolved) = quick_xml::escape::resolve_predefined_entity(&name) {
                        text.push_str(resolved);
                    }
                }
            }
            Ok(Event::CData(t)) => {
                text.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"item" {
                    if let Some(fields) = item.take() {
                        if !fields.title.is_empty() {
                            articles.push(Article {
                                url: fields.link,
                                title: fields.title,
                                date: (!fields.pub_date.is_empty()).then_some(fields.pub_date),
                                summary: (!fields.description.is_empty())
                                    .then_some(fields.description),
                                content: String::new(),
                                kind: None,
                            });
                        }
                    }
                } else if let Some(fields) = item.as_mut() {
                    match (e.local_name().as_ref(), field) {
                        (b"title", Some("title")) => fields.title = text.trim().to_string(),
                        (b"link", Some("link")) => fields.link = text.trim().to_string(),
                        (b"pubDate", Some("pubDate")) => fields.pub_date = text.trim().to_string(),
                        (b"description", Some("description")) => {
                            fields.description = strip_tags(text.trim());
                        }
                        _ => {}
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(error = %e, "RSS parse error; keeping items parsed so far");
                break;
            }
            _ => {}
        }
    }

    articles
}

/// Try each known RSS endpoint until one yields items.
async fn rss_fallback(fetcher: &Fetcher) -> Vec<Article> {
    for rss_url in RSS_URLS {
        match fetcher.get_text(rss_url).await {
            Ok(xml) => {
                let items = parse_rss_items(&xml);
                if !items.is_empty() {
                    info!(count = items.len(), url = rss_url, "Built articles from RSS feed");
                    return items;
                }
            }
            Err(e) => {
                warn!(url = rss_url, error = %e, "RSS endpoint unavailable");
            }
        }
    }
    Vec::new()
}

/// Scrape the newsroom, falling back to RSS when the listing yields nothing.
#[instrument(level = "info", skip_all)]
pub async fn scrape(fetcher: &Fetcher, config: &ScanConfig) -> Result<Vec<Article>, Box<dyn Error>> {
    let base_url = &config.sources.health_news_url;
    let max_articles = config.limits.max_health_articles;

    let links = match fetcher.get_text(base_url).await {
        Ok(html) => extract_article_links(&html, base_url),
        Err(e) => {
            warn!(error = %e, "Failed to fetch newsroom listing");
            Vec::new()
        }
    };
    info!(count = links.len(), "Found potential article links");

    if links.is_empty() {
        return Ok(rss_fallback(fetcher).await);
    }

    let articles: Vec<Article> = stream::iter(links.iter().take(max_articles).enumerate())
        .then(|(index, link)| async move {
            fetcher.polite_pause().await;
            match fetcher.get_text(link).await {
                Ok(html) => match parse_article(&html, link) {
                    Some(article) => {
                        info!(index, title = %article.title, "Scraped article");
                        Some(article)
                    }
                    None => {
                        warn!(index, url = %link, "No usable content extracted");
                        None
                    }
                },
                Err(e) => {
                    warn!(index, url = %link, error = %e, "Article fetch failed");
                    None
                }
            }
        })
        .filter_map(|opt| std::future::ready(opt))
        .collect()
        .await;

    if articles.is_empty() {
        return Ok(rss_fallback(fetcher).await);
    }
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.health.example.gov.au/newsroom/news";

    #[test]
    fn listing_links_are_filtered_and_deduplicated() {
        let html = r#"
            <html><body>
              <h3><a href="/news/new-hospital-wing">New hospital wing</a></h3>
              <div class="news-item"><a href="/news/new-hospital-wing">New hospital wing</a></div>
              <a href="/news/flu-season-update">Flu season update</a>
              <a href="/careers/nursing">Nursing careers</a>
            </body></html>
        "#;
        let links = extract_article_links(html, BASE);
        assert_eq!(
            links,
            [
                "https://www.health.example.gov.au/news/new-hospital-wing",
                "https://www.health.example.gov.au/news/flu-season-update",
            ]
        );
    }

    #[test]
    fn article_fields_are_extracted() {
        let html = r#"
            <html><body>
              <h1>New hospital wing opens</h1>
              <span class="date">Published: 6 August 2025</span>
              <div class="article-content">
                <p>The new wing adds two hundred beds to the hospital campus.</p>
                <p>short</p>
                <p>Construction finished ahead of schedule and under budget.</p>
              </div>
            </body></html>
        "#;
        let article = parse_article(html, "https://x/news/wing").unwrap();
        assert_eq!(article.title, "New hospital wing opens");
        assert_eq!(article.date.as_deref(), Some("6 August 2025"));
        assert_eq!(
            article.summary.as_deref(),
            Some("The new wing adds two hundred beds to the hospital campus.")
        );
        // The short paragraph was dropped.
        assert_eq!(article.content.split("\n\n").count(), 2);
        assert!(article.kind.is_none());
    }

    #[test]
    fn long_lead_paragraph_is_truncated_into_summary() {
        let lead = "a".repeat(300);
        let html = format!(
            r#"<html><body><h1>Title here</h1><div class="content"><p>{lead}</p></div></body></html>"#
        );
        let article = parse_article(&html, "https://x/news/long").unwrap();
        let summary = article.summary.unwrap();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 203);
    }

    #[test]
    fn page_without_content_is_skipped() {
        let html = "<html><body><h1>Title only</h1></body></html>";
        assert!(parse_article(html, "https://x/news/empty").is_none());
    }

    #[test]
    fn rss_items_become_articles() {
        let xml = r#"<?xml version="1.0"?>
            <rss version="2.0"><channel>
              <title>Newsroom</title>
              <item>
                <title>Vaccination clinics extended</title>
                <link>https://x/news/clinics</link>
                <pubDate>Wed, 06 Aug 2025 09:00:00 +1000</pubDate>
                <description>&lt;p&gt;Clinics stay open &lt;b&gt;late&lt;/b&gt; this month.&lt;/p&gt;</description>
              </item>
              <item>
                <title>Second item</title>
                <link>https://x/news/second</link>
              </item>
            </channel></rss>
        "#;
        let articles = parse_rss_items(xml);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Vaccination clinics extended");
        assert_eq!(articles[0].url, "https://x/news/clinics");
        assert_eq!(
            articles[0].summary.as_deref(),
            Some("Clinics stay open late this month.")
        );
        assert!(articles[1].date.is_none());
        assert!(articles[1].summary.is_none());
    }

    #[test]
    fn channel_title_does_not_leak_into_items() {
        let xml = r#"<rss><channel><title>Feed title</title></channel></rss>"#;
        assert!(parse_rss_items(xml).is_empty());
    }
}
