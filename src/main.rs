//! # Civic News Digest
//!
//! A scraping and summarization pipeline that turns heterogeneous civic
//! news sources (a council newsletter published as PDF, two government
//! newsroom sites) into uniform structured Markdown digests, optionally
//! feeding them to a local Ollama model for one comprehensive summary.
//!
//! ## Features
//!
//! - Auto-discovers the latest Living in Brisbane newsletter PDF by
//!   scoring every PDF link on the listing page
//! - Decodes and segments the newsletter into named sections with a
//!   deterministic anchor-linked table of contents
//! - Scrapes the Queensland Health newsroom (with an RSS fallback) and the
//!   Australian Parliament House news pages
//! - Optionally summarizes all produced digests through Ollama into a
//!   single comprehensive report
//!
//! ## Usage
//!
//! ```sh
//! civic_news_digest -o ./digests --summarize
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: Find candidate documents/links on each source
//! 2. **Fetching**: Download pages and PDF bytes
//! 3. **Extraction**: Decode, normalize, and segment the text
//! 4. **Output**: Synthesize Markdown digests and write them out
//! 5. **Summarization** (optional): Per-digest and comprehensive Ollama
//!    summaries

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod normalize;
mod outputs;
mod pdf;
mod ranking;
mod scrapers;
mod segment;
mod summarize;
mod utils;

use cli::Cli;
use config::ScanConfig;
use fetch::Fetcher;
use models::DigestMeta;
use outputs::{markdown, report};
use summarize::{
    comprehensive_summary, language_display_name, summarize_digest, OllamaClient,
};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("civic_news_digest starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.config, "Parsed CLI arguments");

    // --- Configuration (pattern validation happens here, before any I/O) ---
    let config = match &args.config {
        Some(path) => ScanConfig::load(path).await?,
        None => ScanConfig::default(),
    };
    let (segmenter, style) = if args.minimal {
        (
            segment::SegmenterConfig::minimal(),
            markdown::RenderStyle::Minimal,
        )
    } else {
        (config.segmenter_config()?, markdown::RenderStyle::Rich)
    };

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = Fetcher::new()?;
    let generated_at = Local::now().format("%Y-%m-%d %H:%M").to_string();

    // ---- Run the enabled scrapers ----
    let mut digests: Vec<(String, String)> = Vec::new();

    if !args.skip_newsletter {
        match scrapers::newsletter::scan(&fetcher, &config, &segmenter, style).await {
            Ok(md) => digests.push(("brisbane_newsletter_summary.md".to_string(), md)),
            Err(e) => error!(error = %e, "Newsletter scan failed"),
        }
    }

    if !args.skip_health {
        match scrapers::health::scrape(&fetcher, &config).await {
            Ok(articles) if !articles.is_empty() => {
                info!(count = articles.len(), "Scraped health articles");
                let meta = DigestMeta {
                    title: "Queensland Health News".to_string(),
                    source_url: config.sources.health_news_url.clone(),
                    discovered_from: None,
                    generated_at: generated_at.clone(),
                };
                digests.push((
                    "qld_health_news.md".to_string(),
                    markdown::articles_markdown(&articles, &meta),
                ));
            }
            Ok(_) => warn!("No health articles were successfully scraped"),
            Err(e) => error!(error = %e, "Health newsroom scrape failed"),
        }
    }

    if !args.skip_parliament {
        match scrapers::parliament::scrape(&fetcher, &config).await {
            Ok(articles) if !articles.is_empty() => {
                info!(count = articles.len(), "Scraped parliament items");
                let meta = DigestMeta {
                    title: "Australian Parliament House News & Events".to_string(),
                    source_url: config.sources.parliament_url.clone(),
                    discovered_from: None,
                    generated_at: generated_at.clone(),
                };
                digests.push((
                    "parliament_news.md".to_string(),
                    markdown::articles_markdown(&articles, &meta),
                ));
            }
            Ok(_) => warn!("No parliament items were successfully scraped"),
            Err(e) => error!(error = %e, "Parliament scrape failed"),
        }
    }

    // ---- Write digests ----
    for (filename, content) in &digests {
        let path = format!("{}/{}", args.output_dir.trim_end_matches('/'), filename);
        match tokio::fs::write(&path, content).await {
            Ok(()) => info!(path = %path, chars = content.chars().count(), "Wrote digest"),
            Err(e) => error!(path = %path, error = %e, "Failed writing digest"),
        }
    }

    // ---- Optional Ollama summarization ----
    if args.summarize {
        if digests.is_empty() {
            warn!("Nothing to summarize; all scrapers came back empty");
        } else if let Err(e) = run_summarization(&args, &digests).await {
            error!(error = %e, "Summarization failed; digests were still written");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        digests = digests.len(),
        "Execution complete"
    );

    Ok(())
}

/// Summarize each digest through Ollama and write the comprehensive report.
async fn run_summarization(
    args: &Cli,
    digests: &[(String, String)],
) -> Result<(), Box<dyn Error>> {
    let language = args.language.as_deref().map(language_display_name);
    let client = OllamaClient::new(&args.ollama_url, &args.model)?;

    client.check_connection().await?;
    client.ensure_model().await?;

    let mut summaries = Vec::new();
    for (filename, content) in digests {
        match summarize_digest(&client, filename, content, language.as_deref()).await {
            Ok(summary) => summaries.push(summary),
            Err(e) => warn!(file = %filename, error = %e, "Digest summarization failed; skipping"),
        }
    }
    if summaries.is_empty() {
        return Err("no digests were successfully summarized".into());
    }

    let overview = comprehensive_summary(&client, &summaries, language.as_deref()).await?;
    let generated_at = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let report_md = report::final_report(
        &overview,
        &summaries,
        client.model(),
        &generated_at,
        language.as_deref(),
    );

    let file_stamp = Local::now().format("%Y%m%d_%H%M");
    let report_name = match &language {
        Some(lang) => {
            let tag = lang
                .split_whitespace()
                .next()
                .unwrap_or(lang.as_str())
                .to_lowercase();
            format!("comprehensive_news_summary_{tag}_{file_stamp}.md")
        }
        None => format!("comprehensive_news_summary_{file_stamp}.md"),
    };
    let path = format!("{}/{}", args.output_dir.trim_end_matches('/'), report_name);

    tokio::fs::write(&path, &report_md).await?;
    info!(path = %path, sources = summaries.len(), "Wrote comprehensive summary");
    Ok(())
}
