//! Command-line interface definitions.
//!
//! All options can be provided via command-line flags; the Ollama settings
//! also read environment variables so cron invocations stay short.

use clap::Parser;

/// Command-line arguments for the civic news digest pipeline.
///
/// # Examples
///
/// ```sh
/// # Scrape everything into ./digests
/// civic_news_digest -o ./digests
///
/// # Scrape and build the comprehensive Ollama summary in Spanish
/// civic_news_digest -o ./digests --summarize --language es
///
/// # Only the newsletter, with a custom config file
/// civic_news_digest -o ./digests --skip-health --skip-parliament -c scan.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the Markdown digests
    #[arg(short, long, default_value = "./digests")]
    pub output_dir: String,

    /// Optional path to a YAML config file overriding the built-in defaults
    #[arg(short, long)]
    pub config: Option<String>,

    /// Skip the council newsletter scan
    #[arg(long)]
    pub skip_newsletter: bool,

    /// Skip the health newsroom scraper
    #[arg(long)]
    pub skip_health: bool,

    /// Skip the parliament news scraper
    #[arg(long)]
    pub skip_parliament: bool,

    /// Use the simpler newsletter segmentation profile: bare keyword
    /// headings, a 50-character match window, no paragraph-length floor
    #[arg(long)]
    pub minimal: bool,

    /// Summarize the produced digests with a local Ollama model
    #[arg(long)]
    pub summarize: bool,

    /// Ollama base URL
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    pub ollama_url: String,

    /// Ollama model name
    #[arg(long, env = "OLLAMA_MODEL", default_value = "llama3.1:8b")]
    pub model: String,

    /// Target language for summaries (code or name, e.g. "es" or "spanish")
    #[arg(long)]
    pub language: Option<String>,
}
