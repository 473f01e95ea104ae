//! Output rendering modules.
//!
//! # Submodules
//!
//! - [`markdown`]: Synthesizes segmented documents and article lists into
//!   Markdown digests with anchor-linked tables of contents
//! - [`report`]: Renders the final comprehensive-summary report produced
//!   from the Ollama pass
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── brisbane_newsletter_summary.md
//! ├── qld_health_news.md
//! ├── parliament_news.md
//! └── comprehensive_news_summary_20250806_0900.md   # with --summarize
//! ```

pub mod markdown;
pub mod report;
