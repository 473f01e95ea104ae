//! Source scrapers that turn live pages into digest inputs.
//!
//! Each scraper owns the quirks of one source and hands uniform values to
//! the shared core (normalization, segmentation, synthesis):
//!
//! | Source | Module | Shape | Notes |
//! |--------|--------|-------|-------|
//! | Living in Brisbane newsletter | [`newsletter`] | PDF → segmented document | Auto-discovers and ranks PDF links |
//! | Queensland Health newsroom | [`health`] | HTML → flat article list | RSS fallback when the listing blocks scraping |
//! | Australian Parliament House | [`parliament`] | HTML → typed article list | Items classified as news/media/event |
//!
//! # Common Patterns
//!
//! Scrapers share the dual-identity [`crate::fetch::Fetcher`], resolve
//! relative hrefs against their base URL, de-duplicate discovered links in
//! first-seen order, and skip (never abort on) articles that fail to yield
//! a title and content. Element lookup is layered: an ordered list of CSS
//! selectors tried most-specific first, with progressively looser
//! fallbacks.

pub mod health;
pub mod newsletter;
pub mod parliament;
