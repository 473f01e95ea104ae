//! Fatal error types.
//!
//! Only configuration problems are treated as fatal: the scraping and
//! rendering layers degrade gracefully on surprising content, so the error
//! surface here is intentionally small. Everything else propagates as
//! `Box<dyn Error>` at the pipeline seams.

use thiserror::Error;

/// A configuration error detected at load time, before any scraping runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A section-heading pattern failed to compile as a regular expression.
    #[error("invalid section pattern `{pattern}`: {source}")]
    MalformedPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// The section pattern table was present but empty.
    #[error("section pattern table is empty")]
    EmptyPatternTable,
}
