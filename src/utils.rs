//! Utility functions for anchors, casing, snippets, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Deterministic anchor derivation for Markdown table-of-contents links
//! - Title-casing and upper-case detection for paragraph classification
//! - Snippet truncation for summaries and log lines
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::info;

static DASH_OR_SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s-]+").unwrap());

/// Derive a deterministic URL-fragment anchor from a name.
///
/// Lowercases the name, strips every character that is not alphanumeric,
/// whitespace, or a dash, then collapses runs of whitespace and dashes to a
/// single dash. Equal names always produce equal anchors; no uniqueness
/// suffixing is performed, so duplicate names collide in a table of
/// contents.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(anchor("Council News"), "council-news");
/// assert_eq!(anchor("Lord Mayor's Message"), "lord-mayors-message");
/// ```
pub fn anchor(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    DASH_OR_SPACE_RUNS
        .replace_all(kept.trim(), "-")
        .to_lowercase()
}

/// Capitalize the first letter of each whitespace-separated word and
/// lowercase the rest, collapsing internal whitespace runs to single spaces.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the text contains at least one letter and no lowercase letters.
pub fn is_all_caps(s: &str) -> bool {
    s.chars().any(|c| c.is_alphabetic()) && !s.chars().any(|c| c.is_lowercase())
}

/// Truncate text to `max_chars` characters, appending an ellipsis when
/// anything was cut. Used for article summaries derived from lead
/// paragraphs.
pub fn ellipsis_snippet(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte count
/// indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Small sync probe write; simpler error surface than async here.
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_lowercases_and_dashes() {
        assert_eq!(anchor("Council News"), "council-news");
        assert_eq!(anchor("Lord Mayor's Message"), "lord-mayors-message");
        assert_eq!(anchor("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(anchor("Dash - Heavy -- Name"), "dash-heavy-name");
    }

    #[test]
    fn anchor_is_deterministic() {
        assert_eq!(anchor("Updates"), anchor("Updates"));
    }

    #[test]
    fn anchor_contains_only_safe_characters() {
        let a = anchor("What's On @ the Library? (June_2025)");
        assert!(
            a.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "unexpected characters in {a:?}"
        );
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("COUNCIL NEWS"), "Council News");
        assert_eq!(title_case("community   events"), "Community Events");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn all_caps_detection() {
        assert!(is_all_caps("COUNCIL NEWS 2025"));
        assert!(!is_all_caps("Council NEWS"));
        assert!(!is_all_caps("1234"));
    }

    #[test]
    fn snippets_get_ellipsis_only_when_cut() {
        assert_eq!(ellipsis_snippet("short", 10), "short");
        assert_eq!(ellipsis_snippet("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }
}
