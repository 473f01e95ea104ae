//! Section segmentation of normalized newsletter text.
//!
//! Splits paragraph-separated text into an ordered list of named sections by
//! matching each paragraph's leading prefix window against an ordered table
//! of heading patterns. The first matching pattern wins and switches the
//! current section; paragraphs that match nothing stay in whatever section
//! is current. The paragraph that triggers a section switch is appended to
//! the new section rather than discarded, matching the rendered output this
//! pipeline has always produced.
//!
//! Pattern tables are validated when a [`SegmenterConfig`] is constructed,
//! never during segmentation; malformed content can only ever degrade into
//! the default section.

use crate::error::ConfigError;
use crate::models::{Section, SegmentedDocument};
use crate::utils::title_case;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Heading recognizers for the council newsletter, checked in order.
const NEWSLETTER_PATTERNS: [&str; 20] = [
    r"lord mayor(?:'?s)?\s*(?:message|update|word)",
    r"community events?",
    r"council news",
    r"development.*(?:update|news)",
    r"transport.*(?:update|news)",
    r"parks?\s*and\s*recreation",
    r"library.*(?:news|update)",
    r"waste.*(?:collection|service)",
    r"contact.*(?:us|information)",
    r"local business",
    r"environment.*(?:news|update)",
    r"safety.*(?:update|news)",
    r"planning.*(?:update|news)",
    r"festivals?",
    r"grants?",
    r"infrastructure",
    r"what(?:'?s)?\s*on",
    r"events?\s*calendar",
    r"suburb.*(?:news|update)",
    r"roads?.*(?:work|update)",
];

/// Bare-keyword recognizers for the minimal profile.
const MINIMAL_PATTERNS: [&str; 13] = [
    r"community events?",
    r"council news",
    r"development",
    r"transport",
    r"parks? and recreation",
    r"library",
    r"waste",
    r"contact",
    r"mayor",
    r"local business",
    r"environment",
    r"safety",
    r"planning",
];

/// A compiled heading recognizer paired with its source pattern.
#[derive(Debug, Clone)]
pub struct SectionRule {
    pattern: String,
    regex: Regex,
}

impl SectionRule {
    /// Compile a case-insensitive rule, wrapping the pattern in a capture
    /// group so the matched heading text is always recoverable.
    fn compile(pattern: &str) -> Result<Self, ConfigError> {
        let regex = RegexBuilder::new(&format!("({pattern})"))
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigError::MalformedPattern {
                pattern: pattern.to_string(),
                source: Box::new(source),
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Segmentation thresholds and the ordered pattern table.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    rules: Vec<SectionRule>,
    /// Paragraphs shorter than this (in characters, after trimming) are
    /// dropped entirely.
    pub min_paragraph_len: usize,
    /// Number of leading characters inspected for heading matches.
    pub prefix_window: usize,
    /// Name of the synthetic section paragraphs land in before any heading
    /// has matched.
    pub default_section: String,
}

impl SegmenterConfig {
    /// Build a validated config from raw pattern strings.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyPatternTable`] when `patterns` is empty, or
    /// [`ConfigError::MalformedPattern`] for the first pattern that fails to
    /// compile.
    pub fn new(
        patterns: &[String],
        min_paragraph_len: usize,
        prefix_window: usize,
        default_section: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::EmptyPatternTable);
        }
        let rules = patterns
            .iter()
            .map(|p| SectionRule::compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules,
            min_paragraph_len,
            prefix_window,
            default_section: default_section.into(),
        })
    }

    /// The newsletter profile: the full heading table, a 20-character
    /// paragraph floor, and a 100-character prefix window.
    pub fn newsletter() -> Self {
        let patterns: Vec<String> = NEWSLETTER_PATTERNS.iter().map(|p| p.to_string()).collect();
        // The built-in tables are known-good; validation cannot fail here.
        Self::new(&patterns, 20, 100, "General News")
            .unwrap_or_else(|e| unreachable!("built-in pattern table failed to compile: {e}"))
    }

    /// The minimal profile: bare keywords, no paragraph floor, and a
    /// 50-character prefix window.
    pub fn minimal() -> Self {
        let patterns: Vec<String> = MINIMAL_PATTERNS.iter().map(|p| p.to_string()).collect();
        Self::new(&patterns, 0, 50, "General")
            .unwrap_or_else(|e| unreachable!("built-in pattern table failed to compile: {e}"))
    }

    pub fn rules(&self) -> &[SectionRule] {
        &self.rules
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self::newsletter()
    }
}

/// Split normalized text into named sections.
///
/// The text is split on blank-line separators into paragraphs, processed in
/// order:
/// 1. paragraphs below the minimum length are dropped
/// 2. the leading prefix window is checked against each rule in table
///    order; the first match switches the current section to the matched
///    heading text (title-cased, whitespace-collapsed)
/// 3. the full paragraph is appended to the current section, creating it on
///    first use
///
/// Sections that end up with no paragraphs (including the default section)
/// are dropped from the returned document, so empty input degrades to an
/// empty document rather than an error.
pub fn segment(text: &str, config: &SegmenterConfig) -> SegmentedDocument {
    let mut sections: Vec<Section> = vec![Section::new(&config.default_section)];
    let mut current = 0usize;

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() || paragraph.chars().count() < config.min_paragraph_len {
            continue;
        }

        let window: String = paragraph.chars().take(config.prefix_window).collect();
        for rule in &config.rules {
            if let Some(found) = rule.regex.captures(&window).and_then(|c| c.get(1)) {
                let name = title_case(found.as_str());
                current = match sections.iter().position(|s| s.name == name) {
                    Some(index) => index,
                    None => {
                        debug!(section = %name, pattern = rule.pattern(), "Opened section");
                        sections.push(Section::new(&name));
                        sections.len() - 1
                    }
                };
                break;
            }
        }

        sections[current].paragraphs.push(paragraph.to_string());
    }

    sections.retain(|s| !s.paragraphs.is_empty());
    SegmentedDocument { sections }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(paragraphs: &[&str]) -> String {
        paragraphs.join("\n\n")
    }

    #[test]
    fn heading_paragraph_lands_in_its_own_section() {
        let text = join(&[
            "COUNCIL NEWS AND UPDATES",
            "Council has approved a new budget for the year.",
            "Random unrelated text that matches no heading at all.",
        ]);
        let doc = segment(&text, &SegmenterConfig::newsletter());

        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].name, "Council News");
        // The triggering paragraph itself is appended, then the followers.
        assert_eq!(doc.sections[0].paragraphs.len(), 3);
        assert_eq!(doc.sections[0].paragraphs[0], "COUNCIL NEWS AND UPDATES");
    }

    #[test]
    fn all_followers_accumulate_under_the_matched_heading() {
        let patterns = vec!["council news".to_string()];
        let config = SegmenterConfig::new(&patterns, 0, 50, "General").unwrap();
        let text = join(&[
            "COUNCIL NEWS",
            "Council has approved a new budget.",
            "Random unrelated text.",
        ]);
        let doc = segment(&text, &config);

        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].name, "Council News");
        assert_eq!(
            doc.sections[0].paragraphs,
            vec![
                "COUNCIL NEWS",
                "Council has approved a new budget.",
                "Random unrelated text.",
            ]
        );
    }

    #[test]
    fn short_paragraphs_are_dropped_regardless_of_match() {
        let text = join(&[
            "Too short text",
            "Council news coverage continues below this heading.",
        ]);
        let doc = segment(&text, &SegmenterConfig::newsletter());
        let all: Vec<&String> = doc.sections.iter().flat_map(|s| &s.paragraphs).collect();
        assert!(all.iter().all(|p| p.as_str() != "Too short text"));
    }

    #[test]
    fn minimal_profile_keeps_short_paragraphs() {
        let doc = segment("Too short text", &SegmenterConfig::minimal());
        assert_eq!(doc.sections[0].name, "General");
        assert_eq!(doc.sections[0].paragraphs, vec!["Too short text"]);
    }

    #[test]
    fn unmatched_paragraphs_stay_in_default_section() {
        let text = join(&[
            "Nothing in this paragraph resembles a known heading.",
            "Nor in this one, which simply continues the text.",
        ]);
        let doc = segment(&text, &SegmenterConfig::newsletter());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].name, "General News");
        assert_eq!(doc.sections[0].paragraphs.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_document() {
        let doc = segment("", &SegmenterConfig::newsletter());
        assert!(doc.is_empty());
    }

    #[test]
    fn paragraph_order_is_preserved_across_sections() {
        let text = join(&[
            "An opening paragraph with no heading in sight here.",
            "Community events are happening all across the city.",
            "A follow-up item about one of those community events.",
            "Council news was announced at the town hall meeting.",
            "More detail on the council announcement follows here.",
        ]);
        let config = SegmenterConfig::newsletter();
        let doc = segment(&text, &config);

        let flattened: Vec<&str> = doc
            .sections
            .iter()
            .flat_map(|s| s.paragraphs.iter().map(String::as_str))
            .collect();
        let expected: Vec<&str> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty() && p.chars().count() >= config.min_paragraph_len)
            .collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn matches_only_within_prefix_window() {
        // "council news" appears far beyond the 100-char window, so the
        // paragraph must stay in the default section.
        let filler = "x".repeat(120);
        let text = format!("{filler} council news buried deep in the body");
        let doc = segment(&text, &SegmenterConfig::newsletter());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].name, "General News");
    }

    #[test]
    fn first_pattern_wins() {
        let patterns = vec!["events".to_string(), "community events".to_string()];
        let config = SegmenterConfig::new(&patterns, 0, 50, "General").unwrap();
        let doc = segment("Community events this month", &config);
        // The earlier, broader pattern captured first.
        assert_eq!(doc.sections[0].name, "Events");
    }

    #[test]
    fn revisiting_a_section_appends_to_it() {
        let text = join(&[
            "Community events kick off this Saturday in the park.",
            "Council news included three new local infrastructure items.",
            "Community events continue on Sunday with a market day.",
        ]);
        let doc = segment(&text, &SegmenterConfig::newsletter());
        let names: Vec<&str> = doc.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Community Events", "Council News"]);
        assert_eq!(doc.sections[0].paragraphs.len(), 2);
    }

    #[test]
    fn malformed_pattern_is_rejected_at_construction() {
        let patterns = vec!["(unclosed".to_string()];
        let err = SegmenterConfig::new(&patterns, 20, 100, "General News").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedPattern { .. }));
    }

    #[test]
    fn empty_pattern_table_is_rejected() {
        let err = SegmenterConfig::new(&[], 20, 100, "General News").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPatternTable));
    }
}
