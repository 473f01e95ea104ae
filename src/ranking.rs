//! Heuristic scoring to pick the latest newsletter among discovered links.
//!
//! Listing pages carry several PDF links (current edition, regional variants,
//! archives). [`score_and_rank`] assigns each candidate an additive relevance
//! score from temporal and keyword signals and returns the list ranked
//! highest-first. The weight table is externalized as [`ScoreWeights`] so the
//! heuristic stays tunable and testable independent of the defaults.
//!
//! Returning an empty list is a signal, not an error; the caller owns the
//! fallback policy (a last-known-good URL).

use crate::models::PdfCandidate;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lowercase English month names, index 0 = January.
const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Keywords suggesting a link points at the newest edition.
const FRESHNESS_KEYWORDS: [&str; 3] = ["latest", "current", "new"];

/// Additive score contributions for each ranking signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Current year token appears in URL or display text.
    pub year_match: i64,
    /// A month name within the recency window appears.
    pub month_recent: i64,
    /// A month name outside the recency window appears.
    pub month_older: i64,
    /// "latest"/"current"/"new" appears in the display text.
    pub keyword_latest: i64,
    /// The source-specific canonical keyword appears in the URL.
    pub canonical_keyword: i64,
    /// The generic keyword "newsletter" appears in URL or display text.
    pub newsletter_keyword: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            year_match: 10,
            month_recent: 8,
            month_older: 3,
            keyword_latest: 5,
            canonical_keyword: 15,
            newsletter_keyword: 5,
        }
    }
}

/// The temporal context scoring runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanDate {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
}

impl ScanDate {
    /// The current local year and month.
    pub fn now() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }
}

/// Score candidates and return them ranked highest-first.
///
/// Rules are cumulative and applied to lowercase views of each candidate's
/// URL and display text:
/// - the current year token in URL or text
/// - each month name found contributes independently; a month whose number
///   is at least two below the current month counts as recent (months past
///   the current one also land in the window, matching the sliding
///   lower-bound comparison)
/// - a freshness keyword in the display text
/// - the canonical source keyword in the URL
/// - "newsletter" in URL or text
///
/// The sort is stable: candidates with equal scores keep their discovery
/// order. An empty input yields an empty output.
pub fn score_and_rank(
    candidates: Vec<PdfCandidate>,
    now: ScanDate,
    weights: &ScoreWeights,
    canonical_keyword: &str,
) -> Vec<PdfCandidate> {
    let year_token = now.year.to_string();
    let recent_floor = now.month.saturating_sub(2);

    let mut scored: Vec<PdfCandidate> = candidates
        .into_iter()
        .map(|mut candidate| {
            let url = candidate.url.to_lowercase();
            let text = candidate.display_text.to_lowercase();
            let mut score = 0i64;

            if url.contains(&year_token) || text.contains(&year_token) {
                score += weights.year_match;
            }

            for (index, month) in MONTH_NAMES.iter().enumerate() {
                if text.contains(month) || url.contains(month) {
                    let month_number = (index + 1) as u32;
                    if month_number >= recent_floor {
                        score += weights.month_recent;
                    } else {
                        score += weights.month_older;
                    }
                }
            }

            if FRESHNESS_KEYWORDS.iter().any(|k| text.contains(k)) {
                score += weights.keyword_latest;
            }

            if !canonical_keyword.is_empty() && url.contains(canonical_keyword) {
                score += weights.canonical_keyword;
            }

            if url.contains("newsletter") || text.contains("newsletter") {
                score += weights.newsletter_keyword;
            }

            candidate.score = score;
            candidate
        })
        .collect();

    // std's sort is stable, so equal scores keep discovery order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    for candidate in scored.iter().take(3) {
        debug!(score = candidate.score, url = %candidate.url, "Ranked PDF candidate");
    }

    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str, text: &str) -> PdfCandidate {
        PdfCandidate::new(url, text, "")
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let ranked = score_and_rank(
            Vec::new(),
            ScanDate {
                year: 2024,
                month: 9,
            },
            &ScoreWeights::default(),
            "living-in-brisbane",
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn ranks_canonical_latest_link_above_dated_archive() {
        let candidates = vec![
            candidate("aug2024-newsletter.pdf", "August 2024 edition"),
            candidate("living-in-brisbane-latest.pdf", "Latest newsletter"),
        ];
        let ranked = score_and_rank(
            candidates,
            ScanDate {
                year: 2024,
                month: 9,
            },
            &ScoreWeights::default(),
            "living-in-brisbane",
        );

        // First input: year (10) + recent August (8) + newsletter (5) = 23.
        // Second input: latest (5) + canonical (15) + newsletter (5) = 25.
        assert_eq!(ranked[0].url, "living-in-brisbane-latest.pdf");
        assert_eq!(ranked[0].score, 25);
        assert_eq!(ranked[1].score, 23);
    }

    #[test]
    fn top_result_has_maximum_score() {
        let candidates = vec![
            candidate("a.pdf", "old archive"),
            candidate("newsletter-2030.pdf", "Latest newsletter March 2030"),
            candidate("b.pdf", "another file"),
        ];
        let ranked = score_and_rank(
            candidates,
            ScanDate {
                year: 2030,
                month: 4,
            },
            &ScoreWeights::default(),
            "living-in-brisbane",
        );
        let max = ranked.iter().map(|c| c.score).max().unwrap();
        assert_eq!(ranked[0].score, max);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let candidates = vec![
            candidate("first.pdf", "plain"),
            candidate("second.pdf", "plain"),
            candidate("third.pdf", "plain"),
        ];
        let ranked = score_and_rank(
            candidates,
            ScanDate {
                year: 2024,
                month: 6,
            },
            &ScoreWeights::default(),
            "living-in-brisbane",
        );
        let urls: Vec<&str> = ranked.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, ["first.pdf", "second.pdf", "third.pdf"]);
    }

    #[test]
    fn each_month_mention_contributes_independently() {
        let ranked = score_and_rank(
            vec![candidate("a.pdf", "january february double issue")],
            ScanDate {
                year: 2024,
                month: 2,
            },
            &ScoreWeights::default(),
            "",
        );
        // Floor is month 0, so both months count as recent: 8 + 8.
        assert_eq!(ranked[0].score, 16);
    }

    #[test]
    fn older_month_scores_lower_than_recent() {
        let weights = ScoreWeights::default();
        let at = ScanDate {
            year: 2024,
            month: 11,
        };
        let recent = score_and_rank(vec![candidate("a.pdf", "october issue")], at, &weights, "");
        let older = score_and_rank(vec![candidate("a.pdf", "march issue")], at, &weights, "");
        assert_eq!(recent[0].score, weights.month_recent);
        assert_eq!(older[0].score, weights.month_older);
    }

    #[test]
    fn freshness_keyword_only_applies_to_display_text() {
        // "newsletter" in the URL contains "new", but freshness keywords are
        // matched against the display text alone.
        let ranked = score_and_rank(
            vec![candidate("some-newsletter.pdf", "archive edition")],
            ScanDate {
                year: 2024,
                month: 6,
            },
            &ScoreWeights::default(),
            "",
        );
        assert_eq!(ranked[0].score, 5); // newsletter keyword only
    }

    #[test]
    fn custom_weights_are_honored() {
        let weights = ScoreWeights {
            newsletter_keyword: 100,
            ..ScoreWeights::default()
        };
        let ranked = score_and_rank(
            vec![candidate("newsletter.pdf", "x")],
            ScanDate {
                year: 2024,
                month: 1,
            },
            &weights,
            "",
        );
        assert_eq!(ranked[0].score, 100);
    }
}
