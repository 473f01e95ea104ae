//! Final comprehensive-summary report rendering.
//!
//! Assembles the Ollama output into a single Markdown report: an executive
//! summary up top, the per-source summaries with their original sizes, and
//! a technical-details footer. Pure rendering; all model interaction
//! happens before this.

use crate::summarize::DigestSummary;
use std::fmt::Write;

/// Render the comprehensive news summary report.
pub fn final_report(
    comprehensive: &str,
    summaries: &[DigestSummary],
    model: &str,
    generated_at: &str,
    language: Option<&str>,
) -> String {
    let mut md = String::new();

    match language {
        Some(lang) => writeln!(md, "# Comprehensive News Summary (Language: {lang})").unwrap(),
        None => md.push_str("# Comprehensive News Summary\n"),
    }
    writeln!(md, "*Generated by Ollama on {generated_at}*\n").unwrap();
    writeln!(md, "**Model Used:** {model}").unwrap();
    writeln!(md, "**Sources Analyzed:** {} files\n", summaries.len()).unwrap();
    md.push_str("---\n\n");

    md.push_str("## Executive Summary\n\n");
    writeln!(md, "{comprehensive}\n").unwrap();
    md.push_str("---\n\n");

    md.push_str("## Individual Source Summaries\n\n");
    for summary in summaries {
        writeln!(md, "### {}", summary.label).unwrap();
        writeln!(md, "*Original file size: {} characters*\n", summary.original_size).unwrap();
        writeln!(md, "{}\n", summary.summary).unwrap();
        md.push_str("---\n\n");
    }

    let total: usize = summaries.iter().map(|s| s.original_size).sum();
    md.push_str("## Technical Details\n\n");
    writeln!(md, "- **Processing Time:** {generated_at}").unwrap();
    writeln!(md, "- **Ollama Model:** {model}").unwrap();
    writeln!(md, "- **Sources Processed:** {}", summaries.len()).unwrap();
    writeln!(md, "- **Total Content Analyzed:** {total} characters\n").unwrap();
    md.push_str("---\n\n");
    md.push_str(
        "*This summary was generated using a local Ollama model to analyze scraped news \
         content from Australian government and news sources.*\n",
    );

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries() -> Vec<DigestSummary> {
        vec![
            DigestSummary {
                label: "brisbane_newsletter_summary.md".to_string(),
                summary: "- Newsletter highlights".to_string(),
                original_size: 1200,
            },
            DigestSummary {
                label: "qld_health_news.md".to_string(),
                summary: "- Health highlights".to_string(),
                original_size: 800,
            },
        ]
    }

    #[test]
    fn report_carries_all_sections() {
        let md = final_report("Overall picture.", &summaries(), "llama3.1:8b", "2025-08-06 09:00", None);
        assert!(md.starts_with("# Comprehensive News Summary\n"));
        assert!(md.contains("**Model Used:** llama3.1:8b"));
        assert!(md.contains("**Sources Analyzed:** 2 files"));
        assert!(md.contains("## Executive Summary\n\nOverall picture."));
        assert!(md.contains("### brisbane_newsletter_summary.md"));
        assert!(md.contains("*Original file size: 1200 characters*"));
        assert!(md.contains("- **Total Content Analyzed:** 2000 characters"));
    }

    #[test]
    fn language_note_appears_in_title() {
        let md = final_report("x", &summaries(), "m", "t", Some("Spanish (Español)"));
        assert!(md.starts_with("# Comprehensive News Summary (Language: Spanish (Español))"));
    }

    #[test]
    fn empty_summary_list_still_renders() {
        let md = final_report("Nothing to report.", &[], "m", "t", None);
        assert!(md.contains("**Sources Analyzed:** 0 files"));
        assert!(md.contains("- **Total Content Analyzed:** 0 characters"));
    }
}
