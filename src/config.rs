//! Runtime configuration.
//!
//! All tunables live in one YAML-loadable [`ScanConfig`]: the candidate
//! scoring weight table, the section-pattern table and segmentation
//! thresholds, source URLs, and per-source article caps. Compiled-in
//! defaults reproduce the pipeline's long-standing behavior, so a config
//! file is only needed to override something.
//!
//! Validation happens here, at load time: a malformed section pattern
//! aborts the run before any network traffic, per the rule that only
//! configuration errors are fatal.

use crate::error::ConfigError;
use crate::ranking::ScoreWeights;
use crate::segment::SegmenterConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::info;

/// Top-level configuration, deserialized from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub weights: ScoreWeights,
    pub segmentation: SegmentationSettings,
    pub sources: SourceSettings,
    pub limits: LimitSettings,
}

/// Section-pattern table and thresholds for the segmenter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationSettings {
    /// Ordered heading patterns. When absent, the built-in newsletter
    /// table is used; an explicitly empty table is a configuration error.
    pub patterns: Option<Vec<String>>,
    pub min_paragraph_length: Option<usize>,
    pub prefix_window: Option<usize>,
    pub default_section: Option<String>,
}

/// Source URLs and the canonical URL keyword used in scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub newsletter_page_url: String,
    /// Last-known-good newsletter PDF, used when link discovery and ranking
    /// come back empty.
    pub fallback_pdf_url: String,
    pub canonical_keyword: String,
    pub health_news_url: String,
    pub parliament_url: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            newsletter_page_url: "https://www.brisbane.qld.gov.au/about-council/news-and-community-updates/living-in-brisbane-newsletter".to_string(),
            fallback_pdf_url: "https://www.brisbane.qld.gov.au/content/dam/brisbanecitycouncil/corpwebsite/about-council/documents/living-in-brisbane-august-2025-east.pdf.coredownload.pdf".to_string(),
            canonical_keyword: "living-in-brisbane".to_string(),
            health_news_url: "https://www.health.qld.gov.au/newsroom/news".to_string(),
            parliament_url: "https://www.aph.gov.au/News_and_Events".to_string(),
        }
    }
}

/// Per-source article caps, kept modest so a run finishes in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub max_health_articles: usize,
    pub max_parliament_articles: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_health_articles: 15,
            max_parliament_articles: 20,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a YAML file.
    pub async fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let raw = tokio::fs::read_to_string(path).await?;
        let config: ScanConfig = serde_yaml::from_str(&raw)?;
        info!(path, "Loaded configuration");
        Ok(config)
    }

    /// Build the validated segmenter configuration.
    ///
    /// # Errors
    ///
    /// Fails fast with [`ConfigError`] when an explicit pattern table is
    /// empty or contains a pattern that does not compile.
    pub fn segmenter_config(&self) -> Result<SegmenterConfig, ConfigError> {
        let base = SegmenterConfig::newsletter();
        let mut config = match &self.segmentation.patterns {
            None => base,
            Some(patterns) => SegmenterConfig::new(
                patterns,
                self.segmentation.min_paragraph_length.unwrap_or(base.min_paragraph_len),
                self.segmentation.prefix_window.unwrap_or(base.prefix_window),
                self.segmentation
                    .default_section
                    .clone()
                    .unwrap_or(base.default_section),
            )?,
        };
        if self.segmentation.patterns.is_none() {
            if let Some(min) = self.segmentation.min_paragraph_length {
                config.min_paragraph_len = min;
            }
            if let Some(window) = self.segmentation.prefix_window {
                config.prefix_window = window;
            }
            if let Some(name) = &self.segmentation.default_section {
                config.default_section = name.clone();
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_newsletter_profile() {
        let config = ScanConfig::default();
        let segmenter = config.segmenter_config().unwrap();
        assert_eq!(segmenter.min_paragraph_len, 20);
        assert_eq!(segmenter.prefix_window, 100);
        assert_eq!(segmenter.default_section, "General News");
        assert_eq!(config.weights.canonical_keyword, 15);
        assert_eq!(config.sources.canonical_keyword, "living-in-brisbane");
    }

    #[test]
    fn yaml_overrides_are_applied() {
        let yaml = r#"
weights:
  year_match: 20
segmentation:
  min_paragraph_length: 5
limits:
  max_health_articles: 3
"#;
        let config: ScanConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.weights.year_match, 20);
        // Unspecified weights keep their defaults.
        assert_eq!(config.weights.month_recent, 8);
        assert_eq!(config.limits.max_health_articles, 3);

        let segmenter = config.segmenter_config().unwrap();
        assert_eq!(segmenter.min_paragraph_len, 5);
        assert_eq!(segmenter.prefix_window, 100);
    }

    #[test]
    fn explicit_empty_pattern_table_is_fatal() {
        let yaml = "segmentation:\n  patterns: []\n";
        let config: ScanConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.segmenter_config().is_err());
    }

    #[test]
    fn malformed_pattern_is_fatal() {
        let yaml = "segmentation:\n  patterns: ['(bad']\n";
        let config: ScanConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.segmenter_config().is_err());
    }

    #[test]
    fn custom_pattern_table_is_used() {
        let yaml = "segmentation:\n  patterns: ['sports news']\n  default_section: Other\n";
        let config: ScanConfig = serde_yaml::from_str(yaml).unwrap();
        let segmenter = config.segmenter_config().unwrap();
        assert_eq!(segmenter.rules().len(), 1);
        assert_eq!(segmenter.default_section, "Other");
    }
}
