use serde::{Deserialize, Serialize};

use super::lexicon::{Lexicon, LexiconConfig};
use super::thresholds::{ClusteringConfig, DetectionConfig, SummaryConfig};
use crate::errors::AnalysisError;

/// Root configuration structure for complaintmap (`.complaintmap.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplaintmapConfig {
    /// Complaint detector tuning
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Similarity clustering tuning
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Representative summary selection
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Vocabulary overrides; absent tables fall back to the built-ins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<LexiconConfig>,
}

impl ComplaintmapConfig {
    /// Check every section, reporting the first problem found.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.detection.validate().map_err(AnalysisError::config)?;
        self.clustering.validate().map_err(AnalysisError::config)?;
        self.summary.validate().map_err(AnalysisError::config)?;
        self.resolve_lexicon().map(|_| ())
    }

    /// The vocabulary the detector should run with.
    pub fn resolve_lexicon(&self) -> Result<Lexicon, AnalysisError> {
        match &self.lexicon {
            Some(overrides) => overrides.resolve(),
            None => Ok(Lexicon::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::lexicon::CategoryRule;

    #[test]
    fn test_default_config_validates() {
        assert!(ComplaintmapConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: ComplaintmapConfig = toml::from_str("").unwrap();
        assert_eq!(config, ComplaintmapConfig::default());
    }

    #[test]
    fn test_partial_section_fills_remaining_defaults() {
        let config: ComplaintmapConfig = toml::from_str(
            r#"
            [clustering]
            similarity_threshold = 0.4
            "#,
        )
        .unwrap();
        assert_eq!(config.clustering.similarity_threshold, 0.4);
        assert_eq!(config.clustering.min_token_length, 4);
        assert_eq!(config.detection, DetectionConfig::default());
    }

    #[test]
    fn test_invalid_lexicon_fails_validation() {
        let config = ComplaintmapConfig {
            lexicon: Some(LexiconConfig {
                categories: Some(vec![CategoryRule::new("empty", &[])]),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::Config { .. })
        ));
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&ComplaintmapConfig::default()).unwrap();
        let parsed: ComplaintmapConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, ComplaintmapConfig::default());
    }
}
