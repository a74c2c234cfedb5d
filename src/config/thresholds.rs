use serde::{Deserialize, Serialize};

/// Smallest accepted `sentiment_damping`.
pub const MIN_SENTIMENT_DAMPING: f64 = 1e-3;

/// Complaint detector tuning (`[detection]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Texts with fewer characters than this are never complaints
    pub min_text_length: usize,

    /// Fraction of the indicator vocabulary that maps to full confidence
    pub confidence_scale: f64,

    /// Minimum confidence reported for anything classified as a complaint
    pub confidence_floor: f64,

    /// Sentiment strictly below this marks a complaint on its own
    pub sentiment_threshold: f64,

    /// `k` in `sum / (|sum| + k)`
    pub sentiment_damping: f64,

    /// Tokens a negation stays armed before it decays
    pub negation_window: usize,

    /// Reply nesting deeper than this is not traversed
    pub max_reply_depth: usize,

    /// Fan detection out across posts with rayon
    pub parallel: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_text_length: 5,
            confidence_scale: 0.1,
            confidence_floor: 0.3,
            sentiment_threshold: -0.2,
            sentiment_damping: 5.0,
            negation_window: 3,
            max_reply_depth: 256,
            parallel: false,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.confidence_scale > 0.0 && self.confidence_scale.is_finite()) {
            return Err(format!(
                "detection.confidence_scale must be positive, got {}",
                self.confidence_scale
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(format!(
                "detection.confidence_floor must be within [0, 1], got {}",
                self.confidence_floor
            ));
        }
        if !(-1.0..=1.0).contains(&self.sentiment_threshold) {
            return Err(format!(
                "detection.sentiment_threshold must be within [-1, 1], got {}",
                self.sentiment_threshold
            ));
        }
        if !(self.sentiment_damping >= MIN_SENTIMENT_DAMPING && self.sentiment_damping.is_finite())
        {
            return Err(format!(
                "detection.sentiment_damping must be at least {MIN_SENTIMENT_DAMPING}, got {}",
                self.sentiment_damping
            ));
        }
        if self.negation_window == 0 {
            return Err("detection.negation_window must be at least 1".to_string());
        }
        if self.max_reply_depth == 0 {
            return Err("detection.max_reply_depth must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Complaint clusterer tuning (`[clustering]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Jaccard similarity at or above which a complaint joins a cluster
    pub similarity_threshold: f64,

    /// Tokens shorter than this (in characters) are ignored
    pub min_token_length: usize,

    /// Fold common inflections (`crashes`, `crashing` -> `crash`)
    pub stem_tokens: bool,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.25,
            min_token_length: 4,
            stem_tokens: true,
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "clustering.similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            ));
        }
        if self.min_token_length == 0 {
            return Err("clustering.min_token_length must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Cluster summarizer tuning (`[summary]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Characters kept from the representative text
    pub max_length: usize,

    /// Appended when the representative text was cut
    pub ellipsis: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_length: 100,
            ellipsis: "...".to_string(),
        }
    }
}

impl SummaryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_length == 0 {
            return Err("summary.max_length must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DetectionConfig::default().validate().is_ok());
        assert!(ClusteringConfig::default().validate().is_ok());
        assert!(SummaryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = ClusteringConfig {
            similarity_threshold: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("similarity_threshold"));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let config = DetectionConfig {
            confidence_scale: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_damping_rejected() {
        let config = DetectionConfig {
            sentiment_damping: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tiny_damping_rejected() {
        let config = DetectionConfig {
            sentiment_damping: 1e-20,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DetectionConfig {
            sentiment_damping: MIN_SENTIMENT_DAMPING,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = DetectionConfig {
            max_reply_depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
