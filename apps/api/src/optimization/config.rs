use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::metrics::MetricThresholds;

/// Settings for one optimization run. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    pub max_iterations: u32,
    /// Stop once every gating metric passes and the overall score reaches this.
    pub convergence_threshold: f64,
    /// Stop once an iteration improves the overall score by less than this.
    pub improvement_threshold: f64,
    pub thresholds: MetricThresholds,

    // Recorded with each version; the loop itself does not act on these.
    pub enable_company_research: bool,
    pub enable_voice_preservation: bool,
    pub track_unused_content: bool,
    pub enable_version_history: bool,
    pub estimated_time_seconds: Option<u32>,
    pub estimated_cost_usd: Option<f64>,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        OptimizationTier::Standard.config()
    }
}

impl OptimizationConfig {
    /// Range checks applied before a run is accepted.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations < 1 {
            return Err("max_iterations must be at least 1".to_string());
        }
        for (name, value) in [
            ("convergence_threshold", self.convergence_threshold),
            ("improvement_threshold", self.improvement_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be between 0 and 1, got {value}"));
            }
        }
        self.thresholds.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationTier {
    Basic,
    Standard,
    Premium,
}

impl OptimizationTier {
    /// Unknown names fall back to `Standard`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "basic" => OptimizationTier::Basic,
            "premium" => OptimizationTier::Premium,
            _ => OptimizationTier::Standard,
        }
    }

    pub fn config(&self) -> OptimizationConfig {
        let base = OptimizationConfig {
            max_iterations: 3,
            convergence_threshold: 0.85,
            improvement_threshold: 0.02,
            thresholds: MetricThresholds::default(),
            enable_company_research: false,
            enable_voice_preservation: false,
            track_unused_content: false,
            enable_version_history: true,
            estimated_time_seconds: Some(480),
            estimated_cost_usd: Some(2.00),
        };

        match self {
            OptimizationTier::Basic => OptimizationConfig {
                max_iterations: 1,
                convergence_threshold: 0.80,
                enable_version_history: false,
                estimated_time_seconds: Some(120),
                estimated_cost_usd: Some(0.50),
                ..base
            },
            OptimizationTier::Standard => base,
            OptimizationTier::Premium => OptimizationConfig {
                max_iterations: 5,
                convergence_threshold: 0.90,
                enable_company_research: true,
                track_unused_content: true,
                estimated_time_seconds: Some(1200),
                estimated_cost_usd: Some(5.00),
                ..base
            },
        }
    }
}

/// How far the optimizer may move away from the original wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStyle {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl ResumeStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeStyle::Conservative => "conservative",
            ResumeStyle::Balanced => "balanced",
            ResumeStyle::Aggressive => "aggressive",
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            ResumeStyle::Conservative => 0.3,
            ResumeStyle::Balanced => 0.5,
            ResumeStyle::Aggressive => 0.7,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ResumeStyle::Conservative => {
                "Minimal changes. Only rephrase to include missing keywords and fix obvious gaps."
            }
            ResumeStyle::Balanced => {
                "Moderate changes. Reorder and rephrase for relevance while keeping the candidate's voice."
            }
            ResumeStyle::Aggressive => {
                "Substantial rewrites. Restructure bullets and summary to maximise alignment, without inventing facts."
            }
        }
    }
}

impl FromStr for ResumeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(ResumeStyle::Conservative),
            "balanced" => Ok(ResumeStyle::Balanced),
            "aggressive" => Ok(ResumeStyle::Aggressive),
            other => Err(format!(
                "unknown style '{other}' (expected conservative, balanced or aggressive)"
            )),
        }
    }
}

impl fmt::Display for ResumeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_presets() {
        let basic = OptimizationTier::Basic.config();
        assert_eq!(basic.max_iterations, 1);
        assert_eq!(basic.convergence_threshold, 0.80);

        let standard = OptimizationTier::Standard.config();
        assert_eq!(standard.max_iterations, 3);
        assert_eq!(standard.convergence_threshold, 0.85);

        let premium = OptimizationTier::Premium.config();
        assert_eq!(premium.max_iterations, 5);
        assert_eq!(premium.convergence_threshold, 0.90);

        for config in [basic, standard, premium] {
            assert_eq!(config.improvement_threshold, 0.02);
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_unknown_tier_falls_back_to_standard() {
        assert_eq!(OptimizationTier::from_name("PREMIUM"), OptimizationTier::Premium);
        assert_eq!(OptimizationTier::from_name("gold"), OptimizationTier::Standard);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = OptimizationConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.max_iterations = 2;
        config.convergence_threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.contains("convergence_threshold"));
    }

    #[test]
    fn test_partial_config_json_uses_defaults() {
        let config: OptimizationConfig =
            serde_json::from_str(r#"{"max_iterations": 4, "thresholds": {"authenticity": 0.8}}"#)
                .unwrap();
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.convergence_threshold, 0.85);
        assert_eq!(config.thresholds.authenticity, 0.8);
        assert_eq!(config.thresholds.role_alignment, 0.85);
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("Aggressive".parse::<ResumeStyle>(), Ok(ResumeStyle::Aggressive));
        assert!("wild".parse::<ResumeStyle>().is_err());
        assert_eq!(ResumeStyle::Conservative.temperature(), 0.3);
        assert_eq!(ResumeStyle::default().to_string(), "balanced");
    }
}
