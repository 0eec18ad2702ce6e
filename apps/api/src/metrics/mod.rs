//! Quality metrics: four independent scorers combined into one verdict.
//!
//! Every scorer implements [`MetricScorer`] and is driven through the ordered
//! list held by [`MetricsEngine`]. Weights and gating live on [`MetricKind`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod ats;
pub mod authenticity;
pub mod length;
pub mod role_alignment;

pub use ats::AtsScorer;
pub use authenticity::AuthenticityScorer;
pub use length::LengthScorer;
pub use role_alignment::RoleAlignmentScorer;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Authenticity,
    RoleAlignment,
    AtsOptimization,
    LengthCompliance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Important,
    Minor,
}

impl MetricKind {
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::Authenticity => "authenticity",
            MetricKind::RoleAlignment => "role_alignment",
            MetricKind::AtsOptimization => "ats_optimization",
            MetricKind::LengthCompliance => "length_compliance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Authenticity => "Authenticity",
            MetricKind::RoleAlignment => "Role Alignment",
            MetricKind::AtsOptimization => "ATS Optimization",
            MetricKind::LengthCompliance => "Length Compliance",
        }
    }

    /// Share of the overall score. Sums to 1.0 across all kinds.
    pub fn weight(&self) -> f64 {
        match self {
            MetricKind::Authenticity => 0.35,
            MetricKind::RoleAlignment => 0.30,
            MetricKind::AtsOptimization => 0.25,
            MetricKind::LengthCompliance => 0.10,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            MetricKind::Authenticity | MetricKind::RoleAlignment => Severity::Critical,
            MetricKind::AtsOptimization => Severity::Important,
            MetricKind::LengthCompliance => Severity::Minor,
        }
    }

    /// Length is advisory: it moves the average but never fails a run.
    pub fn gates_overall(&self) -> bool {
        self.severity() != Severity::Minor
    }
}

impl Severity {
    fn tag(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Important => "IMPORTANT",
            Severity::Minor => "MINOR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    pub kind: MetricKind,
    pub name: String,
    /// 0.0 – 1.0
    pub score: f64,
    pub passed: bool,
    pub threshold: f64,
    pub details: Value,
    pub recommendations: Vec<String>,
}

impl MetricScore {
    pub fn new(
        kind: MetricKind,
        score: f64,
        threshold: f64,
        details: Value,
        recommendations: Vec<String>,
    ) -> Self {
        let score = score.clamp(0.0, 1.0);
        Self {
            kind,
            name: kind.label().to_string(),
            score,
            passed: score >= threshold,
            threshold,
            details,
            recommendations,
        }
    }
}

/// Per-metric thresholds plus the page target used by the length scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricThresholds {
    pub authenticity: f64,
    pub role_alignment: f64,
    pub ats_optimization: f64,
    pub length_compliance: f64,
    pub target_pages: f64,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            authenticity: 0.90,
            role_alignment: 0.85,
            ats_optimization: 0.80,
            length_compliance: 0.95,
            target_pages: 2.0,
        }
    }
}

impl MetricThresholds {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("thresholds.authenticity", self.authenticity),
            ("thresholds.role_alignment", self.role_alignment),
            ("thresholds.ats_optimization", self.ats_optimization),
            ("thresholds.length_compliance", self.length_compliance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be between 0 and 1, got {value}"));
            }
        }
        if self.target_pages <= 0.0 {
            return Err("thresholds.target_pages must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub metrics: BTreeMap<MetricKind, MetricScore>,
    pub overall_score: f64,
    pub overall_passed: bool,
    pub failed_metrics: Vec<String>,
    pub recommendations: Vec<String>,
}

impl MetricsResult {
    /// Weighted average of all scores; passes only if every gating metric passes.
    pub fn from_scores(scores: Vec<MetricScore>) -> Self {
        let metrics: BTreeMap<MetricKind, MetricScore> =
            scores.into_iter().map(|s| (s.kind, s)).collect();

        let overall_score = metrics
            .values()
            .map(|m| m.score * m.kind.weight())
            .sum::<f64>();

        let overall_passed = metrics
            .values()
            .filter(|m| m.kind.gates_overall())
            .all(|m| m.passed);

        let failed_metrics = metrics
            .values()
            .filter(|m| !m.passed)
            .map(|m| m.name.clone())
            .collect();

        // BTreeMap order follows MetricKind, which is descending weight.
        let mut recommendations = Vec::new();
        for metric in metrics.values().filter(|m| !m.passed) {
            recommendations.push(format!(
                "{} - {}: {:.2} (threshold: {})",
                metric.kind.severity().tag(),
                metric.name,
                metric.score,
                metric.threshold
            ));
            recommendations.extend(metric.recommendations.iter().cloned());
        }
        if overall_passed {
            recommendations.push(
                "All critical metrics passed! Resume optimization meets quality standards."
                    .to_string(),
            );
        }

        Self {
            metrics,
            overall_score,
            overall_passed,
            failed_metrics,
            recommendations,
        }
    }

    pub fn get(&self, kind: MetricKind) -> Option<&MetricScore> {
        self.metrics.get(&kind)
    }

    /// Names of failed metrics as their snake_case keys.
    pub fn failed_keys(&self) -> Vec<&'static str> {
        self.metrics
            .values()
            .filter(|m| !m.passed)
            .map(|m| m.kind.key())
            .collect()
    }

    pub fn summary_report(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = vec![
            rule.clone(),
            "RESUME OPTIMIZATION METRICS REPORT".to_string(),
            rule.clone(),
            String::new(),
            format!(
                "Overall Status: {}",
                if self.overall_passed {
                    "PASSED"
                } else {
                    "NEEDS IMPROVEMENT"
                }
            ),
            format!("Overall Score: {:.2}%", self.overall_score * 100.0),
            String::new(),
            "Individual Metrics:".to_string(),
            "-".repeat(60),
        ];

        for metric in self.metrics.values() {
            out.push(format!(
                "{:20} {:.2}%  {}  (threshold: {:.2}%)",
                metric.name,
                metric.score * 100.0,
                if metric.passed { "PASS" } else { "FAIL" },
                metric.threshold * 100.0
            ));
        }
        out.push(String::new());

        if !self.failed_metrics.is_empty() {
            out.push("Failed Metrics:".to_string());
            for name in &self.failed_metrics {
                out.push(format!("   - {name}"));
            }
            out.push(String::new());
        }

        if !self.recommendations.is_empty() {
            out.push("Recommendations:".to_string());
            for (i, rec) in self.recommendations.iter().take(10).enumerate() {
                out.push(format!("   {}. {rec}", i + 1));
            }
        }

        out.push(String::new());
        out.push(rule);
        out.join("\n")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A single quality dimension. All scorers share one call signature so the
/// engine can iterate over them. Each scorer owns its pass threshold and
/// stamps it on the [`MetricScore`] it returns.
pub trait MetricScorer: Send + Sync {
    fn kind(&self) -> MetricKind;
    fn calculate(&self, original: &str, candidate: &str, job: &str) -> MetricScore;
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct MetricsEngine {
    scorers: Vec<Box<dyn MetricScorer>>,
}

impl MetricsEngine {
    pub fn new(thresholds: &MetricThresholds) -> Self {
        Self {
            scorers: vec![
                Box::new(AuthenticityScorer::new(thresholds.authenticity)),
                Box::new(RoleAlignmentScorer::new(thresholds.role_alignment)),
                Box::new(AtsScorer::new(thresholds.ats_optimization)),
                Box::new(LengthScorer::new(
                    thresholds.target_pages,
                    thresholds.length_compliance,
                )),
            ],
        }
    }

    pub fn with_scorers(scorers: Vec<Box<dyn MetricScorer>>) -> Self {
        Self { scorers }
    }

    pub fn evaluate(&self, original: &str, candidate: &str, job: &str) -> MetricsResult {
        let scores = self
            .scorers
            .iter()
            .map(|s| s.calculate(original, candidate, job))
            .collect();
        MetricsResult::from_scores(scores)
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(&MetricThresholds::default())
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn score(kind: MetricKind, value: f64, threshold: f64) -> MetricScore {
        MetricScore::new(kind, value, threshold, json!({}), vec![format!("fix {}", kind.key())])
    }

    #[test]
    fn test_length_failure_does_not_gate_overall() {
        let result = MetricsResult::from_scores(vec![
            score(MetricKind::Authenticity, 0.95, 0.90),
            score(MetricKind::RoleAlignment, 0.90, 0.85),
            score(MetricKind::AtsOptimization, 0.85, 0.80),
            score(MetricKind::LengthCompliance, 0.50, 0.95),
        ]);
        assert!(!result.get(MetricKind::LengthCompliance).unwrap().passed);
        assert!(result.overall_passed);
        assert_eq!(result.failed_metrics, vec!["Length Compliance"]);
        let expected = 0.35 * 0.95 + 0.30 * 0.90 + 0.25 * 0.85 + 0.10 * 0.50;
        assert!((result.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_any_gating_failure_fails_overall() {
        for failing in [
            MetricKind::Authenticity,
            MetricKind::RoleAlignment,
            MetricKind::AtsOptimization,
        ] {
            let scores = [
                MetricKind::Authenticity,
                MetricKind::RoleAlignment,
                MetricKind::AtsOptimization,
                MetricKind::LengthCompliance,
            ]
            .into_iter()
            .map(|k| score(k, if k == failing { 0.1 } else { 1.0 }, 0.8))
            .collect();
            let result = MetricsResult::from_scores(scores);
            assert!(!result.overall_passed, "{failing:?} should gate");
        }
    }

    #[test]
    fn test_recommendations_ordered_by_severity() {
        let result = MetricsResult::from_scores(vec![
            score(MetricKind::LengthCompliance, 0.5, 0.95),
            score(MetricKind::AtsOptimization, 0.5, 0.80),
            score(MetricKind::Authenticity, 0.5, 0.90),
            score(MetricKind::RoleAlignment, 0.9, 0.85),
        ]);
        assert_eq!(
            result.recommendations,
            vec![
                "CRITICAL - Authenticity: 0.50 (threshold: 0.9)",
                "fix authenticity",
                "IMPORTANT - ATS Optimization: 0.50 (threshold: 0.8)",
                "fix ats_optimization",
                "MINOR - Length Compliance: 0.50 (threshold: 0.95)",
                "fix length_compliance",
            ]
        );
        assert_eq!(
            result.failed_keys(),
            vec!["authenticity", "ats_optimization", "length_compliance"]
        );
    }

    #[test]
    fn test_success_line_when_passed() {
        let result = MetricsResult::from_scores(vec![
            score(MetricKind::Authenticity, 1.0, 0.9),
            score(MetricKind::RoleAlignment, 1.0, 0.85),
            score(MetricKind::AtsOptimization, 1.0, 0.8),
            score(MetricKind::LengthCompliance, 1.0, 0.95),
        ]);
        assert_eq!(result.recommendations.len(), 1);
        assert!(result.recommendations[0].starts_with("All critical metrics passed"));
    }

    #[test]
    fn test_summary_report_lists_every_metric() {
        let result = MetricsResult::from_scores(vec![
            score(MetricKind::Authenticity, 1.0, 0.9),
            score(MetricKind::RoleAlignment, 0.5, 0.85),
            score(MetricKind::AtsOptimization, 1.0, 0.8),
            score(MetricKind::LengthCompliance, 1.0, 0.95),
        ]);
        let report = result.summary_report();
        assert!(report.contains("Overall Status: NEEDS IMPROVEMENT"));
        assert!(report.contains("Role Alignment"));
        assert!(report.contains("FAIL"));
        assert!(report.contains("   - Role Alignment"));
        assert!(report.contains("   1. CRITICAL - Role Alignment"));
    }

    #[test]
    fn test_metrics_result_serializes_with_named_keys() {
        let result = MetricsResult::from_scores(vec![score(MetricKind::Authenticity, 1.0, 0.9)]);
        let value = serde_json::to_value(&result).unwrap();
        assert!(value["metrics"]["authenticity"]["passed"].as_bool().unwrap());
        let back: MetricsResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_engine_runs_all_four_scorers() {
        let engine = MetricsEngine::default();
        let resume = "Summary\nExperience\n- Built Python services\nEducation\nSkills: Python";
        let result = engine.evaluate(resume, resume, "Python engineer");
        assert_eq!(result.metrics.len(), 4);
        let weights: f64 = result.metrics.keys().map(|k| k.weight()).sum();
        assert!((weights - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_engine_stamps_configured_thresholds() {
        let thresholds = MetricThresholds {
            authenticity: 0.5,
            role_alignment: 0.4,
            ats_optimization: 0.3,
            length_compliance: 0.2,
            target_pages: 1.0,
        };
        let result = MetricsEngine::new(&thresholds).evaluate("Built APIs", "Built APIs", "APIs");
        let threshold = |kind| result.get(kind).unwrap().threshold;
        assert_eq!(threshold(MetricKind::Authenticity), 0.5);
        assert_eq!(threshold(MetricKind::RoleAlignment), 0.4);
        assert_eq!(threshold(MetricKind::AtsOptimization), 0.3);
        assert_eq!(threshold(MetricKind::LengthCompliance), 0.2);
        for m in result.metrics.values() {
            assert_eq!(m.passed, m.score >= m.threshold);
        }
    }

    #[test]
    fn test_thresholds_validate() {
        assert!(MetricThresholds::default().validate().is_ok());
        let bad = MetricThresholds {
            ats_optimization: 1.2,
            ..Default::default()
        };
        assert!(bad.validate().unwrap_err().contains("ats_optimization"));
        let no_pages = MetricThresholds {
            target_pages: 0.0,
            ..Default::default()
        };
        assert!(no_pages.validate().is_err());
    }
}
