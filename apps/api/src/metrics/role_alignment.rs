use std::collections::HashSet;

use serde_json::json;

use super::{MetricKind, MetricScore, MetricScorer};
use crate::analysis::lexicon::STOPWORDS;
use crate::analysis::text_signals::{alpha_words, extract_tech_terms};

const TECHNICAL_WEIGHT: f64 = 0.7;
const KEYWORD_WEIGHT: f64 = 0.3;
const MIN_KEYWORD_LEN: usize = 4;

/// How well the candidate covers the job's technical terms and general keywords.
/// Technical terms carry most of the weight since they rarely match by accident.
pub struct RoleAlignmentScorer {
    threshold: f64,
}

impl RoleAlignmentScorer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for RoleAlignmentScorer {
    fn default() -> Self {
        Self::new(0.85)
    }
}

impl MetricScorer for RoleAlignmentScorer {
    fn kind(&self) -> MetricKind {
        MetricKind::RoleAlignment
    }

    fn calculate(&self, _original: &str, candidate: &str, job: &str) -> MetricScore {
        let job_tech = extract_tech_terms(job);
        let resume_tech = extract_tech_terms(candidate);
        let job_keywords = alpha_words(job, MIN_KEYWORD_LEN, &STOPWORDS);
        let resume_keywords = alpha_words(candidate, MIN_KEYWORD_LEN, &STOPWORDS);

        let technical_match_rate = match_rate(&job_tech, &resume_tech);
        let keyword_match_rate = match_rate(&job_keywords, &resume_keywords);
        let score = TECHNICAL_WEIGHT * technical_match_rate + KEYWORD_WEIGHT * keyword_match_rate;

        let matched_tech = sorted(job_tech.intersection(&resume_tech));
        let missing_tech = sorted(job_tech.difference(&resume_tech));
        let missing_keywords = sorted(job_keywords.difference(&resume_keywords));

        let mut recommendations = Vec::new();
        if score < self.threshold {
            if !missing_tech.is_empty() {
                recommendations.push(format!(
                    "Add these missing keywords: {}",
                    missing_tech.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
                ));
            } else if !missing_keywords.is_empty() {
                recommendations.push(format!(
                    "Add these missing keywords: {}",
                    missing_keywords.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
                ));
            }
            if score < 0.5 {
                recommendations.push(
                    "Focus on incorporating more technical terms from the job description"
                        .to_string(),
                );
            }
        }

        let details = json!({
            "technical_match_rate": technical_match_rate,
            "keyword_match_rate": keyword_match_rate,
            "total_jd_technical_terms": job_tech.len(),
            "total_jd_keywords": job_keywords.len(),
            "matched_technical": matched_tech.iter().take(20).collect::<Vec<_>>(),
            "missing_technical": missing_tech.iter().take(10).collect::<Vec<_>>(),
            "missing_keywords": missing_keywords.iter().take(10).collect::<Vec<_>>(),
        });

        MetricScore::new(self.kind(), score, self.threshold, details, recommendations)
    }
}

/// |job ∩ resume| / |job|, or 1.0 when the job side is empty.
fn match_rate(job: &HashSet<String>, resume: &HashSet<String>) -> f64 {
    if job.is_empty() {
        return 1.0;
    }
    job.intersection(resume).count() as f64 / job.len() as f64
}

fn sorted<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = items.cloned().collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = "Backend engineer building Python microservices on AWS with Docker and PostgreSQL";

    #[test]
    fn test_full_coverage_scores_one() {
        let score = RoleAlignmentScorer::default().calculate("", JOB, JOB);
        assert_eq!(score.score, 1.0);
        assert!(score.passed);
    }

    #[test]
    fn test_technical_terms_weigh_more() {
        // all technical terms present, no general keywords
        let tech_only = RoleAlignmentScorer::default()
            .calculate("", "python microservices aws docker postgresql", JOB);
        // all general keywords present, no technical terms
        let words_only = RoleAlignmentScorer::default()
            .calculate("", "backend engineer building", JOB);
        assert!(tech_only.score > words_only.score);
        assert!((tech_only.details["technical_match_rate"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_terms_are_recommended() {
        let score = RoleAlignmentScorer::default().calculate("", "Python developer", JOB);
        assert!(!score.passed);
        assert!(score.recommendations[0].starts_with("Add these missing keywords:"));
        assert!(score.recommendations[0].contains("aws"));
        let missing = score.details["missing_technical"].as_array().unwrap();
        assert!(!missing.iter().any(|v| v == "python"));
    }

    #[test]
    fn test_job_without_terms_is_not_penalised() {
        let score = RoleAlignmentScorer::default().calculate("", "anything at all", "");
        assert_eq!(score.score, 1.0);
    }

    #[test]
    fn test_go_inside_good_does_not_match() {
        let score = RoleAlignmentScorer::default().calculate("", "Good communicator", "Go developer");
        assert_eq!(score.details["technical_match_rate"], 0.0);
    }
}
