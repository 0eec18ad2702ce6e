use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use super::{MetricKind, MetricScore, MetricScorer};
use crate::analysis::lexicon::{
    ACHIEVEMENT_VERBS, CLAIM_TECH_TERMS, FACT_ROLE_TERMS, FACT_TECH_TERMS,
    RED_FLAG_CAPS_EXCLUDED, RED_FLAG_ROLE_TITLES,
};
use crate::analysis::text_signals::{contains_term, extract_capitalized_phrases};

static BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-•*]\s+(.+)$").expect("bullet pattern must compile"));
static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\.\s+(.+)$").expect("numbered pattern must compile"));
static SENTENCE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence pattern must compile"));
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:\.\d+)?\b").expect("number pattern must compile"));
static PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)%").expect("percent pattern must compile"));
static CAPITALIZED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("capitalized pattern must compile"));

const MAX_RED_FLAG_PENALTY: f64 = 0.3;
const RED_FLAG_PENALTY: f64 = 0.1;

/// Checks that claims in the candidate are grounded in the original resume.
/// Heuristic only; no LLM call.
pub struct AuthenticityScorer {
    threshold: f64,
}

impl AuthenticityScorer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for AuthenticityScorer {
    fn default() -> Self {
        Self::new(0.90)
    }
}

impl MetricScorer for AuthenticityScorer {
    fn kind(&self) -> MetricKind {
        MetricKind::Authenticity
    }

    fn calculate(&self, original: &str, candidate: &str, _job: &str) -> MetricScore {
        let claims = extract_claims(candidate);
        let facts = extract_facts(original);

        let (supported, unsupported): (Vec<&String>, Vec<&String>) = claims
            .iter()
            .partition(|claim| is_claim_supported(claim, &facts, original));

        let mut score = if claims.is_empty() {
            1.0
        } else {
            supported.len() as f64 / claims.len() as f64
        };

        let red_flags = detect_red_flags(original, candidate);
        if !red_flags.is_empty() {
            let penalty = (red_flags.len() as f64 * RED_FLAG_PENALTY).min(MAX_RED_FLAG_PENALTY);
            score = (score - penalty).max(0.0);
        }

        let mut recommendations = Vec::new();
        if score < self.threshold {
            if !unsupported.is_empty() {
                recommendations.push(format!(
                    "Found {} potentially unsupported claims. Ensure all quantitative achievements have basis in original resume.",
                    unsupported.len()
                ));
            }
            if !red_flags.is_empty() {
                let top: Vec<&str> = red_flags.iter().take(3).map(String::as_str).collect();
                recommendations.push(format!(
                    "Detected {} red flags: {}",
                    red_flags.len(),
                    top.join(", ")
                ));
            }
            recommendations.push(
                "Review each flagged change against the original resume before accepting it"
                    .to_string(),
            );
        }

        let details = json!({
            "total_claims": claims.len(),
            "supported_claims": supported.len(),
            "unsupported_claims": unsupported.len(),
            "red_flags_count": red_flags.len(),
            "red_flags": red_flags.iter().take(5).collect::<Vec<_>>(),
            "sample_unsupported": unsupported.iter().take(3).collect::<Vec<_>>(),
        });

        MetricScore::new(self.kind(), score, self.threshold, details, recommendations)
    }
}

/// Bullet lines, numbered-list lines, and sentences carrying a number or an
/// achievement verb.
fn extract_claims(text: &str) -> Vec<String> {
    let mut claims: Vec<String> = Vec::new();

    for line in text.lines() {
        for pattern in [&*BULLET_LINE, &*NUMBERED_LINE] {
            if let Some(caps) = pattern.captures(line) {
                let claim = caps[1].trim();
                if !claim.is_empty() {
                    claims.push(claim.to_string());
                }
            }
        }
    }

    for sentence in SENTENCE_SPLIT.split(text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let has_number = sentence.chars().any(|c| c.is_ascii_digit());
        let has_verb = ACHIEVEMENT_VERBS.iter().any(|v| contains_term(sentence, v));
        if (has_number || has_verb) && !claims.iter().any(|c| c == sentence) {
            claims.push(sentence.to_string());
        }
    }

    claims
}

/// Numbers, capitalized terms, known technical terms and role words from the
/// original resume.
fn extract_facts(text: &str) -> HashSet<String> {
    let mut facts: HashSet<String> = numbers(text);
    facts.extend(extract_capitalized_phrases(text));
    for term in FACT_TECH_TERMS.iter().chain(FACT_ROLE_TERMS) {
        if contains_term(text, term) {
            facts.insert(term.to_string());
        }
    }
    facts
}

fn is_claim_supported(claim: &str, facts: &HashSet<String>, original: &str) -> bool {
    let claim_numbers = numbers(claim);
    if !claim_numbers.is_empty() && claim_numbers.is_disjoint(facts) {
        return false;
    }

    let mut terms: HashSet<String> = CAPITALIZED_WORD
        .find_iter(claim)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    for term in CLAIM_TECH_TERMS {
        if contains_term(claim, term) {
            terms.insert(term.to_string());
        }
    }

    if !terms.is_empty() {
        let matching = terms.iter().filter(|t| contains_term(original, t)).count();
        if (matching as f64) / (terms.len() as f64) < 0.5 {
            return false;
        }
    }

    true
}

fn detect_red_flags(original: &str, candidate: &str) -> Vec<String> {
    let mut flags = Vec::new();

    let original_numbers = numbers(original);
    let new_numbers = numbers(candidate)
        .difference(&original_numbers)
        .count();
    if new_numbers > 5 {
        flags.push(format!("{new_numbers} new numbers not found in original"));
    }

    let original_max = max_percentage(original);
    let candidate_max = max_percentage(candidate);
    if let (Some(orig), Some(cand)) = (original_max, candidate_max) {
        if cand > orig * 1.5 {
            flags.push(format!("Percentage inflation detected: {cand}% vs {orig}%"));
        }
    }

    let original_caps: HashSet<String> = extract_capitalized_phrases(original).into_iter().collect();
    let new_caps = extract_capitalized_phrases(candidate)
        .into_iter()
        .filter(|c| !original_caps.contains(c) && !RED_FLAG_CAPS_EXCLUDED.contains(&c.as_str()))
        .collect::<HashSet<_>>()
        .len();
    if new_caps > 10 {
        flags.push(format!(
            "{new_caps} new capitalized terms (potential new companies/products)"
        ));
    }

    let new_roles: Vec<&str> = RED_FLAG_ROLE_TITLES
        .iter()
        .copied()
        .filter(|role| contains_term(candidate, role) && !contains_term(original, role))
        .collect();
    if new_roles.len() > 2 {
        flags.push(format!("New role titles added: {}", new_roles.join(", ")));
    }

    flags
}

fn numbers(text: &str) -> HashSet<String> {
    NUMBER
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn max_percentage(text: &str) -> Option<f64> {
    PERCENT
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL: &str = "Jordan Park\nSoftware Engineer at Acme\n\
        - Built billing services in Python handling 200 requests per second\n\
        - Reduced latency by 30% using caching\n";

    #[test]
    fn test_identical_text_is_fully_authentic() {
        let score = AuthenticityScorer::default().calculate(ORIGINAL, ORIGINAL, "");
        assert_eq!(score.score, 1.0);
        assert!(score.passed);
        assert!(score.recommendations.is_empty());
    }

    #[test]
    fn test_no_claims_scores_one() {
        let score = AuthenticityScorer::default().calculate(ORIGINAL, "Jordan Park", "");
        assert_eq!(score.details["total_claims"], 0);
        assert_eq!(score.score, 1.0);
    }

    #[test]
    fn test_unsupported_number_lowers_score() {
        let candidate = format!("{ORIGINAL}- Reduced costs by 75% across the platform\n");
        let score = AuthenticityScorer::default().calculate(ORIGINAL, &candidate, "");
        assert!(score.score < 1.0);
        assert!(!score.passed);
        assert!(score.details["unsupported_claims"].as_u64().unwrap() >= 1);
        assert!(score.recommendations[0].contains("potentially unsupported claims"));
    }

    #[test]
    fn test_percentage_inflation_is_a_red_flag() {
        let flags = detect_red_flags("Cut costs by 20%", "Cut costs by 45%");
        assert!(flags.iter().any(|f| f.starts_with("Percentage inflation detected")));
        assert!(detect_red_flags("Cut costs by 20%", "Cut costs by 25%").is_empty());
    }

    #[test]
    fn test_new_roles_and_numbers_red_flags() {
        let flags = detect_red_flags(
            "Worked on the product",
            "Engineer, Manager, Director and Architect; 1 2 3 4 5 6 launches",
        );
        assert!(flags.iter().any(|f| f.starts_with("New role titles added")));
        assert!(flags.iter().any(|f| f == "6 new numbers not found in original"));
    }

    #[test]
    fn test_red_flag_penalty_is_capped() {
        let original = "Did 10% of work";
        let candidate = "Engineer Manager Director Architect led 90% with 1 2 3 4 5 6 7 and \
                         Alpha, Beta, Gamma, Delta, Epsilon, Zeta, Eta, Theta, Iota, Kappa, Lambda";
        let flags = detect_red_flags(original, candidate);
        assert_eq!(flags.len(), 4);
        let score = AuthenticityScorer::default().calculate(original, candidate, "");
        assert!(score.score >= 0.0);
        assert_eq!(score.details["red_flags_count"], 4);
    }

    #[test]
    fn test_claims_include_bullets_and_metric_sentences() {
        let claims = extract_claims("Summary line\n- Shipped the app\n1. Led the migration\nGrew users 3x.");
        assert!(claims.contains(&"Shipped the app".to_string()));
        assert!(claims.contains(&"Led the migration".to_string()));
        assert!(claims.iter().any(|c| c.contains("Grew users 3x")));
    }
}
