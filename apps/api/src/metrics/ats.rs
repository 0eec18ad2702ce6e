use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use super::{round_to, MetricKind, MetricScore, MetricScorer};
use crate::analysis::lexicon::{SECTION_HEADERS, STOPWORDS};
use crate::analysis::text_signals::{alpha_words, contains_term, count_term, word_count};

static TAB_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t{2,}").expect("tab pattern must compile"));
static SPECIAL_CHAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^\w\s.,\-:;()'"!?]"#).expect("special char pattern must compile")
});
static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").expect("blank line pattern must compile"));
static SENTENCE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence pattern must compile"));

const KEYWORD_WEIGHT: f64 = 0.40;
const FORMAT_WEIGHT: f64 = 0.25;
const STRUCTURE_WEIGHT: f64 = 0.20;
const READABILITY_WEIGHT: f64 = 0.15;
const SUBSCORE_WARN_BELOW: f64 = 0.7;

/// Applicant-tracking-system friendliness: keyword density, plain formatting,
/// standard sections and sentence length.
pub struct AtsScorer {
    threshold: f64,
}

impl AtsScorer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for AtsScorer {
    fn default() -> Self {
        Self::new(0.80)
    }
}

impl MetricScorer for AtsScorer {
    fn kind(&self) -> MetricKind {
        MetricKind::AtsOptimization
    }

    fn calculate(&self, _original: &str, candidate: &str, job: &str) -> MetricScore {
        let density_pct = keyword_density_pct(candidate, job);
        let keyword_score = density_score(density_pct);
        let format = format_score(candidate);
        let sections = found_sections(candidate);
        let structure = structure_score(sections.iter().filter(|(_, found)| *found).count());
        let avg_sentence = avg_sentence_length(candidate);
        let readability = readability_score(avg_sentence);

        let score = keyword_score * KEYWORD_WEIGHT
            + format * FORMAT_WEIGHT
            + structure * STRUCTURE_WEIGHT
            + readability * READABILITY_WEIGHT;

        let mut recommendations = Vec::new();
        if keyword_score < SUBSCORE_WARN_BELOW {
            recommendations
                .push("Increase keyword density from job description (target: 2-8%)".to_string());
        }
        if format < SUBSCORE_WARN_BELOW {
            recommendations.push(
                "Simplify formatting - avoid tables, excessive tabs, and special characters"
                    .to_string(),
            );
        }
        if structure < SUBSCORE_WARN_BELOW {
            recommendations.push(
                "Ensure resume includes standard sections: Experience, Education, Skills"
                    .to_string(),
            );
        }
        if readability < SUBSCORE_WARN_BELOW {
            recommendations
                .push("Improve readability - aim for 15-20 words per sentence".to_string());
        }

        let standard_sections: serde_json::Map<String, serde_json::Value> = sections
            .iter()
            .map(|(name, found)| (name.to_string(), json!(found)))
            .collect();

        let details = json!({
            "keyword_density_score": keyword_score,
            "format_score": format,
            "structure_score": structure,
            "readability_score": readability,
            "keyword_density_pct": round_to(density_pct, 2),
            "avg_sentence_length": avg_sentence,
            "has_standard_sections": standard_sections,
        });

        MetricScore::new(self.kind(), score, self.threshold, details, recommendations)
    }
}

/// Percentage of candidate words that are job keywords.
fn keyword_density_pct(candidate: &str, job: &str) -> f64 {
    let total_words = word_count(candidate);
    if total_words == 0 {
        return 0.0;
    }
    let keyword_hits: usize = alpha_words(job, 4, &STOPWORDS)
        .iter()
        .map(|kw| count_term(candidate, kw))
        .sum();
    keyword_hits as f64 / total_words as f64 * 100.0
}

/// 1.0 inside [2%, 8%]; linear toward 0 below 2% and between 8% and 15%.
fn density_score(pct: f64) -> f64 {
    if (2.0..=8.0).contains(&pct) {
        1.0
    } else if pct < 2.0 {
        (pct / 2.0).max(0.0)
    } else if pct > 15.0 {
        0.0
    } else {
        (1.0 - (pct - 8.0) / 7.0).max(0.0)
    }
}

fn format_score(text: &str) -> f64 {
    let tab_runs = TAB_RUN.find_iter(text).count() as f64;
    let special = SPECIAL_CHAR.find_iter(text).count() as f64;
    let non_ascii = text.chars().filter(|c| !c.is_ascii()).count() as f64;
    let long_lines = text.split('\n').filter(|l| l.chars().count() > 100).count() as f64;
    let blank_runs = BLANK_RUN.find_iter(text).count() as f64;

    let score = 1.0
        - (tab_runs * 0.05).min(0.3)
        - (special * 0.001).min(0.2)
        - (non_ascii * 0.001).min(0.2)
        - (long_lines * 0.01).min(0.15)
        - (blank_runs * 0.02).min(0.15);
    score.max(0.0)
}

fn found_sections(text: &str) -> Vec<(&'static str, bool)> {
    SECTION_HEADERS
        .iter()
        .map(|(name, headers)| (*name, headers.iter().any(|h| contains_term(text, h))))
        .collect()
}

fn structure_score(found: usize) -> f64 {
    match found {
        0 => 0.0,
        1 => 0.30,
        2 => 0.60,
        3 => 0.85,
        _ => 1.0,
    }
}

/// Average words per sentence, split on `.`, `!`, `?`. One decimal.
fn avg_sentence_length(text: &str) -> f64 {
    let sentences: Vec<&str> = SENTENCE_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.is_empty() {
        return 0.0;
    }
    let words: usize = sentences.iter().map(|s| word_count(s)).sum();
    round_to(words as f64 / sentences.len() as f64, 1)
}

fn readability_score(avg: f64) -> f64 {
    if (15.0..=20.0).contains(&avg) {
        1.0
    } else if avg < 15.0 {
        (avg / 15.0).max(0.6)
    } else if avg > 30.0 {
        0.3
    } else {
        (1.0 - (avg - 20.0) / 10.0 * 0.7).max(0.3)
    }
}
