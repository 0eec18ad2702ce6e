use serde_json::json;

use super::{round_to, MetricKind, MetricScore, MetricScorer};
use crate::analysis::text_signals::word_count;

const CHARS_PER_PAGE: f64 = 3000.0;
const WORDS_PER_PAGE: f64 = 500.0;
const LINES_PER_PAGE: f64 = 45.0;

/// Page-count compliance. Advisory: never gates the overall verdict.
pub struct LengthScorer {
    target_pages: f64,
    threshold: f64,
}

impl LengthScorer {
    pub fn new(target_pages: f64, threshold: f64) -> Self {
        Self {
            target_pages,
            threshold,
        }
    }
}

impl Default for LengthScorer {
    fn default() -> Self {
        Self::new(2.0, 0.95)
    }
}

impl MetricScorer for LengthScorer {
    fn kind(&self) -> MetricKind {
        MetricKind::LengthCompliance
    }

    fn calculate(&self, _original: &str, candidate: &str, _job: &str) -> MetricScore {
        let chars = candidate.chars().count();
        let words = word_count(candidate);
        let lines = candidate.split('\n').count();
        let pages = estimate_pages(chars, words, lines);
        let score = compliance_score(pages, self.target_pages);

        let mut recommendations = Vec::new();
        if score < self.threshold {
            if pages > self.target_pages {
                recommendations.push(format!(
                    "Resume is approximately {:.1} pages too long. Target: {} pages, Current: {:.1} pages",
                    pages - self.target_pages,
                    self.target_pages,
                    pages
                ));
                recommendations.push(
                    "Consider: removing older/less relevant experience, condensing bullet points, or removing redundant skills"
                        .to_string(),
                );
            } else {
                recommendations.push(format!(
                    "Resume is too short ({pages:.1} pages). Consider expanding key achievements and skills"
                ));
            }
        }

        let status = if pages <= self.target_pages {
            "Within target".to_string()
        } else {
            format!("Exceeds by {:.1} pages", pages - self.target_pages)
        };

        let details = json!({
            "target_pages": self.target_pages,
            "estimated_pages": round_to(pages, 2),
            "total_characters": chars,
            "total_words": words,
            "total_lines": lines,
            "compliance_status": status,
        });

        MetricScore::new(self.kind(), score, self.threshold, details, recommendations)
    }
}

/// 40% characters, 40% words, 20% lines, each expressed in pages.
fn estimate_pages(chars: usize, words: usize, lines: usize) -> f64 {
    0.4 * (chars as f64 / CHARS_PER_PAGE)
        + 0.4 * (words as f64 / WORDS_PER_PAGE)
        + 0.2 * (lines as f64 / LINES_PER_PAGE)
}

fn compliance_score(pages: f64, target: f64) -> f64 {
    let overage = pages - target;
    if overage <= 0.0 {
        1.0
    } else if overage <= 0.2 {
        1.0 - overage * 0.5
    } else {
        (1.0 - overage * 0.3).max(0.0)
    }
}
