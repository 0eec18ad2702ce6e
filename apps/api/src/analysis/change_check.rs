use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::lexicon::COMMON_CAPITALIZED;
use super::text_signals::{
    contains_term, extract_capitalized_phrases, extract_numbers, extract_technology_tokens,
};
use crate::models::{Change, StructuredResume};

const EXPANSION_MIN_CHARS: usize = 100;
const EXPANSION_MIN_PCT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCategory {
    NewMetrics,
    NewOrganizations,
    NewTechnologies,
    ExpandedContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeWarning {
    pub category: WarningCategory,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeCheck {
    pub is_risky: bool,
    pub warnings: Vec<ChangeWarning>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningCategories {
    pub new_metrics: usize,
    pub new_organizations: usize,
    pub new_technologies: usize,
    pub expanded_content: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedChange {
    pub change: Change,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthenticityReport {
    pub total_changes: usize,
    pub flagged_changes: usize,
    /// Percentage of changes flagged; 0 when there are no changes.
    pub flag_rate: f64,
    pub warning_categories: WarningCategories,
    pub risky_changes: Vec<FlaggedChange>,
    pub is_safe: bool,
    pub recommendations: Vec<String>,
}

/// Flags a single change that may introduce content not backed by the original
/// resume. High recall by intent: safe rewrites are sometimes flagged.
///
/// Only narrative edits (experience bullets, summary, headline) are checked,
/// and the text compared is what survives review: a rejected change keeps
/// `before`, an edited one its `edited_value`.
pub fn check_change(change: &Change, original: &StructuredResume) -> ChangeCheck {
    if !change.change_type.is_narrative() {
        return ChangeCheck::default();
    }

    let before = change.before.as_str();
    let after = change.final_value();
    let mut warnings = Vec::new();

    // 1. new metrics
    let before_numbers: HashSet<String> = extract_numbers(before).into_iter().collect();
    let new_numbers = first_new(extract_numbers(after), &before_numbers, 3);
    if !new_numbers.is_empty() {
        warnings.push(ChangeWarning {
            category: WarningCategory::NewMetrics,
            message: format!("Introduces new metrics: {}", new_numbers.join(", ")),
        });
    }

    // 2. new organizations
    let mut known_orgs: HashSet<String> = organizations(before).collect();
    known_orgs.extend(original.company_names().into_iter().map(str::to_string));
    let new_orgs = first_new(organizations(after).collect(), &known_orgs, 2);
    if !new_orgs.is_empty() {
        warnings.push(ChangeWarning {
            category: WarningCategory::NewOrganizations,
            message: format!("Mentions new organizations: {}", new_orgs.join(", ")),
        });
    }

    // 3. new technologies, unless mentioned anywhere in the original resume
    let before_tech: HashSet<String> = extract_technology_tokens(before)
        .into_iter()
        .map(|t| t.to_lowercase())
        .collect();
    let original_text = original.full_text();
    let after_tech: Vec<String> = extract_technology_tokens(after)
        .into_iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !contains_term(&original_text, t))
        .collect();
    let new_tech = first_new(after_tech, &before_tech, 3);
    if !new_tech.is_empty() {
        warnings.push(ChangeWarning {
            category: WarningCategory::NewTechnologies,
            message: format!("Introduces new technologies: {}", new_tech.join(", ")),
        });
    }

    // 4. expansion
    let before_len = before.chars().count();
    let after_len = after.chars().count();
    if after_len > before_len + EXPANSION_MIN_CHARS && before_len > 0 {
        let increase_pct = (after_len - before_len) as f64 / before_len as f64 * 100.0;
        if increase_pct > EXPANSION_MIN_PCT {
            warnings.push(ChangeWarning {
                category: WarningCategory::ExpandedContent,
                message: format!("Significantly expanded content (+{increase_pct:.0}% length)"),
            });
        }
    }

    ChangeCheck {
        is_risky: !warnings.is_empty(),
        warnings,
    }
}

/// Runs [`check_change`] over every change and summarises the result.
pub fn generate_authenticity_report(
    changes: &[Change],
    original: &StructuredResume,
) -> AuthenticityReport {
    let mut categories = WarningCategories::default();
    let mut risky_changes = Vec::new();

    for change in changes {
        let check = check_change(change, original);
        if !check.is_risky {
            continue;
        }
        for warning in &check.warnings {
            match warning.category {
                WarningCategory::NewMetrics => categories.new_metrics += 1,
                WarningCategory::NewOrganizations => categories.new_organizations += 1,
                WarningCategory::NewTechnologies => categories.new_technologies += 1,
                WarningCategory::ExpandedContent => categories.expanded_content += 1,
            }
        }
        risky_changes.push(FlaggedChange {
            change: change.clone(),
            warnings: check.warnings.into_iter().map(|w| w.message).collect(),
        });
    }

    let total_changes = changes.len();
    let flagged_changes = risky_changes.len();
    let flag_rate = if total_changes > 0 {
        flagged_changes as f64 / total_changes as f64 * 100.0
    } else {
        0.0
    };

    AuthenticityReport {
        total_changes,
        flagged_changes,
        flag_rate,
        recommendations: recommendations(&categories),
        warning_categories: categories,
        risky_changes,
        is_safe: flagged_changes == 0,
    }
}

fn recommendations(categories: &WarningCategories) -> Vec<String> {
    let mut out = Vec::new();
    if categories.new_metrics > 0 {
        out.push(
            "Review changes with new metrics carefully - ensure all numbers are accurate"
                .to_string(),
        );
    }
    if categories.new_organizations > 0 {
        out.push(
            "Verify that any mentioned organizations are actually part of candidate's experience"
                .to_string(),
        );
    }
    if categories.new_technologies > 0 {
        out.push(
            "Confirm that new technologies mentioned were actually used by the candidate"
                .to_string(),
        );
    }
    if categories.expanded_content > 0 {
        out.push(
            "Review significantly expanded content to ensure no fabricated details were added"
                .to_string(),
        );
    }
    if out.is_empty() {
        out.push("All changes appear safe - no obvious fabrication detected".to_string());
    }
    out
}

fn organizations(text: &str) -> impl Iterator<Item = String> {
    extract_capitalized_phrases(text)
        .into_iter()
        .filter(|p| !COMMON_CAPITALIZED.contains(p.as_str()))
}

/// Items of `candidates` not in `known`, deduplicated, first `limit` in order.
fn first_new(candidates: Vec<String>, known: &HashSet<String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| !known.contains(c) && seen.insert(c.clone()))
        .take(limit)
        .collect()
}
