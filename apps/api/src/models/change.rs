use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Summary,
    Headline,
    ExperienceBullet,
    SkillsSection,
    Education,
    Other,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Summary => "summary",
            ChangeType::Headline => "headline",
            ChangeType::ExperienceBullet => "experience_bullet",
            ChangeType::SkillsSection => "skills_section",
            ChangeType::Education => "education",
            ChangeType::Other => "other",
        }
    }

    /// Narrative edits are the only ones checked for fabricated content.
    pub fn is_narrative(&self) -> bool {
        matches!(
            self,
            ChangeType::ExperienceBullet | ChangeType::Summary | ChangeType::Headline
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Edited,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Pending => "pending",
            ChangeStatus::Accepted => "accepted",
            ChangeStatus::Rejected => "rejected",
            ChangeStatus::Edited => "edited",
        }
    }
}

/// One textual edit proposed by the optimizer. `location` is a path such as
/// `experience[0].bullets[2]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub id: String,
    pub change_type: ChangeType,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub status: ChangeStatus,
    #[serde(default)]
    pub edited_value: Option<String>,
}

impl Change {
    /// The text that survives review.
    pub fn final_value(&self) -> &str {
        match self.status {
            ChangeStatus::Edited => self.edited_value.as_deref().unwrap_or(&self.after),
            ChangeStatus::Accepted | ChangeStatus::Pending => &self.after,
            ChangeStatus::Rejected => &self.before,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
}

pub fn change_stats(changes: &[Change]) -> ChangeStats {
    let mut stats = ChangeStats {
        total: changes.len(),
        ..Default::default()
    };
    for status in [
        ChangeStatus::Pending,
        ChangeStatus::Accepted,
        ChangeStatus::Rejected,
        ChangeStatus::Edited,
    ] {
        stats.by_status.insert(status.as_str().to_string(), 0);
    }
    for change in changes {
        *stats
            .by_status
            .entry(change.status.as_str().to_string())
            .or_insert(0) += 1;
        *stats
            .by_type
            .entry(change.change_type.as_str().to_string())
            .or_insert(0) += 1;
    }
    stats
}
