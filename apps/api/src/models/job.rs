use serde::{Deserialize, Serialize};

/// A single requirement line extracted from a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub description: String,
    /// "Required Skill" | "Preferred Skill" | "Responsibility" | "Qualification"
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_must_have: bool,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Structured job posting produced by job analysis. Immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredJob {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// "Senior", "Mid-level", "Entry" ...
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub raw_text: Option<String>,
}

impl StructuredJob {
    /// Text used as the job side of every metric: raw posting, then description,
    /// then a rendering of the structured fields.
    pub fn scoring_text(&self) -> String {
        if let Some(raw) = self.raw_text.as_deref().filter(|t| !t.trim().is_empty()) {
            return raw.to_string();
        }
        if let Some(desc) = self.description.as_deref().filter(|t| !t.trim().is_empty()) {
            return desc.to_string();
        }
        self.render_text()
    }

    fn render_text(&self) -> String {
        let mut out = self.title.clone();
        if let Some(company) = &self.company {
            out.push_str(&format!(" at {company}"));
        }
        out.push('\n');
        for responsibility in &self.responsibilities {
            out.push_str(&format!("- {responsibility}\n"));
        }
        for req in &self.requirements {
            out.push_str(&format!("- {}\n", req.description));
        }
        if !self.required_skills.is_empty() {
            out.push_str(&format!(
                "Required skills: {}\n",
                self.required_skills.join(", ")
            ));
        }
        if !self.preferred_skills.is_empty() {
            out.push_str(&format!(
                "Preferred skills: {}\n",
                self.preferred_skills.join(", ")
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_text_prefers_raw_text() {
        let job = StructuredJob {
            title: "Backend Engineer".to_string(),
            description: Some("Build services".to_string()),
            raw_text: Some("Raw posting text".to_string()),
            ..Default::default()
        };
        assert_eq!(job.scoring_text(), "Raw posting text");
    }

    #[test]
    fn test_scoring_text_falls_back_to_rendering() {
        let job = StructuredJob {
            title: "Backend Engineer".to_string(),
            company: Some("Acme".to_string()),
            required_skills: vec!["Rust".to_string(), "SQL".to_string()],
            requirements: vec![Requirement {
                description: "5+ years building APIs".to_string(),
                ..Default::default()
            }],
            raw_text: Some("   ".to_string()),
            ..Default::default()
        };
        let text = job.scoring_text();
        assert!(text.starts_with("Backend Engineer at Acme"));
        assert!(text.contains("- 5+ years building APIs"));
        assert!(text.contains("Required skills: Rust, SQL"));
    }

    #[test]
    fn test_job_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "title": "Data Engineer",
            "required_skills": ["Python", "Airflow"],
            "requirements": [{"description": "Build pipelines"}]
        }"#;
        let job: StructuredJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.required_skills.len(), 2);
        assert!(job.preferred_skills.is_empty());
        assert!(!job.requirements[0].is_must_have);
        assert!(job.requirements[0].keywords.is_empty());
    }
}
