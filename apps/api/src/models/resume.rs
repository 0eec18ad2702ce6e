use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub graduation_date: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
}

/// Structured resume. The original and every candidate are independent
/// snapshots; nothing in the optimization loop edits one in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredResume {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub total_years_experience: Option<f64>,
    #[serde(default)]
    pub raw_text: Option<String>,
}

impl StructuredResume {
    /// Text fed to the metric scorers: `raw_text` when present, otherwise the
    /// Markdown rendering.
    pub fn scoring_text(&self) -> String {
        match self.raw_text.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.to_string(),
            _ => self.to_markdown(),
        }
    }

    /// Every bullet across all experiences, in resume order.
    pub fn all_bullets(&self) -> impl Iterator<Item = &str> {
        self.experiences
            .iter()
            .flat_map(|e| e.bullets.iter().map(String::as_str))
    }

    /// Company names as they appear on the resume.
    pub fn company_names(&self) -> Vec<&str> {
        self.experiences
            .iter()
            .map(|e| e.company.as_str())
            .filter(|c| !c.trim().is_empty())
            .collect()
    }

    /// Full serialized form, used when a check must look "anywhere" in the resume.
    pub fn full_text(&self) -> String {
        let mut out = serde_json::to_string(self).unwrap_or_default();
        out.push('\n');
        out.push_str(&self.to_markdown());
        out
    }

    pub fn to_markdown(&self) -> String {
        let mut md: Vec<String> = Vec::new();

        md.push(format!("# {}", self.name));

        let contact: Vec<&str> = [&self.email, &self.phone, &self.location]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect();
        if !contact.is_empty() {
            md.push(contact.join(" | "));
        }

        let links: Vec<&str> = [&self.linkedin, &self.github, &self.portfolio]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect();
        if !links.is_empty() {
            md.push(links.join(" | "));
        }

        if let Some(headline) = non_empty(&self.headline) {
            md.push(String::new());
            md.push(format!("**{headline}**"));
        }

        if let Some(summary) = non_empty(&self.summary) {
            md.push(String::new());
            md.push("## Professional Summary".to_string());
            md.push(summary.to_string());
        }

        if !self.experiences.is_empty() {
            md.push(String::new());
            md.push("## Professional Experience".to_string());
            for exp in &self.experiences {
                md.push(String::new());
                md.push(format!("### {} • {}", exp.title, exp.company));

                let start = exp.start_date.as_deref().unwrap_or("");
                let end = exp.end_date.as_deref().unwrap_or("Present");
                let mut dates = if start.is_empty() {
                    end.to_string()
                } else {
                    format!("{start} – {end}")
                };
                if let Some(loc) = non_empty(&exp.location) {
                    dates.push_str(&format!(" | {loc}"));
                }
                md.push(format!("*{dates}*"));

                for bullet in &exp.bullets {
                    md.push(format!("- {bullet}"));
                }
                if !exp.skills.is_empty() {
                    md.push(format!("**Skills**: {}", exp.skills.join(", ")));
                }
            }
        }

        if !self.skills.is_empty() {
            md.push(String::new());
            md.push("## Skills".to_string());
            md.push(self.skills.join(", "));
        }

        if !self.education.is_empty() {
            md.push(String::new());
            md.push("## Education".to_string());
            for edu in &self.education {
                md.push(format!("### {} • {}", edu.degree, edu.institution));
                if let Some(date) = non_empty(&edu.graduation_date) {
                    md.push(date.to_string());
                }
                if let Some(gpa) = non_empty(&edu.gpa) {
                    md.push(format!("GPA: {gpa}"));
                }
            }
        }

        if !self.certifications.is_empty() {
            md.push(String::new());
            md.push("## Certifications".to_string());
            for cert in &self.certifications {
                md.push(format!("- {cert}"));
            }
        }

        md.join("\n")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
