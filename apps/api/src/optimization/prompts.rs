// All LLM prompt constants for the optimization module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::analysis::gap::GapAnalysis;
use crate::llm_client::prompts::TRUTHFULNESS_INSTRUCTION;
use crate::models::{StructuredJob, StructuredResume};

use super::config::ResumeStyle;

/// System prompt for job posting analysis.
pub const JOB_ANALYSIS_SYSTEM: &str = "You are an expert job posting analyzer. \
    Extract structured information from job descriptions. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Job analysis prompt template. Replace `{job_text}` before sending.
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job posting and return structured JSON.

Return a JSON object with this schema:
{
  "title": "Job title",
  "company": "Company name or null",
  "location": "Location or null",
  "experience_level": "Entry/Mid/Senior/etc or null",
  "description": "Brief job description",
  "responsibilities": ["..."],
  "requirements": [
    {
      "description": "Requirement description",
      "category": "Required Skill|Preferred Skill|Responsibility|Qualification|Education|Experience",
      "is_must_have": true,
      "keywords": ["relevant", "keywords"]
    }
  ],
  "required_skills": ["must-have skills"],
  "preferred_skills": ["nice-to-have skills"]
}

JOB POSTING:
{job_text}"#;

/// System prompt for resume analysis.
pub const RESUME_ANALYSIS_SYSTEM: &str = "You are an expert resume analyzer. \
    Extract structured information from resumes, including every skill mentioned \
    or implied in experience bullets. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Resume analysis prompt template. Replace `{resume_text}` before sending.
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following resume and return structured JSON.

Return a JSON object with this schema:
{
  "name": "Full name",
  "email": "Email or null",
  "phone": "Phone or null",
  "location": "Location or null",
  "linkedin": "LinkedIn URL or null",
  "github": "GitHub URL or null",
  "portfolio": "Portfolio URL or null",
  "headline": "Professional headline or null",
  "summary": "Professional summary or null",
  "experiences": [
    {
      "title": "Job title",
      "company": "Company name",
      "location": "Location or null",
      "start_date": "e.g. Jan 2020",
      "end_date": "End date or Present",
      "bullets": ["..."],
      "skills": ["skills used in this role"]
    }
  ],
  "skills": ["all technical and relevant skills"],
  "education": [
    {"degree": "...", "institution": "...", "graduation_date": "... or null", "gpa": "... or null"}
  ],
  "certifications": ["..."],
  "total_years_experience": 5.5
}

RESUME:
{resume_text}"#;

/// System prompt for one optimization pass.
pub const OPTIMIZATION_SYSTEM: &str = r#"You are an expert resume optimization specialist. Improve resumes to better match job requirements while keeping them truthful and ATS-friendly.

Keep the original structure and order of experiences. Use action verbs and concrete language. Incorporate missing keywords only where they truly apply.

Respond with valid JSON only, using this schema:
{
  "optimized_resume": { complete resume object with the same fields as the input },
  "changes": [
    {
      "id": "unique id",
      "change_type": "summary|headline|experience_bullet|skills_section|education|other",
      "location": "summary or experiences[0].bullets[1]",
      "before": "original text",
      "after": "optimized text",
      "rationale": "why this change helps"
    }
  ],
  "summary_of_improvements": ["high-level improvement"]
}"#;

/// Everything the optimize-once prompt needs besides the job, resume and gap.
pub struct OptimizationPromptContext<'a> {
    pub style: ResumeStyle,
    pub weak_areas: &'a [String],
    pub job_keywords: &'a [String],
}

/// Builds the optimize-once user prompt.
pub fn build_optimization_prompt(
    job: &StructuredJob,
    resume: &StructuredResume,
    gap: &GapAnalysis,
    ctx: &OptimizationPromptContext<'_>,
) -> String {
    let mut lines = vec![
        TRUTHFULNESS_INSTRUCTION.to_string(),
        String::new(),
        format!(
            "OPTIMIZATION STYLE: {} ({})",
            ctx.style.as_str(),
            ctx.style.description()
        ),
        String::new(),
        "TARGET JOB:".to_string(),
        format!("Title: {}", job.title),
        format!("Company: {}", job.company.as_deref().unwrap_or("N/A")),
        format!(
            "Level: {}",
            job.experience_level.as_deref().unwrap_or("N/A")
        ),
        format!("Required Skills: {}", take_join(&job.required_skills, 10)),
        format!("Preferred Skills: {}", take_join(&job.preferred_skills, 5)),
    ];

    if !ctx.job_keywords.is_empty() {
        lines.push(format!("Top Keywords: {}", take_join(ctx.job_keywords, 20)));
    }

    lines.push("Key Requirements:".to_string());
    for req in job.requirements.iter().take(8) {
        lines.push(format!("- {}", req.description));
    }

    lines.push(String::new());
    lines.push("GAP ANALYSIS:".to_string());
    lines.push(format!("Coverage: {}%", gap.coverage_percentage));
    lines.push(format!(
        "Missing Required Skills: {}",
        take_join(&gap.missing_required_skills, 5)
    ));
    let weak: Vec<String> = gap
        .weakly_covered_skills
        .iter()
        .take(5)
        .map(|s| s.skill.clone())
        .collect();
    lines.push(format!("Weakly Covered Skills: {}", weak.join(", ")));
    if !gap.suggestions.is_empty() {
        lines.push("Top Suggestions:".to_string());
        for suggestion in gap.suggestions.iter().take(3) {
            lines.push(format!("- {suggestion}"));
        }
    }

    if !ctx.weak_areas.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "FOCUS AREAS (failed quality checks in the previous pass): {}",
            ctx.weak_areas.join(", ")
        ));
    }

    lines.push(String::new());
    lines.push("CURRENT RESUME (JSON):".to_string());
    lines.push(serde_json::to_string_pretty(resume).unwrap_or_else(|_| resume.to_markdown()));
    lines.push(String::new());
    lines.push(
        "Optimize this resume to better match the target job. Return ONLY the JSON object."
            .to_string(),
    );

    lines.join("\n")
}

fn take_join(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_focus_areas_only_when_present() {
        let job = StructuredJob {
            title: "Platform Engineer".to_string(),
            required_skills: vec!["Rust".to_string(), "Kafka".to_string()],
            ..Default::default()
        };
        let resume = StructuredResume {
            name: "Sam Lee".to_string(),
            ..Default::default()
        };
        let gap = GapAnalysis {
            missing_required_skills: vec!["Kafka".to_string()],
            ..Default::default()
        };

        let first = build_optimization_prompt(
            &job,
            &resume,
            &gap,
            &OptimizationPromptContext {
                style: ResumeStyle::Conservative,
                weak_areas: &[],
                job_keywords: &[],
            },
        );
        assert!(first.contains("Title: Platform Engineer"));
        assert!(first.contains("Missing Required Skills: Kafka"));
        assert!(first.contains("OPTIMIZATION STYLE: conservative"));
        assert!(!first.contains("FOCUS AREAS"));

        let weak = vec!["role_alignment".to_string()];
        let second = build_optimization_prompt(
            &job,
            &resume,
            &gap,
            &OptimizationPromptContext {
                style: ResumeStyle::Balanced,
                weak_areas: &weak,
                job_keywords: &["kafka".to_string()],
            },
        );
        assert!(second.contains("FOCUS AREAS (failed quality checks in the previous pass): role_alignment"));
        assert!(second.contains("Top Keywords: kafka"));
        assert!(second.contains("\"name\": \"Sam Lee\""));
    }
}
