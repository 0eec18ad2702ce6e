use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text_signals::contains_term;
use crate::models::{StructuredJob, StructuredResume};

static REQUIRED_YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*\+?\s*years?").expect("years pattern must compile"));

const EVIDENCE_SKILLS_SECTION: &str = "Listed in skills section";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillStrength {
    Strong,
    Weak,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    pub is_required: bool,
    pub is_present: bool,
    pub strength: SkillStrength,
    /// One entry per distinct place the skill was found.
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub matched_skills: Vec<SkillMatch>,
    pub missing_required_skills: Vec<String>,
    pub missing_preferred_skills: Vec<String>,
    pub weakly_covered_skills: Vec<SkillMatch>,

    pub has_required_experience: bool,
    pub experience_gap_years: f64,
    pub relevant_experience_count: usize,

    pub total_requirements: usize,
    pub met_requirements: usize,
    /// 0-100, one decimal.
    pub coverage_percentage: f64,

    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Before/after comparison of two gap analyses for the same job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapImprovement {
    pub coverage_before: f64,
    pub coverage_after: f64,
    pub coverage_delta: f64,
    pub resolved_required_skills: Vec<String>,
    pub still_missing_required_skills: Vec<String>,
}

impl GapImprovement {
    pub fn between(before: &GapAnalysis, after: &GapAnalysis) -> Self {
        let still_missing: HashSet<String> = after
            .missing_required_skills
            .iter()
            .map(|s| normalize(s))
            .collect();
        let resolved = before
            .missing_required_skills
            .iter()
            .filter(|s| !still_missing.contains(&normalize(s)))
            .cloned()
            .collect();

        Self {
            coverage_before: before.coverage_percentage,
            coverage_after: after.coverage_percentage,
            coverage_delta: round1(after.coverage_percentage - before.coverage_percentage),
            resolved_required_skills: resolved,
            still_missing_required_skills: after.missing_required_skills.clone(),
        }
    }
}

/// Compares a structured job against a structured resume. Pure and deterministic.
pub fn analyze_gap(job: &StructuredJob, resume: &StructuredResume) -> GapAnalysis {
    let required = dedup_skills(&job.required_skills);
    let required_keys: HashSet<String> = required.iter().map(|s| normalize(s)).collect();
    let preferred: Vec<String> = dedup_skills(&job.preferred_skills)
        .into_iter()
        .filter(|s| !required_keys.contains(&normalize(s)))
        .collect();

    let listed_skills = normalized_set(&resume.skills);

    let mut matched_skills = Vec::new();
    let mut weakly_covered_skills = Vec::new();
    let mut missing_required_skills = Vec::new();
    let mut missing_preferred_skills = Vec::new();

    for skill in &required {
        let skill_match = check_skill(skill, &listed_skills, resume, true);
        match skill_match.strength {
            SkillStrength::Strong => matched_skills.push(skill_match),
            SkillStrength::Weak => weakly_covered_skills.push(skill_match),
            SkillStrength::Missing => missing_required_skills.push(skill.clone()),
        }
    }

    // Preferred skills are not split by strength; any evidence counts as matched.
    for skill in &preferred {
        let skill_match = check_skill(skill, &listed_skills, resume, false);
        if skill_match.is_present {
            matched_skills.push(skill_match);
        } else {
            missing_preferred_skills.push(skill.clone());
        }
    }

    let (has_required_experience, experience_gap_years) = check_experience(job, resume);
    let relevant_experience_count = count_relevant_experiences(job, resume);

    let total_requirements = job.requirements.len();
    let met_requirements = count_met_requirements(job, resume);
    let coverage_percentage = if total_requirements > 0 {
        round1(met_requirements as f64 / total_requirements as f64 * 100.0)
    } else {
        0.0
    };

    let strengths = identify_strengths(resume, &matched_skills, relevant_experience_count);
    let weaknesses = identify_weaknesses(&missing_required_skills, &weakly_covered_skills);
    let suggestions = generate_suggestions(
        &missing_required_skills,
        &missing_preferred_skills,
        &weakly_covered_skills,
        resume,
    );

    GapAnalysis {
        matched_skills,
        missing_required_skills,
        missing_preferred_skills,
        weakly_covered_skills,
        has_required_experience,
        experience_gap_years,
        relevant_experience_count,
        total_requirements,
        met_requirements,
        coverage_percentage,
        strengths,
        weaknesses,
        suggestions,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skill matching
// ────────────────────────────────────────────────────────────────────────────

fn check_skill(
    skill: &str,
    listed_skills: &HashSet<String>,
    resume: &StructuredResume,
    is_required: bool,
) -> SkillMatch {
    let key = normalize(skill);
    let mut evidence = Vec::new();

    if listed_skills.contains(&key) {
        evidence.push(EVIDENCE_SKILLS_SECTION.to_string());
    }

    for exp in &resume.experiences {
        if exp.bullets.iter().any(|b| contains_term(b, &key)) {
            evidence.push(format!("Mentioned in {} at {}", exp.title, exp.company));
        }
    }

    for exp in &resume.experiences {
        if exp.skills.iter().any(|s| normalize(s) == key) {
            evidence.push(format!("Used in {} role", exp.title));
        }
    }

    let strength = match evidence.len() {
        0 => SkillStrength::Missing,
        1 => SkillStrength::Weak,
        _ => SkillStrength::Strong,
    };

    SkillMatch {
        skill: skill.to_string(),
        is_required,
        is_present: !evidence.is_empty(),
        strength,
        evidence,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Returns `(has_required_experience, gap_years)`. No signal means satisfied.
fn check_experience(job: &StructuredJob, resume: &StructuredResume) -> (bool, f64) {
    let Some(required_years) = required_years(job) else {
        return (true, 0.0);
    };
    let resume_years = resume.total_years_experience.unwrap_or(0.0);
    if resume_years >= required_years {
        (true, 0.0)
    } else {
        (false, required_years - resume_years)
    }
}

fn required_years(job: &StructuredJob) -> Option<f64> {
    if let Some(level) = job.experience_level.as_deref() {
        if contains_term(level, "senior") || contains_term(level, "sr") {
            return Some(5.0);
        }
        if contains_term(level, "mid") || contains_term(level, "intermediate") {
            return Some(3.0);
        }
        if contains_term(level, "junior") || contains_term(level, "jr") || contains_term(level, "entry")
        {
            return Some(1.0);
        }
    }

    job.requirements.iter().find_map(|req| {
        REQUIRED_YEARS
            .captures(&req.description.to_lowercase())
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    })
}

fn count_relevant_experiences(job: &StructuredJob, resume: &StructuredResume) -> usize {
    let job_skills: HashSet<String> = job
        .required_skills
        .iter()
        .chain(job.preferred_skills.iter())
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect();

    resume
        .experiences
        .iter()
        .filter(|exp| {
            exp.skills.iter().any(|s| job_skills.contains(&normalize(s)))
                || exp.bullets.iter().any(|bullet| {
                    job.required_skills
                        .iter()
                        .any(|skill| contains_term(bullet, skill))
                })
        })
        .count()
}

fn count_met_requirements(job: &StructuredJob, resume: &StructuredResume) -> usize {
    let mut resume_skills = normalized_set(&resume.skills);
    for exp in &resume.experiences {
        resume_skills.extend(normalized_set(&exp.skills));
    }

    let mut resume_text = resume.summary.clone().unwrap_or_default();
    for bullet in resume.all_bullets() {
        resume_text.push(' ');
        resume_text.push_str(bullet);
    }

    job.requirements
        .iter()
        .filter(|req| {
            let keywords = normalized_set(&req.keywords);
            keywords.iter().any(|kw| resume_skills.contains(kw))
                || keywords.iter().any(|kw| contains_term(&resume_text, kw))
        })
        .count()
}

// ────────────────────────────────────────────────────────────────────────────
// Narrative
// ────────────────────────────────────────────────────────────────────────────

fn identify_strengths(
    resume: &StructuredResume,
    matched_skills: &[SkillMatch],
    relevant_experience_count: usize,
) -> Vec<String> {
    let mut strengths = Vec::new();

    let strong = matched_skills
        .iter()
        .filter(|s| s.strength == SkillStrength::Strong)
        .count();
    if strong >= 5 {
        strengths.push(format!(
            "Strong technical skills ({strong} well-documented skills)"
        ));
    }

    if let Some(years) = resume.total_years_experience.filter(|y| *y >= 5.0) {
        strengths.push(format!("{years} years of professional experience"));
    }

    if relevant_experience_count >= 2 {
        strengths.push(format!(
            "{relevant_experience_count} relevant positions in work history"
        ));
    }

    let degrees: Vec<&str> = resume.education.iter().map(|e| e.degree.as_str()).collect();
    if degrees
        .iter()
        .any(|d| contains_term(d, "master") || contains_term(d, "masters") || contains_term(d, "phd"))
    {
        strengths.push("Advanced degree".to_string());
    } else if degrees.iter().any(|d| {
        contains_term(d, "bachelor")
            || contains_term(d, "bachelors")
            || contains_term(d, "bs")
            || contains_term(d, "bsc")
            || contains_term(d, "ba")
    }) {
        strengths.push("Bachelor's degree".to_string());
    }

    if !resume.certifications.is_empty() {
        strengths.push(format!(
            "{} professional certifications",
            resume.certifications.len()
        ));
    }

    strengths
}

fn identify_weaknesses(missing_required: &[String], weakly_covered: &[SkillMatch]) -> Vec<String> {
    let mut weaknesses = Vec::new();
    if !missing_required.is_empty() {
        weaknesses.push(format!("Missing {} required skills", missing_required.len()));
    }
    if !weakly_covered.is_empty() {
        weaknesses.push(format!(
            "{} skills mentioned only briefly",
            weakly_covered.len()
        ));
    }
    weaknesses
}

fn generate_suggestions(
    missing_required: &[String],
    missing_preferred: &[String],
    weakly_covered: &[SkillMatch],
    resume: &StructuredResume,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !missing_required.is_empty() {
        let top: Vec<&str> = missing_required.iter().take(3).map(String::as_str).collect();
        suggestions.push(format!(
            "Add or emphasize experience with: {}",
            top.join(", ")
        ));
    }

    if !weakly_covered.is_empty() {
        let weak: Vec<&str> = weakly_covered
            .iter()
            .take(3)
            .map(|s| s.skill.as_str())
            .collect();
        suggestions.push(format!(
            "Strengthen coverage of: {} with specific examples",
            weak.join(", ")
        ));
    }

    if !missing_preferred.is_empty() && missing_preferred.len() <= 3 {
        suggestions.push(format!(
            "Consider adding: {} to stand out",
            missing_preferred.join(", ")
        ));
    }

    let summary_len = resume
        .summary
        .as_deref()
        .map(|s| s.chars().count())
        .unwrap_or(0);
    if summary_len < 100 {
        suggestions.push(
            "Add or expand professional summary to highlight relevant experience".to_string(),
        );
    }

    let has_numbers = resume
        .all_bullets()
        .any(|b| b.chars().any(|c| c.is_ascii_digit()));
    if !has_numbers {
        suggestions.push("Quantify achievements with metrics and numbers".to_string());
    }

    suggestions
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

fn normalized_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Drops blanks and case-insensitive duplicates, keeping the first spelling.
fn dedup_skills(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Education, Experience, Requirement};

    fn job(required: &[&str], preferred: &[&str]) -> StructuredJob {
        StructuredJob {
            title: "Platform Engineer".to_string(),
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn resume(skills: &[&str]) -> StructuredResume {
        StructuredResume {
            name: "Sam Lee".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn requirement(description: &str, keywords: &[&str]) -> Requirement {
        Requirement {
            description: description.to_string(),
            category: "Required Skill".to_string(),
            is_must_have: true,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_python_aws_docker_scenario() {
        let job = job(&["Python", "AWS", "Docker"], &[]);
        let before = analyze_gap(&job, &resume(&["Python"]));

        let missing: Vec<String> = before
            .missing_required_skills
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        assert!(missing.contains(&"aws".to_string()));
        assert!(missing.contains(&"docker".to_string()));
        assert!(before
            .suggestions
            .iter()
            .any(|s| s.contains("AWS") || s.contains("Docker")));

        let after = analyze_gap(&job, &resume(&["Python", "AWS", "Docker"]));
        assert!(after.missing_required_skills.is_empty());

        let improvement = GapImprovement::between(&before, &after);
        assert_eq!(improvement.resolved_required_skills, vec!["AWS", "Docker"]);
        assert!(improvement.still_missing_required_skills.is_empty());
    }

    #[test]
    fn test_required_skills_are_partitioned() {
        let job = job(&["Python", "Kubernetes", "Go", "Terraform"], &["Rust"]);
        let resume = StructuredResume {
            name: "Sam Lee".to_string(),
            skills: vec!["python".to_string(), "Go".to_string()],
            experiences: vec![Experience {
                title: "SRE".to_string(),
                company: "Initech".to_string(),
                bullets: vec![
                    "Ran Kubernetes clusters for Python services".to_string(),
                    "Good at on-call".to_string(),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        let analysis = analyze_gap(&job, &resume);

        for skill in &job.required_skills {
            let buckets = [
                analysis.matched_skills.iter().any(|m| &m.skill == skill),
                analysis.weakly_covered_skills.iter().any(|m| &m.skill == skill),
                analysis.missing_required_skills.contains(skill),
            ];
            assert_eq!(buckets.iter().filter(|b| **b).count(), 1, "{skill}");
        }

        let python = analysis
            .matched_skills
            .iter()
            .find(|m| m.skill == "Python")
            .unwrap();
        assert_eq!(python.strength, SkillStrength::Strong);
        assert_eq!(
            python.evidence,
            vec![
                "Listed in skills section".to_string(),
                "Mentioned in SRE at Initech".to_string()
            ]
        );
        // "go" inside "Good" is not a mention; only the skills list counts.
        let go = analysis
            .weakly_covered_skills
            .iter()
            .find(|m| m.skill == "Go")
            .unwrap();
        assert_eq!(go.evidence.len(), 1);
        assert!(analysis.missing_required_skills.contains(&"Terraform".to_string()));
        assert_eq!(analysis.missing_preferred_skills, vec!["Rust"]);
    }

    #[test]
    fn test_skill_listed_and_used_in_a_role_is_strong() {
        let job = job(&["Terraform", "Rust"], &[]);
        let resume = StructuredResume {
            name: "Sam Lee".to_string(),
            skills: vec!["Terraform".to_string(), "rust".to_string()],
            experiences: vec![Experience {
                title: "SRE".to_string(),
                company: "Initech".to_string(),
                bullets: vec!["Rewrote the deploy agent in Rust".to_string()],
                skills: vec!["terraform".to_string(), "Rust".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let analysis = analyze_gap(&job, &resume);
        let matched = |name: &str| {
            analysis
                .matched_skills
                .iter()
                .find(|m| m.skill == name)
                .unwrap()
                .clone()
        };

        let terraform = matched("Terraform");
        assert_eq!(terraform.strength, SkillStrength::Strong);
        assert_eq!(
            terraform.evidence,
            vec![
                "Listed in skills section".to_string(),
                "Used in SRE role".to_string()
            ]
        );

        let rust = matched("Rust");
        assert_eq!(
            rust.evidence,
            vec![
                "Listed in skills section".to_string(),
                "Mentioned in SRE at Initech".to_string(),
                "Used in SRE role".to_string()
            ]
        );
        assert!(analysis.weakly_covered_skills.is_empty());
        assert!(analysis.missing_required_skills.is_empty());
    }

    #[test]
    fn test_zero_requirements_gives_zero_coverage() {
        let analysis = analyze_gap(&job(&["Python"], &[]), &resume(&["Python"]));
        assert_eq!(analysis.total_requirements, 0);
        assert_eq!(analysis.met_requirements, 0);
        assert_eq!(analysis.coverage_percentage, 0.0);
    }

    #[test]
    fn test_empty_resume_misses_every_required_skill() {
        let mut job = job(&["Python", "SQL"], &[]);
        job.requirements = vec![requirement("Python experience", &["python"])];
        let analysis = analyze_gap(&job, &StructuredResume::default());
        assert_eq!(analysis.missing_required_skills, vec!["Python", "SQL"]);
        assert_eq!(analysis.total_requirements, 1);
        assert_eq!(analysis.coverage_percentage, 0.0);
    }

    #[test]
    fn test_coverage_rounds_to_one_decimal_and_stays_bounded() {
        let mut job = job(&[], &[]);
        job.requirements = vec![
            requirement("Python", &["python"]),
            requirement("Cloud", &["aws"]),
            requirement("Go", &["go"]),
        ];
        let resume = StructuredResume {
            skills: vec!["Python".to_string()],
            summary: Some("Good engineer who ships on AWS".to_string()),
            ..Default::default()
        };
        let analysis = analyze_gap(&job, &resume);
        assert_eq!(analysis.met_requirements, 2);
        assert_eq!(analysis.coverage_percentage, 66.7);
        assert!((0.0..=100.0).contains(&analysis.coverage_percentage));
    }

    #[test]
    fn test_experience_requirement() {
        let mut job = job(&[], &[]);
        job.requirements = vec![requirement("7+ years of backend work", &[])];
        let mut resume = resume(&[]);
        resume.total_years_experience = Some(4.0);

        let analysis = analyze_gap(&job, &resume);
        assert!(!analysis.has_required_experience);
        assert_eq!(analysis.experience_gap_years, 3.0);

        job.experience_level = Some("Mid-level".to_string());
        let analysis = analyze_gap(&job, &resume);
        assert!(analysis.has_required_experience);

        let no_signal = analyze_gap(&self::job(&[], &[]), &StructuredResume::default());
        assert!(no_signal.has_required_experience);
        assert_eq!(no_signal.experience_gap_years, 0.0);
    }

    #[test]
    fn test_strengths_and_suggestions() {
        let resume = StructuredResume {
            name: "Sam Lee".to_string(),
            summary: Some("Short".to_string()),
            total_years_experience: Some(8.0),
            education: vec![Education {
                degree: "Master of Science".to_string(),
                institution: "Tech".to_string(),
                ..Default::default()
            }],
            experiences: vec![Experience {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                bullets: vec!["Shipped features".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let analysis = analyze_gap(&job(&[], &["Kafka"]), &resume);

        assert!(analysis.strengths.contains(&"8 years of professional experience".to_string()));
        assert!(analysis.strengths.contains(&"Advanced degree".to_string()));
        assert!(analysis
            .suggestions
            .contains(&"Consider adding: Kafka to stand out".to_string()));
        assert!(analysis
            .suggestions
            .iter()
            .any(|s| s.starts_with("Add or expand professional summary")));
        assert!(analysis
            .suggestions
            .contains(&"Quantify achievements with metrics and numbers".to_string()));
    }
}
