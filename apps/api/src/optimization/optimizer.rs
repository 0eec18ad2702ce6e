use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::config::ResumeStyle;
use super::prompts::{build_optimization_prompt, OptimizationPromptContext, OPTIMIZATION_SYSTEM};
use crate::analysis::gap::GapAnalysis;
use crate::analysis::lexicon::{STOPWORDS, TECH_PHRASES};
use crate::analysis::text_signals::extract_keywords_with_phrases;
use crate::errors::CollaboratorError;
use crate::llm_client::{CallOptions, LlmClient};
use crate::models::{Change, StructuredJob, StructuredResume};

const OPTIMIZATION_MAX_TOKENS: u32 = 6000;
const PROMPT_KEYWORD_LIMIT: usize = 20;

/// Output of one optimize-once call.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationPass {
    pub resume: StructuredResume,
    pub changes: Vec<Change>,
    pub summary_of_improvements: Vec<String>,
}

/// Produces one candidate resume per call. `weak_areas` lists the metric
/// keys that failed on the previous pass and is empty on the first.
#[async_trait]
pub trait ResumeOptimizer: Send + Sync {
    async fn optimize_once(
        &self,
        job: &StructuredJob,
        resume: &StructuredResume,
        gap: &GapAnalysis,
        style: ResumeStyle,
        weak_areas: &[String],
    ) -> Result<OptimizationPass, CollaboratorError>;
}

#[derive(Debug, Deserialize)]
struct OptimizationReply {
    optimized_resume: StructuredResume,
    #[serde(default)]
    changes: Vec<Change>,
    #[serde(default)]
    summary_of_improvements: Vec<String>,
}

pub struct LlmResumeOptimizer {
    llm: LlmClient,
}

impl LlmResumeOptimizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeOptimizer for LlmResumeOptimizer {
    async fn optimize_once(
        &self,
        job: &StructuredJob,
        resume: &StructuredResume,
        gap: &GapAnalysis,
        style: ResumeStyle,
        weak_areas: &[String],
    ) -> Result<OptimizationPass, CollaboratorError> {
        let job_keywords: Vec<String> =
            extract_keywords_with_phrases(&job.scoring_text(), &STOPWORDS, TECH_PHRASES)
                .into_iter()
                .take(PROMPT_KEYWORD_LIMIT)
                .collect();

        let prompt = build_optimization_prompt(
            job,
            resume,
            gap,
            &OptimizationPromptContext {
                style,
                weak_areas,
                job_keywords: &job_keywords,
            },
        );
        debug!("Built optimization prompt ({} chars, style {style})", prompt.len());

        let reply: OptimizationReply = self
            .llm
            .call_json(
                &prompt,
                OPTIMIZATION_SYSTEM,
                CallOptions::rewriting(style.temperature(), OPTIMIZATION_MAX_TOKENS),
            )
            .await?;

        let pass = finish_pass(reply);
        info!(
            "Optimize-once produced {} changes ({} improvement notes)",
            pass.changes.len(),
            pass.summary_of_improvements.len()
        );
        Ok(pass)
    }
}

fn finish_pass(reply: OptimizationReply) -> OptimizationPass {
    let mut resume = reply.optimized_resume;
    // The reply carries no source text, so a stale copy would hide the rewrite from scoring.
    resume.raw_text = None;

    OptimizationPass {
        resume,
        changes: assign_unique_ids(reply.changes),
        summary_of_improvements: reply.summary_of_improvements,
    }
}

/// Missing or repeated ids get a fresh UUID; the first holder of an id keeps it.
pub fn assign_unique_ids(mut changes: Vec<Change>) -> Vec<Change> {
    let mut seen: HashSet<String> = HashSet::new();
    for change in &mut changes {
        if change.id.trim().is_empty() || seen.contains(&change.id) {
            change.id = Uuid::new_v4().to_string();
        }
        seen.insert(change.id.clone());
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::extract_json_object;
    use crate::models::ChangeType;

    const REPLY: &str = r#"{
      "optimized_resume": {
        "name": "Avery Chen",
        "summary": "Backend engineer focused on Python services on AWS",
        "skills": ["Python", "AWS"],
        "raw_text": "stale original text"
      },
      "changes": [
        {"id": "c1", "change_type": "summary", "location": "summary", "before": "Engineer", "after": "Backend engineer focused on Python services on AWS", "rationale": "alignment"},
        {"id": "c1", "change_type": "skills_section", "location": "skills", "before": "Python", "after": "Python, AWS", "rationale": "keywords"},
        {"change_type": "experience_bullet", "location": "experiences[0].bullets[0]", "before": "a", "after": "b", "rationale": "clarity"}
      ],
      "summary_of_improvements": ["Aligned summary with role"]
    }"#;

    #[test]
    fn test_reply_parsing_and_normalisation() {
        let reply: OptimizationReply = serde_json::from_str(extract_json_object(REPLY)).unwrap();
        let pass = finish_pass(reply);

        assert!(pass.resume.raw_text.is_none());
        assert_eq!(pass.resume.skills, vec!["Python", "AWS"]);
        assert_eq!(pass.changes.len(), 3);
        assert_eq!(pass.changes[0].id, "c1");
        assert_eq!(pass.changes[1].change_type, ChangeType::SkillsSection);

        let ids: HashSet<&str> = pass.changes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(pass.changes.iter().all(|c| !c.id.is_empty()));
        assert_eq!(pass.summary_of_improvements, vec!["Aligned summary with role"]);
    }

    #[test]
    fn test_reply_without_changes_defaults_empty() {
        let reply: OptimizationReply =
            serde_json::from_str(r#"{"optimized_resume": {"name": "X"}}"#).unwrap();
        let pass = finish_pass(reply);
        assert!(pass.changes.is_empty());
        assert!(pass.summary_of_improvements.is_empty());
    }

    #[test]
    fn test_reply_missing_resume_is_parse_error() {
        assert!(serde_json::from_str::<OptimizationReply>(r#"{"changes": []}"#).is_err());
    }
}
