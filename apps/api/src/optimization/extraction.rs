use async_trait::async_trait;
use tracing::info;

use super::prompts::{
    JOB_ANALYSIS_PROMPT_TEMPLATE, JOB_ANALYSIS_SYSTEM, RESUME_ANALYSIS_PROMPT_TEMPLATE,
    RESUME_ANALYSIS_SYSTEM,
};
use crate::errors::CollaboratorError;
use crate::llm_client::{CallOptions, LlmClient};
use crate::models::{StructuredJob, StructuredResume};

pub const JOB_ANALYSIS_STAGE: &str = "job analysis";
pub const RESUME_ANALYSIS_STAGE: &str = "resume analysis";

/// Turns raw posting / resume text into structured records.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze_job(&self, raw_text: &str) -> Result<StructuredJob, CollaboratorError>;
    async fn analyze_resume(&self, raw_text: &str) -> Result<StructuredResume, CollaboratorError>;
}

pub struct LlmDocumentAnalyzer {
    llm: LlmClient,
}

impl LlmDocumentAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl DocumentAnalyzer for LlmDocumentAnalyzer {
    async fn analyze_job(&self, raw_text: &str) -> Result<StructuredJob, CollaboratorError> {
        require_text(JOB_ANALYSIS_STAGE, raw_text)?;
        let prompt = JOB_ANALYSIS_PROMPT_TEMPLATE.replace("{job_text}", raw_text);
        let job: StructuredJob = self
            .llm
            .call_json(&prompt, JOB_ANALYSIS_SYSTEM, CallOptions::analysis())
            .await
            .map_err(|e| CollaboratorError::analysis(JOB_ANALYSIS_STAGE, e))?;
        let job = finish_job(job, raw_text);
        info!(
            "Job analysis complete: {} at {} ({} required skills)",
            job.title,
            job.company.as_deref().unwrap_or("Unknown"),
            job.required_skills.len()
        );
        Ok(job)
    }

    async fn analyze_resume(&self, raw_text: &str) -> Result<StructuredResume, CollaboratorError> {
        require_text(RESUME_ANALYSIS_STAGE, raw_text)?;
        let prompt = RESUME_ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", raw_text);
        let resume: StructuredResume = self
            .llm
            .call_json(&prompt, RESUME_ANALYSIS_SYSTEM, CallOptions::analysis())
            .await
            .map_err(|e| CollaboratorError::analysis(RESUME_ANALYSIS_STAGE, e))?;
        let resume = finish_resume(resume, raw_text);
        info!(
            "Resume analysis complete: {} ({} experiences, {} skills)",
            resume.name,
            resume.experiences.len(),
            resume.skills.len()
        );
        Ok(resume)
    }
}

fn require_text(stage: &str, raw_text: &str) -> Result<(), CollaboratorError> {
    if raw_text.trim().is_empty() {
        return Err(CollaboratorError::Analysis {
            stage: stage.to_string(),
            message: "input text is empty".to_string(),
        });
    }
    Ok(())
}

/// Keeps the source text on the record and fills a placeholder title.
fn finish_job(mut job: StructuredJob, raw_text: &str) -> StructuredJob {
    if job.title.trim().is_empty() {
        job.title = "Unknown Position".to_string();
    }
    job.raw_text = Some(raw_text.to_string());
    job
}

fn finish_resume(mut resume: StructuredResume, raw_text: &str) -> StructuredResume {
    resume.raw_text = Some(raw_text.to_string());
    resume
}

/// Checks run before an optimization is accepted.
pub fn validate_optimization_inputs(
    job: &StructuredJob,
    resume: &StructuredResume,
) -> Result<(), String> {
    if job.title.trim().is_empty() {
        return Err("Job must have a title".to_string());
    }
    if resume.name.trim().is_empty() {
        return Err("Resume must have a name".to_string());
    }
    if resume.experiences.is_empty() {
        return Err("Resume must have at least one experience".to_string());
    }
    Ok(())
}
