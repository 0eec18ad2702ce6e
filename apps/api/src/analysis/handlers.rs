use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::change_check::{generate_authenticity_report, AuthenticityReport};
use crate::analysis::gap::{analyze_gap, GapAnalysis};
use crate::errors::AppError;
use crate::metrics::{MetricThresholds, MetricsEngine, MetricsResult};
use crate::models::{Change, StructuredJob, StructuredResume};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GapRequest {
    pub job: StructuredJob,
    pub resume: StructuredResume,
}

#[derive(Deserialize)]
pub struct AuthenticityRequest {
    pub changes: Vec<Change>,
    pub original_resume: StructuredResume,
}

#[derive(Deserialize)]
pub struct MetricsRequest {
    pub original_text: String,
    pub candidate_text: String,
    pub job_text: String,
    #[serde(default)]
    pub thresholds: Option<MetricThresholds>,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub result: MetricsResult,
    pub summary_report: String,
}

/// POST /api/v1/analysis/gap
pub async fn handle_gap(Json(req): Json<GapRequest>) -> Result<Json<GapAnalysis>, AppError> {
    let gap = analyze_gap(&req.job, &req.resume);
    info!(
        "Gap analysis for '{}': coverage {}%, {} missing required",
        req.job.title,
        gap.coverage_percentage,
        gap.missing_required_skills.len()
    );
    Ok(Json(gap))
}

/// POST /api/v1/analysis/authenticity
pub async fn handle_authenticity(
    Json(req): Json<AuthenticityRequest>,
) -> Result<Json<AuthenticityReport>, AppError> {
    let report = generate_authenticity_report(&req.changes, &req.original_resume);
    info!(
        "Authenticity check: {}/{} changes flagged",
        report.flagged_changes, report.total_changes
    );
    Ok(Json(report))
}

/// POST /api/v1/metrics
pub async fn handle_metrics(
    State(state): State<AppState>,
    Json(req): Json<MetricsRequest>,
) -> Result<Json<MetricsResponse>, AppError> {
    let thresholds = req.thresholds.unwrap_or(MetricThresholds {
        target_pages: state.config.target_pages,
        ..Default::default()
    });
    thresholds.validate().map_err(AppError::Validation)?;

    let result =
        MetricsEngine::new(&thresholds).evaluate(&req.original_text, &req.candidate_text, &req.job_text);
    info!(
        "Metrics: overall {:.2}%, passed {}",
        result.overall_score * 100.0,
        result.overall_passed
    );
    let summary_report = result.summary_report();
    Ok(Json(MetricsResponse {
        result,
        summary_report,
    }))
}
