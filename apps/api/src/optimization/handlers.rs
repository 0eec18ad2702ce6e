use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::config::{OptimizationConfig, ResumeStyle};
use super::extraction::validate_optimization_inputs;
use super::service::{DocumentInput, RunRecord};
use super::versions::{ResumeVersion, TrajectoryPoint, VersionComparison};
use crate::errors::AppError;
use crate::models::{StructuredJob, StructuredResume};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OptimizationRequest {
    pub job: DocumentInput<StructuredJob>,
    pub resume: DocumentInput<StructuredResume>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub config: Option<OptimizationConfig>,
}

#[derive(Deserialize)]
pub struct CompareQuery {
    pub v1: usize,
    pub v2: usize,
}

#[derive(Serialize)]
pub struct TrajectoryResponse {
    pub run_id: Uuid,
    pub trajectory: Vec<TrajectoryPoint>,
}

/// POST /api/v1/optimizations
pub async fn handle_create_optimization(
    State(state): State<AppState>,
    Json(req): Json<OptimizationRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let style = match req.style.as_deref() {
        Some(s) => s.parse::<ResumeStyle>().map_err(AppError::Validation)?,
        None => ResumeStyle::default(),
    };
    let config = state
        .tailoring
        .resolve_config(req.tier.as_deref(), req.config);
    config.validate().map_err(AppError::Validation)?;

    let job = state.tailoring.resolve_job(req.job).await?;
    let resume = state.tailoring.resolve_resume(req.resume).await?;
    validate_optimization_inputs(&job, &resume).map_err(AppError::UnprocessableEntity)?;

    info!(
        "Optimization requested for '{}' (style {style}, max {} iterations)",
        job.title, config.max_iterations
    );
    let record = state.tailoring.run(job, resume, style, config).await?;
    Ok((StatusCode::CREATED, Json(to_json(&record.summary())?)))
}

/// GET /api/v1/optimizations/:id
pub async fn handle_get_optimization(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let record = find_run(&state, id).await?;
    Ok(Json(to_json(&*record)?))
}

/// GET /api/v1/optimizations/:id/versions/:n
pub async fn handle_get_version(
    State(state): State<AppState>,
    Path((id, n)): Path<(Uuid, usize)>,
) -> Result<Json<ResumeVersion>, AppError> {
    let record = find_run(&state, id).await?;
    record
        .versions
        .get_version(n)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Version {n} not found for run {id}")))
}

/// GET /api/v1/optimizations/:id/versions/latest
pub async fn handle_get_latest_version(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeVersion>, AppError> {
    let record = find_run(&state, id).await?;
    record
        .versions
        .get_latest_version()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Run {id} has no versions")))
}

/// GET /api/v1/optimizations/:id/trajectory
pub async fn handle_get_trajectory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrajectoryResponse>, AppError> {
    let record = find_run(&state, id).await?;
    Ok(Json(TrajectoryResponse {
        run_id: id,
        trajectory: record.versions.get_improvement_trajectory(),
    }))
}

/// GET /api/v1/optimizations/:id/compare?v1=&v2=
pub async fn handle_compare_versions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<CompareQuery>,
) -> Result<Json<VersionComparison>, AppError> {
    let record = find_run(&state, id).await?;
    record
        .versions
        .compare_versions(q.v1, q.v2)
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Versions {} and {} are not both available for run {id}",
                q.v1, q.v2
            ))
        })
}

async fn find_run(state: &AppState, id: Uuid) -> Result<std::sync::Arc<RunRecord>, AppError> {
    state
        .tailoring
        .registry()
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Optimization run {id} not found")))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}
