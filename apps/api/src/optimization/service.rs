use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::config::{OptimizationConfig, OptimizationTier, ResumeStyle};
use super::controller::{FinalResult, IterativeOptimizationResult, IterativeOptimizer};
use super::extraction::DocumentAnalyzer;
use super::optimizer::ResumeOptimizer;
use super::versions::VersionStore;
use crate::analysis::change_check::AuthenticityReport;
use crate::analysis::gap::{analyze_gap, GapAnalysis, GapImprovement};
use crate::errors::CollaboratorError;
use crate::models::{change_stats, ChangeStats, StructuredJob, StructuredResume};

/// Job or resume supplied either as raw text to analyze or already structured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentInput<T> {
    Structured(T),
    Text { raw_text: String },
}

/// Everything kept about one finished run.
#[derive(Debug, Serialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job: StructuredJob,
    pub original_resume: StructuredResume,
    pub style: ResumeStyle,
    pub config: OptimizationConfig,
    pub gap_before: GapAnalysis,
    pub gap_after: GapAnalysis,
    pub gap_improvement: GapImprovement,
    pub authenticity_report: AuthenticityReport,
    pub change_stats: ChangeStats,
    pub result: IterativeOptimizationResult,
    #[serde(skip)]
    pub versions: VersionStore,
}

/// Response body for a run: the outcome without the full version history.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub iterations_run: usize,
    pub converged: bool,
    pub convergence_reason: &'a str,
    pub total_time_seconds: f64,
    pub best_version_number: usize,
    pub overall_score: f64,
    pub overall_passed: bool,
    pub final_result: &'a FinalResult,
    pub gap_improvement: &'a GapImprovement,
    pub authenticity_report: &'a AuthenticityReport,
    pub change_stats: &'a ChangeStats,
    pub metrics_report: String,
}

impl RunRecord {
    pub fn summary(&self) -> RunSummary<'_> {
        let best = &self.result.best_version;
        RunSummary {
            id: self.id,
            created_at: self.created_at,
            iterations_run: self.result.iterations_run,
            converged: self.result.converged,
            convergence_reason: &self.result.convergence_reason,
            total_time_seconds: self.result.total_time_seconds,
            best_version_number: best.version_number,
            overall_score: best.metrics.overall_score,
            overall_passed: best.metrics.overall_passed,
            final_result: &self.result.final_result,
            gap_improvement: &self.gap_improvement,
            authenticity_report: &self.authenticity_report,
            change_stats: &self.change_stats,
            metrics_report: best.metrics.summary_report(),
        }
    }
}

/// Completed runs kept in memory, oldest evicted first.
#[derive(Clone)]
pub struct RunRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    capacity: usize,
}

#[derive(Default)]
struct RegistryInner {
    runs: HashMap<Uuid, Arc<RunRecord>>,
    order: VecDeque<Uuid>,
}

impl RunRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner::default())),
            capacity: capacity.max(1),
        }
    }

    pub async fn insert(&self, record: RunRecord) -> Arc<RunRecord> {
        let record = Arc::new(record);
        let mut inner = self.inner.write().await;
        inner.order.push_back(record.id);
        inner.runs.insert(record.id, record.clone());
        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.runs.remove(&oldest);
                debug!("Run registry evicted run {oldest}");
            }
        }
        record
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<RunRecord>> {
        self.inner.read().await.runs.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.runs.len()
    }
}

/// Full workflow: analyze, gap, iterate, verify, record.
#[derive(Clone)]
pub struct TailoringService {
    analyzer: Arc<dyn DocumentAnalyzer>,
    optimizer: Arc<dyn ResumeOptimizer>,
    registry: RunRegistry,
    default_tier: OptimizationTier,
    target_pages: f64,
}

impl TailoringService {
    pub fn new(
        analyzer: Arc<dyn DocumentAnalyzer>,
        optimizer: Arc<dyn ResumeOptimizer>,
        registry: RunRegistry,
        default_tier: OptimizationTier,
        target_pages: f64,
    ) -> Self {
        Self {
            analyzer,
            optimizer,
            registry,
            default_tier,
            target_pages,
        }
    }

    pub fn registry(&self) -> &RunRegistry {
        &self.registry
    }

    /// An explicit config wins; otherwise the named tier (or the service
    /// default) with the configured page target.
    pub fn resolve_config(
        &self,
        tier: Option<&str>,
        config: Option<OptimizationConfig>,
    ) -> OptimizationConfig {
        if let Some(config) = config {
            return config;
        }
        let tier = tier.map(OptimizationTier::from_name).unwrap_or(self.default_tier);
        let mut config = tier.config();
        config.thresholds.target_pages = self.target_pages;
        config
    }

    pub async fn resolve_job(
        &self,
        input: DocumentInput<StructuredJob>,
    ) -> Result<StructuredJob, CollaboratorError> {
        match input {
            DocumentInput::Structured(job) => Ok(job),
            DocumentInput::Text { raw_text } => self.analyzer.analyze_job(&raw_text).await,
        }
    }

    pub async fn resolve_resume(
        &self,
        input: DocumentInput<StructuredResume>,
    ) -> Result<StructuredResume, CollaboratorError> {
        match input {
            DocumentInput::Structured(resume) => Ok(resume),
            DocumentInput::Text { raw_text } => self.analyzer.analyze_resume(&raw_text).await,
        }
    }

    /// Runs the loop on already-structured, already-validated inputs and
    /// stores the result.
    pub async fn run(
        &self,
        job: StructuredJob,
        original: StructuredResume,
        style: ResumeStyle,
        config: OptimizationConfig,
    ) -> Result<Arc<RunRecord>, CollaboratorError> {
        let gap_before = analyze_gap(&job, &original);
        info!(
            "Gap analysis: coverage {}%, {} matched, {} missing required",
            gap_before.coverage_percentage,
            gap_before.matched_skills.len(),
            gap_before.missing_required_skills.len()
        );

        let run = IterativeOptimizer::new(self.optimizer.as_ref(), config.clone())
            .optimize(&job, &original, &gap_before, style)
            .await?;
        let result = run.result;

        let best_resume = &result.final_result.resume;
        let gap_after = analyze_gap(&job, best_resume);
        let gap_improvement = GapImprovement::between(&gap_before, &gap_after);
        let authenticity_report = result.best_version.authenticity_report.clone();
        let stats = change_stats(&result.final_result.changes);
        info!(
            "Best version flagged {}/{} changes; coverage {}% -> {}%",
            authenticity_report.flagged_changes,
            authenticity_report.total_changes,
            gap_improvement.coverage_before,
            gap_improvement.coverage_after
        );

        let record = RunRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            job,
            original_resume: original,
            style,
            config,
            gap_before,
            gap_after,
            gap_improvement,
            authenticity_report,
            change_stats: stats,
            result,
            versions: run.versions,
        };
        let record = self.registry.insert(record).await;
        info!(
            "Stored optimization run {} ({} runs held)",
            record.id,
            self.registry.len().await
        );
        Ok(record)
    }
}
