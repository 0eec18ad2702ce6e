//! The iterative optimize → score → record → decide loop.
//!
//! One [`IterativeOptimizer`] drives one run. `optimize` consumes the
//! controller, so a finished controller cannot be restarted.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::config::{OptimizationConfig, ResumeStyle};
use super::optimizer::ResumeOptimizer;
use super::versions::{ResumeVersion, VersionStore};
use crate::analysis::change_check::generate_authenticity_report;
use crate::analysis::gap::GapAnalysis;
use crate::errors::CollaboratorError;
use crate::metrics::{MetricsEngine, MetricsResult};
use crate::models::{Change, StructuredJob, StructuredResume};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    NotStarted,
    Iterating,
    Converged,
    MaxIterationsReached,
    Failed,
}

/// The best pass, flattened for consumers that only want the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub resume: StructuredResume,
    pub metrics: MetricsResult,
    pub changes: Vec<Change>,
    pub summary_of_improvements: Vec<String>,
    pub style: ResumeStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterativeOptimizationResult {
    pub best_version: ResumeVersion,
    pub all_versions: Vec<ResumeVersion>,
    pub iterations_run: usize,
    pub converged: bool,
    pub convergence_reason: String,
    pub total_time_seconds: f64,
    pub final_state: ControllerState,
    pub final_result: FinalResult,
}

/// A finished run: the result plus the version log it was built from.
pub struct OptimizationRun {
    pub result: IterativeOptimizationResult,
    pub versions: VersionStore,
}

pub struct IterativeOptimizer<'a> {
    optimizer: &'a dyn ResumeOptimizer,
    config: OptimizationConfig,
    engine: MetricsEngine,
    versions: VersionStore,
    state: ControllerState,
}

impl<'a> IterativeOptimizer<'a> {
    pub fn new(optimizer: &'a dyn ResumeOptimizer, config: OptimizationConfig) -> Self {
        let engine = MetricsEngine::new(&config.thresholds);
        // Room for every pass plus slack, so a run never evicts its own versions.
        let versions = VersionStore::new(config.max_iterations as usize + 2);
        Self {
            optimizer,
            config,
            engine,
            versions,
            state: ControllerState::NotStarted,
        }
    }

    pub fn with_engine(mut self, engine: MetricsEngine) -> Self {
        self.engine = engine;
        self
    }

    #[cfg(test)]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Runs at most `max_iterations` optimize-once calls. Fails only when the
    /// very first pass fails; later failures end the run with what it has.
    pub async fn optimize(
        mut self,
        job: &StructuredJob,
        original: &StructuredResume,
        gap: &GapAnalysis,
        style: ResumeStyle,
    ) -> Result<OptimizationRun, CollaboratorError> {
        let started = Instant::now();
        let max_iterations = self.config.max_iterations.max(1);
        info!("Starting iterative optimization (max {max_iterations} iterations, style {style})");

        self.state = ControllerState::Iterating;
        let original_text = original.scoring_text();
        let job_text = job.scoring_text();

        let mut current_resume = original.clone();
        let mut previous_metrics: Option<MetricsResult> = None;
        let mut converged = false;
        let mut convergence_reason = "Max iterations reached".to_string();
        let mut failed = false;

        for iteration in 1..=max_iterations {
            info!("Starting iteration {iteration}/{max_iterations}");

            let weak_areas: Vec<String> = previous_metrics
                .as_ref()
                .map(failed_metric_keys)
                .unwrap_or_default();
            if !weak_areas.is_empty() {
                info!("Iteration {iteration} focusing on: {}", weak_areas.join(", "));
            }

            let pass = match self
                .optimizer
                .optimize_once(job, &current_resume, gap, style, &weak_areas)
                .await
            {
                Ok(pass) => pass,
                Err(e) => {
                    error!("Error in iteration {iteration}: {e}");
                    if self.versions.is_empty() {
                        self.state = ControllerState::Failed;
                        return Err(e);
                    }
                    convergence_reason = format!("Error in iteration {iteration}: {e}");
                    failed = true;
                    break;
                }
            };

            let metrics = self
                .engine
                .evaluate(&original_text, &pass.resume.scoring_text(), &job_text);
            info!(
                "Iteration {iteration} complete. Overall score: {:.2}%, Passed: {}",
                metrics.overall_score * 100.0,
                metrics.overall_passed
            );

            let authenticity_report = generate_authenticity_report(&pass.changes, original);
            if !authenticity_report.is_safe {
                warn!(
                    "Iteration {iteration} flagged {}/{} changes for review",
                    authenticity_report.flagged_changes, authenticity_report.total_changes
                );
            }

            self.versions.add_version(
                pass.resume.clone(),
                metrics.clone(),
                pass.changes,
                authenticity_report,
                iteration,
                self.config.clone(),
                pass.summary_of_improvements,
            );

            if let Some(reason) =
                convergence_check(&self.config, &metrics, previous_metrics.as_ref())
            {
                info!("Converged: {reason}");
                converged = true;
                convergence_reason = reason;
                break;
            }

            current_resume = pass.resume;
            previous_metrics = Some(metrics);
        }

        self.state = if converged {
            ControllerState::Converged
        } else if failed {
            ControllerState::Failed
        } else {
            ControllerState::MaxIterationsReached
        };

        let best_version = match self.versions.get_best_version() {
            Some(best) => best.clone(),
            // Every path that reaches here recorded at least one version.
            None => {
                return Err(CollaboratorError::Optimization {
                    message: "no versions were recorded".to_string(),
                })
            }
        };
        let all_versions = self.versions.get_all_versions();
        let total_time_seconds = started.elapsed().as_secs_f64();

        info!(
            "Optimization complete. Ran {} iterations in {total_time_seconds:.1}s",
            all_versions.len()
        );
        info!(
            "Best version: #{} with score {:.2}%",
            best_version.version_number,
            best_version.overall_score() * 100.0
        );
        if failed {
            warn!("Run ended early after a collaborator failure; returning best version so far");
        }

        let final_result = FinalResult {
            resume: best_version.resume.clone(),
            metrics: best_version.metrics.clone(),
            changes: best_version.changes.clone(),
            summary_of_improvements: best_version.improvement_summary.clone(),
            style,
        };

        Ok(OptimizationRun {
            result: IterativeOptimizationResult {
                best_version,
                iterations_run: all_versions.len(),
                all_versions,
                converged,
                convergence_reason,
                total_time_seconds,
                final_state: self.state,
                final_result,
            },
            versions: self.versions,
        })
    }
}

/// Failed metric keys in weight order.
fn failed_metric_keys(metrics: &MetricsResult) -> Vec<String> {
    metrics
        .failed_keys()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// `Some(reason)` when the loop should stop after this pass.
///
/// Plateau detection has no floor: a regression also counts as "improved by
/// less than the threshold" and stops the run.
fn convergence_check(
    config: &OptimizationConfig,
    current: &MetricsResult,
    previous: Option<&MetricsResult>,
) -> Option<String> {
    if current.overall_passed && current.overall_score >= config.convergence_threshold {
        return Some(format!(
            "All critical metrics passed threshold (score: {:.1}% >= {:.1}%)",
            current.overall_score * 100.0,
            config.convergence_threshold * 100.0
        ));
    }

    let previous = previous?;
    let improvement = current.overall_score - previous.overall_score;
    if improvement < config.improvement_threshold {
        return Some(format!(
            "Improvement plateaued (improvement: {:.1}% < threshold: {:.1}%)",
            improvement * 100.0,
            config.improvement_threshold * 100.0
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricKind, MetricScore, MetricScorer};
    use crate::models::ChangeType;
    use crate::optimization::optimizer::OptimizationPass;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const PASS_THRESHOLD: f64 = 0.8;

    /// Reads `score:<x>` out of the candidate text.
    struct MarkerScorer(MetricKind);

    impl MetricScorer for MarkerScorer {
        fn kind(&self) -> MetricKind {
            self.0
        }

        fn calculate(&self, _original: &str, candidate: &str, _job: &str) -> MetricScore {
            let score = candidate
                .split("score:")
                .nth(1)
                .and_then(|rest| rest.split_whitespace().next())
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(0.0);
            MetricScore::new(self.0, score, PASS_THRESHOLD, json!({}), vec![])
        }
    }

    fn marker_engine() -> MetricsEngine {
        MetricsEngine::with_scorers(vec![
            Box::new(MarkerScorer(MetricKind::Authenticity)),
            Box::new(MarkerScorer(MetricKind::RoleAlignment)),
            Box::new(MarkerScorer(MetricKind::AtsOptimization)),
            Box::new(MarkerScorer(MetricKind::LengthCompliance)),
        ])
    }

    enum Step {
        Score(f64),
        /// Scores like `Score` and rewrites one bullet from `.1` to `.2`.
        Edit(f64, &'static str, &'static str),
        Fail(&'static str),
    }

    #[derive(Default)]
    struct Seen {
        resume_names: Vec<String>,
        weak_areas: Vec<Vec<String>>,
    }

    struct ScriptedOptimizer {
        steps: Mutex<VecDeque<Step>>,
        seen: Mutex<Seen>,
    }

    impl ScriptedOptimizer {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                seen: Mutex::new(Seen::default()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().resume_names.len()
        }
    }

    #[async_trait]
    impl ResumeOptimizer for ScriptedOptimizer {
        async fn optimize_once(
            &self,
            _job: &StructuredJob,
            resume: &StructuredResume,
            _gap: &GapAnalysis,
            _style: ResumeStyle,
            weak_areas: &[String],
        ) -> Result<OptimizationPass, CollaboratorError> {
            let call = {
                let mut seen = self.seen.lock().unwrap();
                seen.resume_names.push(resume.name.clone());
                seen.weak_areas.push(weak_areas.to_vec());
                seen.resume_names.len()
            };
            let step = self.steps.lock().unwrap().pop_front();
            let (score, changes) = match step {
                Some(Step::Score(score)) => (score, vec![]),
                Some(Step::Edit(score, before, after)) => (
                    score,
                    vec![Change {
                        id: format!("bullet-{call}"),
                        change_type: ChangeType::ExperienceBullet,
                        location: "experience[0].bullets[0]".to_string(),
                        before: before.to_string(),
                        after: after.to_string(),
                        rationale: "closer to the posting".to_string(),
                        status: Default::default(),
                        edited_value: None,
                    }],
                ),
                Some(Step::Fail(msg)) => {
                    return Err(CollaboratorError::Optimization {
                        message: msg.to_string(),
                    })
                }
                None => panic!("optimizer called more times than scripted"),
            };
            Ok(OptimizationPass {
                resume: StructuredResume {
                    name: format!("candidate {call}"),
                    raw_text: Some(format!("score:{score}")),
                    ..Default::default()
                },
                changes,
                summary_of_improvements: vec![format!("pass {call}")],
            })
        }
    }

    fn config(max_iterations: u32) -> OptimizationConfig {
        OptimizationConfig {
            max_iterations,
            convergence_threshold: 0.85,
            improvement_threshold: 0.02,
            ..Default::default()
        }
    }

    fn original() -> StructuredResume {
        StructuredResume {
            name: "original".to_string(),
            raw_text: Some("score:0".to_string()),
            ..Default::default()
        }
    }

    async fn drive(
        stub: &ScriptedOptimizer,
        cfg: OptimizationConfig,
    ) -> Result<OptimizationRun, CollaboratorError> {
        IterativeOptimizer::new(stub, cfg)
            .with_engine(marker_engine())
            .optimize(
                &StructuredJob::default(),
                &original(),
                &GapAnalysis::default(),
                ResumeStyle::Balanced,
            )
            .await
    }

    #[tokio::test]
    async fn test_stops_at_max_iterations() {
        let stub = ScriptedOptimizer::new(vec![Step::Score(0.1), Step::Score(0.2), Step::Score(0.3)]);
        let run = drive(&stub, config(3)).await.unwrap();

        assert_eq!(stub.calls(), 3);
        assert_eq!(run.result.iterations_run, 3);
        assert!(!run.result.converged);
        assert_eq!(run.result.convergence_reason, "Max iterations reached");
        assert_eq!(run.result.final_state, ControllerState::MaxIterationsReached);
        assert_eq!(run.versions.len(), 3);
    }

    #[tokio::test]
    async fn test_converges_when_all_critical_metrics_pass() {
        let stub = ScriptedOptimizer::new(vec![Step::Score(0.9)]);
        let run = drive(&stub, config(5)).await.unwrap();

        assert_eq!(stub.calls(), 1);
        assert!(run.result.converged);
        assert_eq!(
            run.result.convergence_reason,
            "All critical metrics passed threshold (score: 90.0% >= 85.0%)"
        );
        assert_eq!(run.result.final_state, ControllerState::Converged);
    }

    #[tokio::test]
    async fn test_passing_below_convergence_threshold_keeps_iterating() {
        // 0.82 passes every metric but sits under the 0.85 convergence bar.
        let stub = ScriptedOptimizer::new(vec![Step::Score(0.82), Step::Score(0.9)]);
        let run = drive(&stub, config(3)).await.unwrap();
        assert_eq!(stub.calls(), 2);
        assert!(run.result.converged);
    }

    #[tokio::test]
    async fn test_regression_converges_and_best_version_is_earlier_pass() {
        let stub = ScriptedOptimizer::new(vec![Step::Score(0.5), Step::Score(0.7), Step::Score(0.6)]);
        let run = drive(&stub, config(5)).await.unwrap();
        let result = &run.result;

        assert_eq!(stub.calls(), 3);
        assert!(result.converged);
        assert!(result
            .convergence_reason
            .starts_with("Improvement plateaued (improvement: -10.0%"));
        assert_eq!(result.best_version.iteration_number, 2);
        assert_eq!(result.final_result.resume.name, "candidate 2");
        assert!((result.final_result.metrics.overall_score - 0.7).abs() < 1e-9);
        assert_eq!(result.final_result.summary_of_improvements, vec!["pass 2"]);
        assert_eq!(result.all_versions.len(), 3);
    }

    #[tokio::test]
    async fn test_plateau_is_not_checked_on_first_iteration() {
        let stub = ScriptedOptimizer::new(vec![Step::Score(0.1), Step::Score(0.11)]);
        let run = drive(&stub, config(3)).await.unwrap();
        assert_eq!(stub.calls(), 2);
        assert!(run.result.convergence_reason.starts_with("Improvement plateaued"));
    }

    #[tokio::test]
    async fn test_failure_after_first_version_returns_best_so_far() {
        let stub = ScriptedOptimizer::new(vec![Step::Score(0.4), Step::Fail("rate limited")]);
        let run = drive(&stub, config(3)).await.unwrap();

        assert_eq!(run.result.iterations_run, 1);
        assert!(!run.result.converged);
        assert_eq!(
            run.result.convergence_reason,
            "Error in iteration 2: optimization failed: rate limited"
        );
        assert_eq!(run.result.final_state, ControllerState::Failed);
        assert_eq!(run.result.best_version.iteration_number, 1);
    }

    #[tokio::test]
    async fn test_failure_on_first_pass_propagates() {
        let stub = ScriptedOptimizer::new(vec![Step::Fail("bad json")]);
        let err = drive(&stub, config(3)).await.err().unwrap();
        assert_eq!(
            err,
            CollaboratorError::Optimization {
                message: "bad json".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_each_pass_builds_on_previous_candidate_with_weak_areas() {
        let stub = ScriptedOptimizer::new(vec![Step::Score(0.1), Step::Score(0.5)]);
        drive(&stub, config(2)).await.unwrap();

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.resume_names, vec!["original", "candidate 1"]);
        assert!(seen.weak_areas[0].is_empty());
        assert_eq!(
            seen.weak_areas[1],
            vec![
                "authenticity",
                "role_alignment",
                "ats_optimization",
                "length_compliance"
            ]
        );
    }

    #[tokio::test]
    async fn test_every_pass_gets_its_own_authenticity_report() {
        let stub = ScriptedOptimizer::new(vec![
            Step::Edit(0.3, "Built services", "Built internal services"),
            Step::Edit(0.5, "Built internal services", "Migrated internal services to GCP"),
        ]);
        let run = drive(&stub, config(2)).await.unwrap();

        let first = run.versions.get_version(1).unwrap();
        assert_eq!(first.authenticity_report.total_changes, 1);
        assert!(first.authenticity_report.is_safe);

        let second = run.versions.get_version(2).unwrap();
        assert!(!second.authenticity_report.is_safe);
        assert_eq!(second.authenticity_report.warning_categories.new_technologies, 1);
        assert!(second.authenticity_report.risky_changes[0]
            .warnings
            .iter()
            .any(|w| w.contains("GCP")));
        assert_eq!(
            run.result.best_version.authenticity_report,
            second.authenticity_report
        );
    }

    #[test]
    fn test_new_controller_is_not_started() {
        let stub = ScriptedOptimizer::new(vec![]);
        let controller = IterativeOptimizer::new(&stub, config(2));
        assert_eq!(controller.state(), ControllerState::NotStarted);
    }
}
