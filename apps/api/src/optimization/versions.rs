use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::OptimizationConfig;
use crate::analysis::change_check::AuthenticityReport;
use crate::metrics::{MetricKind, MetricsResult};
use crate::models::{Change, StructuredResume};

/// One optimization pass, frozen at the moment it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeVersion {
    pub version_number: usize,
    pub timestamp: DateTime<Utc>,
    pub resume: StructuredResume,
    pub metrics: MetricsResult,
    pub changes: Vec<Change>,
    /// Authenticity check of this pass's own changes against the original.
    pub authenticity_report: AuthenticityReport,
    pub iteration_number: u32,
    pub config: OptimizationConfig,
    pub improvement_summary: Vec<String>,
}

impl ResumeVersion {
    pub fn overall_score(&self) -> f64 {
        self.metrics.overall_score
    }

    fn metric_score(&self, kind: MetricKind) -> f64 {
        self.metrics.get(kind).map(|m| m.score).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionComparison {
    pub version_1: usize,
    pub version_2: usize,
    pub score_delta: f64,
    pub authenticity_delta: f64,
    pub role_alignment_delta: f64,
    pub ats_delta: f64,
    pub length_delta: f64,
    pub time_between: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub iteration: u32,
    pub version: usize,
    pub overall_score: f64,
    pub timestamp: DateTime<Utc>,
}

/// Append-only log of versions with a fixed capacity.
///
/// When the log overflows, the oldest entry is evicted and the survivors are
/// renumbered `1..=len`, so `version_number` always equals the 1-based
/// position in the log. Version numbers are therefore only stable while no
/// eviction happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionStore {
    max_versions: usize,
    versions: VecDeque<ResumeVersion>,
}

impl VersionStore {
    pub fn new(max_versions: usize) -> Self {
        Self {
            max_versions: max_versions.max(1),
            versions: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn add_version(
        &mut self,
        resume: StructuredResume,
        metrics: MetricsResult,
        changes: Vec<Change>,
        authenticity_report: AuthenticityReport,
        iteration_number: u32,
        config: OptimizationConfig,
        improvement_summary: Vec<String>,
    ) -> &ResumeVersion {
        self.versions.push_back(ResumeVersion {
            version_number: self.versions.len() + 1,
            timestamp: Utc::now(),
            resume,
            metrics,
            changes,
            authenticity_report,
            iteration_number,
            config,
            improvement_summary,
        });

        if self.versions.len() > self.max_versions {
            let evicted = self.versions.len() - self.max_versions;
            self.versions.drain(..evicted);
            for (idx, version) in self.versions.iter_mut().enumerate() {
                version.version_number = idx + 1;
            }
            debug!(
                "Version store evicted {evicted} old version(s), renumbered {} survivors",
                self.versions.len()
            );
        }

        // Just pushed, so the log is non-empty.
        &self.versions[self.versions.len() - 1]
    }

    /// 1-based lookup.
    pub fn get_version(&self, version_number: usize) -> Option<&ResumeVersion> {
        version_number
            .checked_sub(1)
            .and_then(|idx| self.versions.get(idx))
    }

    pub fn get_latest_version(&self) -> Option<&ResumeVersion> {
        self.versions.back()
    }

    /// Highest overall score; the later version wins a tie.
    pub fn get_best_version(&self) -> Option<&ResumeVersion> {
        self.versions.iter().fold(None, |best, v| match best {
            Some(b) if b.overall_score() > v.overall_score() => Some(b),
            _ => Some(v),
        })
    }

    pub fn get_all_versions(&self) -> Vec<ResumeVersion> {
        self.versions.iter().cloned().collect()
    }

    /// Deltas are `v2 - v1`.
    pub fn compare_versions(&self, v1: usize, v2: usize) -> Option<VersionComparison> {
        let a = self.get_version(v1)?;
        let b = self.get_version(v2)?;
        let delta = |kind| b.metric_score(kind) - a.metric_score(kind);

        Some(VersionComparison {
            version_1: v1,
            version_2: v2,
            score_delta: b.overall_score() - a.overall_score(),
            authenticity_delta: delta(MetricKind::Authenticity),
            role_alignment_delta: delta(MetricKind::RoleAlignment),
            ats_delta: delta(MetricKind::AtsOptimization),
            length_delta: delta(MetricKind::LengthCompliance),
            time_between: (b.timestamp - a.timestamp).num_milliseconds() as f64 / 1000.0,
        })
    }

    pub fn get_improvement_trajectory(&self) -> Vec<TrajectoryPoint> {
        self.versions
            .iter()
            .map(|v| TrajectoryPoint {
                iteration: v.iteration_number,
                version: v.version_number,
                overall_score: v.overall_score(),
                timestamp: v.timestamp,
            })
            .collect()
    }
}
