//! Coverage library records.
//!
//! A [`CoverageLibrary`] is the result record of one pack run against one
//! entity: one [`CoverageAngle`] per shot spec, plus aggregate counters and
//! timing statistics. The library is owned exclusively by the orchestrator
//! invocation that created it; callers hold it only for display and for
//! triggering a retry.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use callsheet_core::entity::EntityType;
use callsheet_core::progress::RunStats;
use callsheet_core::types::{ArtifactRef, Id};

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a coverage library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryStatus {
    /// Generation (or a retry pass) is underway.
    Generating,
    /// All angles have reached a terminal state; partial failure is data.
    Complete,
    /// The run itself failed before producing angles (distinct from
    /// individual angle failures).
    Failed,
}

/// Terminal status of a single angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleStatus {
    Success,
    Failed,
}

// ---------------------------------------------------------------------------
// CoverageAngle
// ---------------------------------------------------------------------------

/// One shot specification's realized result within a library.
///
/// `id` is the id of the generation request that produced (or last attempted)
/// this angle; it is assigned at request-construction time and is the stable
/// handle retry results are matched on. Mutated only by a retry flipping
/// failed to success; otherwise immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageAngle {
    pub id: Id,
    pub category: String,
    pub shot_type: String,
    pub angle_label: String,
    pub description: String,
    /// Full prompt the request was built from, kept for display and retry.
    pub prompt: String,
    pub artifact_ref: Option<ArtifactRef>,
    pub status: AngleStatus,
    pub error: Option<String>,
    /// Attempts consumed by the run that produced the current state.
    pub attempts: u32,
    pub generation_time: Duration,
    pub created_at: DateTime<Utc>,
}

impl CoverageAngle {
    pub fn is_failed(&self) -> bool {
        self.status == AngleStatus::Failed
    }
}

// ---------------------------------------------------------------------------
// CoverageLibrary
// ---------------------------------------------------------------------------

/// The result record of one pack run against one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageLibrary {
    pub id: Id,
    pub entity_ref: Id,
    pub entity_type: EntityType,
    pub pack_id: String,
    /// Reference artifacts captured from the entity at creation time, reused
    /// verbatim by retry passes.
    pub reference_artifacts: Vec<ArtifactRef>,
    /// One entry per shot spec, in pack order. Retry never changes the length.
    pub angles: Vec<CoverageAngle>,
    pub status: LibraryStatus,
    /// 0..=100; monotonically non-decreasing within a single run.
    pub progress: u8,
    pub generated_count: usize,
    pub failed_count: usize,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub stats: RunStats,
}

impl CoverageLibrary {
    /// Angles whose last run ended in failure.
    pub fn failed_angles(&self) -> impl Iterator<Item = &CoverageAngle> {
        self.angles.iter().filter(|a| a.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.angles.iter().any(|a| a.is_failed())
    }

    /// Recompute `generated_count` / `failed_count` over the full angle set.
    pub fn recount(&mut self) {
        self.generated_count = self.angles.iter().filter(|a| !a.is_failed()).count();
        self.failed_count = self.angles.len() - self.generated_count;
    }

    /// Invariant check: counts partition the angle set, and every successful
    /// angle has an artifact and no error (and vice versa).
    pub fn is_consistent(&self) -> bool {
        if self.generated_count + self.failed_count != self.angles.len() {
            return false;
        }
        self.angles.iter().all(|a| match a.status {
            AngleStatus::Success => a.artifact_ref.is_some() && a.error.is_none(),
            AngleStatus::Failed => a.artifact_ref.is_none() && a.error.is_some(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
