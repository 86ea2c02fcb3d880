//! The coverage orchestrator.
//!
//! Resolves a pack, builds one concrete generation request per shot spec,
//! runs the list through the batch executor, and assembles a
//! [`CoverageLibrary`]. Order is load-bearing end to end: results are zipped
//! back to shot specs by position, and the final angle list is in pack order.
//!
//! Selective retry re-drives only the failed angles with a smaller group
//! size and merges results back in place, matching retry results to angles
//! by request id (never by prompt text, which may collide).

use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use callsheet_batch::{
    run_batch, BatchHooks, BatchOptions, GenerationRequest, GenerationResult, Generator,
};
use callsheet_core::entity::{Entity, EntityType};
use callsheet_core::error::CoreError;
use callsheet_core::pack::{PackCatalog, ShotSpec};
use callsheet_core::progress::RunStats;

use crate::library::{AngleStatus, CoverageAngle, CoverageLibrary, LibraryStatus};

// ---------------------------------------------------------------------------
// Errors and options
// ---------------------------------------------------------------------------

/// Fatal orchestrator failures. Per-angle generation failures are data on
/// the library, never errors.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    /// Pack lookup or validation failed; nothing was dispatched.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Options for one library generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Executor configuration; `batch.group_size` is the maximum number of
    /// concurrently in-flight shots.
    pub batch: BatchOptions,
    /// Optional time-of-day modifier folded into every prompt.
    pub time_of_day: Option<String>,
    /// Optional weather modifier folded into every prompt.
    pub weather: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            batch: BatchOptions::coverage(),
            time_of_day: None,
            weather: None,
        }
    }
}

impl GenerateOptions {
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.batch.group_size = max_concurrent;
        self
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Coverage pack orchestrator, bound to a pack catalog.
pub struct CoverageOrchestrator {
    catalog: PackCatalog,
}

impl CoverageOrchestrator {
    pub fn new(catalog: PackCatalog) -> Self {
        Self { catalog }
    }

    /// Orchestrator over the built-in stock packs.
    pub fn with_builtin_packs() -> Self {
        Self::new(PackCatalog::builtin())
    }

    pub fn catalog(&self) -> &PackCatalog {
        &self.catalog
    }

    /// Generate a full coverage library for `entity` from the pack named by
    /// `pack_id`.
    ///
    /// Fails fast (nothing dispatched) on an unknown pack id or an empty
    /// shot list. Once dispatch starts, the run always completes: every shot
    /// ends as a success or failure angle and the library closes as
    /// [`LibraryStatus::Complete`] with partial failure recorded in counts.
    pub async fn generate_library<G>(
        &self,
        generator: &G,
        entity: &Entity,
        entity_type: EntityType,
        pack_id: &str,
        options: GenerateOptions,
        hooks: BatchHooks,
        cancel: &CancellationToken,
    ) -> Result<CoverageLibrary, CoverageError>
    where
        G: Generator + ?Sized,
    {
        let pack = self.catalog.resolve(pack_id)?;
        let aspect_ratio = entity_type.coverage_aspect_ratio();
        let started = Instant::now();

        let requests: Vec<GenerationRequest> = pack
            .shot_specs
            .iter()
            .map(|spec| {
                GenerationRequest::new(build_shot_prompt(entity, spec, &options))
                    .with_references(entity.reference_artifacts.clone())
                    .with_aspect_ratio(aspect_ratio)
            })
            .collect();

        tracing::info!(
            entity = %entity.name,
            pack_id,
            shots = requests.len(),
            "Coverage library generation started",
        );

        let results = run_batch(generator, &requests, &options.batch, hooks, cancel).await;

        // Zip results back to shot specs by position.
        let angles: Vec<CoverageAngle> = pack
            .shot_specs
            .iter()
            .zip(&requests)
            .zip(&results)
            .map(|((spec, request), result)| build_angle(spec, request, result))
            .collect();

        let mut library = CoverageLibrary {
            id: uuid::Uuid::new_v4(),
            entity_ref: entity.id,
            entity_type,
            pack_id: pack_id.to_string(),
            reference_artifacts: entity.reference_artifacts.clone(),
            angles,
            status: LibraryStatus::Generating,
            progress: 0,
            generated_count: 0,
            failed_count: 0,
            created_at: Utc::now(),
            completed_at: None,
            stats: RunStats::compute(0, 0, started.elapsed()),
        };
        close_library(&mut library, started);

        tracing::info!(
            library_id = %library.id,
            generated = library.generated_count,
            failed = library.failed_count,
            "Coverage library generation complete",
        );
        Ok(library)
    }

    /// Re-drive only the failed angles of `library` with the retry preset
    /// (group size 5) and merge results back in place.
    pub async fn retry_failed<G>(
        &self,
        generator: &G,
        library: CoverageLibrary,
        hooks: BatchHooks,
        cancel: &CancellationToken,
    ) -> CoverageLibrary
    where
        G: Generator + ?Sized,
    {
        self.retry_failed_with(generator, library, BatchOptions::retry_pass(), hooks, cancel)
            .await
    }

    /// [`retry_failed`](Self::retry_failed) with explicit executor options.
    ///
    /// No-op (returns the library unchanged) when no angle is failed.
    /// A retried angle that succeeds is replaced in place; one that fails
    /// again is left unchanged. Already-succeeded angles are never re-run.
    pub async fn retry_failed_with<G>(
        &self,
        generator: &G,
        mut library: CoverageLibrary,
        options: BatchOptions,
        hooks: BatchHooks,
        cancel: &CancellationToken,
    ) -> CoverageLibrary
    where
        G: Generator + ?Sized,
    {
        if !library.has_failures() {
            return library;
        }

        let previous_elapsed = library.stats.total_time;
        let started = Instant::now();
        library.status = LibraryStatus::Generating;

        // Rebuild requests for the failed angles, reusing each angle's id so
        // results merge back by identifier.
        let aspect_ratio = library.entity_type.coverage_aspect_ratio();
        let requests: Vec<GenerationRequest> = library
            .failed_angles()
            .map(|angle| GenerationRequest {
                id: angle.id,
                prompt: angle.prompt.clone(),
                reference_artifacts: library.reference_artifacts.clone(),
                aspect_ratio: Some(aspect_ratio.to_string()),
            })
            .collect();

        tracing::info!(
            library_id = %library.id,
            retrying = requests.len(),
            "Selective retry started",
        );

        let results = run_batch(generator, &requests, &options, hooks, cancel).await;

        for result in &results {
            if !result.is_success() {
                continue;
            }
            if let Some(angle) = library.angles.iter_mut().find(|a| a.id == result.request_id) {
                angle.status = AngleStatus::Success;
                angle.artifact_ref = result.artifact.clone();
                angle.error = None;
                angle.attempts = result.attempts;
                angle.generation_time = result.elapsed;
            }
        }

        close_library(&mut library, started);
        // Timing is cumulative across the original run and every retry pass.
        library.stats.total_time += previous_elapsed;
        if library.stats.total > 0 {
            library.stats.average_time_per_item =
                library.stats.total_time / library.stats.total as u32;
        }

        tracing::info!(
            library_id = %library.id,
            generated = library.generated_count,
            failed = library.failed_count,
            "Selective retry complete",
        );
        library
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Compose the concrete prompt for one shot: entity name, shot description,
/// the entity's stored prompt fragment, and optional atmosphere modifiers.
fn build_shot_prompt(entity: &Entity, spec: &ShotSpec, options: &GenerateOptions) -> String {
    let mut parts = vec![format!("{}, {}", entity.name, spec.description)];
    if !entity.prompt_fragment.is_empty() {
        parts.push(entity.prompt_fragment.clone());
    }
    if let Some(time_of_day) = &options.time_of_day {
        parts.push(format!("{time_of_day} lighting"));
    }
    if let Some(weather) = &options.weather {
        parts.push(weather.clone());
    }
    parts.join(", ")
}

fn build_angle(
    spec: &ShotSpec,
    request: &GenerationRequest,
    result: &GenerationResult,
) -> CoverageAngle {
    CoverageAngle {
        id: request.id,
        category: spec.category.clone(),
        shot_type: spec.shot_type.clone(),
        angle_label: spec.angle_label.clone(),
        description: spec.description.clone(),
        prompt: request.prompt.clone(),
        artifact_ref: result.artifact.clone(),
        status: if result.is_success() {
            AngleStatus::Success
        } else {
            AngleStatus::Failed
        },
        error: result.error.clone(),
        attempts: result.attempts,
        generation_time: result.elapsed,
        created_at: Utc::now(),
    }
}

/// Recount, recompute stats over the full angle set, and close the run.
fn close_library(library: &mut CoverageLibrary, started: Instant) {
    library.recount();
    library.stats = RunStats::compute(
        library.generated_count,
        library.failed_count,
        started.elapsed(),
    );
    library.status = LibraryStatus::Complete;
    library.progress = 100;
    library.completed_at = Some(Utc::now());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
