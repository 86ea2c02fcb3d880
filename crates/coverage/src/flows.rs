//! Variant and sequence generation flows.
//!
//! These are not separate algorithms: each flow builds its own request list
//! from its domain object, picks a group-size preset appropriate to its
//! latency/cost profile, and interprets the returned results back into its
//! domain model. Failure handling, retry, and progress semantics are
//! inherited unchanged from the batch executor.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use callsheet_batch::{
    run_batch, BatchHooks, BatchOptions, GenerationRequest, GenerationResult, Generator,
};
use callsheet_core::progress::RunStats;
use callsheet_core::types::{ArtifactRef, Id};

// ---------------------------------------------------------------------------
// Domain inputs
// ---------------------------------------------------------------------------

/// Number of creative variants generated per beat.
pub const VARIANT_COUNT: usize = 3;

/// One story beat, as seen by the generation flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    pub id: Id,
    /// Full rendering prompt for this beat.
    pub prompt: String,
    /// Reference artifacts carried through to every request for this beat.
    pub reference_artifacts: Vec<ArtifactRef>,
}

/// One coverage shot of a scene, offered for user selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneShot {
    pub id: Id,
    pub label: String,
    pub prompt: String,
}

// ---------------------------------------------------------------------------
// Domain results
// ---------------------------------------------------------------------------

/// Results of generating [`VARIANT_COUNT`] creative variants of one beat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatVariantSet {
    pub beat_id: Id,
    /// One result per variant, in dispatch order.
    pub variants: Vec<GenerationResult>,
    pub stats: RunStats,
}

/// One scene shot's realized result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneShotResult {
    pub shot_id: Id,
    pub label: String,
    pub result: GenerationResult,
}

/// Results of generating the user-selected coverage shots of one scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneCoverageResult {
    /// One entry per selected shot, in the scene's shot order.
    pub shots: Vec<SceneShotResult>,
    pub stats: RunStats,
}

/// Results of batch-generating a list of beats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatBatchResult {
    /// `(beat_id, result)` pairs in input order.
    pub results: Vec<(Id, GenerationResult)>,
    pub stats: RunStats,
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

/// Generate [`VARIANT_COUNT`] creative variants of one beat.
///
/// All variants share the beat's prompt and references; each request carries
/// its own id, and provider stochasticity supplies the variation. Callers
/// normally pass [`BatchOptions::beats`].
pub async fn generate_beat_variants<G>(
    generator: &G,
    beat: &Beat,
    options: &BatchOptions,
    hooks: BatchHooks,
    cancel: &CancellationToken,
) -> BeatVariantSet
where
    G: Generator + ?Sized,
{
    let started = Instant::now();
    let requests: Vec<GenerationRequest> = (0..VARIANT_COUNT)
        .map(|_| {
            GenerationRequest::new(beat.prompt.clone())
                .with_references(beat.reference_artifacts.clone())
        })
        .collect();

    let variants = run_batch(generator, &requests, options, hooks, cancel).await;
    let succeeded = variants.iter().filter(|r| r.is_success()).count();
    let failed = variants.len() - succeeded;

    BeatVariantSet {
        beat_id: beat.id,
        variants,
        stats: RunStats::compute(succeeded, failed, started.elapsed()),
    }
}

/// Generate the coverage shots of one scene that the user selected.
///
/// Shots not in `selected` are neither dispatched nor counted: success/total
/// statistics cover only the selected subset. Requests reuse each shot's id
/// so results map back to shots by identifier.
pub async fn generate_scene_coverage<G>(
    generator: &G,
    shots: &[SceneShot],
    selected: &[Id],
    options: &BatchOptions,
    hooks: BatchHooks,
    cancel: &CancellationToken,
) -> SceneCoverageResult
where
    G: Generator + ?Sized,
{
    let started = Instant::now();
    let chosen: Vec<&SceneShot> = shots.iter().filter(|s| selected.contains(&s.id)).collect();

    let requests: Vec<GenerationRequest> = chosen
        .iter()
        .map(|shot| GenerationRequest {
            id: shot.id,
            prompt: shot.prompt.clone(),
            reference_artifacts: Vec::new(),
            aspect_ratio: None,
        })
        .collect();

    let results = run_batch(generator, &requests, options, hooks, cancel).await;

    let shot_results: Vec<SceneShotResult> = chosen
        .iter()
        .zip(results)
        .map(|(shot, result)| SceneShotResult {
            shot_id: shot.id,
            label: shot.label.clone(),
            result,
        })
        .collect();

    let succeeded = shot_results.iter().filter(|s| s.result.is_success()).count();
    let failed = shot_results.len() - succeeded;

    SceneCoverageResult {
        shots: shot_results,
        stats: RunStats::compute(succeeded, failed, started.elapsed()),
    }
}

/// Batch-generate a list of beats in parallel groups of 3.
///
/// Callers normally pass [`BatchOptions::beats`]; beat generation is slow
/// and costly per item, so the small group size is deliberate.
pub async fn generate_beat_batch<G>(
    generator: &G,
    beats: &[Beat],
    options: &BatchOptions,
    hooks: BatchHooks,
    cancel: &CancellationToken,
) -> BeatBatchResult
where
    G: Generator + ?Sized,
{
    let started = Instant::now();
    let requests: Vec<GenerationRequest> = beats
        .iter()
        .map(|beat| {
            GenerationRequest::new(beat.prompt.clone())
                .with_references(beat.reference_artifacts.clone())
        })
        .collect();

    let results = run_batch(generator, &requests, options, hooks, cancel).await;
    let succeeded = results.iter().filter(|r| r.is_success()).count();
    let failed = results.len() - succeeded;

    BeatBatchResult {
        results: beats.iter().map(|b| b.id).zip(results).collect(),
        stats: RunStats::compute(succeeded, failed, started.elapsed()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
