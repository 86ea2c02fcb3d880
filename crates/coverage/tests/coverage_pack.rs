//! Integration tests for coverage pack generation and selective retry.
//!
//! Exercises the orchestrator end to end against a scripted in-memory
//! generator:
//! - full pack run with a transient per-shot failure recovered by retry
//! - permanent per-shot failure isolated as a failed angle
//! - selective retry flipping failed angles in place
//! - retry idempotence on an all-success library
//! - fail-fast on unknown pack ids

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use assert_matches::assert_matches;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use callsheet_batch::{BatchHooks, BatchOptions, GenerateError, GenerationRequest, Generator};
use callsheet_core::entity::{Entity, EntityType};
use callsheet_core::error::CoreError;
use callsheet_core::pack::{Pack, PackCatalog, ShotSpec};
use callsheet_core::types::ArtifactRef;
use callsheet_coverage::{
    AngleStatus, CoverageError, CoverageOrchestrator, GenerateOptions, LibraryStatus,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fails a scripted number of times for prompts containing a keyword, then
/// succeeds. A count of `u32::MAX` fails forever. Counts every call.
struct ScriptedGenerator {
    rules: Mutex<HashMap<String, u32>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn new(rules: &[(&str, u32)]) -> Self {
        Self {
            rules: Mutex::new(
                rules
                    .iter()
                    .map(|(keyword, count)| (keyword.to_string(), *count))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        }
    }

    fn always_succeeds() -> Self {
        Self::new(&[])
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<ArtifactRef, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rules = self.rules.lock().unwrap();
        for (keyword, remaining) in rules.iter_mut() {
            if !request.prompt.contains(keyword.as_str()) {
                continue;
            }
            if *remaining == u32::MAX {
                return Err(GenerateError::Remote(format!("scripted failure: {keyword}")));
            }
            if *remaining > 0 {
                *remaining -= 1;
                return Err(GenerateError::Remote(format!("scripted failure: {keyword}")));
            }
        }
        Ok(format!("artifact:{}", request.prompt))
    }
}

/// A three-shot turnaround pack matching the classic Front / Side Profile /
/// Back breakdown.
fn turnaround_pack() -> Pack {
    let spec = |label: &str| ShotSpec {
        shot_type: "portrait".to_string(),
        angle_label: label.to_string(),
        description: format!("{label} view, full figure"),
        category: "identity".to_string(),
    };
    Pack {
        id: "turnaround".to_string(),
        name: "Turnaround".to_string(),
        applicable_entity_types: vec![EntityType::Character],
        shot_specs: vec![spec("Front"), spec("Side Profile"), spec("Back")],
    }
}

fn orchestrator() -> CoverageOrchestrator {
    CoverageOrchestrator::new(PackCatalog::with_packs(vec![turnaround_pack()]))
}

fn character(name: &str) -> Entity {
    Entity {
        id: uuid::Uuid::new_v4(),
        name: name.to_string(),
        prompt_fragment: "weathered leather coat".to_string(),
        reference_artifacts: vec!["ref-base".to_string()],
    }
}

fn fast_options() -> GenerateOptions {
    GenerateOptions {
        batch: BatchOptions::coverage().without_delays(),
        ..GenerateOptions::default()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transient_failure_recovers_within_the_run() {
    // "Side Profile" fails exactly once, then succeeds on retry.
    let generator = ScriptedGenerator::new(&[("Side Profile", 1)]);
    let library = orchestrator()
        .generate_library(
            &generator,
            &character("Mara"),
            EntityType::Character,
            "turnaround",
            fast_options(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_matches!(library.status, LibraryStatus::Complete);
    assert_eq!(library.progress, 100);
    assert_eq!(library.generated_count, 3);
    assert_eq!(library.failed_count, 0);
    assert!(library.is_consistent());

    let side = library
        .angles
        .iter()
        .find(|a| a.angle_label == "Side Profile")
        .unwrap();
    assert_matches!(side.status, AngleStatus::Success);
    assert_eq!(side.attempts, 2);
    assert!(side.artifact_ref.is_some());
    assert!(side.error.is_none());
}

#[tokio::test]
async fn permanent_failure_is_isolated_as_a_failed_angle() {
    let generator = ScriptedGenerator::new(&[("Back", u32::MAX)]);
    let library = orchestrator()
        .generate_library(
            &generator,
            &character("Mara"),
            EntityType::Character,
            "turnaround",
            fast_options(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_matches!(library.status, LibraryStatus::Complete);
    assert_eq!(library.generated_count, 2);
    assert_eq!(library.failed_count, 1);
    assert_eq!(library.stats.success_rate, 66.7);
    assert!(library.is_consistent());

    let back = library.angles.iter().find(|a| a.angle_label == "Back").unwrap();
    assert_matches!(back.status, AngleStatus::Failed);
    assert!(back.artifact_ref.is_none());
    assert!(back.error.as_deref().unwrap().contains("Back"));
    // 1 initial attempt + 2 retries.
    assert_eq!(back.attempts, 3);
}

#[tokio::test]
async fn angles_preserve_pack_order() {
    let generator = ScriptedGenerator::always_succeeds();
    let library = orchestrator()
        .generate_library(
            &generator,
            &character("Mara"),
            EntityType::Character,
            "turnaround",
            fast_options(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let labels: Vec<&str> = library.angles.iter().map(|a| a.angle_label.as_str()).collect();
    assert_eq!(labels, vec!["Front", "Side Profile", "Back"]);
}

#[tokio::test]
async fn character_packs_render_square() {
    let generator = ScriptedGenerator::always_succeeds();
    let library = orchestrator()
        .generate_library(
            &generator,
            &character("Mara"),
            EntityType::Character,
            "turnaround",
            fast_options(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    // Aspect policy is static per entity type; artifacts exist for every shot.
    assert!(library.angles.iter().all(|a| a.artifact_ref.is_some()));
    assert_eq!(library.entity_type.coverage_aspect_ratio(), "1:1");
}

#[tokio::test]
async fn unknown_pack_fails_fast_without_dispatch() {
    let generator = ScriptedGenerator::always_succeeds();
    let result = orchestrator()
        .generate_library(
            &generator,
            &character("Mara"),
            EntityType::Character,
            "no-such-pack",
            fast_options(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await;

    assert_matches!(
        result,
        Err(CoverageError::Core(CoreError::PackNotFound(_)))
    );
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn progress_reaches_total_exactly_once() {
    let seen: std::sync::Arc<Mutex<Vec<(usize, usize)>>> =
        std::sync::Arc::new(Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&seen);
    let hooks = BatchHooks::new().on_progress(move |completed, total| {
        sink.lock().unwrap().push((completed, total));
    });

    let generator = ScriptedGenerator::always_succeeds();
    orchestrator()
        .generate_library(
            &generator,
            &character("Mara"),
            EntityType::Character,
            "turnaround",
            fast_options(),
            hooks,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    for window in seen.windows(2) {
        assert!(window[0].0 <= window[1].0);
    }
    assert_eq!(seen.iter().filter(|(c, t)| c == t).count(), 1);
}

// ---------------------------------------------------------------------------
// Selective retry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn retry_flips_failed_angles_in_place() {
    let generator = ScriptedGenerator::new(&[("Back", u32::MAX)]);
    let orchestrator = orchestrator();
    let library = orchestrator
        .generate_library(
            &generator,
            &character("Mara"),
            EntityType::Character,
            "turnaround",
            fast_options(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(library.failed_count, 1);

    let original_ids: Vec<_> = library.angles.iter().map(|a| a.id).collect();
    let succeeded_artifact = library.angles[0].artifact_ref.clone();

    // The provider recovered; retry only the failed shot.
    let retry_generator = ScriptedGenerator::always_succeeds();
    let retried = orchestrator
        .retry_failed_with(
            &retry_generator,
            library,
            BatchOptions::retry_pass().without_delays(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(retried.generated_count, 3);
    assert_eq!(retried.failed_count, 0);
    assert_eq!(retried.stats.success_rate, 100.0);
    assert!(retried.is_consistent());
    assert_matches!(retried.status, LibraryStatus::Complete);

    // Only the failed shot was re-run.
    assert_eq!(retry_generator.call_count(), 1);
    // Retry never changes the angle set, only flips members.
    let retried_ids: Vec<_> = retried.angles.iter().map(|a| a.id).collect();
    assert_eq!(retried_ids, original_ids);
    // Already-succeeded angles are untouched.
    assert_eq!(retried.angles[0].artifact_ref, succeeded_artifact);
}

#[tokio::test]
async fn retry_on_clean_library_is_a_no_op() {
    let generator = ScriptedGenerator::always_succeeds();
    let orchestrator = orchestrator();
    let library = orchestrator
        .generate_library(
            &generator,
            &character("Mara"),
            EntityType::Character,
            "turnaround",
            fast_options(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let completed_at = library.completed_at;
    let artifacts: Vec<_> = library.angles.iter().map(|a| a.artifact_ref.clone()).collect();

    let retry_generator = ScriptedGenerator::always_succeeds();
    let retried = orchestrator
        .retry_failed_with(
            &retry_generator,
            library,
            BatchOptions::retry_pass().without_delays(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(retry_generator.call_count(), 0);
    assert_eq!(retried.completed_at, completed_at);
    let after: Vec<_> = retried.angles.iter().map(|a| a.artifact_ref.clone()).collect();
    assert_eq!(after, artifacts);
}

#[tokio::test]
async fn repeated_retry_converges_to_all_success() {
    let generator = ScriptedGenerator::new(&[("Side Profile", u32::MAX), ("Back", u32::MAX)]);
    let orchestrator = orchestrator();
    let library = orchestrator
        .generate_library(
            &generator,
            &character("Mara"),
            EntityType::Character,
            "turnaround",
            fast_options(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(library.failed_count, 2);

    // First retry: "Back" recovers, "Side Profile" still fails.
    let first_retry = ScriptedGenerator::new(&[("Side Profile", u32::MAX)]);
    let library = orchestrator
        .retry_failed_with(
            &first_retry,
            library,
            BatchOptions::retry_pass().without_delays(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await;
    assert_eq!(library.generated_count, 2);
    assert_eq!(library.failed_count, 1);

    // Second retry: everything recovers.
    let second_retry = ScriptedGenerator::always_succeeds();
    let library = orchestrator
        .retry_failed_with(
            &second_retry,
            library,
            BatchOptions::retry_pass().without_delays(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await;
    assert_eq!(library.generated_count, 3);
    assert_eq!(library.failed_count, 0);

    // Converged: a further retry re-runs nothing.
    let third_retry = ScriptedGenerator::always_succeeds();
    let library = orchestrator
        .retry_failed_with(
            &third_retry,
            library,
            BatchOptions::retry_pass().without_delays(),
            BatchHooks::new(),
            &CancellationToken::new(),
        )
        .await;
    assert_eq!(third_retry.call_count(), 0);
    assert!(library.is_consistent());
}
