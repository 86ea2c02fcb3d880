//! The batch executor.
//!
//! Partitions requests into ordered groups, processes groups strictly
//! sequentially with a pacing delay between them, and dispatches all requests
//! of a group concurrently. Each request runs an independent retry loop; one
//! request exhausting its budget never aborts its siblings or the batch.
//! Within a group, completions are folded back one at a time on the calling
//! task, so the progress counter and hooks never see concurrent writers.

use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

use callsheet_core::progress::ProgressTracker;
use callsheet_core::types::ArtifactRef;

use crate::generator::{GenerateError, Generator};
use crate::hooks::BatchHooks;
use crate::options::BatchOptions;
use crate::request::{GenerationRequest, GenerationResult};

/// Execute a batch of generation requests.
///
/// Returns one [`GenerationResult`] per request, in input order, regardless
/// of completion order. Never fails as a whole: every per-request failure is
/// captured in its result. An empty request list returns immediately with no
/// groups and no delays.
///
/// Cancelling `cancel` stops new attempts; requests still pending resolve as
/// terminal failures so the result list stays complete.
pub async fn run_batch<G>(
    generator: &G,
    requests: &[GenerationRequest],
    options: &BatchOptions,
    mut hooks: BatchHooks,
    cancel: &CancellationToken,
) -> Vec<GenerationResult>
where
    G: Generator + ?Sized,
{
    if requests.is_empty() {
        return Vec::new();
    }

    let group_size = options.group_size.max(1);
    let total_groups = requests.len().div_ceil(group_size);
    let mut progress = ProgressTracker::new(requests.len());
    let mut indexed: Vec<(usize, GenerationResult)> = Vec::with_capacity(requests.len());

    tracing::info!(
        total = requests.len(),
        total_groups,
        group_size,
        "Batch started",
    );

    let mut base_index = 0;
    for (group_index, group) in requests.chunks(group_size).enumerate() {
        if group_index > 0 && !options.inter_group_delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(options.inter_group_delay) => {}
            }
        }

        let mut in_flight: FuturesUnordered<_> = group
            .iter()
            .enumerate()
            .map(|(offset, request)| {
                run_request(generator, request, base_index + offset, options, cancel)
            })
            .collect();

        while let Some((index, result)) = in_flight.next().await {
            if let Some(error) = result.error.as_deref() {
                hooks.emit_error(&requests[index], error);
            }
            let (completed, total) = progress.complete_one();
            hooks.emit_progress(completed, total);
            indexed.push((index, result));
        }

        tracing::debug!(group_index, total_groups, "Group drained");
        hooks.emit_group_complete(group_index, total_groups);
        base_index += group.len();
    }

    indexed.sort_by_key(|(index, _)| *index);
    let results: Vec<GenerationResult> = indexed.into_iter().map(|(_, r)| r).collect();

    let failed = results.iter().filter(|r| !r.is_success()).count();
    tracing::info!(
        total = results.len(),
        succeeded = results.len() - failed,
        failed,
        "Batch complete",
    );
    results
}

/// Retry loop for a single request. Always resolves to a terminal result.
async fn run_request<G>(
    generator: &G,
    request: &GenerationRequest,
    index: usize,
    options: &BatchOptions,
    cancel: &CancellationToken,
) -> (usize, GenerationResult)
where
    G: Generator + ?Sized,
{
    let started = Instant::now();
    let max_attempts = options.max_retries.saturating_add(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match attempt_once(generator, request, options, cancel).await {
            Ok(artifact) => {
                return (
                    index,
                    GenerationResult::success(request, artifact, attempt, started.elapsed()),
                );
            }
            Err(error) => {
                let cancelled = matches!(error, GenerateError::Cancelled);
                if cancelled || attempt >= max_attempts {
                    tracing::error!(
                        request_id = %request.id,
                        attempt,
                        error = %error,
                        "Generation failed terminally",
                    );
                    return (
                        index,
                        GenerationResult::failure(
                            request,
                            error.to_string(),
                            attempt,
                            started.elapsed(),
                        ),
                    );
                }

                tracing::warn!(
                    request_id = %request.id,
                    attempt,
                    error = %error,
                    "Generation attempt failed, will retry",
                );

                let delay = options.backoff.delay_for(attempt);
                if !delay.is_zero() {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                if cancel.is_cancelled() {
                    return (
                        index,
                        GenerationResult::failure(
                            request,
                            GenerateError::Cancelled.to_string(),
                            attempt,
                            started.elapsed(),
                        ),
                    );
                }
            }
        }
    }
}

/// One generation attempt, raced against cancellation and the per-request
/// timeout. A timeout is a retryable failure like any other.
async fn attempt_once<G>(
    generator: &G,
    request: &GenerationRequest,
    options: &BatchOptions,
    cancel: &CancellationToken,
) -> Result<ArtifactRef, GenerateError>
where
    G: Generator + ?Sized,
{
    let call = generator.generate(request);
    match options.request_timeout {
        Some(limit) => {
            tokio::select! {
                _ = cancel.cancelled() => Err(GenerateError::Cancelled),
                outcome = tokio::time::timeout(limit, call) => match outcome {
                    Ok(result) => result,
                    Err(_) => Err(GenerateError::Timeout(limit)),
                },
            }
        }
        None => {
            tokio::select! {
                _ = cancel.cancelled() => Err(GenerateError::Cancelled),
                result = call => result,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
