//! Generation request and result records.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use callsheet_core::types::{ArtifactRef, Id};

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// An opaque instruction to produce one artifact.
///
/// Immutable once constructed. A retry never mutates a request; it runs a
/// fresh attempt against the same request. The `id` is assigned at
/// construction time and is the stable handle results and retries are
/// matched on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub id: Id,
    /// Full rendering prompt text.
    pub prompt: String,
    /// Reference artifacts biasing the generator toward visual consistency.
    pub reference_artifacts: Vec<ArtifactRef>,
    /// Aspect ratio hint, e.g. `"16:9"`. `None` leaves it to the provider.
    pub aspect_ratio: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            prompt: prompt.into(),
            reference_artifacts: Vec::new(),
            aspect_ratio: None,
        }
    }

    pub fn with_references(mut self, references: Vec<ArtifactRef>) -> Self {
        self.reference_artifacts = references;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(aspect_ratio.into());
        self
    }
}

// ---------------------------------------------------------------------------
// GenerationResult
// ---------------------------------------------------------------------------

/// Terminal state of one request within a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Success,
    Failed,
}

/// Outcome of one request: exactly one of `artifact` / `error` is populated
/// depending on `status`. Created once per request per batch run and never
/// mutated; a later retry run supersedes it with a fresh result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Id of the originating [`GenerationRequest`].
    pub request_id: Id,
    pub status: ResultStatus,
    pub artifact: Option<ArtifactRef>,
    pub error: Option<String>,
    /// Total attempts made, including the first.
    pub attempts: u32,
    /// Wall-clock time from first dispatch to terminal state, delays included.
    pub elapsed: Duration,
}

impl GenerationResult {
    pub fn success(
        request: &GenerationRequest,
        artifact: ArtifactRef,
        attempts: u32,
        elapsed: Duration,
    ) -> Self {
        Self {
            request_id: request.id,
            status: ResultStatus::Success,
            artifact: Some(artifact),
            error: None,
            attempts,
            elapsed,
        }
    }

    pub fn failure(
        request: &GenerationRequest,
        error: String,
        attempts: u32,
        elapsed: Duration,
    ) -> Self {
        Self {
            request_id: request.id,
            status: ResultStatus::Failed,
            artifact: None,
            error: Some(error),
            attempts,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
