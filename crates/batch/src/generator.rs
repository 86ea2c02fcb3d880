//! The remote generation seam.
//!
//! [`Generator`] is the single suspension point of the whole pipeline: one
//! asynchronous call that either yields an artifact reference or fails. The
//! executor treats every error uniformly as retryable, except
//! [`GenerateError::Cancelled`], which short-circuits the retry loop.

use std::time::Duration;

use async_trait::async_trait;

use crate::request::GenerationRequest;
use callsheet_core::types::ArtifactRef;

/// Failure of a single generation attempt.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The remote provider rejected or failed the call (network, rate limit,
    /// content policy). Message is provider-supplied, human readable.
    #[error("Remote generation failed: {0}")]
    Remote(String),

    /// The call did not resolve within the per-request time limit.
    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    /// The run was cancelled while this attempt was pending.
    #[error("Generation cancelled")]
    Cancelled,
}

/// An asynchronous remote generation operation.
///
/// Implementations must be shareable across concurrently pending calls;
/// the executor dispatches up to `group_size` calls at once against the
/// same instance.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest)
        -> Result<ArtifactRef, GenerateError>;
}
