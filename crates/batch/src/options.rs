//! Batch execution options and the named presets used at call sites.
//!
//! Callers pick a preset matching their latency/cost profile instead of
//! scattering magic numbers: generic coverage runs dispatch 10 at a time,
//! video beat generation 3, and retry passes 5.

use std::time::Duration;

use crate::backoff::BackoffPolicy;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Requests dispatched concurrently per group for generic batches.
pub const DEFAULT_GROUP_SIZE: usize = 10;

/// Group size for beat (video segment) batches, which are slower and
/// costlier per item.
pub const BEAT_GROUP_SIZE: usize = 3;

/// Group size for selective retry passes over previously failed items.
pub const RETRY_GROUP_SIZE: usize = 5;

/// Additional attempts after the first failure, per request.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Pause between dispatching successive groups, to avoid bursting the
/// remote rate limiter.
pub const DEFAULT_INTER_GROUP_DELAY: Duration = Duration::from_millis(1000);

/// Per-request time limit; a call still pending after this long is treated
/// as a retryable failure.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// BatchOptions
// ---------------------------------------------------------------------------

/// Configuration for one [`run_batch`](crate::executor::run_batch) call.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Number of requests dispatched concurrently per group.
    pub group_size: usize,
    /// Additional attempts after the first failure, per request.
    pub max_retries: u32,
    /// Delay policy between attempts of a single request.
    pub backoff: BackoffPolicy,
    /// Pause between successive groups.
    pub inter_group_delay: Duration,
    /// Per-request timeout. `None` disables the limit (a hung remote call
    /// then stalls its group).
    pub request_timeout: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: BackoffPolicy::default(),
            inter_group_delay: DEFAULT_INTER_GROUP_DELAY,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

impl BatchOptions {
    /// Preset for coverage pack generation (group size 10).
    pub fn coverage() -> Self {
        Self::default()
    }

    /// Preset for beat/video generation (group size 3).
    pub fn beats() -> Self {
        Self {
            group_size: BEAT_GROUP_SIZE,
            ..Self::default()
        }
    }

    /// Preset for selective retry passes (group size 5).
    pub fn retry_pass() -> Self {
        Self {
            group_size: RETRY_GROUP_SIZE,
            ..Self::default()
        }
    }

    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Zero out every delay. Intended for tests and for callers that do
    /// their own pacing.
    pub fn without_delays(mut self) -> Self {
        self.backoff = BackoffPolicy::Fixed(Duration::ZERO);
        self.inter_group_delay = Duration::ZERO;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_pick_documented_group_sizes() {
        assert_eq!(BatchOptions::coverage().group_size, 10);
        assert_eq!(BatchOptions::beats().group_size, 3);
        assert_eq!(BatchOptions::retry_pass().group_size, 5);
    }

    #[test]
    fn default_retry_budget() {
        let options = BatchOptions::default();
        assert_eq!(options.max_retries, 2);
        assert_eq!(options.inter_group_delay, Duration::from_millis(1000));
        assert_eq!(options.request_timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn without_delays_zeroes_pacing() {
        let options = BatchOptions::default().without_delays();
        assert_eq!(options.inter_group_delay, Duration::ZERO);
        assert_eq!(options.backoff.delay_for(1), Duration::ZERO);
    }
}
