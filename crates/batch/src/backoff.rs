//! Pluggable retry backoff policies.
//!
//! The default is a fixed delay between attempts. Exponential and jittered
//! variants are drop-in replacements for providers whose rate limiters
//! punish constant-interval retries.

use std::time::Duration;

use rand::Rng;

/// Default pause before each retry attempt of a single request.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Maps an attempt number to the pause taken before the next attempt.
#[derive(Debug, Clone)]
pub enum BackoffPolicy {
    /// The same delay before every retry.
    Fixed(Duration),
    /// Delay grows by `multiplier` after each failure, capped at `max`.
    Exponential {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
    /// Exponential growth with each delay scaled by a uniform factor in
    /// `0.5..=1.0` to spread retries from concurrent requests apart.
    ExponentialJittered {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_RETRY_DELAY)
    }
}

impl BackoffPolicy {
    /// Delay before the retry that follows failed attempt number `attempt`
    /// (1-based: `attempt = 1` means the first attempt just failed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Exponential {
                initial,
                max,
                multiplier,
            } => exponential_delay(*initial, *max, *multiplier, attempt),
            Self::ExponentialJittered {
                initial,
                max,
                multiplier,
            } => {
                let base = exponential_delay(*initial, *max, *multiplier, attempt);
                let factor = rand::rng().random_range(0.5..=1.0);
                Duration::from_millis((base.as_millis() as f64 * factor) as u64)
            }
        }
    }
}

fn exponential_delay(initial: Duration, max: Duration, multiplier: f64, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(32);
    let scaled = initial.as_millis() as f64 * multiplier.powi(exponent as i32);
    Duration::from_millis(scaled as u64).min(max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
