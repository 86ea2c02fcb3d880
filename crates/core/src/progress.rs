//! Shared progress and terminal-statistics model.
//!
//! Every multi-shot flow (coverage packs, beat variants, beat batches) reports
//! progress as completed/total counts and closes with the same aggregate
//! statistics record. Progress within a single run is monotonically
//! non-decreasing; [`ProgressTracker`] enforces that.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Percentage math
// ---------------------------------------------------------------------------

/// Progress percentage: `round(completed / total * 100)`.
///
/// Returns 100 for an empty total so zero-item runs read as complete.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Success rate rounded to one decimal, e.g. `66.7` for 2 of 3.
pub fn success_rate(succeeded: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((succeeded as f64 / total as f64) * 1000.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// ProgressTracker
// ---------------------------------------------------------------------------

/// Counts completed items and guarantees the reported sequence never
/// decreases within one run.
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    completed: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self { total, completed: 0 }
    }

    /// Record one item reaching a terminal state. Returns the new
    /// `(completed, total)` pair for callback fan-out.
    pub fn complete_one(&mut self) -> (usize, usize) {
        self.completed = (self.completed + 1).min(self.total);
        (self.completed, self.total)
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn percent(&self) -> u8 {
        progress_percent(self.completed, self.total)
    }

    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}

// ---------------------------------------------------------------------------
// Terminal statistics
// ---------------------------------------------------------------------------

/// Aggregate statistics for one completed batch or library run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Success rate in percent, one decimal.
    pub success_rate: f64,
    pub total_time: Duration,
    /// Mean wall-clock time per item; zero for empty runs.
    pub average_time_per_item: Duration,
}

impl RunStats {
    /// Compute stats from terminal counts and the run's wall-clock time.
    pub fn compute(succeeded: usize, failed: usize, total_time: Duration) -> Self {
        let total = succeeded + failed;
        let average_time_per_item = if total == 0 {
            Duration::ZERO
        } else {
            total_time / total as u32
        };
        Self {
            total,
            succeeded,
            failed,
            success_rate: success_rate(succeeded, total),
            total_time,
            average_time_per_item,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- progress_percent -----------------------------------------------------

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
    }

    #[test]
    fn percent_of_empty_total_is_complete() {
        assert_eq!(progress_percent(0, 0), 100);
    }

    #[test]
    fn percent_zero_completed() {
        assert_eq!(progress_percent(0, 10), 0);
    }

    // -- success_rate ---------------------------------------------------------

    #[test]
    fn success_rate_one_decimal() {
        assert_eq!(success_rate(2, 3), 66.7);
        assert_eq!(success_rate(1, 3), 33.3);
        assert_eq!(success_rate(3, 3), 100.0);
    }

    #[test]
    fn success_rate_empty_is_zero() {
        assert_eq!(success_rate(0, 0), 0.0);
    }

    // -- ProgressTracker ------------------------------------------------------

    #[test]
    fn tracker_counts_up_monotonically() {
        let mut tracker = ProgressTracker::new(3);
        assert_eq!(tracker.complete_one(), (1, 3));
        assert_eq!(tracker.complete_one(), (2, 3));
        assert_eq!(tracker.complete_one(), (3, 3));
        assert!(tracker.is_done());
    }

    #[test]
    fn tracker_saturates_at_total() {
        let mut tracker = ProgressTracker::new(1);
        tracker.complete_one();
        assert_eq!(tracker.complete_one(), (1, 1));
    }

    #[test]
    fn tracker_percent_tracks_completion() {
        let mut tracker = ProgressTracker::new(4);
        assert_eq!(tracker.percent(), 0);
        tracker.complete_one();
        assert_eq!(tracker.percent(), 25);
    }

    // -- RunStats -------------------------------------------------------------

    #[test]
    fn stats_counts_and_rate() {
        let stats = RunStats::compute(2, 1, Duration::from_secs(6));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.success_rate, 66.7);
        assert_eq!(stats.average_time_per_item, Duration::from_secs(2));
    }

    #[test]
    fn stats_empty_run() {
        let stats = RunStats::compute(0, 0, Duration::ZERO);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.average_time_per_item, Duration::ZERO);
    }
}
