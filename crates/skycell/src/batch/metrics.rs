//! Per-run counters and the end-of-run report

use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::batch::driver::RunStatus;
use crate::error::PlacementError;

/// Counters for one placement run
///
/// Atomic so a progress observer on another thread can read them while the
/// driver is stepping.
#[derive(Debug, Default)]
pub struct RunMetrics {
    pub lines_processed: AtomicU64,
    pub placed: AtomicU64,
    pub malformed_lines: AtomicU64,
    pub assets_not_found: AtomicU64,
    pub imports_failed: AtomicU64,
    pub ticks: AtomicU64,
}

impl RunMetrics {
    pub fn record_tick(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_line_processed(&self) {
        self.lines_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_placed(&self) {
        self.placed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a per-record failure under its category
    pub fn record_skipped(&self, error: &PlacementError) {
        let counter = match error {
            PlacementError::MalformedLine { .. } => &self.malformed_lines,
            PlacementError::AssetNotFound { .. } => &self.assets_not_found,
            PlacementError::ImportFailed { .. } => &self.imports_failed,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> RunMetricsSnapshot {
        RunMetricsSnapshot {
            lines_processed: self.lines_processed.load(Ordering::Relaxed),
            placed: self.placed.load(Ordering::Relaxed),
            malformed_lines: self.malformed_lines.load(Ordering::Relaxed),
            assets_not_found: self.assets_not_found.load(Ordering::Relaxed),
            imports_failed: self.imports_failed.load(Ordering::Relaxed),
            ticks: self.ticks.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of run metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunMetricsSnapshot {
    pub lines_processed: u64,
    pub placed: u64,
    pub malformed_lines: u64,
    pub assets_not_found: u64,
    pub imports_failed: u64,
    pub ticks: u64,
}

impl RunMetricsSnapshot {
    pub fn skipped(&self) -> u64 {
        self.malformed_lines + self.assets_not_found + self.imports_failed
    }

    /// Placed records as a fraction of processed lines (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.lines_processed == 0 {
            0.0
        } else {
            self.placed as f64 / self.lines_processed as f64
        }
    }
}

/// A manifest line that did not produce a placed object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub line_number: usize,
    pub object_name: Option<String>,
    pub category: &'static str,
    pub message: String,
}

/// Aggregate summary emitted once a run stops
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub manifest: PathBuf,
    pub status: RunStatus,
    pub metrics: RunMetricsSnapshot,
    pub skipped: Vec<SkippedRecord>,
    /// Lines left unprocessed (non-zero only after cancellation)
    pub unprocessed_lines: usize,
    pub duration: Duration,
}

impl RunReport {
    pub fn skipped_in<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a SkippedRecord> + 'a {
        self.skipped.iter().filter(move |s| s.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedReason;

    #[test]
    fn test_skipped_counts_by_category() {
        let metrics = RunMetrics::default();
        metrics.record_line_processed();
        metrics.record_line_processed();
        metrics.record_placed();
        metrics.record_skipped(&PlacementError::MalformedLine {
            line_number: 3,
            line: "x".to_string(),
            reason: MalformedReason::FieldCount { found: 1 },
        });
        metrics.record_skipped(&PlacementError::NotRunning);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.malformed_lines, 1);
        assert_eq!(snapshot.skipped(), 1);
        assert_eq!(snapshot.success_rate(), 0.5);
    }

    #[test]
    fn test_ticks_are_numbered_from_one() {
        let metrics = RunMetrics::default();
        assert_eq!(metrics.record_tick(), 1);
        assert_eq!(metrics.record_tick(), 2);
        assert_eq!(metrics.snapshot().ticks, 2);
    }

    #[test]
    fn test_empty_run_success_rate() {
        assert_eq!(RunMetricsSnapshot::default().success_rate(), 0.0);
    }
}
