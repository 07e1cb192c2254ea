//! Batch placement
//!
//! This module contains the resumable driver that walks a manifest in bounded
//! ticks, its progress events and metrics, and a tokio scheduler for it.

pub mod driver;
pub mod metrics;
pub mod progress;
pub mod scheduler;

// Re-export main types for convenience
pub use driver::{BatchDriver, BatchState, DriverState, RunStatus};
pub use metrics::{RunMetrics, RunMetricsSnapshot, RunReport, SkippedRecord};
pub use progress::{
    ConsoleProgressReporter, IntoProgressCallback, NullProgressReporter, ProgressCallback,
    ProgressEvent, ProgressReporter,
};
pub use scheduler::{drive, DEFAULT_TICK_INTERVAL};
