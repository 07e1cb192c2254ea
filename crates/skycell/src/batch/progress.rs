//! Progress tracking and reporting for placement runs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::batch::metrics::RunReport;

/// Progress callback for placement runs
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted while a run is driven
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    RunStarted {
        manifest: PathBuf,
        total_lines: usize,
    },
    RecordPlaced {
        line_number: usize,
        object_name: String,
        mesh_path: PathBuf,
    },
    RecordSkipped {
        line_number: usize,
        object_name: Option<String>,
        category: &'static str,
        message: String,
    },
    TickCompleted {
        tick: u64,
        processed: usize,
        remaining: usize,
    },
    RunFinished {
        report: RunReport,
    },
    RunCancelled {
        report: RunReport,
    },
}

/// Trait for progress reporting with more granular control
pub trait ProgressReporter: Send + Sync {
    fn on_run_started(&self, _manifest: &Path, _total_lines: usize) {}
    fn on_record_placed(&self, _line_number: usize, _object_name: &str, _mesh_path: &Path) {}
    fn on_record_skipped(
        &self,
        _line_number: usize,
        _object_name: Option<&str>,
        _category: &str,
        _message: &str,
    ) {
    }
    fn on_tick_completed(&self, _tick: u64, _processed: usize, _remaining: usize) {}
    fn on_run_finished(&self, _report: &RunReport) {}
    fn on_run_cancelled(&self, _report: &RunReport) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::RunStarted { manifest, total_lines } => {
                self.on_run_started(&manifest, total_lines);
            }
            ProgressEvent::RecordPlaced { line_number, object_name, mesh_path } => {
                self.on_record_placed(line_number, &object_name, &mesh_path);
            }
            ProgressEvent::RecordSkipped { line_number, object_name, category, message } => {
                self.on_record_skipped(line_number, object_name.as_deref(), category, &message);
            }
            ProgressEvent::TickCompleted { tick, processed, remaining } => {
                self.on_tick_completed(tick, processed, remaining);
            }
            ProgressEvent::RunFinished { report } => {
                self.on_run_finished(&report);
            }
            ProgressEvent::RunCancelled { report } => {
                self.on_run_cancelled(&report);
            }
        })
    }
}

/// Simple console progress reporter implementation
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    pub verbose: bool,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn on_run_started(&self, manifest: &Path, total_lines: usize) {
        println!("📋 Placing {} manifest lines from {}", total_lines, manifest.display());
    }

    fn on_record_placed(&self, line_number: usize, object_name: &str, mesh_path: &Path) {
        if self.verbose {
            println!("✅ Line {}: placed {} ({})", line_number, object_name, mesh_path.display());
        }
    }

    fn on_record_skipped(
        &self,
        line_number: usize,
        object_name: Option<&str>,
        category: &str,
        message: &str,
    ) {
        if !self.verbose {
            return;
        }
        let icon = if category == "import_failed" { "❌" } else { "⚠️" };
        match object_name {
            Some(name) => eprintln!("{} Line {} ({}): {}", icon, line_number, name, message),
            None => eprintln!("{} Line {}: {}", icon, line_number, message),
        }
    }

    fn on_tick_completed(&self, tick: u64, processed: usize, remaining: usize) {
        if self.verbose {
            println!("⏱️ Tick {}: {} processed, {} remaining", tick, processed, remaining);
        }
    }

    fn on_run_finished(&self, report: &RunReport) {
        let m = &report.metrics;
        println!(
            "🎉 Finished: {} placed, {} skipped in {} ticks ({:.1}% success)",
            m.placed,
            m.skipped(),
            m.ticks,
            m.success_rate() * 100.0
        );
    }

    fn on_run_cancelled(&self, report: &RunReport) {
        println!(
            "🛑 Cancelled after {} lines ({} placed, {} lines not processed)",
            report.metrics.lines_processed, report.metrics.placed, report.unprocessed_lines
        );
    }
}

/// Null progress reporter that does nothing
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}
