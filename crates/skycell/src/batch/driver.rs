//! Resumable batch placement driver
//!
//! The driver owns the cursor into the manifest and processes a bounded
//! number of lines per `step`, so a host event loop stays responsive while a
//! large cell is placed. It never schedules itself: a timer, an event-loop
//! tick or [`crate::batch::scheduler::drive`] calls `step` repeatedly.
//!
//! ```text
//! Idle --start--> Running --step (cursor at end)--> Finished
//!                    |
//!                    +--cancel--> Cancelled
//! ```
//!
//! Per-line failures (malformed line, missing mesh, failed import) are logged,
//! counted and skipped. Only `start` can fail the whole run.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::batch::metrics::{RunMetrics, RunMetricsSnapshot, RunReport, SkippedRecord};
use crate::batch::progress::{ProgressCallback, ProgressEvent};
use crate::config::{ImportOptions, ImportSettings, RunRequest};
use crate::error::{InputKind, PlacementError, Result};
use crate::manifest::{parse_line, read_manifest, ManifestLine};
use crate::place::{adjust_record, apply_transform, MeshImporter};
use crate::resolve::AssetResolver;

/// Lifecycle of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Finished,
    Cancelled,
}

/// Outcome of one `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    Continuing,
    Finished,
    Cancelled,
}

/// Manifest lines still to be processed and the cursor into them
#[derive(Debug, Clone)]
pub struct BatchState {
    lines: Vec<ManifestLine>,
    cursor: usize,
}

impl BatchState {
    pub fn new(lines: Vec<ManifestLine>) -> Self {
        Self { lines, cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.lines.len()
    }

    pub fn remaining(&self) -> usize {
        self.lines.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    /// Move the cursor past any blank lines under it
    fn skip_blank_lines(&mut self) {
        while self.lines.get(self.cursor).is_some_and(ManifestLine::is_blank) {
            self.cursor += 1;
        }
    }

    /// Take the line under the cursor and advance past it
    fn advance(&mut self) -> Option<ManifestLine> {
        let line = self.lines.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(line)
    }
}

/// State that only exists while a run is in progress
struct ActiveRun {
    manifest_path: PathBuf,
    batch: BatchState,
    resolver: AssetResolver,
    settings: ImportSettings,
    skipped: Vec<SkippedRecord>,
    started_at: Instant,
}

impl ActiveRun {
    /// Parse, resolve, import, adjust and place a single manifest line
    fn place_line<I: MeshImporter>(
        &self,
        line: &ManifestLine,
        importer: &mut I,
        options: &ImportOptions,
    ) -> Result<(String, PathBuf)> {
        let record = parse_line(&line.text, line.number)?;

        let resolved = self.resolver.resolve(&record.name);
        let Some(mesh_path) = resolved.file_path else {
            return Err(PlacementError::AssetNotFound {
                file_name: self.resolver.target_file_name(&record.name),
                object_name: record.name,
            });
        };

        let mut object = importer
            .import_mesh(&mesh_path, &self.settings)
            .map_err(|source| PlacementError::ImportFailed {
                object_name: record.name.clone(),
                path: mesh_path.clone(),
                source,
            })?;

        let adjusted = adjust_record(&record, options);
        apply_transform(&mut object, &adjusted);

        Ok((record.name, mesh_path))
    }
}

/// Drives a manifest through the parser, resolver and importer in bounded ticks
pub struct BatchDriver {
    state: DriverState,
    run: Option<ActiveRun>,
    metrics: Arc<RunMetrics>,
    progress_callback: Option<ProgressCallback>,
    cancellation_token: CancellationToken,
    last_report: Option<RunReport>,
}

impl BatchDriver {
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
            run: None,
            metrics: Arc::new(RunMetrics::default()),
            progress_callback: None,
            cancellation_token: CancellationToken::new(),
            last_report: None,
        }
    }

    /// Set a progress callback for run updates
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Set a cancellation token checked between lines.
    ///
    /// Starting a new run after this token was cancelled replaces it with a
    /// fresh one; fetch that with [`BatchDriver::cancellation_token`] after
    /// `start`.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Token that cancels the current run when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Counters of the current (or most recent) run
    pub fn metrics(&self) -> RunMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Shared counters, readable while the run is stepping
    pub fn metrics_handle(&self) -> Arc<RunMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Lines not yet processed by the current run
    pub fn remaining(&self) -> usize {
        self.run.as_ref().map_or(0, |run| run.batch.remaining())
    }

    /// Report of the most recent finished or cancelled run
    pub fn report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    /// Validate inputs, read the manifest and enter `Running`.
    ///
    /// On failure no run state is created and the driver keeps its state.
    pub fn start(&mut self, request: RunRequest) -> Result<()> {
        if self.state == DriverState::Running {
            return Err(PlacementError::AlreadyRunning);
        }

        if !request.manifest_path.exists() {
            error!("Manifest file path does not exist: {}", request.manifest_path.display());
            return Err(PlacementError::InputPathInvalid {
                path: request.manifest_path,
                kind: InputKind::Manifest,
            });
        }
        if !request.mesh_directory.is_dir() {
            error!("Mesh directory does not exist: {}", request.mesh_directory.display());
            return Err(PlacementError::InputPathInvalid {
                path: request.mesh_directory,
                kind: InputKind::MeshDirectory,
            });
        }

        let lines = read_manifest(&request.manifest_path)?;
        let total_lines = lines.len();

        if self.cancellation_token.is_cancelled() {
            self.cancellation_token = CancellationToken::new();
        }
        self.metrics = Arc::new(RunMetrics::default());
        self.last_report = None;
        self.run = Some(ActiveRun {
            manifest_path: request.manifest_path.clone(),
            batch: BatchState::new(lines),
            resolver: AssetResolver::new(request.mesh_directory, request.mesh_extension),
            settings: request.import_settings,
            skipped: Vec::new(),
            started_at: Instant::now(),
        });
        self.state = DriverState::Running;

        info!(
            "Starting placement of {} manifest lines from {}",
            total_lines,
            request.manifest_path.display()
        );
        self.emit(ProgressEvent::RunStarted {
            manifest: request.manifest_path,
            total_lines,
        });
        Ok(())
    }

    /// Process up to `options.batch_size` lines.
    ///
    /// `options` is the caller's snapshot for this tick. Cancellation is
    /// checked before each line, never in the middle of one.
    pub fn step<I: MeshImporter>(
        &mut self,
        importer: &mut I,
        options: &ImportOptions,
    ) -> Result<RunStatus> {
        match self.state {
            DriverState::Idle => return Err(PlacementError::NotRunning),
            DriverState::Finished => return Ok(RunStatus::Finished),
            DriverState::Cancelled => return Ok(RunStatus::Cancelled),
            DriverState::Running => {}
        }

        let tick = self.metrics.record_tick();
        let budget = options.effective_batch_size();
        let mut processed = 0;

        while processed < budget {
            if self.cancellation_token.is_cancelled() {
                self.cancel();
                return Ok(RunStatus::Cancelled);
            }

            let Some(run) = self.run.as_mut() else {
                return Err(PlacementError::NotRunning);
            };
            let Some(line) = run.batch.advance() else {
                break;
            };
            if line.is_blank() {
                debug!("Skipping blank manifest line {}", line.number);
                continue;
            }

            processed += 1;
            self.metrics.record_line_processed();
            let outcome = run.place_line(&line, importer, options);
            self.record_outcome(&line, outcome);
        }

        // Blank lines under the cursor are not remaining work
        if let Some(run) = self.run.as_mut() {
            run.batch.skip_blank_lines();
        }

        let remaining = self.remaining();
        debug!("Tick {} processed {} lines, {} remaining", tick, processed, remaining);
        self.emit(ProgressEvent::TickCompleted {
            tick,
            processed,
            remaining,
        });

        if remaining == 0 {
            self.finish(DriverState::Finished);
            Ok(RunStatus::Finished)
        } else {
            Ok(RunStatus::Continuing)
        }
    }

    /// Stop the current run. Objects already placed are kept.
    ///
    /// Returns `false` when no run was in progress.
    pub fn cancel(&mut self) -> bool {
        if self.state != DriverState::Running {
            return false;
        }
        self.cancellation_token.cancel();
        warn!("Placement cancelled with {} lines left", self.remaining());
        self.finish(DriverState::Cancelled);
        true
    }

    fn record_outcome(&mut self, line: &ManifestLine, outcome: Result<(String, PathBuf)>) {
        match outcome {
            Ok((object_name, mesh_path)) => {
                self.metrics.record_placed();
                debug!("Placed {} from {}", object_name, mesh_path.display());
                self.emit(ProgressEvent::RecordPlaced {
                    line_number: line.number,
                    object_name,
                    mesh_path,
                });
            }
            Err(e) => {
                match &e {
                    PlacementError::ImportFailed { source, .. } => error!("{}: {}", e, source),
                    _ => warn!("{}", e),
                }
                self.metrics.record_skipped(&e);

                let skipped = SkippedRecord {
                    line_number: line.number,
                    object_name: e.object_name().map(str::to_string),
                    category: e.category(),
                    message: e.to_string(),
                };
                if let Some(run) = self.run.as_mut() {
                    run.skipped.push(skipped.clone());
                }
                self.emit(ProgressEvent::RecordSkipped {
                    line_number: skipped.line_number,
                    object_name: skipped.object_name,
                    category: skipped.category,
                    message: skipped.message,
                });
            }
        }
    }

    /// Tear down the active run and publish its report
    fn finish(&mut self, state: DriverState) {
        let Some(run) = self.run.take() else {
            self.state = state;
            return;
        };

        let report = RunReport {
            manifest: run.manifest_path,
            status: if state == DriverState::Cancelled {
                RunStatus::Cancelled
            } else {
                RunStatus::Finished
            },
            metrics: self.metrics.snapshot(),
            skipped: run.skipped,
            unprocessed_lines: run.batch.remaining(),
            duration: run.started_at.elapsed(),
        };
        self.state = state;

        if state == DriverState::Finished {
            info!(
                "Placement finished: {} placed, {} skipped, {} ticks",
                report.metrics.placed,
                report.metrics.skipped(),
                report.metrics.ticks
            );
            self.emit(ProgressEvent::RunFinished { report: report.clone() });
        } else {
            self.emit(ProgressEvent::RunCancelled { report: report.clone() });
        }
        self.last_report = Some(report);
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(callback) = &self.progress_callback {
            callback(event);
        }
    }
}

impl Default for BatchDriver {
    fn default() -> Self {
        Self::new()
    }
}
