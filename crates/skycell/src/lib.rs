//! SkyCell Library
//!
//! This library places whole game cells into a 3D scene at once. It reads a
//! cell manifest exported by an extraction tool, finds the mesh file for each
//! listed object, hands it to a mesh importer and applies the manifest
//! transform to the object the importer created.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use skycell::{
//!     BatchDriver, ConsoleProgressReporter, ImportOptions, IntoProgressCallback,
//!     RunRequest, RunStatus, SceneDocument,
//! };
//!
//! # fn example() -> skycell::Result<()> {
//! let request = RunRequest::new("cell.txt", "Data/meshes");
//! let options = ImportOptions {
//!     ignore_scale: true,
//!     batch_size: 20,
//!     ..Default::default()
//! };
//!
//! let mut scene = SceneDocument::new();
//! let mut driver = BatchDriver::new()
//!     .with_progress_callback(ConsoleProgressReporter::new(false).into_callback());
//!
//! driver.start(request)?;
//! // Call `step` from the host's timer or event loop; each call handles at
//! // most `batch_size` manifest lines.
//! while driver.step(&mut scene, &options)? == RunStatus::Continuing {}
//!
//! println!("Placed {} objects", scene.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Tolerant manifest parsing**: tabs or spaces, byte-order mark, discarded header
//! - **Asset resolution**: case-insensitive recursive search with numbered-suffix stripping
//! - **Override options**: ignore position/rotation/scale or force a uniform scale
//! - **Cooperative batching**: bounded work per tick, live batch size, cancellation
//! - **Run reports**: per-line warnings plus an aggregate end-of-run summary

pub mod batch;
pub mod config;
pub mod error;
pub mod manifest;
pub mod place;
pub mod resolve;

// Re-export commonly used types for convenience
pub use batch::{
    drive, BatchDriver, ConsoleProgressReporter, DriverState, IntoProgressCallback,
    NullProgressReporter, ProgressCallback, ProgressEvent, ProgressReporter, RunReport,
    RunStatus,
};
pub use config::{ImportOptions, ImportSettings, RunRequest};
pub use error::{ImportFailure, PlacementError, Result};
pub use manifest::{parse_line, read_manifest, ManifestRecord, Vec3};
pub use place::{adjust_record, apply_transform, MeshImporter, Placeable, SceneDocument, Transform};
pub use resolve::{normalize_object_name, AssetResolver, ResolvedAsset};
