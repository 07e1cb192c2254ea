//! Configuration types for placement runs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PlacementError, Result};

/// Default mesh file extension searched by the asset resolver
pub const DEFAULT_MESH_EXTENSION: &str = "nif";

/// User-chosen overrides and throughput for a placement run
///
/// The scheduler takes a fresh snapshot of these once per tick, so the batch
/// size can be changed while a run is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Place every object at the origin
    pub ignore_position: bool,
    /// Reset every rotation to zero
    pub ignore_rotation: bool,
    /// Reset every scale to 1.0
    pub ignore_scale: bool,
    /// Replace every scale with `scale_override_value` (wins over `ignore_scale`)
    pub override_scale: bool,
    pub scale_override_value: f64,
    /// Maximum number of manifest records processed per tick
    pub batch_size: usize,
}

impl ImportOptions {
    /// Check the options before a run starts
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(PlacementError::Configuration {
                message: "batch size must be at least 1".to_string(),
                field: Some("batch_size".to_string()),
            });
        }
        if !self.scale_override_value.is_finite() {
            return Err(PlacementError::Configuration {
                message: format!("scale override {} is not finite", self.scale_override_value),
                field: Some("scale_override_value".to_string()),
            });
        }
        Ok(())
    }

    /// Load options from a JSON file; missing keys fall back to defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PlacementError::Configuration {
            message: format!("cannot read options file '{}': {}", path.display(), e),
            field: None,
        })?;
        let options: ImportOptions =
            serde_json::from_str(&text).map_err(|e| PlacementError::Configuration {
                message: format!("invalid options file '{}': {}", path.display(), e),
                field: None,
            })?;
        options.validate()?;
        Ok(options)
    }

    /// Batch size clamped to the minimum of one record per tick
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            ignore_position: false,
            ignore_rotation: false,
            ignore_scale: false,
            override_scale: false,
            scale_override_value: 1.0,
            batch_size: 5,
        }
    }
}

/// Fixed options handed to the mesh importer for every file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Rename bones to the NifTools convention
    pub rename_bones: bool,
    pub create_bones: bool,
    /// Convert from the game's coordinate space into the scene's
    pub convert_coordinate_space: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            rename_bones: true,
            create_bones: false,
            convert_coordinate_space: true,
        }
    }
}

/// Inputs needed to start a placement run
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub manifest_path: PathBuf,
    pub mesh_directory: PathBuf,
    /// Extension (without the dot) of the mesh files to look for
    pub mesh_extension: String,
    pub import_settings: ImportSettings,
}

impl RunRequest {
    pub fn new<M: Into<PathBuf>, D: Into<PathBuf>>(manifest_path: M, mesh_directory: D) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            mesh_directory: mesh_directory.into(),
            mesh_extension: DEFAULT_MESH_EXTENSION.to_string(),
            import_settings: ImportSettings::default(),
        }
    }

    pub fn with_mesh_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.mesh_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_import_settings(mut self, settings: ImportSettings) -> Self {
        self.import_settings = settings;
        self
    }
}
