//! Error types for the placement system with context and recovery information

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while placing manifest objects into a scene
///
/// Only the start-time variants are fatal to a run. Everything raised for a
/// single manifest record is reported and skipped by the batch driver.
#[derive(Error, Debug)]
pub enum PlacementError {
    /// Manifest file or mesh directory missing at run start
    #[error("{kind} '{path}' does not exist")]
    InputPathInvalid {
        path: PathBuf,
        kind: InputKind,
    },

    /// Manifest exists but could not be read as UTF-8 text
    #[error("Failed to read manifest '{path}'")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest line with too few fields or a bad numeric field
    #[error("Line {line_number} skipped due to incorrect format ({reason}): {line}")]
    MalformedLine {
        line_number: usize,
        line: String,
        reason: MalformedReason,
    },

    /// No mesh file matched the object name
    #[error("Mesh file '{file_name}' for {object_name} not found")]
    AssetNotFound {
        object_name: String,
        file_name: String,
    },

    /// The mesh importer rejected the file
    #[error("Failed to import {object_name} from '{path}'")]
    ImportFailed {
        object_name: String,
        path: PathBuf,
        #[source]
        source: ImportFailure,
    },

    /// Configuration errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    #[error("A placement run is already in progress")]
    AlreadyRunning,

    #[error("No placement run is in progress")]
    NotRunning,
}

/// Which start-time input failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Manifest,
    MeshDirectory,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Manifest => write!(f, "Manifest file"),
            InputKind::MeshDirectory => write!(f, "Mesh directory"),
        }
    }
}

/// Why a manifest line was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum MalformedReason {
    /// Fewer than eight whitespace separated fields
    FieldCount { found: usize },
    /// A numeric field (1-based column) did not parse as a float
    InvalidNumber { column: usize, value: String },
    /// A numeric field parsed to NaN or infinity
    NonFinite { column: usize, value: String },
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::FieldCount { found } => {
                write!(f, "expected 8 fields, found {}", found)
            }
            MalformedReason::InvalidNumber { column, value } => {
                write!(f, "field {} '{}' is not a number", column, value)
            }
            MalformedReason::NonFinite { column, value } => {
                write!(f, "field {} '{}' is not finite", column, value)
            }
        }
    }
}

/// Failure signalled by a mesh importer collaborator
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ImportFailure {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ImportFailure {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }
}

pub type Result<T> = std::result::Result<T, PlacementError>;

impl PlacementError {
    /// Whether the error stops the whole run rather than a single record
    pub fn is_fatal(&self) -> bool {
        match self {
            PlacementError::InputPathInvalid { .. } => true,
            PlacementError::ManifestRead { .. } => true,
            PlacementError::Configuration { .. } => true,
            PlacementError::AlreadyRunning => true,
            PlacementError::NotRunning => true,
            PlacementError::MalformedLine { .. } => false,
            PlacementError::AssetNotFound { .. } => false,
            PlacementError::ImportFailed { .. } => false,
        }
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            PlacementError::InputPathInvalid { .. } => "input_path_invalid",
            PlacementError::ManifestRead { .. } => "manifest_read",
            PlacementError::MalformedLine { .. } => "malformed_line",
            PlacementError::AssetNotFound { .. } => "asset_not_found",
            PlacementError::ImportFailed { .. } => "import_failed",
            PlacementError::Configuration { .. } => "configuration",
            PlacementError::AlreadyRunning => "already_running",
            PlacementError::NotRunning => "not_running",
        }
    }

    /// Get severity level for error prioritization
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PlacementError::InputPathInvalid { .. } => ErrorSeverity::Critical,
            PlacementError::ManifestRead { .. } => ErrorSeverity::Critical,
            PlacementError::Configuration { .. } => ErrorSeverity::High,
            PlacementError::AlreadyRunning => ErrorSeverity::High,
            PlacementError::NotRunning => ErrorSeverity::Low,
            PlacementError::MalformedLine { .. } => ErrorSeverity::Medium,
            PlacementError::AssetNotFound { .. } => ErrorSeverity::Medium,
            PlacementError::ImportFailed { .. } => ErrorSeverity::High,
        }
    }

    /// Name of the object the error refers to, if any
    pub fn object_name(&self) -> Option<&str> {
        match self {
            PlacementError::AssetNotFound { object_name, .. } => Some(object_name),
            PlacementError::ImportFailed { object_name, .. } => Some(object_name),
            _ => None,
        }
    }
}

/// Error severity levels for prioritization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_per_record_errors_are_not_fatal() {
        let malformed = PlacementError::MalformedLine {
            line_number: 2,
            line: "Rock 1 2".to_string(),
            reason: MalformedReason::FieldCount { found: 3 },
        };
        let missing = PlacementError::AssetNotFound {
            object_name: "Chair".to_string(),
            file_name: "Chair.nif".to_string(),
        };

        assert!(!malformed.is_fatal());
        assert!(!missing.is_fatal());
        assert_eq!(malformed.category(), "malformed_line");
        assert_eq!(missing.object_name(), Some("Chair"));
    }

    #[test]
    fn test_start_errors_are_fatal() {
        let err = PlacementError::InputPathInvalid {
            path: PathBuf::from("/nope/cell.txt"),
            kind: InputKind::Manifest,
        };

        assert!(err.is_fatal());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.to_string(), "Manifest file '/nope/cell.txt' does not exist");
    }

    #[test]
    fn test_import_failed_keeps_source() {
        let err = PlacementError::ImportFailed {
            object_name: "Table01".to_string(),
            path: PathBuf::from("table.nif"),
            source: ImportFailure::new("bad header"),
        };

        assert_eq!(err.source().map(|s| s.to_string()), Some("bad header".to_string()));
        assert!(err.severity() > ErrorSeverity::Medium);
    }

    #[test]
    fn test_malformed_reason_display() {
        let reason = MalformedReason::InvalidNumber {
            column: 4,
            value: "abc".to_string(),
        };
        assert_eq!(reason.to_string(), "field 4 'abc' is not a number");
    }
}
