//! Case-insensitive recursive mesh lookup
//!
//! Numbered scene instances (`Rock003`, `Rock017`) share one mesh file
//! (`rock.nif`), so a trailing three-digit suffix is stripped before searching.
//! When that name has no match, a name with its whole trailing digit run
//! stripped (`Table01` -> `Table`) is tried as a fallback. Every matching file
//! under the root is collected and sorted by path so the result does not
//! depend on filesystem enumeration order.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Length of the numbered instance suffix
const INSTANCE_SUFFIX_LEN: usize = 3;

/// Result of looking up one object name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub object_name: String,
    /// First match in path order, `None` when nothing matched
    pub file_path: Option<PathBuf>,
    /// Every other file that matched the same name
    pub collisions: Vec<PathBuf>,
}

impl ResolvedAsset {
    pub fn is_found(&self) -> bool {
        self.file_path.is_some()
    }
}

/// Strip a trailing three-digit instance suffix from an object name.
///
/// Names of three characters or fewer are returned unchanged so a purely
/// numeric name never normalizes to an empty string.
pub fn normalize_object_name(name: &str) -> &str {
    let suffix_start = match name.char_indices().rev().nth(INSTANCE_SUFFIX_LEN - 1) {
        Some((idx, _)) if idx > 0 => idx,
        _ => return name,
    };

    if name[suffix_start..].chars().all(|c| c.is_ascii_digit()) {
        &name[..suffix_start]
    } else {
        name
    }
}

/// Looks up mesh files for object names below a root directory
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
    extension: String,
}

impl AssetResolver {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(root: P, extension: S) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name searched for an object, e.g. `Rock003` -> `Rock.nif`
    pub fn target_file_name(&self, object_name: &str) -> String {
        format!("{}.{}", normalize_object_name(object_name), self.extension)
    }

    /// File names tried for an object, in priority order
    pub fn candidate_file_names(&self, object_name: &str) -> Vec<String> {
        let mut candidates = vec![self.target_file_name(object_name)];

        let stem = object_name.trim_end_matches(|c: char| c.is_ascii_digit());
        if !stem.is_empty() && stem != normalize_object_name(object_name) {
            candidates.push(format!("{}.{}", stem, self.extension));
        }
        candidates
    }

    /// Resolve an object name to a mesh file. Absence is not an error.
    pub fn resolve(&self, object_name: &str) -> ResolvedAsset {
        let candidates = self.candidate_file_names(object_name);
        let lowered: Vec<String> = candidates.iter().map(|c| c.to_lowercase()).collect();
        let target = &candidates[0];
        debug!("Searching for {:?} in directory: {}", candidates, self.root.display());

        let mut found: Vec<(usize, PathBuf)> = Vec::new();
        self.collect_matches(&self.root, &lowered, &mut found);

        let mut matches: Vec<PathBuf> = match found.iter().map(|(rank, _)| *rank).min() {
            Some(best) => found
                .into_iter()
                .filter(|(rank, _)| *rank == best)
                .map(|(_, path)| path)
                .collect(),
            None => Vec::new(),
        };
        matches.sort();

        let mut matches = matches.into_iter();
        let file_path = matches.next();
        let collisions: Vec<PathBuf> = matches.collect();

        match &file_path {
            Some(path) => {
                debug!("Found mesh file: {}", path.display());
                if !collisions.is_empty() {
                    warn!(
                        "{} files match '{}' for {}; using {} and ignoring {:?}",
                        collisions.len() + 1,
                        target,
                        object_name,
                        path.display(),
                        collisions
                    );
                }
            }
            None => debug!(
                "Mesh file '{}' not found in directory: {}",
                target,
                self.root.display()
            ),
        }

        ResolvedAsset {
            object_name: object_name.to_string(),
            file_path,
            collisions,
        }
    }

    /// Walk `dir` recursively, pairing each matching file with its candidate rank
    fn collect_matches(
        &self,
        dir: &Path,
        targets_lower: &[String],
        matches: &mut Vec<(usize, PathBuf)>,
    ) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            // Symlinked directories are not followed to avoid cycles
            if file_type.is_dir() {
                self.collect_matches(&path, targets_lower, matches);
            } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
                let name = entry.file_name().to_string_lossy().to_lowercase();
                if let Some(rank) = targets_lower.iter().position(|t| *t == name) {
                    matches.push((rank, path));
                }
            }
        }
    }
}
