//! Mesh importer collaborator contract

use std::path::Path;

use crate::config::ImportSettings;
use crate::error::ImportFailure;
use crate::place::transform::Placeable;

/// Host operation that turns a mesh file into a new scene object.
///
/// A successful import creates exactly one object and returns a handle to it.
/// The batch driver never looks the object up through ambient selection state.
pub trait MeshImporter {
    type Object: Placeable;

    fn import_mesh(
        &mut self,
        path: &Path,
        settings: &ImportSettings,
    ) -> Result<Self::Object, ImportFailure>;
}
