//! Placing imported meshes into a scene
//!
//! The mesh importer and the scene object API are collaborators supplied by
//! the host. This module defines their contracts, the option adjustment that
//! runs before a transform is applied, and the applicator itself.

pub mod adjust;
pub mod importer;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use adjust::adjust_record;
pub use importer::MeshImporter;
pub use scene::{ObjectHandle, SceneDocument, SceneObject};
pub use transform::{apply_transform, Placeable, Transform};
