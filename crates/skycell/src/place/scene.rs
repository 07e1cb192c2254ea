//! In-memory scene that records imported meshes
//!
//! `SceneDocument` is a self-contained importer for hosts without a 3D
//! application attached: each import becomes a `SceneObject` that can later be
//! exported as JSON for another tool to instantiate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::config::ImportSettings;
use crate::error::ImportFailure;
use crate::manifest::Vec3;
use crate::place::importer::MeshImporter;
use crate::place::transform::{Placeable, Transform};

/// One imported mesh and its placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub mesh_path: PathBuf,
    pub import_settings: ImportSettings,
    pub transform: Transform,
}

/// Shared handle to an object owned by a `SceneDocument`
#[derive(Debug, Clone)]
pub struct ObjectHandle(Arc<RwLock<SceneObject>>);

impl ObjectHandle {
    fn new(object: SceneObject) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    pub fn transform(&self) -> Transform {
        self.read().transform
    }

    /// Copy of the object as it is right now
    pub fn snapshot(&self) -> SceneObject {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SceneObject> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SceneObject> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Placeable for ObjectHandle {
    fn set_location(&mut self, location: Vec3) {
        self.write().transform.location = location;
    }

    fn set_rotation_euler(&mut self, rotation: Vec3) {
        self.write().transform.rotation_euler = rotation;
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.write().transform.scale = scale;
    }
}

/// Exported form of a scene
#[derive(Debug, Serialize, Deserialize)]
pub struct SceneFile {
    pub objects: Vec<SceneObject>,
}

/// Scene that "imports" meshes by recording them
#[derive(Debug, Default)]
pub struct SceneDocument {
    objects: Vec<ObjectHandle>,
    names: HashSet<String>,
}

impl SceneDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn handles(&self) -> &[ObjectHandle] {
        &self.objects
    }

    pub fn objects(&self) -> Vec<SceneObject> {
        self.objects.iter().map(ObjectHandle::snapshot).collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&SceneFile {
            objects: self.objects(),
        })
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = self.to_json_pretty().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Object names are unique; repeats get `.001`, `.002`, ... appended
    fn unique_name(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        let mut counter = 1;
        while self.names.contains(&name) {
            name = format!("{}.{:03}", base, counter);
            counter += 1;
        }
        self.names.insert(name.clone());
        name
    }
}

impl MeshImporter for SceneDocument {
    type Object = ObjectHandle;

    fn import_mesh(
        &mut self,
        path: &Path,
        settings: &ImportSettings,
    ) -> Result<ObjectHandle, ImportFailure> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            ImportFailure::new(format!("cannot open mesh '{}'", path.display())).with_source(e)
        })?;
        if !metadata.is_file() {
            return Err(ImportFailure::new(format!("'{}' is not a file", path.display())));
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mesh".to_string());
        let name = self.unique_name(&stem);
        debug!("Imported {} as {}", path.display(), name);

        let handle = ObjectHandle::new(SceneObject {
            name,
            mesh_path: path.to_path_buf(),
            import_settings: *settings,
            transform: Transform::default(),
        });
        self.objects.push(handle.clone());
        Ok(handle)
    }
}
