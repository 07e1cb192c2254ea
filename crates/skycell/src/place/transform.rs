//! Transform applicator

use serde::{Deserialize, Serialize};

use crate::manifest::{ManifestRecord, Vec3};

/// Spatial state setters exposed by a host scene object
pub trait Placeable {
    fn set_location(&mut self, location: Vec3);
    /// Euler angles, assigned verbatim
    fn set_rotation_euler(&mut self, rotation: Vec3);
    fn set_scale(&mut self, scale: Vec3);
}

/// Location, rotation and per-axis scale of a placed object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub location: Vec3,
    pub rotation_euler: Vec3,
    pub scale: Vec3,
}

impl Transform {
    /// Uniform scale on all three axes from the record's single value
    pub fn from_record(record: &ManifestRecord) -> Self {
        Self {
            location: record.position,
            rotation_euler: record.rotation,
            scale: Vec3::splat(record.scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation_euler: Vec3::ZERO,
            scale: Vec3::splat(1.0),
        }
    }
}

/// Assign a record's transform to an object. No bounds checks, no unit conversion.
pub fn apply_transform<P: Placeable + ?Sized>(object: &mut P, record: &ManifestRecord) {
    let transform = Transform::from_record(record);
    object.set_location(transform.location);
    object.set_rotation_euler(transform.rotation_euler);
    object.set_scale(transform.scale);
}
