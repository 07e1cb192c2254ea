//! Mesh asset resolution
//!
//! Maps manifest object names onto mesh files below a directory root.

pub mod resolver;

pub use resolver::{normalize_object_name, AssetResolver, ResolvedAsset};
