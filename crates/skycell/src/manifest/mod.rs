//! Cell manifest reading and parsing
//!
//! A manifest is a UTF-8 text file with one discarded header line followed by
//! one object per line: `name pos_x pos_y pos_z rot_x rot_y rot_z scale`.

pub mod parser;
pub mod reader;

// Re-export main types
pub use parser::{parse_line, ManifestRecord, Vec3};
pub use reader::{read_manifest, split_manifest, ManifestLine};
