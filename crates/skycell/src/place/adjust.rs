//! User override rules applied to parsed records

use crate::config::ImportOptions;
use crate::manifest::{ManifestRecord, Vec3};

/// Apply the ignore/override flags to a record.
///
/// Rules fire independently. `override_scale` is applied after `ignore_scale`
/// and wins when both are set. The name is never touched.
pub fn adjust_record(record: &ManifestRecord, options: &ImportOptions) -> ManifestRecord {
    let mut adjusted = record.clone();

    if options.ignore_position {
        adjusted.position = Vec3::ZERO;
    }
    if options.ignore_rotation {
        adjusted.rotation = Vec3::ZERO;
    }
    if options.ignore_scale {
        adjusted.scale = 1.0;
    }
    if options.override_scale {
        adjusted.scale = options.scale_override_value;
    }

    adjusted
}
