//! Manifest line parser

use serde::{Deserialize, Serialize};

use crate::error::{MalformedReason, PlacementError, Result};

/// Number of fields on a valid manifest line
pub const FIELD_COUNT: usize = 8;

/// Three scalars used for locations, Euler rotations and scales
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same value on all three axes
    pub fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// One parsed manifest line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub name: String,
    pub position: Vec3,
    /// Euler angles, passed through without unit conversion
    pub rotation: Vec3,
    pub scale: f64,
}

/// Parse a single manifest line.
///
/// Fields are separated by any run of tabs or spaces. Fields past the eighth
/// are ignored. `line_number` is only used for error reporting.
pub fn parse_line(line: &str, line_number: usize) -> Result<ManifestRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() < FIELD_COUNT {
        let reason = MalformedReason::FieldCount {
            found: fields.len(),
        };
        return Err(malformed(line, line_number, reason));
    }

    let mut numbers = [0.0f64; FIELD_COUNT - 1];
    for (i, raw) in fields[1..FIELD_COUNT].iter().enumerate() {
        let column = i + 2;
        let value: f64 = raw.parse().map_err(|_| {
            malformed(line, line_number, MalformedReason::InvalidNumber {
                column,
                value: raw.to_string(),
            })
        })?;
        if !value.is_finite() {
            return Err(malformed(line, line_number, MalformedReason::NonFinite {
                column,
                value: raw.to_string(),
            }));
        }
        numbers[i] = value;
    }

    Ok(ManifestRecord {
        name: fields[0].to_string(),
        position: Vec3::new(numbers[0], numbers[1], numbers[2]),
        rotation: Vec3::new(numbers[3], numbers[4], numbers[5]),
        scale: numbers[6],
    })
}

fn malformed(line: &str, line_number: usize, reason: MalformedReason) -> PlacementError {
    PlacementError::MalformedLine {
        line_number,
        line: line.trim().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason_of(err: PlacementError) -> MalformedReason {
        match err {
            PlacementError::MalformedLine { reason, .. } => reason,
            other => panic!("expected MalformedLine, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tab_separated_line() {
        let record = parse_line("Table01\t1.0\t2.0\t3.0\t0.0\t0.0\t90.0\t1.5", 2).unwrap();

        assert_eq!(record.name, "Table01");
        assert_eq!(record.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(record.rotation, Vec3::new(0.0, 0.0, 90.0));
        assert_eq!(record.scale, 1.5);
    }

    #[test]
    fn test_parse_mixed_whitespace_and_padding() {
        let line = "  Rock003 \t -12.5   4e2\t0.125 \t10 20  30\t 0.75  \r\n";
        let record = parse_line(line, 7).unwrap();

        assert_eq!(record.name, "Rock003");
        assert_eq!(record.position, Vec3::new(-12.5, 400.0, 0.125));
        assert_eq!(record.rotation, Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(record.scale, 0.75);
    }

    #[test]
    fn test_values_match_float_parse_exactly() {
        let fields = [
            "0.1",
            "-2048.33333",
            "1e-7",
            "359.999",
            "-0.0",
            "3.14159265358979",
            "1.0000001",
        ];
        let line = format!("Obj {}", fields.join("\t"));
        let record = parse_line(&line, 2).unwrap();

        let expected: Vec<f64> = fields.iter().map(|f| f.parse().unwrap()).collect();
        assert_eq!(record.position, Vec3::new(expected[0], expected[1], expected[2]));
        assert_eq!(record.rotation, Vec3::new(expected[3], expected[4], expected[5]));
        assert_eq!(record.scale, expected[6]);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let record = parse_line("Barrel 1 2 3 4 5 6 1 extra trailing", 3).unwrap();
        assert_eq!(record.name, "Barrel");
        assert_eq!(record.scale, 1.0);
    }

    #[test]
    fn test_too_few_fields_rejected() {
        let err = parse_line("Chair\t1\t2\t3\t4", 5).unwrap_err();

        assert!(!err.is_fatal());
        match &err {
            PlacementError::MalformedLine { line_number, line, .. } => {
                assert_eq!(*line_number, 5);
                assert_eq!(line, "Chair\t1\t2\t3\t4");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(reason_of(err), MalformedReason::FieldCount { found: 5 });
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let err = parse_line("Chair 1 2 three 0 0 0 1", 2).unwrap_err();
        assert_eq!(
            reason_of(err),
            MalformedReason::InvalidNumber { column: 4, value: "three".to_string() }
        );
    }

    #[test]
    fn test_non_finite_field_rejected() {
        let err = parse_line("Chair 1 2 3 0 0 0 inf", 2).unwrap_err();
        assert_eq!(
            reason_of(err),
            MalformedReason::NonFinite { column: 8, value: "inf".to_string() }
        );

        let err = parse_line("Chair NaN 2 3 0 0 0 1", 2).unwrap_err();
        assert!(matches!(reason_of(err), MalformedReason::NonFinite { column: 2, .. }));
    }

    #[test]
    fn test_empty_line_rejected() {
        let err = parse_line("   \t ", 9).unwrap_err();
        assert_eq!(reason_of(err), MalformedReason::FieldCount { found: 0 });
    }
}
