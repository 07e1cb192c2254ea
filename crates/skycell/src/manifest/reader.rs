//! Manifest file loading

use std::path::Path;
use tracing::debug;

use crate::error::{PlacementError, Result};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A raw manifest line paired with its 1-based line number in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLine {
    pub number: usize,
    pub text: String,
}

impl ManifestLine {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Read a manifest file into its data lines.
///
/// A leading byte-order mark is dropped and the first line is always treated
/// as a header and discarded, whatever it contains.
pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<ManifestLine>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| PlacementError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    let lines = split_manifest(&text);
    debug!("Read {} data lines from manifest {}", lines.len(), path.display());
    Ok(lines)
}

/// Split manifest text into data lines, skipping the header
pub fn split_manifest(text: &str) -> Vec<ManifestLine> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    text.lines()
        .enumerate()
        .skip(1)
        .map(|(i, line)| ManifestLine {
            number: i + 1,
            text: line.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_header_is_discarded() {
        let lines = split_manifest("Table01\t1\t2\t3\t0\t0\t0\t1\nRock\t0\t0\t0\t0\t0\t0\t1\n");

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number, 2);
        assert!(lines[0].text.starts_with("Rock"));
    }

    #[test]
    fn test_byte_order_mark_and_crlf() {
        let lines = split_manifest("\u{feff}Name\tX\r\nTable01\t1\t2\t3\t0\t0\t90\t1.5\r\n");

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Table01\t1\t2\t3\t0\t0\t90\t1.5");
    }

    #[test]
    fn test_header_only_and_empty() {
        assert!(split_manifest("Name\tX\tY\n").is_empty());
        assert!(split_manifest("").is_empty());
    }

    #[test]
    fn test_blank_line_detection() {
        let lines = split_manifest("header\n  \t \nRock 1 2 3 4 5 6 7\n");
        assert!(lines[0].is_blank());
        assert!(!lines[1].is_blank());
        assert_eq!(lines[1].number, 3);
    }

    #[test]
    fn test_read_manifest_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cell.txt");
        std::fs::write(&path, "\u{feff}header\nChair 1 2 3 0 0 0 1\n").unwrap();

        let lines = read_manifest(&path).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Chair 1 2 3 0 0 0 1");
    }

    #[test]
    fn test_read_manifest_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cell.txt");
        std::fs::write(&path, [0x68, 0x0a, 0xff, 0xfe, 0x41]).unwrap();

        let err = read_manifest(&path).unwrap_err();
        assert_eq!(err.category(), "manifest_read");
        assert!(err.is_fatal());
    }
}
