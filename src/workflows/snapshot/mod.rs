//! Loads record-pair snapshots exported from the CRM merge view.
//!
//! JSON files carry the full [`RecordSnapshot`] (fields, tags, and any email
//! selection already made). CSV files carry one field per row and nothing else.

mod parser;

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::workflows::merge::RecordSnapshot;

#[derive(Debug)]
pub enum SnapshotImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    UnknownFormat(String),
}

impl fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotImportError::Io(err) => write!(f, "failed to read snapshot: {}", err),
            SnapshotImportError::Csv(err) => write!(f, "invalid snapshot CSV data: {}", err),
            SnapshotImportError::Json(err) => write!(f, "invalid snapshot JSON data: {}", err),
            SnapshotImportError::UnknownFormat(value) => {
                write!(f, "unknown snapshot format `{}` (expected json or csv)", value)
            }
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io(err) => Some(err),
            SnapshotImportError::Csv(err) => Some(err),
            SnapshotImportError::Json(err) => Some(err),
            SnapshotImportError::UnknownFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for SnapshotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SnapshotImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for SnapshotImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    Json,
    Csv,
}

impl SnapshotFormat {
    /// Guesses from the file extension; anything but `.csv` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SnapshotFormat::Csv,
            _ => SnapshotFormat::Json,
        }
    }
}

impl FromStr for SnapshotFormat {
    type Err = SnapshotImportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "csv" => Ok(SnapshotFormat::Csv),
            _ => Err(SnapshotImportError::UnknownFormat(value.to_string())),
        }
    }
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        format: Option<SnapshotFormat>,
    ) -> Result<RecordSnapshot, SnapshotImportError> {
        let path = path.as_ref();
        let format = format.unwrap_or_else(|| SnapshotFormat::from_path(path));
        let file = std::fs::File::open(path)?;
        debug!(path = %path.display(), ?format, "loading snapshot");
        Self::from_reader(file, format)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        format: SnapshotFormat,
    ) -> Result<RecordSnapshot, SnapshotImportError> {
        let snapshot = match format {
            SnapshotFormat::Json => serde_json::from_reader(reader)?,
            SnapshotFormat::Csv => RecordSnapshot::new(parser::read_csv_fields(reader)?),
        };
        debug!(
            fields = snapshot.fields.len(),
            tags = snapshot.tags.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::merge::Side;

    #[test]
    fn reads_json_snapshots_with_defaults() {
        let data = r#"{
            "fields": [
                {"label": "Email", "left": "a@csusb.edu", "right": "a@gmail.com"},
                {"label": "First Name", "left": "Ana", "right": "Ana", "conflicting": false}
            ],
            "selected_email_side": "right"
        }"#;

        let snapshot =
            SnapshotImporter::from_reader(data.as_bytes(), SnapshotFormat::Json).expect("json parses");

        assert_eq!(snapshot.fields.len(), 2);
        assert!(snapshot.fields[0].conflicting);
        assert!(!snapshot.fields[1].conflicting);
        assert!(snapshot.tags.is_empty());
        assert_eq!(snapshot.selected_email_side, Some(Side::Right));
    }

    #[test]
    fn picks_format_from_extension() {
        assert_eq!(SnapshotFormat::from_path(Path::new("pair.CSV")), SnapshotFormat::Csv);
        assert_eq!(SnapshotFormat::from_path(Path::new("pair.json")), SnapshotFormat::Json);
        assert!("xml".parse::<SnapshotFormat>().is_err());
    }

    #[test]
    fn malformed_json_is_reported() {
        let error = SnapshotImporter::from_reader("{".as_bytes(), SnapshotFormat::Json)
            .expect_err("invalid json");
        assert!(matches!(error, SnapshotImportError::Json(_)));
    }
}
