//! Container-format detection and parsing
//!
//! One parser per container kind, each turning file bytes into ordered raw
//! records. The archive parser delegates back to the other three for every
//! qualifying zip entry.

mod archive;
mod json;
mod sheet;
mod tabular;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::RawRecord;

/// Container kind a source file was classified into
///
/// `Unknown` is a classification, not an error: detection is a total
/// function over file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Xlsx,
    Json,
    Zip,
    Unknown,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Xlsx => "xlsx",
            FileKind::Json => "json",
            FileKind::Zip => "zip",
            FileKind::Unknown => "unknown",
        }
    }

    /// Parse a stored tag. Total: unrecognized tags map to `Unknown`.
    pub fn from_tag(tag: &str) -> FileKind {
        match tag {
            "csv" => FileKind::Csv,
            "xlsx" => FileKind::Xlsx,
            "json" => FileKind::Json,
            "zip" => FileKind::Zip,
            _ => FileKind::Unknown,
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a file name by its lower-cased extension alone
///
/// No content sniffing: a mislabeled file surfaces later as malformed
/// content from the parser the extension selected.
pub fn detect_file_kind(file_name: &str) -> FileKind {
    let name = file_name.to_lowercase();
    if name.ends_with(".csv") {
        FileKind::Csv
    } else if name.ends_with(".xlsx") || name.ends_with(".xls") {
        FileKind::Xlsx
    } else if name.ends_with(".json") {
        FileKind::Json
    } else if name.ends_with(".zip") {
        FileKind::Zip
    } else {
        FileKind::Unknown
    }
}

/// A source file handed to the pipeline: a name plus its bytes
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }
}

/// Raw records parsed out of one container, or one archive entry
#[derive(Debug, Clone)]
pub struct RawBatch {
    /// Archive entry name when the records came from inside a zip
    pub source_file: Option<String>,
    pub records: Vec<RawRecord>,
}

/// Parse a source file into raw batches according to its detected kind
///
/// Flat containers yield one batch; an archive yields one batch per
/// recognized entry. The `Unknown` classification fails here, before any
/// parser runs.
pub fn parse_source(kind: FileKind, source: &SourceFile) -> Result<Vec<RawBatch>> {
    match kind {
        FileKind::Csv => Ok(vec![RawBatch {
            source_file: None,
            records: tabular::parse(&source.name, &source.bytes)?,
        }]),
        FileKind::Json => Ok(vec![RawBatch {
            source_file: None,
            records: json::parse(&source.name, &source.bytes)?,
        }]),
        FileKind::Xlsx => Ok(vec![RawBatch {
            source_file: None,
            records: sheet::parse(&source.name, &source.bytes)?,
        }]),
        FileKind::Zip => archive::parse(&source.name, &source.bytes),
        FileKind::Unknown => Err(Error::UnsupportedFormat(source.name.clone())),
    }
}
