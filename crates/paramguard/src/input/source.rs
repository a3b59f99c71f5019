//! Telemetry snapshots and their provenance.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ParamguardError, Result};
use crate::value::Value;

/// Metadata about the file a snapshot was loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Telemetry captured for one app version over one date range.
///
/// Stored column-major; column order follows the source header. A
/// snapshot is never modified after construction.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    columns: IndexMap<String, Vec<Value>>,
    row_count: usize,
    source: Option<SourceMetadata>,
}

impl Snapshot {
    /// Build a snapshot from named columns.
    ///
    /// Every column must hold the same number of values. A repeated column
    /// name keeps its first occurrence.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut map: IndexMap<String, Vec<Value>> = IndexMap::new();
        let mut row_count: Option<usize> = None;

        for (position, (name, values)) in columns.into_iter().enumerate() {
            let name = name.into();
            match row_count {
                None => row_count = Some(values.len()),
                Some(expected) if expected != values.len() => {
                    return Err(ParamguardError::Parse {
                        row: values.len(),
                        column: position,
                        message: format!(
                            "column '{}' has {} values, expected {}",
                            name,
                            values.len(),
                            expected
                        ),
                    });
                }
                Some(_) => {}
            }
            map.entry(name).or_insert(values);
        }

        Ok(Self {
            columns: map,
            row_count: row_count.unwrap_or(0),
            source: None,
        })
    }

    /// Build a snapshot from row-major string cells, as read from a file.
    pub(crate) fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut columns: IndexMap<String, Vec<Value>> = IndexMap::with_capacity(headers.len());
        for (index, header) in headers.into_iter().enumerate() {
            let values = rows
                .iter()
                .map(|row| row.get(index).map(|s| Value::from_cell(s)).unwrap_or_default())
                .collect();
            columns.entry(header).or_insert(values);
        }

        Self {
            columns,
            row_count: rows.len(),
            source: None,
        }
    }

    /// Attach provenance metadata.
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    /// Provenance metadata, when loaded from a file.
    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Column names in source order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Iterate over `(name, values)` pairs in source order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
