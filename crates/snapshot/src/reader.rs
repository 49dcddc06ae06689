//! CSV reading for the exported snapshot.
//!
//! The snapshot provider hands us an already-downloaded CSV file, decoded to
//! UTF-8. Only a missing/empty/headerless file is fatal; individual record
//! errors are dropped rows like any other.

use thiserror::Error;

use crate::normalize::{RawRow, Snapshot, SnapshotColumns, SnapshotLoad};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Fatal snapshot ingestion failure (the run cannot proceed).
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot file is empty")]
    Empty,

    #[error("failed to read snapshot headers: {0}")]
    Headers(String),

    #[error("snapshot is missing required column {0:?}")]
    MissingColumn(String),
}

fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}

/// Read name-keyed rows from raw CSV bytes.
///
/// Record-level CSV errors are logged and skipped; they surface later as
/// dropped rows only if the caller counts them, the run itself continues.
pub fn read_rows(data: &[u8]) -> Result<Vec<RawRow>, SnapshotError> {
    let data = strip_utf8_bom(data);
    if data.is_empty() {
        return Err(SnapshotError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SnapshotError::Headers(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // Header occupies line 1; first data row is line 2.
                tracing::warn!(line = idx + 2, error = %e, "skipping malformed CSV record");
                continue;
            }
        };
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Load and normalize a snapshot from raw CSV bytes in one step.
pub fn load_snapshot(
    data: &[u8],
    columns: &SnapshotColumns,
) -> Result<SnapshotLoad, SnapshotError> {
    let rows = read_rows(data)?;

    if let Some(first) = rows.first() {
        for required in columns.required() {
            if !first.contains_key(required) {
                return Err(SnapshotError::MissingColumn(required.to_string()));
            }
        }
    }

    Ok(Snapshot::from_rows(rows, columns))
}
