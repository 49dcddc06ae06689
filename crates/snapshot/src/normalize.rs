//! Row normalization: raw export rows → typed stock records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stocksync_core::Sku;

/// One raw row of the export, keyed by column name.
pub type RawRow = HashMap<String, String>;

/// Column names of the warehouse export.
///
/// Defaults match the warehouse system's CSV headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotColumns {
    pub sku: String,
    pub current_stock: String,
    pub expected_arrival: String,
    pub expected_shipment: String,
    pub available_for_sale: String,
}

impl Default for SnapshotColumns {
    fn default() -> Self {
        Self {
            sku: "商品コード".to_string(),
            current_stock: "現在在庫数".to_string(),
            expected_arrival: "入庫予定数".to_string(),
            expected_shipment: "出庫予定数".to_string(),
            available_for_sale: "販売可能数".to_string(),
        }
    }
}

impl SnapshotColumns {
    /// All required column names, for header validation.
    pub fn required(&self) -> [&str; 5] {
        [
            &self.sku,
            &self.current_stock,
            &self.expected_arrival,
            &self.expected_shipment,
            &self.available_for_sale,
        ]
    }
}

/// Typed stock figures for one SKU, as exported by the warehouse system.
///
/// Quantities stay fractional until mutation submission; the export can carry
/// rounding artifacts that are normalized at the write boundary, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub sku: Sku,
    pub current_stock: f64,
    pub expected_arrival: f64,
    pub expected_shipment: f64,
    pub available_for_sale: f64,
}

/// Outcome of normalizing one raw row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Parsed(StockRecord),
    /// The SKU field was blank or absent; the row carries nothing to reconcile.
    BlankSku,
    /// A numeric field failed to parse; the row is dropped from the run.
    ParseFailed { field: String, message: String },
}

/// A dropped row, annotated with its line number (header = line 1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub sku: Option<Sku>,
    pub field: String,
    pub message: String,
}

/// The normalized snapshot: SKU → stock record, plus file-order SKU sequence.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: HashMap<Sku, StockRecord>,
    order: Vec<Sku>,
}

impl Snapshot {
    pub fn get(&self, sku: &Sku) -> Option<&StockRecord> {
        self.records.get(sku)
    }

    /// SKUs in file order (first occurrence), for batch sequencing.
    pub fn skus(&self) -> &[Sku] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Result of normalizing a full export: the snapshot plus dropped rows.
#[derive(Debug, Clone)]
pub struct SnapshotLoad {
    pub snapshot: Snapshot,
    pub dropped: Vec<RowError>,
}

/// Strip thousands separators and whitespace variants (including U+3000
/// full-width spaces) before parsing a locale-formatted numeric field.
fn parse_quantity(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err("empty value".to_string());
    }
    cleaned
        .parse::<f64>()
        .map_err(|e| format!("{e}: {cleaned:?}"))
}

/// Normalize one raw row.
pub fn normalize_row(row: &RawRow, columns: &SnapshotColumns) -> RowOutcome {
    let sku = match row.get(&columns.sku) {
        Some(s) if !s.trim().is_empty() => Sku::new(s.trim()),
        _ => return RowOutcome::BlankSku,
    };

    let mut field = |name: &str| -> Result<f64, RowOutcome> {
        let raw = row.get(name).map(String::as_str).unwrap_or("");
        parse_quantity(raw).map_err(|message| RowOutcome::ParseFailed {
            field: name.to_string(),
            message,
        })
    };

    let current_stock = match field(&columns.current_stock) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };
    let expected_arrival = match field(&columns.expected_arrival) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };
    let expected_shipment = match field(&columns.expected_shipment) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };
    let available_for_sale = match field(&columns.available_for_sale) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };

    RowOutcome::Parsed(StockRecord {
        sku,
        current_stock,
        expected_arrival,
        expected_shipment,
        available_for_sale,
    })
}

impl Snapshot {
    /// Build a snapshot from pre-parsed rows.
    ///
    /// Duplicate SKUs: the last row wins in the record map, while the SKU
    /// keeps its first position in the ordering. Dropped rows are returned
    /// alongside the snapshot and logged here.
    pub fn from_rows<I>(rows: I, columns: &SnapshotColumns) -> SnapshotLoad
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut snapshot = Snapshot::default();
        let mut dropped = Vec::new();

        for (idx, row) in rows.into_iter().enumerate() {
            // Header occupies line 1; first data row is line 2.
            let line = idx + 2;
            match normalize_row(&row, columns) {
                RowOutcome::Parsed(record) => {
                    if snapshot.records.insert(record.sku.clone(), record.clone()).is_none() {
                        snapshot.order.push(record.sku);
                    }
                }
                RowOutcome::BlankSku => {
                    tracing::debug!(line, "skipping row with blank SKU");
                }
                RowOutcome::ParseFailed { field, message } => {
                    let sku = row
                        .get(&columns.sku)
                        .map(|s| Sku::new(s.trim()));
                    tracing::warn!(line, field = %field, error = %message, "dropping unparseable row");
                    dropped.push(RowError {
                        line,
                        sku,
                        field,
                        message,
                    });
                }
            }
        }

        SnapshotLoad { snapshot, dropped }
    }
}
