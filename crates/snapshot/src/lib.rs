//! `stocksync-snapshot` — warehouse stock snapshot ingestion.
//!
//! Turns the raw tabular export (name-keyed, string-typed, locale-formatted
//! fields) into typed [`StockRecord`]s. Per-row problems never abort the run:
//! blank-SKU and unparseable rows are dropped and reported as explicit
//! outcomes.

pub mod normalize;
pub mod reader;

pub use normalize::{
    RawRow, RowError, RowOutcome, Snapshot, SnapshotColumns, SnapshotLoad, StockRecord,
    normalize_row,
};
pub use reader::{SnapshotError, load_snapshot, read_rows};
