//! Per-SKU result records and the run report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stocksync_core::{RunId, Sku};
use stocksync_shopify::InventoryVariant;
use stocksync_snapshot::StockRecord;

use crate::policy::SkipReason;

/// Final status of one SKU/variant pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum RecordStatus {
    Updated,
    Skipped(SkipReason),
    Error(String),
}

/// One row of the run report.
///
/// Shopify-side fields are `None` when the SKU never resolved to a variant
/// (or the variant was archived before quantities were read).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub sku: Sku,
    pub status: RecordStatus,
    pub csv_stock: f64,
    pub csv_available: f64,
    pub shopify_available: Option<i64>,
    pub shopify_committed: Option<i64>,
    pub new_available: Option<f64>,
    pub product_title: Option<String>,
    pub product_handle: Option<String>,
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    /// SKU-reuse-across-products annotation: set on every record of a SKU
    /// that resolved to more than one variant.
    pub multiple_variants: bool,
    pub variant_count: usize,
    pub sibling_titles: Vec<String>,
}

impl ResultRecord {
    fn base(sku: Sku, stock: &StockRecord, status: RecordStatus) -> Self {
        Self {
            sku,
            status,
            csv_stock: stock.current_stock,
            csv_available: stock.available_for_sale,
            shopify_available: None,
            shopify_committed: None,
            new_available: None,
            product_title: None,
            product_handle: None,
            product_id: None,
            variant_id: None,
            multiple_variants: false,
            variant_count: 1,
            sibling_titles: Vec::new(),
        }
    }

    fn with_variant(mut self, variant: &InventoryVariant) -> Self {
        self.product_title = Some(variant.product_title.clone());
        self.product_handle = Some(variant.product_handle.clone());
        self.product_id = Some(variant.product_id.clone());
        self.variant_id = Some(variant.variant_id.clone());
        self
    }

    fn with_quantities(mut self, variant: &InventoryVariant, new_available: Option<f64>) -> Self {
        self.shopify_available = Some(variant.available);
        self.shopify_committed = Some(variant.committed);
        self.new_available = new_available;
        self
    }

    /// SKU with no matching remote record.
    pub fn not_found(sku: Sku, stock: &StockRecord) -> Self {
        Self::base(
            sku,
            stock,
            RecordStatus::Error("SKU not found in Shopify".to_string()),
        )
    }

    /// Whole-batch failure: resolution or bulk update failed after retries.
    pub fn batch_failed(sku: Sku, stock: &StockRecord, message: impl Into<String>) -> Self {
        Self::base(sku, stock, RecordStatus::Error(message.into()))
    }

    /// Expected business skip (archived, both-zero, already-matches).
    pub fn skipped(
        stock: &StockRecord,
        variant: &InventoryVariant,
        reason: SkipReason,
        new_available: Option<f64>,
    ) -> Self {
        let record = Self::base(variant.sku.clone(), stock, RecordStatus::Skipped(reason));
        if reason == SkipReason::Archived {
            // Quantities are never read for archived products.
            record.with_variant(variant)
        } else {
            record
                .with_variant(variant)
                .with_quantities(variant, new_available)
        }
    }

    /// Successfully applied correction.
    pub fn updated(stock: &StockRecord, variant: &InventoryVariant, new_available: f64) -> Self {
        Self::base(variant.sku.clone(), stock, RecordStatus::Updated)
            .with_variant(variant)
            .with_quantities(variant, Some(new_available))
    }

    /// Field-level mutation error for one correction.
    pub fn update_failed(
        stock: &StockRecord,
        variant: &InventoryVariant,
        new_available: f64,
        message: impl Into<String>,
    ) -> Self {
        Self::base(variant.sku.clone(), stock, RecordStatus::Error(message.into()))
            .with_variant(variant)
            .with_quantities(variant, Some(new_available))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, RecordStatus::Error(_))
    }
}

/// Flag every record of a SKU that resolved to more than one variant.
///
/// All N records get `multiple_variants`, the count, and an identical
/// sibling title list so operators can spot SKU reuse across products.
pub fn annotate_multi_variants(records: &mut [ResultRecord], variants: &[InventoryVariant]) {
    use std::collections::HashMap;

    let mut titles_by_sku: HashMap<&Sku, Vec<String>> = HashMap::new();
    for variant in variants {
        titles_by_sku
            .entry(&variant.sku)
            .or_default()
            .push(variant.product_title.clone());
    }

    for record in records.iter_mut() {
        if let Some(titles) = titles_by_sku.get(&record.sku) {
            if titles.len() > 1 {
                record.multiple_variants = true;
                record.variant_count = titles.len();
                record.sibling_titles = titles.clone();
            }
        }
    }
}

/// Summary counts over a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
    pub multi_variant: usize,
    pub dropped_rows: usize,
}

/// Categorized result of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// The run was cancelled between batches; trailing batches never ran.
    pub cancelled: bool,
    /// Rows dropped during snapshot normalization.
    pub dropped_rows: usize,
    pub records: Vec<ResultRecord>,
}

impl RunReport {
    pub fn updated(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, RecordStatus::Updated))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, RecordStatus::Skipped(_)))
    }

    pub fn errors(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter().filter(|r| r.is_error())
    }

    pub fn multi_variant(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter().filter(|r| r.multiple_variants)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.records.len(),
            updated: self.updated().count(),
            skipped: self.skipped().count(),
            errors: self.errors().count(),
            multi_variant: self.multi_variant().count(),
            dropped_rows: self.dropped_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(sku: &str) -> StockRecord {
        StockRecord {
            sku: Sku::new(sku),
            current_stock: 10.0,
            expected_arrival: 0.0,
            expected_shipment: 0.0,
            available_for_sale: 10.0,
        }
    }

    fn variant(sku: &str, variant_id: &str, title: &str) -> InventoryVariant {
        InventoryVariant {
            variant_id: variant_id.to_string(),
            sku: Sku::new(sku),
            product_id: format!("p-{variant_id}"),
            product_title: title.to_string(),
            product_handle: title.to_lowercase(),
            archived: false,
            inventory_item_id: format!("i-{variant_id}"),
            available: 7,
            committed: 1,
        }
    }

    #[test]
    fn not_found_record_has_no_shopify_fields() {
        let record = ResultRecord::not_found(Sku::new("A-1"), &stock("A-1"));
        assert!(record.is_error());
        assert_eq!(record.shopify_available, None);
        assert_eq!(record.variant_id, None);
        assert_eq!(record.csv_stock, 10.0);
    }

    #[test]
    fn archived_skip_carries_identity_but_no_quantities() {
        let record = ResultRecord::skipped(
            &stock("A-1"),
            &variant("A-1", "1", "Coat"),
            SkipReason::Archived,
            None,
        );
        assert_eq!(record.product_title.as_deref(), Some("Coat"));
        assert_eq!(record.shopify_available, None);
        assert_eq!(record.new_available, None);
    }

    #[test]
    fn updated_record_carries_both_sides() {
        let record = ResultRecord::updated(&stock("A-1"), &variant("A-1", "1", "Coat"), 10.0);
        assert_eq!(record.status, RecordStatus::Updated);
        assert_eq!(record.shopify_available, Some(7));
        assert_eq!(record.shopify_committed, Some(1));
        assert_eq!(record.new_available, Some(10.0));
    }

    #[test]
    fn multi_variant_annotation_flags_all_records_of_the_sku() {
        let variants = vec![
            variant("A-1", "1", "Coat"),
            variant("A-1", "2", "Apron"),
            variant("B-2", "3", "Hat"),
        ];
        let mut records = vec![
            ResultRecord::updated(&stock("A-1"), &variants[0], 10.0),
            ResultRecord::updated(&stock("A-1"), &variants[1], 10.0),
            ResultRecord::updated(&stock("B-2"), &variants[2], 10.0),
        ];
        annotate_multi_variants(&mut records, &variants);

        for record in &records[..2] {
            assert!(record.multiple_variants);
            assert_eq!(record.variant_count, 2);
            assert_eq!(
                record.sibling_titles,
                vec!["Coat".to_string(), "Apron".to_string()]
            );
        }
        assert!(!records[2].multiple_variants);
        assert_eq!(records[2].variant_count, 1);
        assert!(records[2].sibling_titles.is_empty());
    }

    #[test]
    fn summary_counts_partitions() {
        let v = variant("A-1", "1", "Coat");
        let report = RunReport {
            run_id: RunId::new(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            cancelled: false,
            dropped_rows: 2,
            records: vec![
                ResultRecord::updated(&stock("A-1"), &v, 10.0),
                ResultRecord::skipped(&stock("B-2"), &v, SkipReason::AlreadyMatches, Some(7.0)),
                ResultRecord::not_found(Sku::new("C-3"), &stock("C-3")),
            ],
        };
        let summary = report.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.dropped_rows, 2);
    }
}
