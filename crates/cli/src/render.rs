//! Report rendering over structured logs.

use stocksync_engine::{RecordStatus, ResultRecord, RunReport};

/// Emit the categorized report: summary, then per-category detail, then the
/// multi-variant warnings.
pub fn emit(report: &RunReport) {
    let summary = report.summary();
    tracing::info!(
        run_id = %report.run_id,
        total = summary.total,
        updated = summary.updated,
        skipped = summary.skipped,
        errors = summary.errors,
        multi_variant = summary.multi_variant,
        dropped_rows = summary.dropped_rows,
        cancelled = report.cancelled,
        "update summary"
    );

    for record in report.updated() {
        tracing::info!(
            sku = %record.sku,
            product = record.product_title.as_deref().unwrap_or("-"),
            csv_stock = record.csv_stock,
            csv_available = record.csv_available,
            shopify_available = record.shopify_available,
            new_available = record.new_available,
            "updated"
        );
    }

    for record in report.skipped() {
        tracing::info!(
            sku = %record.sku,
            product = record.product_title.as_deref().unwrap_or("-"),
            reason = status_detail(record),
            csv_stock = record.csv_stock,
            csv_available = record.csv_available,
            shopify_available = record.shopify_available,
            "skipped"
        );
    }

    for record in report.errors() {
        tracing::warn!(
            sku = %record.sku,
            product = record.product_title.as_deref().unwrap_or("-"),
            error = status_detail(record),
            csv_stock = record.csv_stock,
            csv_available = record.csv_available,
            "error"
        );
    }

    for record in report.multi_variant() {
        tracing::warn!(
            sku = %record.sku,
            variant_count = record.variant_count,
            products = ?record.sibling_titles,
            "SKU appears in multiple products"
        );
    }
}

fn status_detail(record: &ResultRecord) -> String {
    match &record.status {
        RecordStatus::Updated => "updated".to_string(),
        RecordStatus::Skipped(reason) => reason.message().to_string(),
        RecordStatus::Error(message) => message.clone(),
    }
}
