//! The sequential run loop.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use stocksync_core::{RunConfig, RunId, Sku};
use stocksync_shopify::{InventoryVariant, ShopifyClient, Transport, UpdateOutcome, UpdateRequest};
use stocksync_snapshot::{Snapshot, SnapshotLoad, StockRecord};

use crate::batch::batches;
use crate::policy::{Action, decide};
use crate::report::{ResultRecord, RunReport, annotate_multi_variants};

/// Execute one reconciliation run over the snapshot.
///
/// Batches are processed strictly in file order. A failed batch is reported
/// and the loop continues; `cancel` is honored between batches only, so no
/// batch is ever left half-applied by this engine.
pub async fn run<T: Transport>(
    load: &SnapshotLoad,
    client: &ShopifyClient<T>,
    config: &RunConfig,
    cancel: &AtomicBool,
) -> RunReport {
    let run_id = RunId::new();
    let started_at = Utc::now();
    let snapshot = &load.snapshot;

    tracing::info!(
        %run_id,
        skus = snapshot.len(),
        batch_size = config.batch_size,
        "starting reconciliation run"
    );

    let mut records = Vec::new();
    let mut cancelled = false;

    for (index, batch) in batches(snapshot.skus(), config.batch_size).enumerate() {
        if cancel.load(Ordering::SeqCst) {
            tracing::warn!(%run_id, completed_batches = index, "run cancelled between batches");
            cancelled = true;
            break;
        }
        if index > 0 {
            tokio::time::sleep(config.batch_pause).await;
        }

        tracing::info!(%run_id, batch = index + 1, size = batch.len(), "processing batch");
        records.extend(process_batch(snapshot, client, batch).await);
    }

    let report = RunReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        cancelled,
        dropped_rows: load.dropped.len(),
        records,
    };

    let summary = report.summary();
    tracing::info!(
        %run_id,
        total = summary.total,
        updated = summary.updated,
        skipped = summary.skipped,
        errors = summary.errors,
        multi_variant = summary.multi_variant,
        "run complete"
    );

    report
}

/// Resolve → decide → apply for one batch. Never fails: every failure mode
/// lands in the returned records.
async fn process_batch<T: Transport>(
    snapshot: &Snapshot,
    client: &ShopifyClient<T>,
    batch: &[Sku],
) -> Vec<ResultRecord> {
    let variants = match client.resolve_variants(batch).await {
        Ok(variants) => variants,
        Err(e) => {
            tracing::error!(error = %e, skus = batch.len(), "variant resolution failed for batch");
            return batch
                .iter()
                .filter_map(|sku| {
                    snapshot.get(sku).map(|stock| {
                        ResultRecord::batch_failed(
                            sku.clone(),
                            stock,
                            format!("variant resolution failed: {e}"),
                        )
                    })
                })
                .collect();
        }
    };

    let mut records = Vec::new();
    let mut updates: Vec<UpdateRequest> = Vec::new();
    let mut pending: Vec<(&StockRecord, &InventoryVariant, f64)> = Vec::new();
    let mut found: HashSet<&Sku> = HashSet::new();

    for variant in &variants {
        found.insert(&variant.sku);
        let Some(stock) = snapshot.get(&variant.sku) else {
            // The disjunctive query can echo variants outside this batch.
            tracing::debug!(sku = %variant.sku, "resolved variant has no snapshot row");
            continue;
        };
        match decide(stock, variant) {
            Action::Skip {
                reason,
                new_available,
            } => {
                records.push(ResultRecord::skipped(stock, variant, reason, new_available));
            }
            Action::Update { new_available } => {
                updates.push(UpdateRequest::new(
                    &variant.inventory_item_id,
                    client.location_id(),
                    new_available,
                ));
                pending.push((stock, variant, new_available));
            }
        }
    }

    for sku in batch {
        if !found.contains(sku) {
            if let Some(stock) = snapshot.get(sku) {
                records.push(ResultRecord::not_found(sku.clone(), stock));
            }
        }
    }

    if !updates.is_empty() {
        match client.apply_updates(&updates).await {
            Ok(outcomes) => {
                for ((stock, variant, new_available), outcome) in
                    pending.iter().zip(outcomes)
                {
                    records.push(match outcome {
                        UpdateOutcome::Updated => {
                            ResultRecord::updated(stock, variant, *new_available)
                        }
                        UpdateOutcome::Failed(message) => {
                            ResultRecord::update_failed(stock, variant, *new_available, message)
                        }
                    });
                }
            }
            Err(e) => {
                tracing::error!(error = %e, updates = updates.len(), "bulk update failed for batch");
                for (stock, variant, new_available) in &pending {
                    records.push(ResultRecord::update_failed(
                        stock,
                        variant,
                        *new_available,
                        format!("bulk update failed: {e}"),
                    ));
                }
            }
        }
    }

    annotate_multi_variants(&mut records, &variants);
    records
}
