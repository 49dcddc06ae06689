//! Reconciliation run entry point.
//!
//! Reads the warehouse CSV export, reconciles it against Shopify inventory
//! at the configured location, and emits a categorized report through
//! structured logs. An interrupt stops the run at the next batch boundary;
//! the partial report is still rendered.

mod config;
mod render;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;

use stocksync_shopify::{HttpTransport, ShopifyClient};
use stocksync_snapshot::load_snapshot;

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stocksync_observability::init();

    let config = AppConfig::from_env()?;

    let data = std::fs::read(&config.snapshot_path).with_context(|| {
        format!(
            "failed to read snapshot file {}",
            config.snapshot_path.display()
        )
    })?;
    let load = load_snapshot(&data, &config.columns)?;
    tracing::info!(
        skus = load.snapshot.len(),
        dropped_rows = load.dropped.len(),
        path = %config.snapshot_path.display(),
        "snapshot loaded"
    );

    let transport = HttpTransport::new(&config.shopify)?;
    let client = ShopifyClient::new(
        transport,
        config.shopify.location_numeric_id().to_string(),
    )
    .with_retry_policy(config.retry);

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received; stopping at the next batch boundary");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let report = stocksync_engine::run(&load, &client, &config.run, &cancel).await;
    render::emit(&report);

    Ok(())
}
