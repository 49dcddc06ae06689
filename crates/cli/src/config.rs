//! Environment-based configuration assembly.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use stocksync_core::{ConfigError, RunConfig};
use stocksync_shopify::{RetryPolicy, ShopifyConfig};
use stocksync_snapshot::SnapshotColumns;

/// Everything a run needs, assembled once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub shopify: ShopifyConfig,
    pub run: RunConfig,
    pub retry: RetryPolicy,
    pub snapshot_path: PathBuf,
    pub columns: SnapshotColumns,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (injectable for tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_domain = required(&lookup, "SHOPIFY_STORE_URL")?;
        let access_token = required(&lookup, "SHOPIFY_ACCESS_TOKEN")?;
        let location_id = required(&lookup, "TARGET_LOCATION_ID")?;

        let mut shopify = ShopifyConfig::new(store_domain, access_token, location_id);
        if let Some(version) = lookup("SHOPIFY_API_VERSION") {
            shopify = shopify.with_api_version(version);
        }

        let run = RunConfig::default()
            .with_batch_size(parsed(&lookup, "STOCKSYNC_BATCH_SIZE", 35)?)
            .with_batch_pause(Duration::from_secs(parsed(
                &lookup,
                "STOCKSYNC_BATCH_PAUSE_SECS",
                5,
            )?));
        run.validate()?;

        let retry = RetryPolicy {
            max_attempts: parsed(&lookup, "STOCKSYNC_RETRY_ATTEMPTS", 5)?,
            base_delay: Duration::from_secs(parsed(
                &lookup,
                "STOCKSYNC_RETRY_BASE_SECS",
                4,
            )?),
            max_delay: Duration::from_secs(parsed(&lookup, "STOCKSYNC_RETRY_MAX_SECS", 60)?),
        };

        let snapshot_path = lookup("STOCKSYNC_CSV")
            .unwrap_or_else(|| "latest_stock.csv".to_string())
            .into();

        Ok(Self {
            shopify,
            run,
            retry,
            snapshot_path,
            columns: SnapshotColumns::default(),
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::missing(key))
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid(format!("{key}: {e}"))),
        None => Ok(default),
    }
}
