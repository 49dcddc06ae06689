//! `stocksync-shopify` — Shopify Admin GraphQL client for inventory
//! reconciliation.
//!
//! Provides the two remote operations the engine needs: resolving a batch of
//! SKUs to inventory-bearing variants, and applying a batched on-hand
//! quantity correction. Both are wrapped in bounded exponential-backoff
//! retries and run over an injectable [`Transport`], so tests never touch the
//! network.

pub mod client;
pub mod config;
pub mod error;
pub mod gid;
pub mod retry;
pub mod testing;
pub mod transport;
pub mod update;
pub mod variant;

pub use client::ShopifyClient;
pub use config::ShopifyConfig;
pub use error::ShopifyError;
pub use retry::{RetryPolicy, with_retry};
pub use transport::{HttpTransport, Transport};
pub use update::{UpdateOutcome, UpdateRequest};
pub use variant::InventoryVariant;
