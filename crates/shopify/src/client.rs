//! Remote operations used by the reconciliation engine.

use stocksync_core::Sku;

use crate::error::ShopifyError;
use crate::retry::{RetryPolicy, with_retry};
use crate::transport::Transport;
use crate::update::{UpdateOutcome, UpdateRequest, build_update_mutation, parse_update_results};
use crate::variant::{InventoryVariant, build_variant_query, parse_variants};

/// Shopify client: variant resolution and bulk corrections over an
/// injectable transport, each call wrapped in the retry policy.
pub struct ShopifyClient<T> {
    transport: T,
    location_id: String,
    retry: RetryPolicy,
}

impl<T: Transport> ShopifyClient<T> {
    pub fn new(transport: T, location_id: impl Into<String>) -> Self {
        Self {
            transport,
            location_id: location_id.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    /// Resolve a batch of SKUs to inventory-bearing variants.
    ///
    /// `Ok(vec![])` means the platform has no match for any SKU in the
    /// batch; `Err` means the call failed even after retries.
    pub async fn resolve_variants(
        &self,
        skus: &[Sku],
    ) -> Result<Vec<InventoryVariant>, ShopifyError> {
        if skus.is_empty() {
            return Ok(Vec::new());
        }
        let document = build_variant_query(skus, &self.location_id);
        tracing::debug!(skus = skus.len(), "resolving variants");
        let data = with_retry(&self.retry, "productVariants", || {
            self.transport.execute(&document)
        })
        .await?;
        let variants = parse_variants(&data)?;
        tracing::debug!(
            skus = skus.len(),
            variants = variants.len(),
            "variant resolution complete"
        );
        Ok(variants)
    }

    /// Apply all pending corrections in one batched mutation.
    ///
    /// Returns one outcome per request, positionally. `Err` means the whole
    /// call failed after retries; field-level errors come back as
    /// [`UpdateOutcome::Failed`] entries.
    pub async fn apply_updates(
        &self,
        updates: &[UpdateRequest],
    ) -> Result<Vec<UpdateOutcome>, ShopifyError> {
        if updates.is_empty() {
            return Ok(Vec::new());
        }
        let document = build_update_mutation(updates);
        tracing::debug!(updates = updates.len(), "submitting bulk correction");
        let data = with_retry(&self.retry, "inventorySetOnHandQuantities", || {
            self.transport.execute(&document)
        })
        .await?;
        Ok(parse_update_results(&data, updates.len()))
    }
}
