//! Bulk on-hand quantity corrections.
//!
//! One mutation document per batch, not one call per SKU: each correction is
//! a positionally-aliased `inventorySetOnHandQuantities` sub-mutation so the
//! response demultiplexes back to its originating decision by index.

use serde::Serialize;
use serde_json::Value;

use crate::gid;

/// A single pending correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    pub inventory_item_id: String,
    pub location_id: String,
    pub quantity: i64,
}

impl UpdateRequest {
    /// Shopify inventory counts are integral; fractional candidates are
    /// rounding artifacts from the export and are normalized here.
    pub fn new(
        inventory_item_id: impl Into<String>,
        location_id: impl Into<String>,
        quantity: f64,
    ) -> Self {
        Self {
            inventory_item_id: inventory_item_id.into(),
            location_id: location_id.into(),
            quantity: quantity.round() as i64,
        }
    }
}

/// Per-correction result, demultiplexed by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// Field-level `userErrors` payload from the API.
    Failed(String),
}

/// Alias for the sub-mutation at `index`.
fn alias(index: usize) -> String {
    format!("set{index}")
}

/// Build the batched mutation document.
pub fn build_update_mutation(updates: &[UpdateRequest]) -> String {
    let mut body = String::new();
    for (index, update) in updates.iter().enumerate() {
        body.push_str(&format!(
            r#"
  {alias}: inventorySetOnHandQuantities(input: {{
    setQuantities: [
      {{
        inventoryItemId: "{item}",
        locationId: "{location}",
        quantity: {quantity}
      }}
    ],
    reason: "correction"
  }}) {{
    inventoryAdjustmentGroup {{
      id
    }}
    userErrors {{
      field
      message
    }}
  }}
"#,
            alias = alias(index),
            item = gid::inventory_item_gid(&update.inventory_item_id),
            location = gid::location_gid(&update.location_id),
            quantity = update.quantity,
        ));
    }
    format!("mutation {{{body}}}")
}

/// Demultiplex the mutation response back to input positions.
pub fn parse_update_results(data: &Value, count: usize) -> Vec<UpdateOutcome> {
    (0..count)
        .map(|index| {
            let result = match data.get(alias(index)) {
                Some(result) if !result.is_null() => result,
                _ => return UpdateOutcome::Failed("missing sub-mutation result".to_string()),
            };
            match result.get("userErrors").and_then(Value::as_array) {
                Some(errors) if !errors.is_empty() => {
                    UpdateOutcome::Failed(Value::Array(errors.clone()).to_string())
                }
                _ => UpdateOutcome::Updated,
            }
        })
        .collect()
}
