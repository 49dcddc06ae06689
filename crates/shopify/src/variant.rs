//! Variant resolution: batch SKU lookup against `productVariants`.

use serde::Serialize;
use serde_json::Value;

use stocksync_core::Sku;

use crate::error::ShopifyError;
use crate::gid;

/// An inventory-bearing variant matched to a snapshot SKU.
///
/// Read-only reference data for the run. A SKU may resolve to zero, one, or
/// many of these; multi-product overlap is reportable, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryVariant {
    pub variant_id: String,
    pub sku: Sku,
    pub product_id: String,
    pub product_title: String,
    pub product_handle: String,
    /// Parent product is archived; writes to its inventory are inert.
    pub archived: bool,
    pub inventory_item_id: String,
    /// On-hand quantity at the configured location.
    pub available: i64,
    /// Committed/reserved quantity at the configured location.
    pub committed: i64,
}

/// Build one disjunctive lookup covering the whole batch.
///
/// The `first: 250` page bound together with the batch-size cap keeps a
/// full-fan-out batch within a single page.
pub fn build_variant_query(skus: &[Sku], location_id: &str) -> String {
    let disjunction = skus
        .iter()
        .map(|sku| format!("sku:{}", sku.as_str().replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!(
        r#"{{
  productVariants(first: 250, query: "{disjunction}") {{
    edges {{
      node {{
        id
        sku
        product {{
          id
          title
          handle
          status
        }}
        inventoryItem {{
          id
          inventoryLevels(first: 1, query: "location_id:{location_id}") {{
            edges {{
              node {{
                quantities(names: ["available", "committed"]) {{
                  name
                  quantity
                }}
              }}
            }}
          }}
        }}
      }}
    }}
  }}
}}"#,
        disjunction = disjunction,
        location_id = gid::numeric_id(location_id),
    )
}

fn str_field<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}

/// Quantity of `name` at the first (location-filtered) inventory level.
///
/// A variant with no level at the target location reads as zero; the policy
/// layer then treats it like any other mismatch.
fn level_quantity(node: &Value, name: &str) -> i64 {
    node.pointer("/inventoryItem/inventoryLevels/edges/0/node/quantities")
        .and_then(Value::as_array)
        .and_then(|quantities| {
            quantities.iter().find(|q| {
                q.get("name").and_then(Value::as_str) == Some(name)
            })
        })
        .and_then(|q| q.get("quantity").and_then(Value::as_i64))
        .unwrap_or(0)
}

/// Parse the `productVariants` response payload.
///
/// An empty edge list is a valid "no match" result, distinct from a failed
/// call (which surfaces as `Err` out of the transport/retry layer).
pub fn parse_variants(data: &Value) -> Result<Vec<InventoryVariant>, ShopifyError> {
    let edges = data
        .pointer("/productVariants/edges")
        .and_then(Value::as_array)
        .ok_or_else(|| ShopifyError::parse("missing productVariants.edges"))?;

    let mut variants = Vec::with_capacity(edges.len());
    for edge in edges {
        let node = match edge.get("node") {
            Some(node) => node,
            None => continue,
        };

        let sku = str_field(node, "/sku");
        if sku.is_empty() {
            // Variants without a SKU cannot be joined to the snapshot.
            tracing::debug!(
                variant = str_field(node, "/id"),
                "ignoring variant without SKU"
            );
            continue;
        }

        variants.push(InventoryVariant {
            variant_id: gid::numeric_id(str_field(node, "/id")).to_string(),
            sku: Sku::new(sku),
            product_id: gid::numeric_id(str_field(node, "/product/id")).to_string(),
            product_title: str_field(node, "/product/title").to_string(),
            product_handle: str_field(node, "/product/handle").to_string(),
            archived: str_field(node, "/product/status") == "ARCHIVED",
            inventory_item_id: gid::numeric_id(str_field(node, "/inventoryItem/id"))
                .to_string(),
            available: level_quantity(node, "available"),
            committed: level_quantity(node, "committed"),
        });
    }

    Ok(variants)
}
