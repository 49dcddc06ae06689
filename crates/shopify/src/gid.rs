//! Shopify global ID helpers.
//!
//! The API returns `gid://shopify/<Type>/<id>` values; reports carry the
//! numeric part and mutation inputs need the full form reconstructed.

/// Numeric tail of a GID; values without a `gid://` prefix pass through.
pub fn numeric_id(value: &str) -> &str {
    if value.starts_with("gid://") {
        value.rsplit('/').next().unwrap_or(value)
    } else {
        value
    }
}

/// Full InventoryItem GID from a numeric ID or existing GID.
pub fn inventory_item_gid(value: &str) -> String {
    format!("gid://shopify/InventoryItem/{}", numeric_id(value))
}

/// Full Location GID from a numeric ID or existing GID.
pub fn location_gid(value: &str) -> String {
    format!("gid://shopify/Location/{}", numeric_id(value))
}
