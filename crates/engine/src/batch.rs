//! SKU batching.

use stocksync_core::Sku;

/// Split the SKU universe into contiguous chunks of at most `size`.
///
/// Order is preserved; batches run in input-file order, no reordering or
/// priority. Pacing between batches is the run loop's concern.
pub fn batches(skus: &[Sku], size: usize) -> impl Iterator<Item = &[Sku]> {
    skus.chunks(size.max(1))
}
