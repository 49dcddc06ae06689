//! Reconciliation policy.
//!
//! `decide` is the one place that determines the authoritative "available"
//! quantity for a (stock record, variant) pair. It is pure: no I/O, no
//! hidden state, same inputs always give the same decision.

use serde::Serialize;

use stocksync_shopify::InventoryVariant;
use stocksync_snapshot::StockRecord;

/// Business condition that makes a write unnecessary or unsafe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Parent product is archived; writes to its inventory are inert.
    Archived,
    /// Both sides already agree on emptiness.
    BothZero,
    /// Shopify already matches the calculated value.
    AlreadyMatches,
}

impl SkipReason {
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::Archived => "product is archived in Shopify",
            SkipReason::BothZero => "both CSV and Shopify show 0 stock",
            SkipReason::AlreadyMatches => "Shopify already matches calculated value",
        }
    }
}

impl core::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of policy evaluation for one resolved variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Correct Shopify's available quantity to `new_available`.
    Update { new_available: f64 },
    /// No write warranted. `new_available` carries the computed candidate
    /// for reporting; it is `None` only for archived products, where no
    /// candidate is computed at all.
    Skip {
        reason: SkipReason,
        new_available: Option<f64>,
    },
}

impl Action {
    pub fn new_available(&self) -> Option<f64> {
        match self {
            Action::Update { new_available } => Some(*new_available),
            Action::Skip { new_available, .. } => *new_available,
        }
    }
}

/// Candidate "available" quantity from the snapshot figures.
///
/// Equal expected arrival and shipment means no pending movement, so on-hand
/// stock is authoritative; otherwise the export's pre-netted available-for-
/// sale figure is. The candidate is floored at zero; inputs are deliberately
/// not clamped earlier (the both-zero rule below reads the raw figure).
fn candidate(stock: &StockRecord) -> f64 {
    let raw = if stock.expected_arrival == stock.expected_shipment {
        stock.current_stock
    } else {
        stock.available_for_sale
    };
    raw.max(0.0)
}

/// Decide what to do about one (stock record, variant) pair.
pub fn decide(stock: &StockRecord, variant: &InventoryVariant) -> Action {
    if variant.archived {
        return Action::Skip {
            reason: SkipReason::Archived,
            new_available: None,
        };
    }

    let new_available = candidate(stock);

    if stock.available_for_sale <= 0.0 && variant.available == 0 {
        return Action::Skip {
            reason: SkipReason::BothZero,
            new_available: Some(new_available),
        };
    }

    if variant.available as f64 == new_available {
        return Action::Skip {
            reason: SkipReason::AlreadyMatches,
            new_available: Some(new_available),
        };
    }

    Action::Update { new_available }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocksync_core::Sku;

    fn stock(current: f64, arrival: f64, shipment: f64, available: f64) -> StockRecord {
        StockRecord {
            sku: Sku::new("A-1"),
            current_stock: current,
            expected_arrival: arrival,
            expected_shipment: shipment,
            available_for_sale: available,
        }
    }

    fn variant(available: i64, archived: bool) -> InventoryVariant {
        InventoryVariant {
            variant_id: "11".to_string(),
            sku: Sku::new("A-1"),
            product_id: "110".to_string(),
            product_title: "Chef Coat".to_string(),
            product_handle: "chef-coat".to_string(),
            archived,
            inventory_item_id: "1100".to_string(),
            available,
            committed: 0,
        }
    }

    #[test]
    fn no_pending_movement_uses_current_stock() {
        // arrival == shipment, current_stock 10, Shopify 7 → update to 10.
        let action = decide(&stock(10.0, 5.0, 5.0, 10.0), &variant(7, false));
        assert_eq!(action, Action::Update { new_available: 10.0 });
    }

    #[test]
    fn pending_movement_uses_available_for_sale() {
        let action = decide(&stock(10.0, 3.0, 5.0, 8.0), &variant(7, false));
        assert_eq!(action, Action::Update { new_available: 8.0 });
    }

    #[test]
    fn negative_candidate_clamps_to_zero() {
        // available_for_sale = -2, Shopify holds 5 → update to 0, not -2.
        let action = decide(&stock(1.0, 0.0, 3.0, -2.0), &variant(5, false));
        assert_eq!(action, Action::Update { new_available: 0.0 });
    }

    #[test]
    fn negative_current_stock_clamps_to_zero() {
        let action = decide(&stock(-4.0, 2.0, 2.0, 3.0), &variant(5, false));
        assert_eq!(action, Action::Update { new_available: 0.0 });
    }

    #[test]
    fn archived_always_skips_regardless_of_quantities() {
        for (s, v) in [
            (stock(10.0, 5.0, 5.0, 10.0), variant(7, true)),
            (stock(0.0, 0.0, 0.0, 0.0), variant(0, true)),
            (stock(-2.0, 1.0, 3.0, -2.0), variant(99, true)),
        ] {
            assert_eq!(
                decide(&s, &v),
                Action::Skip {
                    reason: SkipReason::Archived,
                    new_available: None
                }
            );
        }
    }

    #[test]
    fn both_zero_skips_even_when_candidate_is_nonzero() {
        // available_for_sale <= 0 and Shopify 0, but candidate comes from
        // current_stock (arrival == shipment) and is nonzero.
        let action = decide(&stock(2.0, 1.0, 1.0, 0.0), &variant(0, false));
        assert_eq!(
            action,
            Action::Skip {
                reason: SkipReason::BothZero,
                new_available: Some(2.0)
            }
        );
    }

    #[test]
    fn negative_available_for_sale_with_zero_shopify_skips_as_both_zero() {
        let action = decide(&stock(1.0, 0.0, 3.0, -2.0), &variant(0, false));
        assert_eq!(
            action,
            Action::Skip {
                reason: SkipReason::BothZero,
                new_available: Some(0.0)
            }
        );
    }

    #[test]
    fn matching_quantities_skip() {
        let action = decide(&stock(7.0, 5.0, 5.0, 7.0), &variant(7, false));
        assert_eq!(
            action,
            Action::Skip {
                reason: SkipReason::AlreadyMatches,
                new_available: Some(7.0)
            }
        );
    }

    #[test]
    fn decide_is_idempotent() {
        let s = stock(12.5, 2.0, 4.0, 9.5);
        let v = variant(3, false);
        assert_eq!(decide(&s, &v), decide(&s, &v));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: with no pending movement the candidate is
            /// current_stock clamped at zero.
            #[test]
            fn no_movement_candidate_is_clamped_current_stock(
                current in -1000.0f64..1000.0,
                movement in -100.0f64..100.0,
                afs in 0.1f64..1000.0,
                shopify in 0i64..1000,
            ) {
                let s = stock(current, movement, movement, afs);
                let v = variant(shopify, false);
                prop_assert_eq!(
                    decide(&s, &v).new_available(),
                    Some(current.max(0.0))
                );
            }

            /// Property: with pending movement the candidate is
            /// available_for_sale clamped at zero.
            #[test]
            fn pending_movement_candidate_is_clamped_afs(
                current in -1000.0f64..1000.0,
                arrival in 0.0f64..100.0,
                afs in 0.1f64..1000.0,
                shopify in 0i64..1000,
            ) {
                let s = stock(current, arrival, arrival + 1.0, afs);
                let v = variant(shopify, false);
                prop_assert_eq!(
                    decide(&s, &v).new_available(),
                    Some(afs.max(0.0))
                );
            }

            /// Property: archived wins over everything.
            #[test]
            fn archived_always_wins(
                current in -1000.0f64..1000.0,
                arrival in -100.0f64..100.0,
                shipment in -100.0f64..100.0,
                afs in -1000.0f64..1000.0,
                shopify in -10i64..1000,
            ) {
                let s = stock(current, arrival, shipment, afs);
                let v = variant(shopify, true);
                prop_assert!(
                    matches!(
                        decide(&s, &v),
                        Action::Skip { reason: SkipReason::Archived, .. }
                    ),
                    "expected Action::Skip with SkipReason::Archived"
                );
            }

            /// Property: decide never proposes a negative quantity.
            #[test]
            fn update_quantity_is_never_negative(
                current in -1000.0f64..1000.0,
                arrival in -100.0f64..100.0,
                shipment in -100.0f64..100.0,
                afs in -1000.0f64..1000.0,
                shopify in 0i64..1000,
            ) {
                let s = stock(current, arrival, shipment, afs);
                let v = variant(shopify, false);
                if let Action::Update { new_available } = decide(&s, &v) {
                    prop_assert!(new_available >= 0.0);
                }
            }
        }
    }
}
