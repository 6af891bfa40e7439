//! Pure stock arithmetic and validation helpers
//!
//! Keeping the ledger math here lets the movement semantics be verified
//! without a database connection.

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

/// Recompute the weighted-average unit cost after an inbound movement.
///
/// `(old_avg * old_qty + unit_cost * qty) / max(old_qty + qty, 1)`, rounded to
/// two decimal places. The `max(.., 1)` divisor guard keeps the formula defined
/// when the ledger row was driven negative under an allow-negatives policy.
pub fn weighted_average_cost(
    old_average: Decimal,
    old_quantity: Decimal,
    unit_cost: Decimal,
    quantity: Decimal,
) -> Decimal {
    let new_quantity = old_quantity + quantity;
    let divisor = new_quantity.max(Decimal::ONE);
    ((old_average * old_quantity + unit_cost * quantity) / divisor)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Quantity available for new orders: on-hand minus reservations, clamped at 0
pub fn available_quantity(stock_on_hand: Decimal, reserved_quantity: Decimal) -> Decimal {
    (stock_on_hand - reserved_quantity).max(Decimal::ZERO)
}

/// Whether an outbound of `requested` units may proceed against `stock_on_hand`
pub fn can_fulfill(stock_on_hand: Decimal, requested: Decimal, allow_negatives: bool) -> bool {
    allow_negatives || stock_on_hand >= requested
}

/// Validate a movement or return quantity
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate transfer endpoints are two distinct warehouses
pub fn validate_transfer_endpoints(from: Uuid, to: Uuid) -> Result<(), &'static str> {
    if from == to {
        return Err("Source and destination warehouses must differ");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn weighted_average_blends_old_and_new_cost() {
        // 10 units at 5.00 into an empty row
        assert_eq!(
            weighted_average_cost(Decimal::ZERO, Decimal::ZERO, dec("5"), dec("10")),
            dec("5.00")
        );
        // 100 @ 20 then 50 @ 30 -> 3500 / 150 = 23.33
        assert_eq!(
            weighted_average_cost(dec("20"), dec("100"), dec("30"), dec("50")),
            dec("23.33")
        );
    }

    #[test]
    fn weighted_average_without_cost_change_is_stable() {
        assert_eq!(
            weighted_average_cost(dec("7.50"), dec("40"), dec("7.50"), dec("60")),
            dec("7.50")
        );
    }

    #[test]
    fn weighted_average_divisor_guard_on_negative_stock() {
        // old_qty = -5, inbound 3 -> new_qty = -2, divisor clamps to 1
        let avg = weighted_average_cost(dec("10"), dec("-5"), dec("10"), dec("3"));
        assert_eq!(avg, dec("-20.00"));
    }

    #[test]
    fn available_quantity_clamps_at_zero() {
        assert_eq!(available_quantity(dec("10"), dec("4")), dec("6"));
        assert_eq!(available_quantity(dec("3"), dec("8")), Decimal::ZERO);
    }

    #[test]
    fn can_fulfill_respects_policy_gate() {
        assert!(can_fulfill(dec("5"), dec("5"), false));
        assert!(!can_fulfill(dec("3"), dec("5"), false));
        assert!(can_fulfill(dec("3"), dec("5"), true));
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(dec("0.5")).is_ok());
        assert!(validate_quantity(Decimal::ZERO).is_err());
        assert!(validate_quantity(dec("-1")).is_err());
    }

    #[test]
    fn transfer_endpoints_must_differ() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(validate_transfer_endpoints(a, b).is_ok());
        assert!(validate_transfer_endpoints(a, a).is_err());
    }
}
