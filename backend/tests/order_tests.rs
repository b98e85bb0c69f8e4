//! Customer order tests
//!
//! Tests for order totals and the order state machine:
//! - Totals are the sum of line totals
//! - Orders move placed -> accepted | rejected, accepted -> completed

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{order_total, OrderLine, OrderStatus};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Property Test Strategies
// ============================================================================

fn money_strategy() -> impl Strategy<Value = Decimal> {
    (0u64..=1_000_000u64).prop_map(|n| Decimal::new(n as i64, 2))
}

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..=10_000u64).prop_map(|n| Decimal::new(n as i64, 2))
}

fn line_strategy() -> impl Strategy<Value = OrderLine> {
    (quantity_strategy(), money_strategy()).prop_map(|(quantity, unit_price)| OrderLine {
        item_id: Uuid::new_v4(),
        name: "item".to_string(),
        quantity,
        unit_price,
    })
}

fn status_strategy() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Placed),
        Just(OrderStatus::Accepted),
        Just(OrderStatus::Rejected),
        Just(OrderStatus::Completed),
    ]
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// The order total equals the sum of per-line totals
    #[test]
    fn test_total_is_sum_of_lines(lines in prop::collection::vec(line_strategy(), 0..8)) {
        let expected: Decimal = lines.iter().map(|l| l.quantity * l.unit_price).sum();
        prop_assert_eq!(order_total(&lines), expected);
    }

    /// Appending a line never decreases the total
    #[test]
    fn test_total_is_monotone(
        lines in prop::collection::vec(line_strategy(), 0..8),
        extra in line_strategy(),
    ) {
        let base = order_total(&lines);
        let mut extended = lines;
        extended.push(extra);
        prop_assert!(order_total(&extended) >= base);
    }

    /// Rejected and completed orders never transition again
    #[test]
    fn test_terminal_order_states(to in status_strategy()) {
        prop_assert!(!OrderStatus::Rejected.can_transition_to(to));
        prop_assert!(!OrderStatus::Completed.can_transition_to(to));
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_line_total() {
    let line = OrderLine {
        item_id: Uuid::nil(),
        name: "Rice".to_string(),
        quantity: dec("2.5"),
        unit_price: dec("40.00"),
    };
    assert_eq!(line.line_total(), dec("100.00"));
}

#[test]
fn test_empty_order_totals_zero() {
    assert_eq!(order_total(&[]), Decimal::ZERO);
}

#[test]
fn test_order_lifecycle() {
    assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Accepted));
    assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Rejected));
    assert!(OrderStatus::Accepted.can_transition_to(OrderStatus::Completed));
    assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Completed));
    assert!(!OrderStatus::Accepted.can_transition_to(OrderStatus::Rejected));
}
