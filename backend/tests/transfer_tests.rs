//! Stock transfer engine tests
//!
//! Property-based and unit tests for the transfer plan builder:
//! - Conservation: dealer debits always equal vendor credits
//! - New vendor items are seeded with the right fallbacks
//! - Unresolvable dealer items abort the whole plan

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{
    build_transfer_plan, ItemSnapshot, LineSnapshot, RequestLine, TransferOp,
    DEFAULT_TRANSFER_CATEGORY,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn snapshot(name: &str, quantity: Decimal, price: Decimal) -> ItemSnapshot {
    ItemSnapshot {
        id: Uuid::new_v4(),
        name: name.to_string(),
        quantity,
        price,
        description: None,
        unit: Some("kg".to_string()),
        category: Some("Grains".to_string()),
        image_url: None,
    }
}

fn line(name: &str, quantity: Decimal) -> RequestLine {
    RequestLine {
        name: name.to_string(),
        quantity,
        source_item_id: None,
        price: None,
        image_url: None,
        unit: None,
    }
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Positive quantities with up to three decimal places
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..=1_000_000u64).prop_map(|n| Decimal::new(n as i64, 3))
}

/// Item names from a small alphabet so duplicates stay plausible
fn item_name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{3,12}( [a-z]{3,8})?"
}

/// A request line backed by a dealer item, sometimes with a vendor item too
fn snapshot_strategy() -> impl Strategy<Value = LineSnapshot> {
    (
        item_name_strategy(),
        quantity_strategy(),
        quantity_strategy(),
        any::<bool>(),
    )
        .prop_map(|(name, quantity, dealer_stock, vendor_has_item)| {
            let dealer_item = snapshot(&name, dealer_stock, dec("42.00"));
            let vendor_item = vendor_has_item.then(|| snapshot(&name, dec("5"), dec("50.00")));
            LineSnapshot {
                line: line(&name, quantity),
                dealer_item: Some(dealer_item),
                vendor_item,
            }
        })
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Conservation: the sum of dealer debits equals the sum of vendor
    /// credits, whatever mix of existing and new vendor items the plan has.
    #[test]
    fn test_plan_conserves_quantity(
        snapshots in prop::collection::vec(snapshot_strategy(), 1..10),
    ) {
        let plan = build_transfer_plan(Uuid::new_v4(), &snapshots).unwrap();

        prop_assert_eq!(plan.dealer_debit_total(), plan.vendor_credit_total());
        prop_assert_eq!(plan.dealer_debit_total(), plan.total_quantity);
    }

    /// Every line yields exactly one debit and exactly one credit-side op
    #[test]
    fn test_plan_op_count(
        snapshots in prop::collection::vec(snapshot_strategy(), 1..10),
    ) {
        let plan = build_transfer_plan(Uuid::new_v4(), &snapshots).unwrap();

        let debits = plan.ops.iter().filter(|op| matches!(op, TransferOp::DebitDealer { .. })).count();
        let credits = plan.ops.iter().filter(|op| !matches!(op, TransferOp::DebitDealer { .. })).count();

        prop_assert_eq!(debits, snapshots.len());
        prop_assert_eq!(credits, snapshots.len());
    }

    /// Debits never depend on dealer stock level: overdraft is the
    /// engine's problem, not the planner's
    #[test]
    fn test_debit_ignores_dealer_stock(
        quantity in quantity_strategy(),
        dealer_stock in quantity_strategy(),
    ) {
        let snapshots = vec![LineSnapshot {
            line: line("rice", quantity),
            dealer_item: Some(snapshot("rice", dealer_stock, dec("30.00"))),
            vendor_item: None,
        }];

        let plan = build_transfer_plan(Uuid::new_v4(), &snapshots).unwrap();
        prop_assert_eq!(plan.dealer_debit_total(), quantity);
    }
}

// ============================================================================
// Unit Tests: Plan Construction
// ============================================================================

#[test]
fn test_existing_vendor_item_gets_credit_not_insert() {
    let vendor_item = snapshot("rice", dec("5"), dec("60.00"));
    let vendor_item_id = vendor_item.id;
    let snapshots = vec![LineSnapshot {
        line: line("rice", dec("3")),
        dealer_item: Some(snapshot("rice", dec("10"), dec("55.00"))),
        vendor_item: Some(vendor_item),
    }];

    let plan = build_transfer_plan(Uuid::new_v4(), &snapshots).unwrap();

    assert!(plan.ops.iter().any(|op| matches!(
        op,
        TransferOp::CreditVendor { item_id, quantity } if *item_id == vendor_item_id && *quantity == dec("3")
    )));
    assert!(!plan
        .ops
        .iter()
        .any(|op| matches!(op, TransferOp::CreateVendorItem { .. })));
}

#[test]
fn test_missing_vendor_item_gets_insert() {
    let snapshots = vec![LineSnapshot {
        line: line("sugar", dec("2")),
        dealer_item: Some(snapshot("sugar", dec("20"), dec("40.00"))),
        vendor_item: None,
    }];

    let plan = build_transfer_plan(Uuid::new_v4(), &snapshots).unwrap();

    let created = plan
        .ops
        .iter()
        .find_map(|op| match op {
            TransferOp::CreateVendorItem { item } => Some(item),
            _ => None,
        })
        .expect("plan should create the vendor item");

    assert_eq!(created.name, "sugar");
    assert_eq!(created.quantity, dec("2"));
    // Seeded from the dealer item when the line has no price
    assert_eq!(created.price, dec("40.00"));
    assert_eq!(created.unit.as_deref(), Some("kg"));
    assert_eq!(created.category, "Grains");
}

#[test]
fn test_new_item_category_defaults_to_returns() {
    let mut dealer_item = snapshot("mystery", dec("9"), dec("10.00"));
    dealer_item.category = None;

    let snapshots = vec![LineSnapshot {
        line: line("mystery", dec("1")),
        dealer_item: Some(dealer_item),
        vendor_item: None,
    }];

    let plan = build_transfer_plan(Uuid::new_v4(), &snapshots).unwrap();
    let created = plan
        .ops
        .iter()
        .find_map(|op| match op {
            TransferOp::CreateVendorItem { item } => Some(item),
            _ => None,
        })
        .expect("plan should create the vendor item");

    assert_eq!(created.category, DEFAULT_TRANSFER_CATEGORY);
}

#[test]
fn test_line_price_overrides_dealer_price() {
    let mut request_line = line("beans", dec("4"));
    request_line.price = Some(dec("99.99"));

    let snapshots = vec![LineSnapshot {
        line: request_line,
        dealer_item: Some(snapshot("beans", dec("50"), dec("20.00"))),
        vendor_item: None,
    }];

    let plan = build_transfer_plan(Uuid::new_v4(), &snapshots).unwrap();
    let created = plan
        .ops
        .iter()
        .find_map(|op| match op {
            TransferOp::CreateVendorItem { item } => Some(item),
            _ => None,
        })
        .expect("plan should create the vendor item");

    assert_eq!(created.price, dec("99.99"));
}

#[test]
fn test_unresolvable_dealer_item_fails_whole_plan() {
    let snapshots = vec![
        LineSnapshot {
            line: line("rice", dec("3")),
            dealer_item: Some(snapshot("rice", dec("10"), dec("55.00"))),
            vendor_item: None,
        },
        LineSnapshot {
            line: line("ghost", dec("1")),
            dealer_item: None,
            vendor_item: None,
        },
    ];

    // One bad line poisons the plan; nothing partial comes back
    assert!(build_transfer_plan(Uuid::new_v4(), &snapshots).is_err());
}

#[test]
fn test_new_vendor_item_key_uses_vendor_id() {
    let vendor_id = Uuid::new_v4();
    let snapshots = vec![LineSnapshot {
        line: line("Brown Rice", dec("2")),
        dealer_item: Some(snapshot("Brown Rice", dec("8"), dec("35.00"))),
        vendor_item: None,
    }];

    let plan = build_transfer_plan(vendor_id, &snapshots).unwrap();
    let created = plan
        .ops
        .iter()
        .find_map(|op| match op {
            TransferOp::CreateVendorItem { item } => Some(item),
            _ => None,
        })
        .expect("plan should create the vendor item");

    assert_eq!(created.item_key, format!("{}_brown_rice", vendor_id));
}
