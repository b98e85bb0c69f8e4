//! Inventory model tests
//!
//! Tests for item key normalization and quantity rules:
//! - Keys are stable under case and surrounding whitespace
//! - Keys are scoped to the owner
//! - Manual quantity validation

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::normalize_item_key;
use shared::validation::{validate_price, validate_quantity};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Case and surrounding whitespace never change the key
    #[test]
    fn test_key_ignores_case_and_padding(
        name in "[A-Za-z0-9 ]{1,30}",
        left_pad in 0usize..4,
        right_pad in 0usize..4,
    ) {
        let owner = Uuid::new_v4();
        let padded = format!("{}{}{}", " ".repeat(left_pad), name, " ".repeat(right_pad));

        prop_assert_eq!(
            normalize_item_key(owner, &padded),
            normalize_item_key(owner, name.trim().to_uppercase().as_str())
        );
    }

    /// The same name under two owners yields two different keys
    #[test]
    fn test_key_is_owner_scoped(name in "[a-z]{1,20}") {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        prop_assert_ne!(normalize_item_key(a, &name), normalize_item_key(b, &name));
    }

    /// The normalized part only ever contains lowercase, digits, and
    /// underscores
    #[test]
    fn test_key_alphabet(name in "\\PC{1,30}") {
        let owner = Uuid::new_v4();
        let key = normalize_item_key(owner, &name);
        let prefix = format!("{}_", owner);
        let suffix = &key[prefix.len()..];

        prop_assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_key_replaces_special_characters() {
    let owner = Uuid::nil();
    assert_eq!(
        normalize_item_key(owner, "Rice & Beans"),
        format!("{}_rice___beans", owner)
    );
}

#[test]
fn test_key_keeps_digits() {
    let owner = Uuid::nil();
    assert_eq!(
        normalize_item_key(owner, "Rice 5kg"),
        format!("{}_rice_5kg", owner)
    );
}

#[test]
fn test_quantity_must_be_positive() {
    assert!(validate_quantity(dec("0.001")).is_ok());
    assert!(validate_quantity(dec("0")).is_err());
    assert!(validate_quantity(dec("-3")).is_err());
}

#[test]
fn test_price_must_not_be_negative() {
    assert!(validate_price(dec("0")).is_ok());
    assert!(validate_price(dec("19.99")).is_ok());
    assert!(validate_price(dec("-0.01")).is_err());
}
