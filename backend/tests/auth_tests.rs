//! Authentication and account gating tests
//!
//! Tests for registration validation and login gating:
//! - Vendors and dealers need admin approval before login
//! - Customers and admins skip approval
//! - Credential format validation

use proptest::prelude::*;

use shared::models::{can_login, ApprovalStatus, UserRole};
use shared::validation::{validate_email, validate_password, validate_phone};

// ============================================================================
// Property Test Strategies
// ============================================================================

fn role_strategy() -> impl Strategy<Value = UserRole> {
    prop_oneof![
        Just(UserRole::Customer),
        Just(UserRole::Vendor),
        Just(UserRole::Dealer),
        Just(UserRole::Admin),
    ]
}

fn approval_strategy() -> impl Strategy<Value = ApprovalStatus> {
    prop_oneof![
        Just(ApprovalStatus::Pending),
        Just(ApprovalStatus::Approved),
        Just(ApprovalStatus::Rejected),
    ]
}

/// Generate valid email addresses
fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{5,10}@[a-z]{3,8}\\.(com|org|net)"
}

/// Generate valid passwords (8+ chars)
fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{8,20}"
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Nobody logs in on a deactivated account, whatever the role or
    /// approval state
    #[test]
    fn test_inactive_accounts_never_login(
        role in role_strategy(),
        approval in approval_strategy(),
    ) {
        prop_assert!(!can_login(role, approval, false));
    }

    /// Approval only ever gates the roles that require it
    #[test]
    fn test_approval_gates_only_vendors_and_dealers(
        role in role_strategy(),
        approval in approval_strategy(),
    ) {
        let allowed = can_login(role, approval, true);
        if role.requires_approval() {
            prop_assert_eq!(allowed, approval == ApprovalStatus::Approved);
        } else {
            prop_assert!(allowed);
        }
    }

    /// Generated emails and passwords pass validation
    #[test]
    fn test_credential_format(
        email in email_strategy(),
        password in password_strategy(),
    ) {
        prop_assert!(validate_email(&email).is_ok());
        prop_assert!(validate_password(&password).is_ok());
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_roles_that_require_approval() {
    assert!(UserRole::Vendor.requires_approval());
    assert!(UserRole::Dealer.requires_approval());
    assert!(!UserRole::Customer.requires_approval());
    assert!(!UserRole::Admin.requires_approval());
}

#[test]
fn test_pending_vendor_cannot_login() {
    assert!(!can_login(UserRole::Vendor, ApprovalStatus::Pending, true));
    assert!(!can_login(UserRole::Dealer, ApprovalStatus::Rejected, true));
    assert!(can_login(UserRole::Vendor, ApprovalStatus::Approved, true));
}

#[test]
fn test_customer_logs_in_regardless_of_approval() {
    assert!(can_login(UserRole::Customer, ApprovalStatus::Pending, true));
    assert!(can_login(UserRole::Customer, ApprovalStatus::Approved, true));
}

#[test]
fn test_password_length_floor() {
    assert!(validate_password("short").is_err());
    assert!(validate_password("longenough").is_ok());
}

#[test]
fn test_email_shape() {
    assert!(validate_email("user@example.com").is_ok());
    assert!(validate_email("not-an-email").is_err());
    assert!(validate_email("").is_err());
}

#[test]
fn test_phone_shape() {
    assert!(validate_phone("0812345678").is_ok());
    assert!(validate_phone("+66812345678").is_ok());
    assert!(validate_phone("123").is_err());
    assert!(validate_phone("not a phone").is_err());
}
