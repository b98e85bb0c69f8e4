//! Stock request lifecycle tests
//!
//! Tests for the request state machine, the accept/reject decision check,
//! and line validation:
//! - Pending is the only non-terminal state
//! - Terminal states never transition again
//! - Re-applying a recorded decision is a no-op, the opposite decision is
//!   refused, and only the addressed vendor may decide at all
//! - Request lines are validated before a request is stored

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{
    authorize_request_decision, RequestDecision, RequestLine, RequestStatus,
};
use shared::validation::validate_request_lines;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
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

fn status_strategy() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        Just(RequestStatus::Pending),
        Just(RequestStatus::Accepted),
        Just(RequestStatus::Rejected),
    ]
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Terminal states admit no transition at all
    #[test]
    fn test_terminal_states_are_frozen(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        if from.is_terminal() {
            prop_assert!(!from.can_transition_to(to));
        }
    }

    /// Pending transitions only into a terminal state
    #[test]
    fn test_pending_transitions_are_terminal(
        to in status_strategy(),
    ) {
        if RequestStatus::Pending.can_transition_to(to) {
            prop_assert!(to.is_terminal());
        }
    }

    /// Status strings round-trip through parse
    #[test]
    fn test_status_string_round_trip(status in status_strategy()) {
        let parsed: RequestStatus = status.as_str().parse().unwrap();
        prop_assert_eq!(parsed, status);
    }
}

// ============================================================================
// Unit Tests: State Machine
// ============================================================================

#[test]
fn test_pending_is_the_only_open_state() {
    assert!(!RequestStatus::Pending.is_terminal());
    assert!(RequestStatus::Accepted.is_terminal());
    assert!(RequestStatus::Rejected.is_terminal());
}

#[test]
fn test_valid_transitions() {
    assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Accepted));
    assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
    assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    assert!(!RequestStatus::Accepted.can_transition_to(RequestStatus::Rejected));
    assert!(!RequestStatus::Rejected.can_transition_to(RequestStatus::Accepted));
}

// ============================================================================
// Unit Tests: Accept/Reject Decision Check
// ============================================================================

#[test]
fn test_pending_request_accepts_either_decision() {
    let vendor = Uuid::new_v4();
    for target in [RequestStatus::Accepted, RequestStatus::Rejected] {
        assert_eq!(
            authorize_request_decision(vendor, vendor, RequestStatus::Pending, target),
            RequestDecision::Apply
        );
    }
}

#[test]
fn test_repeating_a_recorded_decision_is_a_no_op() {
    let vendor = Uuid::new_v4();
    for terminal in [RequestStatus::Accepted, RequestStatus::Rejected] {
        assert_eq!(
            authorize_request_decision(vendor, vendor, terminal, terminal),
            RequestDecision::AlreadyApplied
        );
    }
}

#[test]
fn test_decided_request_refuses_the_opposite_decision() {
    let vendor = Uuid::new_v4();
    assert_eq!(
        authorize_request_decision(
            vendor,
            vendor,
            RequestStatus::Accepted,
            RequestStatus::Rejected
        ),
        RequestDecision::Superseded
    );
    assert_eq!(
        authorize_request_decision(
            vendor,
            vendor,
            RequestStatus::Rejected,
            RequestStatus::Accepted
        ),
        RequestDecision::Superseded
    );
}

#[test]
fn test_only_the_addressed_vendor_may_decide() {
    let vendor = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    // Ownership is checked before state: a non-owner is refused whether the
    // request is still open or already decided
    for current in [
        RequestStatus::Pending,
        RequestStatus::Accepted,
        RequestStatus::Rejected,
    ] {
        for target in [RequestStatus::Accepted, RequestStatus::Rejected] {
            assert_eq!(
                authorize_request_decision(intruder, vendor, current, target),
                RequestDecision::NotVendor
            );
        }
    }
}

#[test]
fn test_pending_is_never_a_decision_target() {
    let vendor = Uuid::new_v4();
    for current in [
        RequestStatus::Pending,
        RequestStatus::Accepted,
        RequestStatus::Rejected,
    ] {
        assert_eq!(
            authorize_request_decision(vendor, vendor, current, RequestStatus::Pending),
            RequestDecision::InvalidTarget
        );
    }
}

proptest! {
    /// Whatever the state, only the Apply outcome can run the transfer, and
    /// it only comes out of a pending request owned by the caller
    #[test]
    fn test_apply_requires_pending_and_ownership(
        current in status_strategy(),
        target in status_strategy(),
        same_caller in any::<bool>(),
    ) {
        let vendor = Uuid::new_v4();
        let caller = if same_caller { vendor } else { Uuid::new_v4() };
        let decision = authorize_request_decision(caller, vendor, current, target);
        if decision == RequestDecision::Apply {
            prop_assert_eq!(current, RequestStatus::Pending);
            prop_assert_eq!(caller, vendor);
            prop_assert!(target.is_terminal());
        }
    }
}

// ============================================================================
// Unit Tests: Line Validation
// ============================================================================

#[test]
fn test_empty_request_is_rejected() {
    assert!(validate_request_lines(&[]).is_err());
}

#[test]
fn test_zero_quantity_line_is_rejected() {
    let lines = vec![line("rice", dec("0"))];
    assert!(validate_request_lines(&lines).is_err());
}

#[test]
fn test_negative_quantity_line_is_rejected() {
    let lines = vec![line("rice", dec("-1"))];
    assert!(validate_request_lines(&lines).is_err());
}

#[test]
fn test_blank_name_line_is_rejected() {
    let lines = vec![line("   ", dec("2"))];
    assert!(validate_request_lines(&lines).is_err());
}

#[test]
fn test_well_formed_lines_pass() {
    let lines = vec![line("rice", dec("2.5")), line("sugar", dec("1"))];
    assert!(validate_request_lines(&lines).is_ok());
}
