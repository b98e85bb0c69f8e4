//! Stock request models
//!
//! A stock request is a dealer-initiated ask for a vendor to take over
//! inventory. Accepting it runs the transfer engine; rejecting it only
//! records the decision. Both outcomes are terminal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dealer-to-vendor stock request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRequest {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub dealer_id: Uuid,
    pub dealer_name: String,
    pub items: Vec<RequestLine>,
    pub total_items: i32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a stock request. Value object, stored as JSONB on the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLine {
    pub name: String,
    pub quantity: Decimal,
    /// Reference to the dealer's inventory item. Name lookup is the
    /// deprecated fallback when this is absent.
    pub source_item_id: Option<Uuid>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub unit: Option<String>,
}

/// Status of a stock request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Accepted and rejected are terminal; no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Accepted | RequestStatus::Rejected)
    }

    /// Valid transitions: pending -> accepted, pending -> rejected.
    pub fn can_transition_to(&self, target: RequestStatus) -> bool {
        matches!(
            (self, target),
            (RequestStatus::Pending, RequestStatus::Accepted)
                | (RequestStatus::Pending, RequestStatus::Rejected)
        )
    }
}

/// What a vendor's accept/reject attempt should do, decided before any
/// storage is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    /// Pending request, addressed to the caller: apply the decision.
    Apply,
    /// The target status is already recorded; return the request unchanged.
    AlreadyApplied,
    /// The request reached the opposite terminal status.
    Superseded,
    /// The caller is not the vendor the request is addressed to.
    NotVendor,
    /// Pending is not a decision.
    InvalidTarget,
}

/// Decide how to handle a vendor's accept/reject attempt. Ownership is
/// checked before state, so a non-owner learns nothing about the request.
pub fn authorize_request_decision(
    caller: Uuid,
    vendor_id: Uuid,
    current: RequestStatus,
    target: RequestStatus,
) -> RequestDecision {
    if target == RequestStatus::Pending {
        return RequestDecision::InvalidTarget;
    }
    if caller != vendor_id {
        return RequestDecision::NotVendor;
    }
    if current.can_transition_to(target) {
        return RequestDecision::Apply;
    }
    if current == target {
        return RequestDecision::AlreadyApplied;
    }
    RequestDecision::Superseded
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(format!("Unknown request status: {}", other)),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_transitions_to_both_terminals() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Accepted));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
    }

    #[test]
    fn terminal_states_do_not_transition() {
        for terminal in [RequestStatus::Accepted, RequestStatus::Rejected] {
            assert!(terminal.is_terminal());
            for target in [
                RequestStatus::Pending,
                RequestStatus::Accepted,
                RequestStatus::Rejected,
            ] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn pending_is_not_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    }
}
