//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub role: UserRole,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Display name of the shop, set for vendors and dealers
    pub shop_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub approval_status: ApprovalStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Role of a user account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Vendor,
    Dealer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Vendor => "vendor",
            UserRole::Dealer => "dealer",
            UserRole::Admin => "admin",
        }
    }

    /// Vendors and dealers must be approved by an admin before they can
    /// use the platform; customers are active immediately.
    pub fn requires_approval(&self) -> bool {
        matches!(self, UserRole::Vendor | UserRole::Dealer)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "vendor" => Ok(UserRole::Vendor),
            "dealer" => Ok(UserRole::Dealer),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin approval state for vendor and dealer accounts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(format!("Unknown approval status: {}", other)),
        }
    }
}

/// Whether an account in the given state may log in
pub fn can_login(role: UserRole, approval_status: ApprovalStatus, is_active: bool) -> bool {
    if !is_active {
        return false;
    }
    if role.requires_approval() {
        approval_status == ApprovalStatus::Approved
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customers_log_in_without_approval() {
        assert!(can_login(
            UserRole::Customer,
            ApprovalStatus::Pending,
            true
        ));
    }

    #[test]
    fn pending_vendors_cannot_log_in() {
        assert!(!can_login(UserRole::Vendor, ApprovalStatus::Pending, true));
        assert!(!can_login(UserRole::Dealer, ApprovalStatus::Rejected, true));
        assert!(can_login(UserRole::Vendor, ApprovalStatus::Approved, true));
    }

    #[test]
    fn inactive_accounts_cannot_log_in() {
        assert!(!can_login(
            UserRole::Admin,
            ApprovalStatus::Approved,
            false
        ));
    }
}
