//! In-app notification models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An in-app notification, owned by a single user. Append-only; the only
/// mutation after creation is marking it read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Kind of event a notification describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    StockTransfer,
    StockRequest,
    Order,
    Account,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::StockTransfer => "stock_transfer",
            NotificationType::StockRequest => "stock_request",
            NotificationType::Order => "order",
            NotificationType::Account => "account",
            NotificationType::System => "system",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock_transfer" => Ok(NotificationType::StockTransfer),
            "stock_request" => Ok(NotificationType::StockRequest),
            "order" => Ok(NotificationType::Order),
            "account" => Ok(NotificationType::Account),
            "system" => Ok(NotificationType::System),
            other => Err(format!("Unknown notification type: {}", other)),
        }
    }
}
