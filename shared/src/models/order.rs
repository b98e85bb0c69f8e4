//! Customer order models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer order against a vendor's inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vendor_id: Uuid,
    pub items: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order, stored as JSONB on the order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Compute the order total from its lines
pub fn order_total(lines: &[OrderLine]) -> Decimal {
    lines.iter().map(OrderLine::line_total).sum()
}

/// Status of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Accepted,
    Rejected,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Completed => "completed",
        }
    }

    /// Valid transitions: placed -> accepted | rejected, accepted -> completed.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Placed, OrderStatus::Accepted)
                | (OrderStatus::Placed, OrderStatus::Rejected)
                | (OrderStatus::Accepted, OrderStatus::Completed)
        )
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placed" => Ok(OrderStatus::Placed),
            "accepted" => Ok(OrderStatus::Accepted),
            "rejected" => Ok(OrderStatus::Rejected),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(format!("Unknown order status: {}", other)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(v: f64) -> Decimal {
        Decimal::from_f64(v).unwrap()
    }

    #[test]
    fn order_total_sums_line_totals() {
        let lines = vec![
            OrderLine {
                item_id: Uuid::nil(),
                name: "Rice".into(),
                quantity: dec(2.0),
                unit_price: dec(55.0),
            },
            OrderLine {
                item_id: Uuid::nil(),
                name: "Sugar".into(),
                quantity: dec(1.5),
                unit_price: dec(40.0),
            },
        ];
        assert_eq!(order_total(&lines), dec(170.0));
    }

    #[test]
    fn placed_orders_can_be_accepted_or_rejected() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Accepted));
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Rejected));
        assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn only_accepted_orders_complete() {
        assert!(OrderStatus::Accepted.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Rejected.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Accepted));
    }
}
