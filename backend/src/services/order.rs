//! Order service
//!
//! Customers place orders against a vendor's catalog; the vendor accepts,
//! rejects, or completes them. Acceptance decrements vendor stock inside a
//! transaction with a floor check, so customer orders can never drive
//! inventory negative.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::NotificationService;
use shared::models::{order_total, NotificationType, Order, OrderLine, OrderStatus};
use shared::validation::validate_quantity;

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// One requested line when placing an order
#[derive(Debug, serde::Deserialize)]
pub struct PlaceOrderLine {
    pub item_id: Uuid,
    pub quantity: Decimal,
}

/// Input for placing an order
#[derive(Debug, serde::Deserialize)]
pub struct PlaceOrderInput {
    pub vendor_id: Uuid,
    pub items: Vec<PlaceOrderLine>,
    pub delivery_address: Option<String>,
    pub note: Option<String>,
}

/// Database row for an order
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Uuid,
    vendor_id: Uuid,
    items: serde_json::Value,
    total_amount: Decimal,
    status: String,
    delivery_address: Option<String>,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderLine> = serde_json::from_value(row.items)
            .map_err(|e| AppError::Internal(format!("Corrupt order lines: {}", e)))?;
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|e: String| AppError::Internal(e))?;
        Ok(Order {
            id: row.id,
            customer_id: row.customer_id,
            vendor_id: row.vendor_id,
            items,
            total_amount: row.total_amount,
            status,
            delivery_address: row.delivery_address,
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, customer_id, vendor_id, items, total_amount, status, delivery_address, note, created_at, updated_at";

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Place an order against an approved vendor. Lines are priced from the
    /// vendor's current catalog at placement time.
    pub async fn place_order(
        &self,
        customer_id: Uuid,
        input: PlaceOrderInput,
    ) -> AppResult<Order> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "An order needs at least one item".to_string(),
            });
        }
        for line in &input.items {
            validate_quantity(line.quantity).map_err(|msg| AppError::Validation {
                field: "items".to_string(),
                message: msg.to_string(),
            })?;
        }

        let vendor_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE id = $1 AND role = 'vendor' AND approval_status = 'approved'",
        )
        .bind(input.vendor_id)
        .fetch_one(&self.db)
        .await?;
        if vendor_exists == 0 {
            return Err(AppError::NotFound("Vendor".to_string()));
        }

        // Snapshot name and price from the vendor catalog into the lines
        let mut lines = Vec::with_capacity(input.items.len());
        for requested in &input.items {
            let row = sqlx::query_as::<_, (String, Decimal, Decimal)>(
                "SELECT name, price, quantity FROM inventory_items WHERE id = $1 AND owner_id = $2",
            )
            .bind(requested.item_id)
            .bind(input.vendor_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

            let (name, price, available) = row;
            if available < requested.quantity {
                return Err(AppError::InsufficientInventory(format!(
                    "'{}' has only {} in stock",
                    name, available
                )));
            }
            lines.push(OrderLine {
                item_id: requested.item_id,
                name,
                quantity: requested.quantity,
                unit_price: price,
            });
        }

        let total = order_total(&lines);
        let items_json = serde_json::to_value(&lines)
            .map_err(|e| AppError::Internal(format!("Failed to encode order lines: {}", e)))?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (customer_id, vendor_id, items, total_amount, status, delivery_address, note)
            VALUES ($1, $2, $3, $4, 'placed', $5, $6)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(customer_id)
        .bind(input.vendor_id)
        .bind(&items_json)
        .bind(total)
        .bind(&input.delivery_address)
        .bind(&input.note)
        .fetch_one(&self.db)
        .await?;

        let order: Order = row.try_into()?;

        let notifications = NotificationService::new(self.db.clone());
        if let Err(e) = notifications
            .create(
                order.vendor_id,
                "New order",
                &format!("You received a new order ({} line(s), total {})", order.items.len(), order.total_amount),
                NotificationType::Order,
            )
            .await
        {
            tracing::warn!(order_id = %order.id, "Failed to notify vendor of new order: {}", e);
        }

        Ok(order)
    }

    /// List orders the caller is a party to
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE customer_id = $1 OR vendor_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Get one order; only its customer or vendor may see it
    pub async fn get_order(&self, caller: Uuid, order_id: Uuid) -> AppResult<Order> {
        let order = self.fetch_order(order_id).await?;
        if order.customer_id != caller && order.vendor_id != caller {
            return Err(AppError::InsufficientPermissions);
        }
        Ok(order)
    }

    /// Move an order through its lifecycle (vendor side). Accepting takes
    /// the stock out of the vendor's inventory atomically.
    pub async fn update_order_status(
        &self,
        caller: Uuid,
        order_id: Uuid,
        target: OrderStatus,
    ) -> AppResult<Order> {
        let order = self.fetch_order(order_id).await?;
        if order.vendor_id != caller {
            return Err(AppError::InsufficientPermissions);
        }

        if order.status == target {
            return Ok(order);
        }
        if !order.status.can_transition_to(target) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot move order from {} to {}",
                order.status, target
            )));
        }

        if target == OrderStatus::Accepted {
            self.accept_order(&order).await?;
        } else {
            let updated = sqlx::query(
                "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3",
            )
            .bind(target.as_str())
            .bind(order.id)
            .bind(order.status.as_str())
            .execute(&self.db)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(AppError::InvalidStateTransition(
                    "Order was updated concurrently".to_string(),
                ));
            }
        }

        let notifications = NotificationService::new(self.db.clone());
        if let Err(e) = notifications
            .create(
                order.customer_id,
                "Order update",
                &format!("Your order is now {}", target),
                NotificationType::Order,
            )
            .await
        {
            tracing::warn!(order_id = %order.id, "Failed to notify customer of order update: {}", e);
        }

        self.fetch_order(order_id).await
    }

    /// Accept in one transaction: claim the status with a compare-and-swap,
    /// then decrement each line with a floor check.
    async fn accept_order(&self, order: &Order) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let claimed = sqlx::query(
            "UPDATE orders SET status = 'accepted', updated_at = NOW() WHERE id = $1 AND status = 'placed'",
        )
        .bind(order.id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            return Err(AppError::InvalidStateTransition(
                "Order was updated concurrently".to_string(),
            ));
        }

        for line in &order.items {
            let updated = sqlx::query(
                r#"
                UPDATE inventory_items
                SET quantity = quantity - $1, updated_at = NOW()
                WHERE id = $2 AND owner_id = $3 AND quantity >= $1
                "#,
            )
            .bind(line.quantity)
            .bind(line.item_id)
            .bind(order.vendor_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Dropping the transaction rolls back earlier decrements
                return Err(AppError::InsufficientInventory(format!(
                    "'{}' no longer has {} in stock",
                    line.name, line.quantity
                )));
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn fetch_order(&self, order_id: Uuid) -> AppResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        row.try_into()
    }
}
