//! Stock request service
//!
//! Dealers create stock requests against vendors; the owning vendor accepts
//! or rejects them. Acceptance runs the transfer engine: one database
//! transaction that reads everything first, claims the request status with a
//! compare-and-swap, then applies the inventory writes and the dealer
//! notification. Any failure inside the transaction rolls the whole thing
//! back and surfaces as one opaque error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::NotificationService;
use shared::models::{
    authorize_request_decision, build_transfer_plan, ItemSnapshot, LineSnapshot, NotificationType,
    RequestDecision, RequestLine, RequestStatus, StockRequest, TransferOp, UserRole,
};
use shared::validation::validate_request_lines;

/// Stock request service
#[derive(Clone)]
pub struct StockRequestService {
    db: PgPool,
}

/// Input for creating a stock request
#[derive(Debug, serde::Deserialize)]
pub struct CreateStockRequestInput {
    pub vendor_id: Uuid,
    pub items: Vec<RequestLine>,
}

/// Database row for a stock request
#[derive(Debug, sqlx::FromRow)]
struct StockRequestRow {
    id: Uuid,
    vendor_id: Uuid,
    dealer_id: Uuid,
    dealer_name: String,
    items: serde_json::Value,
    total_items: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StockRequestRow> for StockRequest {
    type Error = AppError;

    fn try_from(row: StockRequestRow) -> Result<Self, Self::Error> {
        let items: Vec<RequestLine> = serde_json::from_value(row.items)
            .map_err(|e| AppError::Internal(format!("Corrupt request lines: {}", e)))?;
        let status: RequestStatus = row
            .status
            .parse()
            .map_err(|e: String| AppError::Internal(e))?;
        Ok(StockRequest {
            id: row.id,
            vendor_id: row.vendor_id,
            dealer_id: row.dealer_id,
            dealer_name: row.dealer_name,
            items,
            total_items: row.total_items,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Inventory row shape used by the read phase
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    quantity: Decimal,
    price: Decimal,
    description: Option<String>,
    unit: Option<String>,
    category: String,
    image_url: Option<String>,
}

impl From<ItemRow> for ItemSnapshot {
    fn from(row: ItemRow) -> Self {
        ItemSnapshot {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            price: row.price,
            description: row.description,
            unit: row.unit,
            category: Some(row.category),
            image_url: row.image_url,
        }
    }
}

/// Outcome of the transactional transfer body
enum TransferOutcome {
    Applied,
    /// The status compare-and-swap hit zero rows: a concurrent caller
    /// finished first and this transaction was rolled back.
    LostRace,
}

const REQUEST_COLUMNS: &str =
    "id, vendor_id, dealer_id, dealer_name, items, total_items, status, created_at, updated_at";

impl StockRequestService {
    /// Create a new StockRequestService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a stock request (dealer side)
    pub async fn create_request(
        &self,
        dealer_id: Uuid,
        input: CreateStockRequestInput,
    ) -> AppResult<StockRequest> {
        validate_request_lines(&input.items).map_err(|msg| AppError::Validation {
            field: "items".to_string(),
            message: msg.to_string(),
        })?;

        // Target must be an approved vendor
        let vendor = sqlx::query_as::<_, (String, Option<String>)>(
            "SELECT name, shop_name FROM users WHERE id = $1 AND role = 'vendor' AND approval_status = 'approved'",
        )
        .bind(input.vendor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor".to_string()))?;

        let dealer_name = sqlx::query_scalar::<_, String>(
            "SELECT COALESCE(shop_name, name) FROM users WHERE id = $1 AND role = 'dealer'",
        )
        .bind(dealer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Dealer".to_string()))?;

        let items_json = serde_json::to_value(&input.items)
            .map_err(|e| AppError::Internal(format!("Failed to encode request lines: {}", e)))?;

        let row = sqlx::query_as::<_, StockRequestRow>(&format!(
            r#"
            INSERT INTO stock_requests (vendor_id, dealer_id, dealer_name, items, total_items, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(input.vendor_id)
        .bind(dealer_id)
        .bind(&dealer_name)
        .bind(&items_json)
        .bind(input.items.len() as i32)
        .fetch_one(&self.db)
        .await?;

        let request: StockRequest = row.try_into()?;

        // Tell the vendor a request is waiting; fire-and-forget semantics,
        // the request itself is already committed.
        let vendor_label = vendor.1.unwrap_or(vendor.0);
        let notifications = NotificationService::new(self.db.clone());
        if let Err(e) = notifications
            .create(
                request.vendor_id,
                "New stock request",
                &format!(
                    "{} sent you a stock request with {} item(s)",
                    request.dealer_name, request.total_items
                ),
                NotificationType::StockRequest,
            )
            .await
        {
            tracing::warn!(vendor = %vendor_label, "Failed to notify vendor of new request: {}", e);
        }

        Ok(request)
    }

    /// List requests the caller is a party to
    pub async fn list_for_user(&self, user_id: Uuid, role: UserRole) -> AppResult<Vec<StockRequest>> {
        let column = match role {
            UserRole::Vendor => "vendor_id",
            UserRole::Dealer => "dealer_id",
            _ => return Err(AppError::InsufficientPermissions),
        };

        let rows = sqlx::query_as::<_, StockRequestRow>(&format!(
            "SELECT {} FROM stock_requests WHERE {} = $1 ORDER BY created_at DESC",
            REQUEST_COLUMNS, column
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(StockRequest::try_from).collect()
    }

    /// Get a single request; only the vendor or dealer on it may see it
    pub async fn get_request(&self, caller: Uuid, request_id: Uuid) -> AppResult<StockRequest> {
        let request = self.fetch_request(request_id).await?;
        if request.vendor_id != caller && request.dealer_id != caller {
            return Err(AppError::InsufficientPermissions);
        }
        Ok(request)
    }

    /// Accept or reject a stock request (vendor side). Accepting runs the
    /// stock transfer; rejecting only records the decision. Re-applying the
    /// same terminal status is an idempotent no-op.
    pub async fn update_request_status(
        &self,
        caller: Uuid,
        request_id: Uuid,
        target: RequestStatus,
    ) -> AppResult<StockRequest> {
        let request = self.fetch_request(request_id).await?;

        match authorize_request_decision(caller, request.vendor_id, request.status, target) {
            RequestDecision::Apply => match target {
                RequestStatus::Accepted => self.accept_request(request).await,
                RequestStatus::Rejected => self.reject_request(request).await,
                RequestStatus::Pending => unreachable!("pending is never Apply"),
            },
            // Idempotent: the decision is already recorded, never re-run
            // the transfer
            RequestDecision::AlreadyApplied => Ok(request),
            RequestDecision::Superseded => Err(AppError::InvalidStateTransition(format!(
                "Request is already {}",
                request.status
            ))),
            RequestDecision::NotVendor => Err(AppError::InsufficientPermissions),
            RequestDecision::InvalidTarget => Err(AppError::Validation {
                field: "status".to_string(),
                message: "Status must be 'accepted' or 'rejected'".to_string(),
            }),
        }
    }

    /// Reject: compare-and-swap on the status, no inventory touched
    async fn reject_request(&self, request: StockRequest) -> AppResult<StockRequest> {
        let updated = sqlx::query(
            "UPDATE stock_requests SET status = 'rejected', updated_at = NOW() WHERE id = $1 AND status = 'pending'",
        )
        .bind(request.id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return self.resolve_lost_race(request.id, RequestStatus::Rejected).await;
        }

        let notifications = NotificationService::new(self.db.clone());
        if let Err(e) = notifications
            .create(
                request.dealer_id,
                "Stock request rejected",
                &format!(
                    "Your stock request with {} item(s) was rejected by the vendor",
                    request.total_items
                ),
                NotificationType::StockRequest,
            )
            .await
        {
            tracing::warn!(request_id = %request.id, "Failed to notify dealer of rejection: {}", e);
        }

        self.fetch_request(request.id).await
    }

    /// Accept: run the transfer transaction and map every failure inside it
    /// to the single opaque transfer error
    async fn accept_request(&self, request: StockRequest) -> AppResult<StockRequest> {
        match self.run_transfer(&request).await {
            Ok(TransferOutcome::Applied) => {
                tracing::info!(
                    request_id = %request.id,
                    vendor_id = %request.vendor_id,
                    dealer_id = %request.dealer_id,
                    "Stock transfer applied"
                );
                self.fetch_request(request.id).await
            }
            Ok(TransferOutcome::LostRace) => {
                self.resolve_lost_race(request.id, RequestStatus::Accepted).await
            }
            Err(AppError::TransferFailed(detail)) => {
                tracing::error!(request_id = %request.id, "Stock transfer failed: {}", detail);
                Err(AppError::TransferFailed(detail))
            }
            Err(AppError::DatabaseError(e)) => {
                tracing::error!(request_id = %request.id, "Stock transfer failed: {}", e);
                Err(AppError::TransferFailed(e.to_string()))
            }
            Err(other) => Err(other),
        }
    }

    /// The transactional transfer body. Reads all items first, then writes:
    /// status CAS, inventory ops, dealer notification. Dropping the
    /// transaction on any error path rolls everything back.
    async fn run_transfer(&self, request: &StockRequest) -> AppResult<TransferOutcome> {
        let mut tx = self.db.begin().await?;

        // Phase 1: reads only. The vendor label rides along for the
        // notification text.
        let vendor_label = sqlx::query_scalar::<_, String>(
            "SELECT COALESCE(shop_name, name) FROM users WHERE id = $1",
        )
        .bind(request.vendor_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut snapshots = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let dealer_item = self
                .resolve_dealer_item(&mut tx, request.dealer_id, line)
                .await?;
            let vendor_item =
                Self::read_item_by_name(&mut tx, request.vendor_id, &line.name).await?;
            snapshots.push(LineSnapshot {
                line: line.clone(),
                dealer_item,
                vendor_item,
            });
        }

        let plan = build_transfer_plan(request.vendor_id, &snapshots)
            .map_err(|e| AppError::TransferFailed(e.to_string()))?;

        // Phase 2: writes only. The status CAS goes first so a racing
        // double-accept can claim the request exactly once.
        let claimed = sqlx::query(
            "UPDATE stock_requests SET status = 'accepted', updated_at = NOW() WHERE id = $1 AND status = 'pending'",
        )
        .bind(request.id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            // Roll back the transaction and let the caller re-read
            return Ok(TransferOutcome::LostRace);
        }

        for op in &plan.ops {
            match op {
                TransferOp::DebitDealer { item_id, quantity } => {
                    // No floor: dealer stock is allowed to go negative
                    let touched = sqlx::query(
                        "UPDATE inventory_items SET quantity = quantity - $1, updated_at = NOW() WHERE id = $2",
                    )
                    .bind(quantity)
                    .bind(item_id)
                    .execute(&mut *tx)
                    .await?;
                    Self::ensure_item_touched(touched.rows_affected(), "dealer", *item_id)?;
                }
                TransferOp::CreditVendor { item_id, quantity } => {
                    let touched = sqlx::query(
                        "UPDATE inventory_items SET quantity = quantity + $1, updated_at = NOW() WHERE id = $2",
                    )
                    .bind(quantity)
                    .bind(item_id)
                    .execute(&mut *tx)
                    .await?;
                    Self::ensure_item_touched(touched.rows_affected(), "vendor", *item_id)?;
                }
                TransferOp::CreateVendorItem { item } => {
                    sqlx::query(
                        r#"
                        INSERT INTO inventory_items
                            (owner_id, item_key, name, quantity, price, description, unit, category, image_url)
                        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                        "#,
                    )
                    .bind(request.vendor_id)
                    .bind(&item.item_key)
                    .bind(&item.name)
                    .bind(item.quantity)
                    .bind(item.price)
                    .bind(&item.description)
                    .bind(&item.unit)
                    .bind(&item.category)
                    .bind(&item.image_url)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        // One notification to the dealer, inside the same transaction
        sqlx::query(
            r#"
            INSERT INTO notifications (user_id, title, message, notification_type)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(request.dealer_id)
        .bind("Stock request accepted")
        .bind(format!(
            "{} accepted your stock request: {} item(s), total quantity {} transferred",
            vendor_label, request.total_items, plan.total_quantity
        ))
        .bind(NotificationType::StockTransfer.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(TransferOutcome::Applied)
    }

    /// Resolve the dealer item for a request line: stored reference first,
    /// name match within the dealer's inventory as the deprecated fallback.
    async fn resolve_dealer_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        dealer_id: Uuid,
        line: &RequestLine,
    ) -> AppResult<Option<ItemSnapshot>> {
        if let Some(source_item_id) = line.source_item_id {
            let by_id = sqlx::query_as::<_, ItemRow>(
                "SELECT id, name, quantity, price, description, unit, category, image_url
                 FROM inventory_items WHERE id = $1 AND owner_id = $2",
            )
            .bind(source_item_id)
            .bind(dealer_id)
            .fetch_optional(&mut **tx)
            .await?;

            if let Some(row) = by_id {
                return Ok(Some(row.into()));
            }
        }

        let by_name = Self::read_item_by_name(tx, dealer_id, &line.name).await?;
        if by_name.is_some() {
            tracing::warn!(
                dealer_id = %dealer_id,
                item = %line.name,
                "Dealer item resolved by name fallback; request lines should carry source_item_id"
            );
        }
        Ok(by_name)
    }

    /// First item with a matching name in the owner's inventory. Duplicate
    /// names are unresolved by design; the oldest row wins.
    async fn read_item_by_name(
        tx: &mut Transaction<'_, Postgres>,
        owner_id: Uuid,
        name: &str,
    ) -> AppResult<Option<ItemSnapshot>> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, quantity, price, description, unit, category, image_url
             FROM inventory_items
             WHERE owner_id = $1 AND name = $2
             ORDER BY created_at ASC
             LIMIT 1",
        )
        .bind(owner_id)
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(Into::into))
    }

    /// A CAS lost the race. Re-read the request: if the stored status equals
    /// what the caller asked for, report idempotent success; otherwise the
    /// concurrent decision conflicts.
    async fn resolve_lost_race(
        &self,
        request_id: Uuid,
        target: RequestStatus,
    ) -> AppResult<StockRequest> {
        let request = self.fetch_request(request_id).await?;
        if request.status == target {
            Ok(request)
        } else {
            Err(AppError::InvalidStateTransition(format!(
                "Request is already {}",
                request.status
            )))
        }
    }

    async fn fetch_request(&self, request_id: Uuid) -> AppResult<StockRequest> {
        let row = sqlx::query_as::<_, StockRequestRow>(&format!(
            "SELECT {} FROM stock_requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(request_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock request".to_string()))?;

        row.try_into()
    }

    /// An inventory row read in phase 1 may be deleted before the write in
    /// phase 2 lands. A miss would leave the transfer one-sided, so it
    /// aborts the transaction instead.
    fn ensure_item_touched(rows_affected: u64, side: &str, item_id: Uuid) -> AppResult<()> {
        if rows_affected == 1 {
            Ok(())
        } else {
            Err(AppError::TransferFailed(format!(
                "{} item {} disappeared during transfer",
                side, item_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_inventory_row_aborts_the_transfer() {
        let item_id = Uuid::new_v4();
        assert!(StockRequestService::ensure_item_touched(1, "dealer", item_id).is_ok());
        let err = StockRequestService::ensure_item_touched(0, "vendor", item_id).unwrap_err();
        assert!(matches!(err, AppError::TransferFailed(_)));
    }
}
