//! Reporting service for summaries and data export
//! Inventory valuation, request history, and a per-user dashboard

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::models::UserRole;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Inventory valuation entry
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct InventoryReportRow {
    pub name: String,
    pub category: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub stock_value: Decimal,
    pub unit: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// One row of request history
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RequestHistoryRow {
    pub request_id: Uuid,
    pub dealer_name: String,
    pub total_items: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dashboard metrics for a vendor or dealer
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub item_count: i64,
    pub total_stock_value: Decimal,
    pub pending_requests: i64,
    pub accepted_requests_30d: i64,
    pub unread_notifications: i64,
}

/// Report filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Current inventory with stock value, highest value first
    pub async fn inventory_report(&self, owner_id: Uuid) -> AppResult<Vec<InventoryReportRow>> {
        let rows = sqlx::query_as::<_, InventoryReportRow>(
            r#"
            SELECT
                name,
                category,
                quantity,
                price,
                quantity * price as stock_value,
                unit,
                updated_at
            FROM inventory_items
            WHERE owner_id = $1
            ORDER BY stock_value DESC, name
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Stock request history for either party, filtered by date range
    pub async fn request_history(
        &self,
        user_id: Uuid,
        role: UserRole,
        filter: &ReportFilter,
    ) -> AppResult<Vec<RequestHistoryRow>> {
        let start = filter
            .start_date
            .unwrap_or(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        let end = filter
            .end_date
            .unwrap_or(NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());

        let column = match role {
            UserRole::Dealer => "dealer_id",
            _ => "vendor_id",
        };

        let query = format!(
            r#"
            SELECT
                id as request_id,
                dealer_name,
                total_items,
                status,
                created_at,
                updated_at
            FROM stock_requests
            WHERE {} = $1
              AND created_at::date BETWEEN $2 AND $3
            ORDER BY created_at DESC
            "#,
            column
        );

        let rows = sqlx::query_as::<_, RequestHistoryRow>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Get dashboard metrics
    pub async fn dashboard_metrics(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> AppResult<DashboardMetrics> {
        let inventory: (i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(quantity * price), 0) FROM inventory_items WHERE owner_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        let party_column = match role {
            UserRole::Dealer => "dealer_id",
            _ => "vendor_id",
        };

        let pending_requests: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM stock_requests WHERE {} = $1 AND status = 'pending'",
            party_column
        ))
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        let accepted_30d: i64 = sqlx::query_scalar(&format!(
            r#"
            SELECT COUNT(*) FROM stock_requests
            WHERE {} = $1
              AND status = 'accepted'
              AND updated_at >= NOW() - INTERVAL '30 days'
            "#,
            party_column
        ))
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        let unread: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            item_count: inventory.0,
            total_stock_value: inventory.1,
            pending_requests,
            accepted_requests_30d: accepted_30d,
            unread_notifications: unread,
        })
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
