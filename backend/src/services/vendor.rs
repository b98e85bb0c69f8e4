//! Vendor browsing service
//!
//! Public-facing (authenticated) views over approved vendors: directory
//! search by city or name, vendor detail, and the vendor's catalog.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::InventoryItemRow;
use shared::models::InventoryItem;
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

/// Vendor browsing service
#[derive(Clone)]
pub struct VendorService {
    db: PgPool,
}

/// Public profile of an approved vendor
#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct VendorProfile {
    pub id: Uuid,
    pub name: String,
    pub shop_name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Directory filters
#[derive(Debug, Default, serde::Deserialize)]
pub struct VendorFilter {
    pub city: Option<String>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl VendorFilter {
    fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(default.page).max(1),
            per_page: self.per_page.unwrap_or(default.per_page).clamp(1, 100),
        }
    }
}

const VENDOR_COLUMNS: &str = "id, name, shop_name, city, address, phone, created_at";

impl VendorService {
    /// Create a new VendorService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List approved vendors, optionally filtered by city and a free-text
    /// match on name or shop name. Paginated.
    pub async fn list_vendors(
        &self,
        filter: VendorFilter,
    ) -> AppResult<PaginatedResponse<VendorProfile>> {
        let base = "FROM users WHERE role = 'vendor' AND approval_status = 'approved' AND is_active = TRUE";
        let mut conditions = String::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(city) = filter.city.as_deref().filter(|c| !c.trim().is_empty()) {
            binds.push(city.trim().to_string());
            conditions.push_str(&format!(" AND LOWER(city) = LOWER(${})", binds.len()));
        }
        if let Some(q) = filter.q.as_deref().filter(|q| !q.trim().is_empty()) {
            binds.push(format!("%{}%", q.trim()));
            conditions.push_str(&format!(
                " AND (name ILIKE ${n} OR shop_name ILIKE ${n})",
                n = binds.len()
            ));
        }

        let count_sql = format!("SELECT COUNT(*) {}{}", base, conditions);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(&self.db).await?;

        let pagination = filter.pagination();
        let sql = format!(
            "SELECT {} {}{} ORDER BY shop_name NULLS LAST, name LIMIT {} OFFSET {}",
            VENDOR_COLUMNS,
            base,
            conditions,
            pagination.limit(),
            pagination.offset()
        );
        let mut query = sqlx::query_as::<_, VendorProfile>(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }

        let vendors = query.fetch_all(&self.db).await?;
        Ok(PaginatedResponse {
            data: vendors,
            pagination: PaginationMeta::new(&pagination, total as u64),
        })
    }

    /// One approved vendor's profile
    pub async fn get_vendor(&self, vendor_id: Uuid) -> AppResult<VendorProfile> {
        let vendor = sqlx::query_as::<_, VendorProfile>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND role = 'vendor' AND approval_status = 'approved' AND is_active = TRUE",
            VENDOR_COLUMNS
        ))
        .bind(vendor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor".to_string()))?;

        Ok(vendor)
    }

    /// The vendor's catalog: only items with stock on hand
    pub async fn catalog(&self, vendor_id: Uuid) -> AppResult<Vec<InventoryItem>> {
        // 404 before an empty catalog so unknown ids are distinguishable
        self.get_vendor(vendor_id).await?;

        let items = sqlx::query_as::<_, InventoryItemRow>(
            r#"
            SELECT id, owner_id, item_key, name, quantity, price, description, unit, category, image_url, created_at, updated_at
            FROM inventory_items
            WHERE owner_id = $1 AND quantity > 0
            ORDER BY category, name
            "#,
        )
        .bind(vendor_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items.into_iter().map(Into::into).collect())
    }
}
