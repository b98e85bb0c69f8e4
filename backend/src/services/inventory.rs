//! Inventory service
//!
//! Owner-scoped CRUD over inventory items. Vendors and dealers each manage
//! their own stock; the item_key (owner + normalized name) keeps names
//! unique per owner at the database level.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{normalize_item_key, InventoryItem};
use shared::validation::{validate_item_name, validate_price, validate_quantity};

/// Inventory service
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Input for creating an inventory item
#[derive(Debug, serde::Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

/// Input for updating an inventory item; absent fields are left unchanged
#[derive(Debug, serde::Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

/// Database row for an inventory item
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct InventoryItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub item_key: String,
    pub name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<InventoryItemRow> for InventoryItem {
    fn from(row: InventoryItemRow) -> Self {
        InventoryItem {
            id: row.id,
            owner_id: row.owner_id,
            item_key: row.item_key,
            name: row.name,
            quantity: row.quantity,
            price: row.price,
            description: row.description,
            unit: row.unit,
            category: row.category,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ITEM_COLUMNS: &str = "id, owner_id, item_key, name, quantity, price, description, unit, category, image_url, created_at, updated_at";

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an item in the caller's inventory
    pub async fn create_item(
        &self,
        owner_id: Uuid,
        input: CreateItemInput,
    ) -> AppResult<InventoryItem> {
        validate_item_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_price(input.price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;
        if input.quantity < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must not be negative".to_string(),
            });
        }

        let item_key = normalize_item_key(owner_id, &input.name);

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_items WHERE item_key = $1",
        )
        .bind(&item_key)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "inventory_item".to_string(),
                message: format!("An item named '{}' already exists", input.name.trim()),
            });
        }

        let item = sqlx::query_as::<_, InventoryItemRow>(&format!(
            r#"
            INSERT INTO inventory_items
                (owner_id, item_key, name, quantity, price, description, unit, category, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(owner_id)
        .bind(&item_key)
        .bind(input.name.trim())
        .bind(input.quantity)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.unit)
        .bind(input.category.as_deref().unwrap_or("General"))
        .bind(&input.image_url)
        .fetch_one(&self.db)
        .await?;

        Ok(item.into())
    }

    /// List the caller's inventory, newest first
    pub async fn list_items(&self, owner_id: Uuid) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {} FROM inventory_items WHERE owner_id = $1 ORDER BY created_at DESC",
            ITEM_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Get one item; owner only
    pub async fn get_item(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<InventoryItem> {
        let item = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {} FROM inventory_items WHERE id = $1 AND owner_id = $2",
            ITEM_COLUMNS
        ))
        .bind(item_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        Ok(item.into())
    }

    /// Update an item; renaming recomputes the item_key and re-checks
    /// uniqueness
    pub async fn update_item(
        &self,
        owner_id: Uuid,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<InventoryItem> {
        let current = self.get_item(owner_id, item_id).await?;

        let name = match input.name {
            Some(ref name) => {
                validate_item_name(name).map_err(|msg| AppError::Validation {
                    field: "name".to_string(),
                    message: msg.to_string(),
                })?;
                name.trim().to_string()
            }
            None => current.name.clone(),
        };

        let item_key = normalize_item_key(owner_id, &name);
        if item_key != current.item_key {
            let taken = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM inventory_items WHERE item_key = $1 AND id != $2",
            )
            .bind(&item_key)
            .bind(item_id)
            .fetch_one(&self.db)
            .await?;

            if taken > 0 {
                return Err(AppError::Conflict {
                    resource: "inventory_item".to_string(),
                    message: format!("An item named '{}' already exists", name),
                });
            }
        }

        if let Some(price) = input.price {
            validate_price(price).map_err(|msg| AppError::Validation {
                field: "price".to_string(),
                message: msg.to_string(),
            })?;
        }
        if input.quantity.is_some_and(|q| q < Decimal::ZERO) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must not be negative".to_string(),
            });
        }

        let item = sqlx::query_as::<_, InventoryItemRow>(&format!(
            r#"
            UPDATE inventory_items
            SET item_key = $1,
                name = $2,
                quantity = $3,
                price = $4,
                description = $5,
                unit = $6,
                category = $7,
                image_url = $8,
                updated_at = NOW()
            WHERE id = $9 AND owner_id = $10
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&item_key)
        .bind(&name)
        .bind(input.quantity.unwrap_or(current.quantity))
        .bind(input.price.unwrap_or(current.price))
        .bind(input.description.or(current.description))
        .bind(input.unit.or(current.unit))
        .bind(input.category.unwrap_or(current.category))
        .bind(input.image_url.or(current.image_url))
        .bind(item_id)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;

        Ok(item.into())
    }

    /// Adjust quantity by a signed delta. Manual adjustments may not take
    /// stock below zero; only the transfer engine is allowed to do that.
    pub async fn adjust_quantity(
        &self,
        owner_id: Uuid,
        item_id: Uuid,
        delta: Decimal,
    ) -> AppResult<InventoryItem> {
        let current = self.get_item(owner_id, item_id).await?;

        let next = current.quantity + delta;
        if next < Decimal::ZERO {
            return Err(AppError::InsufficientInventory(format!(
                "Cannot adjust '{}' below zero (current {}, delta {})",
                current.name, current.quantity, delta
            )));
        }

        let item = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "UPDATE inventory_items SET quantity = $1, updated_at = NOW() WHERE id = $2 AND owner_id = $3 RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(next)
        .bind(item_id)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;

        Ok(item.into())
    }

    /// Items at or below the given threshold, lowest first
    pub async fn low_stock(
        &self,
        owner_id: Uuid,
        threshold: Decimal,
    ) -> AppResult<Vec<InventoryItem>> {
        validate_quantity(threshold).map_err(|msg| AppError::Validation {
            field: "threshold".to_string(),
            message: msg.to_string(),
        })?;

        let items = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {} FROM inventory_items WHERE owner_id = $1 AND quantity <= $2 ORDER BY quantity ASC",
            ITEM_COLUMNS
        ))
        .bind(owner_id)
        .bind(threshold)
        .fetch_all(&self.db)
        .await?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Delete an item; owner only
    pub async fn delete_item(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND owner_id = $2")
            .bind(item_id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Inventory item".to_string()));
        }
        Ok(())
    }
}
