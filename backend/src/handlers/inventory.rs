//! HTTP handlers for inventory management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{CreateItemInput, InventoryService, UpdateItemInput};
use crate::AppState;
use shared::models::InventoryItem;

#[derive(Deserialize)]
pub struct AdjustQuantityRequest {
    pub delta: Decimal,
}

#[derive(Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<Decimal>,
}

/// Create an inventory item
pub async fn create_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateItemInput>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    let service = InventoryService::new(state.db);
    let item = service.create_item(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// List the caller's inventory
pub async fn list_items(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items(current_user.0.user_id).await?;
    Ok(Json(items))
}

/// Get one inventory item
pub async fn get_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    let item = service.get_item(current_user.0.user_id, item_id).await?;
    Ok(Json(item))
}

/// Update an inventory item
pub async fn update_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    let item = service
        .update_item(current_user.0.user_id, item_id, input)
        .await?;
    Ok(Json(item))
}

/// Adjust an item's quantity by a signed delta
pub async fn adjust_quantity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(body): Json<AdjustQuantityRequest>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    let item = service
        .adjust_quantity(current_user.0.user_id, item_id, body.delta)
        .await?;
    Ok(Json(item))
}

/// Items at or below a stock threshold
pub async fn low_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let threshold = query.threshold.unwrap_or(Decimal::from(5));
    let items = service.low_stock(current_user.0.user_id, threshold).await?;
    Ok(Json(items))
}

/// Delete an inventory item
pub async fn delete_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = InventoryService::new(state.db);
    service.delete_item(current_user.0.user_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
