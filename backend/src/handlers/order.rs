//! HTTP handlers for customer order endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::order::{OrderService, PlaceOrderInput};
use crate::AppState;
use shared::models::{Order, OrderStatus, UserRole};

#[derive(Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Place an order (customers only)
pub async fn place_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<PlaceOrderInput>,
) -> AppResult<(StatusCode, Json<Order>)> {
    if current_user.0.role != UserRole::Customer {
        return Err(AppError::InsufficientPermissions);
    }

    let service = OrderService::new(state.db);
    let order = service.place_order(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List the caller's orders
pub async fn list_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let service = OrderService::new(state.db);
    let orders = service.list_for_user(current_user.0.user_id).await?;
    Ok(Json(orders))
}

/// Get one order
pub async fn get_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let service = OrderService::new(state.db);
    let order = service.get_order(current_user.0.user_id, order_id).await?;
    Ok(Json(order))
}

/// Accept, reject, or complete an order (vendor side)
pub async fn update_order_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(body): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<Order>> {
    let service = OrderService::new(state.db);
    let order = service
        .update_order_status(current_user.0.user_id, order_id, body.status)
        .await?;
    Ok(Json(order))
}
