//! HTTP handlers for stock request endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::stock_request::{CreateStockRequestInput, StockRequestService};
use crate::AppState;
use shared::models::{RequestStatus, StockRequest, UserRole};

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RequestStatus,
}

/// Create a stock request (dealers only)
pub async fn create_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateStockRequestInput>,
) -> AppResult<(StatusCode, Json<StockRequest>)> {
    if current_user.0.role != UserRole::Dealer {
        return Err(AppError::InsufficientPermissions);
    }

    let service = StockRequestService::new(state.db);
    let request = service.create_request(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// List requests the caller is a party to
pub async fn list_requests(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<StockRequest>>> {
    let service = StockRequestService::new(state.db);
    let requests = service
        .list_for_user(current_user.0.user_id, current_user.0.role)
        .await?;
    Ok(Json(requests))
}

/// Get one request
pub async fn get_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<StockRequest>> {
    let service = StockRequestService::new(state.db);
    let request = service
        .get_request(current_user.0.user_id, request_id)
        .await?;
    Ok(Json(request))
}

/// Accept or reject a request (vendor side). Accepting runs the stock
/// transfer.
pub async fn update_request_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> AppResult<Json<StockRequest>> {
    let service = StockRequestService::new(state.db);
    let request = service
        .update_request_status(current_user.0.user_id, request_id, body.status)
        .await?;
    Ok(Json(request))
}
