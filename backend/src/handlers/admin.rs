//! HTTP handlers for admin endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::admin::{AdminService, PendingAccount};
use crate::AppState;
use shared::models::ApprovalStatus;

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub decision: ApprovalStatus,
}

/// Vendor and dealer registrations awaiting review
pub async fn pending_accounts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<PendingAccount>>> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = AdminService::new(state.db);
    let accounts = service.pending_accounts().await?;
    Ok(Json(accounts))
}

/// Approve or reject a pending registration
pub async fn review_account(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(account_id): Path<Uuid>,
    Json(body): Json<ReviewRequest>,
) -> AppResult<StatusCode> {
    if !current_user.0.is_admin() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = AdminService::new(state.db);
    service.review_account(account_id, body.decision).await?;
    Ok(StatusCode::NO_CONTENT)
}
