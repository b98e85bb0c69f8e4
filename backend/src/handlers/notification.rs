//! HTTP handlers for notification endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::NotificationService;
use crate::AppState;
use shared::models::Notification;

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub marked: u64,
}

/// List the caller's notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let service = NotificationService::new(state.db);
    let notifications = service.list_for_user(current_user.0.user_id).await?;
    Ok(Json(notifications))
}

/// Unread notification count
pub async fn unread_count(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UnreadCountResponse>> {
    let service = NotificationService::new(state.db);
    let unread = service.unread_count(current_user.0.user_id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// Mark one notification read
pub async fn mark_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    let service = NotificationService::new(state.db);
    let notification = service
        .mark_read(current_user.0.user_id, notification_id)
        .await?;
    Ok(Json(notification))
}

/// Mark all of the caller's notifications read
pub async fn mark_all_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<MarkAllReadResponse>> {
    let service = NotificationService::new(state.db);
    let marked = service.mark_all_read(current_user.0.user_id).await?;
    Ok(Json(MarkAllReadResponse { marked }))
}
