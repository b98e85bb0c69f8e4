//! HTTP handlers for vendor browsing endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::vendor::{VendorFilter, VendorProfile, VendorService};
use crate::AppState;
use shared::models::InventoryItem;
use shared::types::PaginatedResponse;

/// List approved vendors, filtered by city or free text
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(filter): Query<VendorFilter>,
) -> AppResult<Json<PaginatedResponse<VendorProfile>>> {
    let service = VendorService::new(state.db);
    let vendors = service.list_vendors(filter).await?;
    Ok(Json(vendors))
}

/// One vendor's public profile
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<VendorProfile>> {
    let service = VendorService::new(state.db);
    let vendor = service.get_vendor(vendor_id).await?;
    Ok(Json(vendor))
}

/// The vendor's in-stock catalog
pub async fn get_catalog(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = VendorService::new(state.db);
    let items = service.catalog(vendor_id).await?;
    Ok(Json(items))
}
