//! Route definitions for the Local Marketplace Platform

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public, /auth/me protected inside)
        .nest("/auth", auth_routes())
        // Protected routes - vendor directory and catalogs
        .nest("/vendors", vendor_routes())
        // Protected routes - own inventory management
        .nest("/inventory", inventory_routes())
        // Protected routes - dealer-to-vendor stock requests
        .nest("/requests", stock_request_routes())
        // Protected routes - customer orders
        .nest("/orders", order_routes())
        // Protected routes - notifications
        .nest("/notifications", notification_routes())
        // Protected routes - account approval
        .nest("/admin", admin_routes())
        // Protected routes - reporting and export
        .nest("/reports", reporting_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .merge(protected)
}

/// Vendor directory routes (protected)
fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_vendors))
        .route("/:vendor_id", get(handlers::get_vendor))
        .route("/:vendor_id/catalog", get(handlers::get_catalog))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory management routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route("/low-stock", get(handlers::low_stock))
        .route(
            "/:item_id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/:item_id/adjust", post(handlers::adjust_quantity))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock request routes (protected)
fn stock_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_requests).post(handlers::create_request),
        )
        .route("/:request_id", get(handlers::get_request))
        .route(
            "/:request_id/status",
            patch(handlers::update_request_status),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer order routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::place_order))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/status", patch(handlers::update_order_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Notification routes (protected)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/unread-count", get(handlers::unread_count))
        .route("/:notification_id/read", put(handlers::mark_read))
        .route("/read-all", put(handlers::mark_all_read))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Admin routes (protected, admin checked in handlers)
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/pending", get(handlers::pending_accounts))
        .route("/accounts/:account_id/review", post(handlers::review_account))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn reporting_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/inventory", get(handlers::get_inventory_report))
        .route("/requests", get(handlers::get_request_history))
        .route_layer(middleware::from_fn(auth_middleware))
}
