//! HTTP handlers for the Local Marketplace Platform API

pub mod admin;
pub mod auth;
pub mod health;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod reporting;
pub mod stock_request;
pub mod vendor;

pub use admin::{pending_accounts, review_account};
pub use auth::{login, me, refresh, register};
pub use health::health_check;
pub use inventory::{
    adjust_quantity, create_item, delete_item, get_item, list_items, low_stock, update_item,
};
pub use notification::{list_notifications, mark_all_read, mark_read, unread_count};
pub use order::{get_order, list_orders, place_order, update_order_status};
pub use reporting::{get_dashboard, get_inventory_report, get_request_history};
pub use stock_request::{create_request, get_request, list_requests, update_request_status};
pub use vendor::{get_catalog, get_vendor, list_vendors};
