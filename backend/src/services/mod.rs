//! Business logic services for the Local Marketplace Platform

pub mod admin;
pub mod auth;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod reporting;
pub mod stock_request;
pub mod vendor;

pub use admin::AdminService;
pub use auth::AuthService;
pub use inventory::InventoryService;
pub use notification::NotificationService;
pub use order::OrderService;
pub use reporting::ReportingService;
pub use stock_request::StockRequestService;
pub use vendor::VendorService;
