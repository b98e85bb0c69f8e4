//! Domain models for the Local Marketplace Platform

mod inventory;
mod notification;
mod order;
mod stock_request;
mod transfer;
mod user;

pub use inventory::*;
pub use notification::*;
pub use order::*;
pub use stock_request::*;
pub use transfer::*;
pub use user::*;
