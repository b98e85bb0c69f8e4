//! Middleware for the Local Marketplace Platform

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
