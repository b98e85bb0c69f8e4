//! Shared types and models for the Local Marketplace Platform
//!
//! This crate contains domain types shared between the backend services,
//! handlers, and tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
