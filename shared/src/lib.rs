//! Shared types and models for the PoolStock inventory platform
//!
//! This crate contains the domain models, common types, and pure stock
//! arithmetic shared between the backend service and its test suites.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
