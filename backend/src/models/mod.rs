//! Database models for the PoolStock inventory platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
