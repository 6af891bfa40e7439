//! Database models for the PoolStock inventory platform

pub mod inventory;
pub mod product;
pub mod returns;
pub mod warehouse;

pub use inventory::*;
pub use product::*;
pub use returns::*;
pub use warehouse::*;
