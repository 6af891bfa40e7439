//! HTTP handlers for the PoolStock inventory platform

pub mod health;
pub mod inventory;
pub mod product;
pub mod returns;
pub mod warehouse;

pub use health::*;
pub use inventory::*;
pub use product::*;
pub use returns::*;
pub use warehouse::*;
