//! Business logic services for the PoolStock inventory platform

pub mod inventory;
pub mod product;
pub mod returns;
pub mod warehouse;

pub use inventory::InventoryService;
pub use product::ProductService;
pub use returns::ReturnsService;
pub use warehouse::WarehouseService;
