//! Inventory ledger models: items, batches, and the stock movement log

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-(product, warehouse) ledger row
///
/// Lazily created on the first movement that references the pair and never
/// deleted afterwards. `stock_on_hand` is intended to stay non-negative unless
/// the owning warehouse allows negatives; the database does not enforce it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub stock_on_hand: Decimal,
    pub reserved_quantity: Decimal,
    pub incoming_quantity: Decimal,
    pub damaged_quantity: Decimal,
    pub reorder_level: Decimal,
    pub safety_stock: Decimal,
    pub average_unit_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-lot quantity and expiry tracking nested under an inventory item
///
/// Consistency between an item's `stock_on_hand` and the sum of its batch
/// quantities is the caller's responsibility; the ledger only guards each
/// batch's own quantity on outbound.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryBatch {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub batch_number: String,
    pub quantity: Decimal,
    pub reserved_quantity: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_direction", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementDirection {
    Inbound,
    Outbound,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::Inbound => "inbound",
            MovementDirection::Outbound => "outbound",
        }
    }
}

/// Business meaning of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Purchase,
    Sale,
    TransferIn,
    TransferOut,
    ReturnRestock,
    Adjustment,
    Damage,
    Assembly,
    Initial,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Purchase => "purchase",
            MovementType::Sale => "sale",
            MovementType::TransferIn => "transfer_in",
            MovementType::TransferOut => "transfer_out",
            MovementType::ReturnRestock => "return_restock",
            MovementType::Adjustment => "adjustment",
            MovementType::Damage => "damage",
            MovementType::Assembly => "assembly",
            MovementType::Initial => "initial",
        }
    }
}

/// One immutable audit-log entry for a stock change
///
/// Rows are append-only; nothing in the service updates or deletes them.
/// Transfers produce two rows cross-referencing each other's warehouse via
/// `from_warehouse_id` / `to_warehouse_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub direction: MovementDirection,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub unit_cost: Option<Decimal>,
    pub reference_type: Option<String>,
    pub reference_code: Option<String>,
    pub from_warehouse_id: Option<Uuid>,
    pub to_warehouse_id: Option<Uuid>,
    pub note: Option<String>,
    pub note_fa: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
