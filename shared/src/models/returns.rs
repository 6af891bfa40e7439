//! Returns tracker models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Where the returned units came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "return_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReturnSource {
    Customer,
    Vendor,
}

impl ReturnSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnSource::Customer => "customer",
            ReturnSource::Vendor => "vendor",
        }
    }
}

/// Lifecycle state of a return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "return_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    Pending,
    Approved,
    Rejected,
    Restocked,
}

impl ReturnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Pending => "pending",
            ReturnStatus::Approved => "approved",
            ReturnStatus::Rejected => "rejected",
            ReturnStatus::Restocked => "restocked",
        }
    }
}

/// Decided outcome for the returned units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "return_disposition", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReturnDisposition {
    Pending,
    Restock,
    Scrap,
    VendorReturn,
}

impl ReturnDisposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnDisposition::Pending => "pending",
            ReturnDisposition::Restock => "restock",
            ReturnDisposition::Scrap => "scrap",
            ReturnDisposition::VendorReturn => "vendor_return",
        }
    }
}

/// A customer or vendor return awaiting (or past) its disposition decision
///
/// Once `status` reaches `Restocked` the row is immutable and
/// `restock_movement_id` links to the inbound movement that restored stock.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryReturn {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: Decimal,
    pub source: ReturnSource,
    pub reason: Option<String>,
    pub reference_code: Option<String>,
    pub status: ReturnStatus,
    pub disposition: ReturnDisposition,
    pub restock_movement_id: Option<Uuid>,
    pub note: Option<String>,
    pub note_fa: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
