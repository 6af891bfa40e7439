//! Warehouse registry models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::Language;

/// A physical storage location
///
/// Warehouses are never hard-deleted; deactivation flips `is_active`.
/// `allow_negatives` is the per-warehouse policy gate that lets stock on hand
/// go below zero on outbound movements.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Warehouse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub name_fa: Option<String>,
    pub warehouse_type: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub capacity: Option<Decimal>,
    pub allow_negatives: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Warehouse {
    /// Display name in the requested language, falling back to English
    pub fn display_name(&self, lang: Language) -> &str {
        match lang {
            Language::Persian => self.name_fa.as_deref().unwrap_or(&self.name),
            Language::English => &self.name,
        }
    }
}
