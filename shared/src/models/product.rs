//! Product registry models
//!
//! The full catalog (pricing, media, ordering) lives outside this service;
//! only the identity fields the inventory ledger references are kept here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::Language;

/// A sellable product known to the inventory ledger
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub name_fa: Option<String>,
    pub category: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Display name in the requested language, falling back to English
    pub fn display_name(&self, lang: Language) -> &str {
        match lang {
            Language::Persian => self.name_fa.as_deref().unwrap_or(&self.name),
            Language::English => &self.name,
        }
    }
}
