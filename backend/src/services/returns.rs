//! Returns tracker service
//!
//! Returns are created pending and move to a terminal status via update.
//! Restocking reuses the inventory service's inbound leg inside the same
//! transaction, so the return row and the ledger change commit together.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use shared::validation::validate_quantity;

use crate::error::{AppError, AppResult};
use crate::models::{
    InventoryReturn, MovementType, ReturnDisposition, ReturnSource, ReturnStatus,
};
use crate::services::inventory::{InboundInput, InventoryService};

/// Returns tracker service
#[derive(Clone)]
pub struct ReturnsService {
    db: PgPool,
}

/// Input for creating a return
#[derive(Debug, Deserialize)]
pub struct CreateReturnInput {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: Decimal,
    pub source: ReturnSource,
    pub reason: Option<String>,
    pub reference_code: Option<String>,
    pub disposition: Option<ReturnDisposition>,
    pub note: Option<String>,
    pub note_fa: Option<String>,
    pub restock_now: Option<bool>,
    pub created_by: Option<String>,
}

/// Input for partially updating a return
#[derive(Debug, Deserialize)]
pub struct UpdateReturnInput {
    pub status: Option<ReturnStatus>,
    pub disposition: Option<ReturnDisposition>,
    pub note: Option<String>,
    pub note_fa: Option<String>,
    pub restock: Option<bool>,
    pub created_by: Option<String>,
}

/// Query filters for the returns listing
#[derive(Debug, Default, Deserialize)]
pub struct ReturnFilter {
    pub status: Option<ReturnStatus>,
    pub warehouse_id: Option<Uuid>,
}

/// Return row enriched with display fields
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReturnDetails {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub warehouse_code: String,
    pub warehouse_name: String,
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

impl ReturnsService {
    /// Create a new ReturnsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a return, optionally restocking it in the same transaction
    pub async fn create_return(&self, input: CreateReturnInput) -> AppResult<InventoryReturn> {
        validate_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
            message_fa: "مقدار باید مثبت باشد".to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(input.product_id)
        .fetch_one(&mut *tx)
        .await?;
        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        InventoryService::active_warehouse(&mut tx, input.warehouse_id).await?;

        let disposition = input.disposition.unwrap_or(ReturnDisposition::Pending);

        let mut record = sqlx::query_as::<_, InventoryReturn>(
            r#"
            INSERT INTO inventory_returns (product_id, warehouse_id, quantity, source, reason,
                                           reference_code, disposition, note, note_fa, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, product_id, warehouse_id, quantity, source, reason, reference_code,
                      status, disposition, restock_movement_id, note, note_fa, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(input.quantity)
        .bind(input.source)
        .bind(&input.reason)
        .bind(&input.reference_code)
        .bind(disposition)
        .bind(&input.note)
        .bind(&input.note_fa)
        .bind(&input.created_by)
        .fetch_one(&mut *tx)
        .await?;

        if input.restock_now.unwrap_or(false) && disposition == ReturnDisposition::Restock {
            record = Self::restock(&mut tx, &record, input.created_by.clone()).await?;
        }

        tx.commit().await?;

        Ok(record)
    }

    /// Update a return; a `restock = true` patch performs the inbound-and-link
    /// sequence if no restock movement exists yet
    pub async fn update_return(
        &self,
        return_id: Uuid,
        input: UpdateReturnInput,
    ) -> AppResult<InventoryReturn> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, InventoryReturn>(
            r#"
            SELECT id, product_id, warehouse_id, quantity, source, reason, reference_code,
                   status, disposition, restock_movement_id, note, note_fa, created_by,
                   created_at, updated_at
            FROM inventory_returns
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(return_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Return".to_string()))?;

        // A restocked return is immutable
        if existing.status == ReturnStatus::Restocked {
            return Err(AppError::Validation {
                field: "status".to_string(),
                message: "Return has already been restocked".to_string(),
                message_fa: "مرجوعی قبلا به موجودی بازگردانده شده است".to_string(),
            });
        }

        let status = input.status.unwrap_or(existing.status);
        let disposition = input.disposition.unwrap_or(existing.disposition);
        let note = input.note.or(existing.note.clone());
        let note_fa = input.note_fa.or(existing.note_fa.clone());

        let mut record = sqlx::query_as::<_, InventoryReturn>(
            r#"
            UPDATE inventory_returns
            SET status = $1, disposition = $2, note = $3, note_fa = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, product_id, warehouse_id, quantity, source, reason, reference_code,
                      status, disposition, restock_movement_id, note, note_fa, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(disposition)
        .bind(&note)
        .bind(&note_fa)
        .bind(return_id)
        .fetch_one(&mut *tx)
        .await?;

        if input.restock.unwrap_or(false) && record.restock_movement_id.is_none() {
            record = Self::restock(&mut tx, &record, input.created_by).await?;
        }

        tx.commit().await?;

        Ok(record)
    }

    /// Perform the inbound movement for a return and link it back
    async fn restock(
        conn: &mut PgConnection,
        record: &InventoryReturn,
        created_by: Option<String>,
    ) -> AppResult<InventoryReturn> {
        let inbound = InboundInput {
            product_id: record.product_id,
            warehouse_id: record.warehouse_id,
            quantity: record.quantity,
            movement_type: Some(MovementType::ReturnRestock),
            unit_cost: None,
            reference_type: Some("return".to_string()),
            reference_code: record
                .reference_code
                .clone()
                .or_else(|| Some(record.id.to_string())),
            note: record.note.clone(),
            note_fa: record.note_fa.clone(),
            batch_number: None,
            expiry_date: None,
            created_by,
        };
        let movement_id = InventoryService::apply_inbound(&mut *conn, &inbound, None).await?;

        let updated = sqlx::query_as::<_, InventoryReturn>(
            r#"
            UPDATE inventory_returns
            SET status = 'restocked', disposition = 'restock', restock_movement_id = $1,
                updated_at = NOW()
            WHERE id = $2
            RETURNING id, product_id, warehouse_id, quantity, source, reason, reference_code,
                      status, disposition, restock_movement_id, note, note_fa, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(movement_id)
        .bind(record.id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    /// List returns, newest first
    pub async fn list_returns(&self, filter: ReturnFilter) -> AppResult<Vec<ReturnDetails>> {
        let returns = sqlx::query_as::<_, ReturnDetails>(
            r#"
            SELECT r.id, r.product_id, r.warehouse_id,
                   p.sku AS product_sku, p.name AS product_name,
                   w.code AS warehouse_code, w.name AS warehouse_name,
                   r.quantity, r.source, r.reason, r.reference_code, r.status, r.disposition,
                   r.restock_movement_id, r.note, r.note_fa, r.created_by,
                   r.created_at, r.updated_at
            FROM inventory_returns r
            JOIN products p ON p.id = r.product_id
            JOIN warehouses w ON w.id = r.warehouse_id
            WHERE ($1::return_status IS NULL OR r.status = $1)
              AND ($2::uuid IS NULL OR r.warehouse_id = $2)
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(filter.status)
        .bind(filter.warehouse_id)
        .fetch_all(&self.db)
        .await?;

        Ok(returns)
    }
}
