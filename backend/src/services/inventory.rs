//! Inventory ledger service: per-(product, warehouse) stock accounting,
//! batch tracking, and the append-only movement log.
//!
//! Every mutation runs inside one transaction. The ledger row is acquired
//! with `INSERT .. ON CONFLICT DO NOTHING` followed by `SELECT .. FOR UPDATE`,
//! so lazy creation is race-free and concurrent mutations of the same
//! (product, warehouse) pair serialize at the database.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use shared::validation::{can_fulfill, validate_quantity, validate_transfer_endpoints, weighted_average_cost};

use crate::error::{AppError, AppResult};
use crate::models::{
    InventoryBatch, InventoryItem, MovementDirection, MovementType, Warehouse,
};

/// Inventory ledger service
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Input for recording an inbound movement
#[derive(Debug, Clone, Deserialize)]
pub struct InboundInput {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: Decimal,
    pub movement_type: Option<MovementType>,
    pub unit_cost: Option<Decimal>,
    pub reference_type: Option<String>,
    pub reference_code: Option<String>,
    pub note: Option<String>,
    pub note_fa: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub created_by: Option<String>,
}

/// Input for recording an outbound movement
#[derive(Debug, Clone, Deserialize)]
pub struct OutboundInput {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: Decimal,
    pub movement_type: Option<MovementType>,
    pub reference_type: Option<String>,
    pub reference_code: Option<String>,
    pub note: Option<String>,
    pub note_fa: Option<String>,
    pub batch_number: Option<String>,
    pub created_by: Option<String>,
}

/// Input for transferring stock between two warehouses
#[derive(Debug, Deserialize)]
pub struct TransferInput {
    pub product_id: Uuid,
    pub from_warehouse_id: Uuid,
    pub to_warehouse_id: Uuid,
    pub quantity: Decimal,
    pub reference_code: Option<String>,
    pub note: Option<String>,
    pub note_fa: Option<String>,
    pub created_by: Option<String>,
}

/// Query filters for the item listing
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub warehouse_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Query filters for the movement log
#[derive(Debug, Default, Deserialize)]
pub struct MovementFilter {
    pub warehouse_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub direction: Option<MovementDirection>,
    pub limit: Option<i64>,
}

/// Ledger row enriched with product/warehouse display fields
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryItemDetails {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub product_name_fa: Option<String>,
    pub warehouse_code: String,
    pub warehouse_name: String,
    pub warehouse_name_fa: Option<String>,
    pub stock_on_hand: Decimal,
    pub reserved_quantity: Decimal,
    pub incoming_quantity: Decimal,
    pub damaged_quantity: Decimal,
    pub reorder_level: Decimal,
    pub safety_stock: Decimal,
    pub average_unit_cost: Decimal,
    pub available_quantity: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single-item detail view including its batches
#[derive(Debug, Serialize)]
pub struct InventoryItemDetail {
    #[serde(flatten)]
    pub item: InventoryItemDetails,
    pub batches: Vec<InventoryBatch>,
}

/// Movement log row enriched with display fields
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovementDetails {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub warehouse_code: String,
    pub warehouse_name: String,
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

const DEFAULT_MOVEMENT_LIMIT: i64 = 50;
const MAX_MOVEMENT_LIMIT: i64 = 500;

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Resolve a warehouse that must exist and be active
    pub(crate) async fn active_warehouse(
        conn: &mut PgConnection,
        warehouse_id: Uuid,
    ) -> AppResult<Warehouse> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            SELECT id, code, name, name_fa, warehouse_type, address, city, contact_person,
                   phone, capacity, allow_negatives, is_active, created_at, updated_at
            FROM warehouses
            WHERE id = $1
            "#,
        )
        .bind(warehouse_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        if !warehouse.is_active {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        Ok(warehouse)
    }

    /// Get or lazily create the ledger row for (product, warehouse),
    /// row-locked for the rest of the enclosing transaction.
    pub(crate) async fn ensure_item(
        conn: &mut PgConnection,
        product_id: Uuid,
        warehouse_id: Uuid,
    ) -> AppResult<InventoryItem> {
        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&mut *conn)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        // Atomic get-or-create: the unique constraint absorbs concurrent
        // first movements for the same pair.
        sqlx::query(
            r#"
            INSERT INTO inventory_items (product_id, warehouse_id)
            VALUES ($1, $2)
            ON CONFLICT (product_id, warehouse_id) DO NOTHING
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .execute(&mut *conn)
        .await?;

        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, product_id, warehouse_id, stock_on_hand, reserved_quantity,
                   incoming_quantity, damaged_quantity, reorder_level, safety_stock,
                   average_unit_cost, created_at, updated_at
            FROM inventory_items
            WHERE product_id = $1 AND warehouse_id = $2
            FOR UPDATE
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(item)
    }

    /// Inbound leg: raise on-hand, blend average cost, upsert batch, log.
    /// Runs on the caller's transaction connection.
    pub(crate) async fn apply_inbound(
        conn: &mut PgConnection,
        input: &InboundInput,
        from_warehouse_id: Option<Uuid>,
    ) -> AppResult<Uuid> {
        validate_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
            message_fa: "مقدار باید مثبت باشد".to_string(),
        })?;

        Self::active_warehouse(&mut *conn, input.warehouse_id).await?;
        let item = Self::ensure_item(&mut *conn, input.product_id, input.warehouse_id).await?;

        let new_on_hand = item.stock_on_hand + input.quantity;
        let new_average = match input.unit_cost {
            Some(unit_cost) => weighted_average_cost(
                item.average_unit_cost,
                item.stock_on_hand,
                unit_cost,
                input.quantity,
            ),
            None => item.average_unit_cost,
        };

        sqlx::query(
            r#"
            UPDATE inventory_items
            SET stock_on_hand = $1, average_unit_cost = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(new_on_hand)
        .bind(new_average)
        .bind(item.id)
        .execute(&mut *conn)
        .await?;

        if let Some(ref batch_number) = input.batch_number {
            // Add to an existing batch, or start one; a new expiry replaces,
            // an absent one preserves the stored value.
            sqlx::query(
                r#"
                INSERT INTO inventory_batches (inventory_item_id, batch_number, quantity, expiry_date)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (inventory_item_id, batch_number) DO UPDATE
                SET quantity = inventory_batches.quantity + EXCLUDED.quantity,
                    expiry_date = COALESCE(EXCLUDED.expiry_date, inventory_batches.expiry_date),
                    updated_at = NOW()
                "#,
            )
            .bind(item.id)
            .bind(batch_number)
            .bind(input.quantity)
            .bind(input.expiry_date)
            .execute(&mut *conn)
            .await?;
        }

        let movement_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stock_movements (product_id, warehouse_id, direction, movement_type,
                                         quantity, unit_cost, reference_type, reference_code,
                                         from_warehouse_id, to_warehouse_id, note, note_fa, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(MovementDirection::Inbound)
        .bind(input.movement_type.unwrap_or(MovementType::Purchase))
        .bind(input.quantity)
        .bind(input.unit_cost)
        .bind(&input.reference_type)
        .bind(&input.reference_code)
        .bind(from_warehouse_id)
        .bind(None::<Uuid>)
        .bind(&input.note)
        .bind(&input.note_fa)
        .bind(&input.created_by)
        .fetch_one(&mut *conn)
        .await?;

        Ok(movement_id)
    }

    /// Outbound leg: check policy, lower on-hand, decrement batch, log.
    /// Runs on the caller's transaction connection.
    pub(crate) async fn apply_outbound(
        conn: &mut PgConnection,
        input: &OutboundInput,
        to_warehouse_id: Option<Uuid>,
    ) -> AppResult<Uuid> {
        validate_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
            message_fa: "مقدار باید مثبت باشد".to_string(),
        })?;

        let warehouse = Self::active_warehouse(&mut *conn, input.warehouse_id).await?;
        let item = Self::ensure_item(&mut *conn, input.product_id, input.warehouse_id).await?;

        if !can_fulfill(item.stock_on_hand, input.quantity, warehouse.allow_negatives) {
            return Err(AppError::InsufficientStock {
                message: format!(
                    "Requested {} but warehouse {} has {} on hand",
                    input.quantity, warehouse.code, item.stock_on_hand
                ),
                message_fa: format!(
                    "درخواست {} ولی موجودی انبار {} فقط {} است",
                    input.quantity, warehouse.code, item.stock_on_hand
                ),
            });
        }

        let new_on_hand = item.stock_on_hand - input.quantity;

        sqlx::query(
            "UPDATE inventory_items SET stock_on_hand = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(new_on_hand)
        .bind(item.id)
        .execute(&mut *conn)
        .await?;

        if let Some(ref batch_number) = input.batch_number {
            let batch_quantity = sqlx::query_scalar::<_, Decimal>(
                r#"
                SELECT quantity FROM inventory_batches
                WHERE inventory_item_id = $1 AND batch_number = $2
                "#,
            )
            .bind(item.id)
            .bind(batch_number)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

            // A batch never goes negative, even under an allow-negatives policy
            if batch_quantity < input.quantity {
                return Err(AppError::InsufficientStock {
                    message: format!(
                        "Batch {} has {} but {} requested",
                        batch_number, batch_quantity, input.quantity
                    ),
                    message_fa: format!(
                        "بچ {} فقط {} موجودی دارد، درخواست {}",
                        batch_number, batch_quantity, input.quantity
                    ),
                });
            }

            sqlx::query(
                r#"
                UPDATE inventory_batches
                SET quantity = quantity - $1, updated_at = NOW()
                WHERE inventory_item_id = $2 AND batch_number = $3
                "#,
            )
            .bind(input.quantity)
            .bind(item.id)
            .bind(batch_number)
            .execute(&mut *conn)
            .await?;
        }

        let movement_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stock_movements (product_id, warehouse_id, direction, movement_type,
                                         quantity, unit_cost, reference_type, reference_code,
                                         from_warehouse_id, to_warehouse_id, note, note_fa, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(MovementDirection::Outbound)
        .bind(input.movement_type.unwrap_or(MovementType::Sale))
        .bind(input.quantity)
        .bind(None::<Decimal>)
        .bind(&input.reference_type)
        .bind(&input.reference_code)
        .bind(None::<Uuid>)
        .bind(to_warehouse_id)
        .bind(&input.note)
        .bind(&input.note_fa)
        .bind(&input.created_by)
        .fetch_one(&mut *conn)
        .await?;

        Ok(movement_id)
    }

    /// Record an inbound movement (purchase, return restock, adjustment, ...)
    ///
    /// Inbound never rejects based on existing stock.
    pub async fn record_inbound(&self, input: InboundInput) -> AppResult<Uuid> {
        let mut tx = self.db.begin().await?;
        let movement_id = Self::apply_inbound(&mut tx, &input, None).await?;
        tx.commit().await?;

        tracing::debug!(
            movement_id = %movement_id,
            product_id = %input.product_id,
            warehouse_id = %input.warehouse_id,
            "recorded inbound movement"
        );

        Ok(movement_id)
    }

    /// Record an outbound movement (sale, damage, adjustment, ...)
    pub async fn record_outbound(&self, input: OutboundInput) -> AppResult<Uuid> {
        let mut tx = self.db.begin().await?;
        let movement_id = Self::apply_outbound(&mut tx, &input, None).await?;
        tx.commit().await?;

        tracing::debug!(
            movement_id = %movement_id,
            product_id = %input.product_id,
            warehouse_id = %input.warehouse_id,
            "recorded outbound movement"
        );

        Ok(movement_id)
    }

    /// Transfer stock between two warehouses
    ///
    /// One transaction around both legs: if the inbound leg fails, the
    /// outbound leg is rolled back with it and nothing is observable.
    pub async fn transfer(&self, input: TransferInput) -> AppResult<(Uuid, Uuid)> {
        validate_transfer_endpoints(input.from_warehouse_id, input.to_warehouse_id).map_err(
            |msg| AppError::Validation {
                field: "to_warehouse_id".to_string(),
                message: msg.to_string(),
                message_fa: "انبار مبدا و مقصد باید متفاوت باشند".to_string(),
            },
        )?;

        let mut tx = self.db.begin().await?;

        let outbound = OutboundInput {
            product_id: input.product_id,
            warehouse_id: input.from_warehouse_id,
            quantity: input.quantity,
            movement_type: Some(MovementType::TransferOut),
            reference_type: Some("transfer".to_string()),
            reference_code: input.reference_code.clone(),
            note: input.note.clone(),
            note_fa: input.note_fa.clone(),
            batch_number: None,
            created_by: input.created_by.clone(),
        };
        let outbound_movement_id =
            Self::apply_outbound(&mut tx, &outbound, Some(input.to_warehouse_id)).await?;

        let inbound = InboundInput {
            product_id: input.product_id,
            warehouse_id: input.to_warehouse_id,
            quantity: input.quantity,
            movement_type: Some(MovementType::TransferIn),
            unit_cost: None,
            reference_type: Some("transfer".to_string()),
            reference_code: input.reference_code.clone(),
            note: input.note.clone(),
            note_fa: input.note_fa.clone(),
            batch_number: None,
            expiry_date: None,
            created_by: input.created_by.clone(),
        };
        let inbound_movement_id =
            Self::apply_inbound(&mut tx, &inbound, Some(input.from_warehouse_id)).await?;

        tx.commit().await?;

        tracing::debug!(
            outbound_movement_id = %outbound_movement_id,
            inbound_movement_id = %inbound_movement_id,
            product_id = %input.product_id,
            "transferred stock"
        );

        Ok((outbound_movement_id, inbound_movement_id))
    }

    /// List ledger rows with optional warehouse/product/search filters
    pub async fn list_items(&self, filter: ItemFilter) -> AppResult<Vec<InventoryItemDetails>> {
        let items = sqlx::query_as::<_, InventoryItemDetails>(
            r#"
            SELECT i.id, i.product_id, i.warehouse_id,
                   p.sku AS product_sku, p.name AS product_name, p.name_fa AS product_name_fa,
                   w.code AS warehouse_code, w.name AS warehouse_name, w.name_fa AS warehouse_name_fa,
                   i.stock_on_hand, i.reserved_quantity, i.incoming_quantity, i.damaged_quantity,
                   i.reorder_level, i.safety_stock, i.average_unit_cost,
                   GREATEST(i.stock_on_hand - i.reserved_quantity, 0) AS available_quantity,
                   i.created_at, i.updated_at
            FROM inventory_items i
            JOIN products p ON p.id = i.product_id
            JOIN warehouses w ON w.id = i.warehouse_id
            WHERE ($1::uuid IS NULL OR i.warehouse_id = $1)
              AND ($2::uuid IS NULL OR i.product_id = $2)
              AND ($3::text IS NULL OR p.name ILIKE '%' || $3 || '%'
                   OR p.name_fa ILIKE '%' || $3 || '%'
                   OR p.sku ILIKE '%' || $3 || '%')
            ORDER BY w.code, p.sku
            "#,
        )
        .bind(filter.warehouse_id)
        .bind(filter.product_id)
        .bind(filter.search)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Get a single ledger row with its batches
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<InventoryItemDetail> {
        let item = sqlx::query_as::<_, InventoryItemDetails>(
            r#"
            SELECT i.id, i.product_id, i.warehouse_id,
                   p.sku AS product_sku, p.name AS product_name, p.name_fa AS product_name_fa,
                   w.code AS warehouse_code, w.name AS warehouse_name, w.name_fa AS warehouse_name_fa,
                   i.stock_on_hand, i.reserved_quantity, i.incoming_quantity, i.damaged_quantity,
                   i.reorder_level, i.safety_stock, i.average_unit_cost,
                   GREATEST(i.stock_on_hand - i.reserved_quantity, 0) AS available_quantity,
                   i.created_at, i.updated_at
            FROM inventory_items i
            JOIN products p ON p.id = i.product_id
            JOIN warehouses w ON w.id = i.warehouse_id
            WHERE i.id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        let batches = sqlx::query_as::<_, InventoryBatch>(
            r#"
            SELECT id, inventory_item_id, batch_number, quantity, reserved_quantity,
                   expiry_date, status, created_at, updated_at
            FROM inventory_batches
            WHERE inventory_item_id = $1
            ORDER BY batch_number
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        Ok(InventoryItemDetail { item, batches })
    }

    /// List movements, newest first
    pub async fn list_movements(&self, filter: MovementFilter) -> AppResult<Vec<MovementDetails>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_MOVEMENT_LIMIT)
            .clamp(1, MAX_MOVEMENT_LIMIT);

        let movements = sqlx::query_as::<_, MovementDetails>(
            r#"
            SELECT m.id, m.product_id, m.warehouse_id,
                   p.sku AS product_sku, p.name AS product_name,
                   w.code AS warehouse_code, w.name AS warehouse_name,
                   m.direction, m.movement_type, m.quantity, m.unit_cost,
                   m.reference_type, m.reference_code, m.from_warehouse_id, m.to_warehouse_id,
                   m.note, m.note_fa, m.created_by, m.created_at
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            JOIN warehouses w ON w.id = m.warehouse_id
            WHERE ($1::uuid IS NULL OR m.warehouse_id = $1)
              AND ($2::uuid IS NULL OR m.product_id = $2)
              AND ($3::movement_direction IS NULL OR m.direction = $3)
            ORDER BY m.created_at DESC
            LIMIT $4
            "#,
        )
        .bind(filter.warehouse_id)
        .bind(filter.product_id)
        .bind(filter.direction)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}
