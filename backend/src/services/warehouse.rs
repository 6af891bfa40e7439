//! Warehouse registry service

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Warehouse;

/// Warehouse registry service
#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

/// Input for creating a warehouse
#[derive(Debug, Deserialize)]
pub struct CreateWarehouseInput {
    pub code: String,
    pub name: String,
    pub name_fa: Option<String>,
    pub warehouse_type: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub capacity: Option<Decimal>,
    pub allow_negatives: Option<bool>,
}

/// Input for partially updating a warehouse
///
/// Absent fields keep their stored values; `updated_at` is always refreshed.
#[derive(Debug, Deserialize)]
pub struct UpdateWarehouseInput {
    pub name: Option<String>,
    pub name_fa: Option<String>,
    pub warehouse_type: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub capacity: Option<Decimal>,
    pub allow_negatives: Option<bool>,
    pub is_active: Option<bool>,
}

impl WarehouseService {
    /// Create a new WarehouseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all warehouses
    ///
    /// Inactive warehouses are included: the list endpoint never filtered on
    /// `is_active` and callers depend on seeing deactivated locations. Write
    /// paths enforce activity separately.
    pub async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(
            r#"
            SELECT id, code, name, name_fa, warehouse_type, address, city, contact_person,
                   phone, capacity, allow_negatives, is_active, created_at, updated_at
            FROM warehouses
            ORDER BY code
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(warehouses)
    }

    /// Look up a warehouse by id
    pub async fn get_warehouse(&self, warehouse_id: Uuid) -> AppResult<Warehouse> {
        sqlx::query_as::<_, Warehouse>(
            r#"
            SELECT id, code, name, name_fa, warehouse_type, address, city, contact_person,
                   phone, capacity, allow_negatives, is_active, created_at, updated_at
            FROM warehouses
            WHERE id = $1
            "#,
        )
        .bind(warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))
    }

    /// Create a warehouse
    pub async fn create_warehouse(&self, input: CreateWarehouseInput) -> AppResult<Warehouse> {
        if input.code.trim().is_empty() {
            return Err(AppError::Validation {
                field: "code".to_string(),
                message: "Warehouse code cannot be empty".to_string(),
                message_fa: "کد انبار نمی‌تواند خالی باشد".to_string(),
            });
        }
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Warehouse name cannot be empty".to_string(),
                message_fa: "نام انبار نمی‌تواند خالی باشد".to_string(),
            });
        }
        if let Some(capacity) = input.capacity {
            if capacity < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "capacity".to_string(),
                    message: "Capacity cannot be negative".to_string(),
                    message_fa: "ظرفیت نمی‌تواند منفی باشد".to_string(),
                });
            }
        }

        // Check for duplicate code
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM warehouses WHERE LOWER(code) = LOWER($1)",
        )
        .bind(&input.code)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "warehouse".to_string(),
                message: "A warehouse with this code already exists".to_string(),
                message_fa: "انباری با این کد از قبل وجود دارد".to_string(),
            });
        }

        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            INSERT INTO warehouses (code, name, name_fa, warehouse_type, address, city,
                                    contact_person, phone, capacity, allow_negatives)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, code, name, name_fa, warehouse_type, address, city, contact_person,
                      phone, capacity, allow_negatives, is_active, created_at, updated_at
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.name_fa)
        .bind(&input.warehouse_type)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.contact_person)
        .bind(&input.phone)
        .bind(input.capacity)
        .bind(input.allow_negatives.unwrap_or(false))
        .fetch_one(&self.db)
        .await?;

        Ok(warehouse)
    }

    /// Update a warehouse
    ///
    /// There is no delete operation; deactivation is done by setting
    /// `is_active = false` through this update.
    pub async fn update_warehouse(
        &self,
        warehouse_id: Uuid,
        input: UpdateWarehouseInput,
    ) -> AppResult<Warehouse> {
        let existing = self.get_warehouse(warehouse_id).await?;

        if let Some(ref name) = input.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "Warehouse name cannot be empty".to_string(),
                    message_fa: "نام انبار نمی‌تواند خالی باشد".to_string(),
                });
            }
        }
        if let Some(capacity) = input.capacity {
            if capacity < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "capacity".to_string(),
                    message: "Capacity cannot be negative".to_string(),
                    message_fa: "ظرفیت نمی‌تواند منفی باشد".to_string(),
                });
            }
        }

        // Apply supplied fields over the stored record
        let name = input.name.unwrap_or(existing.name);
        let name_fa = input.name_fa.or(existing.name_fa);
        let warehouse_type = input.warehouse_type.or(existing.warehouse_type);
        let address = input.address.or(existing.address);
        let city = input.city.or(existing.city);
        let contact_person = input.contact_person.or(existing.contact_person);
        let phone = input.phone.or(existing.phone);
        let capacity = input.capacity.or(existing.capacity);
        let allow_negatives = input.allow_negatives.unwrap_or(existing.allow_negatives);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            UPDATE warehouses
            SET name = $1, name_fa = $2, warehouse_type = $3, address = $4, city = $5,
                contact_person = $6, phone = $7, capacity = $8, allow_negatives = $9,
                is_active = $10, updated_at = NOW()
            WHERE id = $11
            RETURNING id, code, name, name_fa, warehouse_type, address, city, contact_person,
                      phone, capacity, allow_negatives, is_active, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&name_fa)
        .bind(&warehouse_type)
        .bind(&address)
        .bind(&city)
        .bind(&contact_person)
        .bind(&phone)
        .bind(capacity)
        .bind(allow_negatives)
        .bind(is_active)
        .bind(warehouse_id)
        .fetch_one(&self.db)
        .await?;

        Ok(warehouse)
    }
}
