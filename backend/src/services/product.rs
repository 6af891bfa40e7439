//! Product registry service
//!
//! Minimal catalog surface: just enough identity for ledger rows and
//! movements to reference. Pricing and ordering live outside this service.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Product;

/// Product registry service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating a product
#[derive(Debug, serde::Deserialize)]
pub struct CreateProductInput {
    pub sku: String,
    pub name: String,
    pub name_fa: Option<String>,
    pub category: Option<String>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all products, newest first
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, name_fa, category, is_active, created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Look up a product by id
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, name_fa, category, is_active, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Create a product
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        if input.sku.trim().is_empty() {
            return Err(AppError::Validation {
                field: "sku".to_string(),
                message: "SKU cannot be empty".to_string(),
                message_fa: "شناسه کالا نمی‌تواند خالی باشد".to_string(),
            });
        }
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name cannot be empty".to_string(),
                message_fa: "نام کالا نمی‌تواند خالی باشد".to_string(),
            });
        }

        // Check for duplicate SKU
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE LOWER(sku) = LOWER($1)",
        )
        .bind(&input.sku)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "product".to_string(),
                message: "A product with this SKU already exists".to_string(),
                message_fa: "کالایی با این شناسه از قبل وجود دارد".to_string(),
            });
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (sku, name, name_fa, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sku, name, name_fa, category, is_active, created_at, updated_at
            "#,
        )
        .bind(&input.sku)
        .bind(&input.name)
        .bind(&input.name_fa)
        .bind(&input.category)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }
}
