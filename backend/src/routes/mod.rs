//! Route definitions for the PoolStock inventory platform

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Product registry
        .nest("/products", product_routes())
        // Warehouse registry
        .nest("/warehouses", warehouse_routes())
        // Inventory ledger, movements, and returns
        .nest("/inventory", inventory_routes())
}

/// Product registry routes
fn product_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_products).post(handlers::create_product),
    )
}

/// Warehouse registry routes
fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_warehouses).post(handlers::create_warehouse),
        )
        .route(
            "/:warehouse_id",
            get(handlers::get_warehouse).put(handlers::update_warehouse),
        )
}

/// Inventory ledger routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        // Ledger rows
        .route("/items", get(handlers::list_items))
        .route("/items/:item_id", get(handlers::get_item))
        // Movements
        .route("/movements", get(handlers::list_movements))
        .route("/movements/inbound", post(handlers::record_inbound))
        .route("/movements/outbound", post(handlers::record_outbound))
        .route("/movements/transfer", post(handlers::transfer_stock))
        // Returns
        .route(
            "/returns",
            get(handlers::list_returns).post(handlers::create_return),
        )
        .route("/returns/:return_id", put(handlers::update_return))
}
