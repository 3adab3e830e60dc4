//! Read-only catalog handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use superuber_core::{Product, ProductRepository, SqliteProductRepository};

use super::row_id;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// GET /api/v1/products
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state
        .with_store(|conn, _| {
            SqliteProductRepository::try_new(conn)
                .and_then(|repo| repo.list_products())
                .map_err(ApiError::listing)
        })
        .await?;
    Ok(Json(products))
}

/// GET /api/v1/product/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = row_id(&id);
    let product = state
        .with_store(move |conn, _| Ok(SqliteProductRepository::try_new(conn)?.get_product(id)?))
        .await?;
    Ok(Json(product))
}
