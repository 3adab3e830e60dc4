//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                         - Liveness probe
//!
//! # Users (under /api/v1)
//! GET    /users                          - List users
//! GET    /user/{id}                      - User summary (id, email, password)
//! POST   /users                          - Register user
//! PUT    /users/{id}                     - Replace user fields
//! DELETE /users/{id}                     - Delete user
//!
//! # Products
//! GET    /products                       - List products
//! GET    /product/{id}                   - Product detail
//!
//! # Authentication
//! POST   /authentication                 - Email/password check
//!
//! # Orders
//! POST   /order                          - Place order
//! POST   /order/verify/{order}           - Verify order
//! ```

pub mod auth;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::state::AppState;

/// Builds the `/api/v1` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/user/{id}", get(users::get_user))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/products", get(products::list_products))
        .route("/product/{id}", get(products::get_product))
        .route("/authentication", post(auth::authenticate))
        .route("/order", post(orders::place_order))
        .route("/order/verify/{order}", post(orders::verify_order))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: superuber_core::core_version(),
    })
}

/// Interprets a path segment as a row id.
///
/// Segments that are not integers map to `0`, which never names a stored row,
/// so they resolve as "not found" through the normal lookup path.
pub(crate) fn row_id(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}
