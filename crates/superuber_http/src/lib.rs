//! HTTP surface for the SuperUber storefront service.
//!
//! # Responsibility
//! - Translate JSON requests into core service calls.
//! - Map core errors onto status codes and JSON error bodies.
//!
//! # Invariants
//! - Handlers never touch SQL directly; all store work goes through core
//!   repositories on the blocking pool.
//! - No endpoint requires a token.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};

pub use config::{ConfigError, DatabaseLocation, ServerConfig};
pub use error::ApiError;
pub use extract::JsonBody;
pub use state::{run_blocking, AppState, Settings};

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .nest("/api/v1", routes::api_routes())
        .with_state(state)
}
