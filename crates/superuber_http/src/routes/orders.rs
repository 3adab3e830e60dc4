//! Order placement and verification handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use superuber_core::{NewOrder, Order, OrderWorkflow, SqliteOrderRepository};

use super::row_id;
use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub verify: &'static str,
}

/// POST /api/v1/order
pub async fn place_order(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state
        .with_store(move |conn, settings| {
            let workflow = OrderWorkflow::new(
                SqliteOrderRepository::try_new(conn)?,
                settings.verification_policy,
            );
            Ok(workflow.place_order(&input)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /api/v1/order/verify/{order}
///
/// Behavior depends on the configured verification policy; under the default
/// policy an unknown order reports `Verify Complete`.
pub async fn verify_order(
    State(state): State<AppState>,
    Path(order): Path<String>,
) -> Result<Json<VerifyResponse>> {
    let id = row_id(&order);
    let result = state
        .with_store(move |conn, settings| {
            let workflow = OrderWorkflow::new(
                SqliteOrderRepository::try_new(conn)?,
                settings.verification_policy,
            );
            Ok(workflow.verify_order(id)?)
        })
        .await?;
    Ok(Json(VerifyResponse {
        verify: result.message(),
    }))
}
