//! Request extractors whose rejections answer with the JSON error body.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `Json<T>` whose rejections become [`ApiError::InvalidBody`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
