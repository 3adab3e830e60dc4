//! Request error type and its mapping onto HTTP responses.
//!
//! Handlers return `Result<T, ApiError>`. Store failures are logged with detail
//! and answered with a generic body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde::Serialize;
use superuber_core::{AuthError, EntityKind, RepoError, UserServiceError, ValidationError};
use thiserror::Error;

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller data failed a precondition.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Request body was missing, not JSON, or did not fit the expected shape.
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// No row matched the requested id.
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// Authentication mismatch.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A collection could not be read. Reported as 404.
    #[error("listing failed: {0}")]
    ListUnavailable(RepoError),

    /// Store failure while handling a request.
    #[error("store error: {0}")]
    Store(RepoError),

    /// Anything else that is not the caller's fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Wraps a failed listing so it maps to 404 instead of 500.
    pub fn listing(err: RepoError) -> Self {
        match Self::from(err) {
            Self::Store(err) => Self::ListUnavailable(err),
            other => other,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) | Self::InvalidCredentials | Self::ListUnavailable(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Validation(_) => "fields are empty".to_string(),
            Self::InvalidBody(_) => "invalid request body".to_string(),
            Self::NotFound(entity) => format!("{entity} not found"),
            Self::InvalidCredentials => "User and/or password is incorrect".to_string(),
            Self::ListUnavailable(_) => "resource unavailable".to_string(),
            Self::Store(_) | Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, .. } => Self::NotFound(entity),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(value: UserServiceError) -> Self {
        match value {
            UserServiceError::Repo(err) => Self::from(err),
            UserServiceError::Credential(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Validation(err) => Self::Validation(err),
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Repo(err) => Self::from(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::InvalidBody(rejection) = &self {
            warn!(
                "event=request_rejected module=http status=error http_status={status} detail={}",
                rejection.body_text()
            );
        }
        if status == StatusCode::INTERNAL_SERVER_ERROR || matches!(self, Self::ListUnavailable(_)) {
            error!("event=request_failed module=http status=error http_status={status} error={self}");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
