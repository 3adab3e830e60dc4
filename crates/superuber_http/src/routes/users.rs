//! User CRUD handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use superuber_core::{
    encode_new_user, encode_user_changes, NewUser, SqliteUserRepository, User, UserChanges,
    UserRepository, UserService, UserSummary,
};

use super::row_id;
use crate::error::{ApiError, Result};
use crate::extract::JsonBody;
use crate::state::{run_blocking, AppState};

/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = state
        .with_store(|conn, settings| {
            let repo = SqliteUserRepository::try_new(conn).map_err(ApiError::listing)?;
            UserService::new(repo, settings.password_scheme)
                .list_users()
                .map_err(ApiError::listing)
        })
        .await?;
    Ok(Json(users))
}

/// GET /api/v1/user/{id}
///
/// Returns only the credential projection of the user.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserSummary>> {
    let id = row_id(&id);
    let user = state
        .with_store(move |conn, settings| {
            let service =
                UserService::new(SqliteUserRepository::try_new(conn)?, settings.password_scheme);
            Ok(service.get_user(id)?)
        })
        .await?;
    Ok(Json(UserSummary::from(user)))
}

/// POST /api/v1/users
///
/// Validation and password hashing run before the store is locked.
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<UserSummary>)> {
    let scheme = state.settings().password_scheme;
    let encoded = run_blocking(move || Ok(encode_new_user(scheme, &input)?)).await?;
    let user = state
        .with_store(move |conn, settings| {
            let service =
                UserService::new(SqliteUserRepository::try_new(conn)?, settings.password_scheme);
            Ok(service.store_new_user(&encoded)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserSummary::from(user))))
}

/// PUT /api/v1/users/{id}
///
/// Replaces every mutable field. An unknown id answers 404 even when the body
/// is unusable; field validation happens after the existence check.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<JsonBody<UserChanges>, ApiError>,
) -> Result<Json<User>> {
    let id = row_id(&id);
    let changes = match body {
        Ok(JsonBody(changes)) => changes,
        Err(rejection) => {
            state
                .with_store(move |conn, _| {
                    SqliteUserRepository::try_new(conn)?.get_user(id)?;
                    Ok(())
                })
                .await?;
            return Err(rejection);
        }
    };

    let scheme = state.settings().password_scheme;
    let encoded = run_blocking(move || Ok(encode_user_changes(scheme, &changes)?)).await?;
    let user = state
        .with_store(move |conn, settings| {
            let service =
                UserService::new(SqliteUserRepository::try_new(conn)?, settings.password_scheme);
            Ok(service.store_user_changes(id, &encoded)?)
        })
        .await?;
    Ok(Json(user))
}

/// DELETE /api/v1/users/{id}
///
/// Acknowledges with `{"id #<id>": " deleted"}`, leading space included.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Map<String, Value>>> {
    let id = row_id(&id);
    let deleted = state
        .with_store(move |conn, settings| {
            let service =
                UserService::new(SqliteUserRepository::try_new(conn)?, settings.password_scheme);
            Ok(service.delete_user(id)?)
        })
        .await?;

    let mut ack = Map::new();
    ack.insert(format!("id #{deleted}"), Value::from(" deleted"));
    Ok(Json(ack))
}
