//! Stateless credential check.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use superuber_core::{select_credential, AuthService, SqliteUserRepository};

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::{run_blocking, AppState};

/// Credentials submitted to `/authentication`. Missing fields count as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthenticationRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    pub token: &'static str,
}

/// POST /api/v1/authentication
///
/// Issues no session; callers re-authenticate per request. Only the credential
/// lookup holds the store; password comparison runs after it is released.
pub async fn authenticate(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AuthenticationRequest>,
) -> Result<Json<AuthenticationResponse>> {
    let AuthenticationRequest { email, password } = request;
    let lookup_password = password.clone();
    let candidates = state
        .with_store(move |conn, settings| {
            let auth =
                AuthService::new(SqliteUserRepository::try_new(conn)?, settings.password_scheme);
            Ok(auth.lookup_candidates(&email, &lookup_password)?)
        })
        .await?;

    let scheme = state.settings().password_scheme;
    run_blocking(move || Ok(select_credential(scheme, &password, &candidates)?)).await?;

    Ok(Json(AuthenticationResponse {
        token: "authenticated",
    }))
}
