//! Application state shared across handlers.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use superuber_core::{PasswordScheme, VerificationPolicy};

use crate::error::ApiError;

/// Per-process settings handlers pass into core services.
#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    pub password_scheme: PasswordScheme,
    pub verification_policy: VerificationPolicy,
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Owns the single store connection, which is
/// handed to one blocking task at a time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    conn: Mutex<Connection>,
    settings: Settings,
}

impl AppState {
    /// Create a new application state around an already-migrated connection.
    #[must_use]
    pub fn new(conn: Connection, settings: Settings) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                conn: Mutex::new(conn),
                settings,
            }),
        }
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.inner.settings
    }

    /// Runs store work on the blocking pool with exclusive use of the connection.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or `ApiError::Internal` if the task panicked
    /// or the connection lock is poisoned.
    pub async fn with_store<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, Settings) -> Result<T, ApiError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        run_blocking(move || {
            let conn = inner
                .conn
                .lock()
                .map_err(|_| ApiError::Internal("store connection lock poisoned".to_string()))?;
            work(&conn, inner.settings)
        })
        .await
    }
}

/// Runs CPU-bound work on the blocking pool without touching the store.
///
/// # Errors
///
/// Returns the closure's error, or `ApiError::Internal` if the task panicked.
pub async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ApiError::Internal(format!("blocking task failed: {err}")))?
}
