//! `superuber` server entry point.
//!
//! # Responsibility
//! - Load configuration, start logging, open the store and serve the API.
//! - Treat any startup failure as fatal: log it and exit non-zero.

use std::process::ExitCode;

use log::{error, info};
use superuber_core::db::{open_db, open_db_in_memory};
use superuber_core::init_logging;
use superuber_http::{app, AppState, DatabaseLocation, ServerConfig, Settings};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("superuber: failed to load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("superuber: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=cli status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = match &config.database {
        DatabaseLocation::File(path) => open_db(path)?,
        DatabaseLocation::InMemory => open_db_in_memory()?,
    };

    let state = AppState::new(
        conn,
        Settings {
            password_scheme: config.password_scheme,
            verification_policy: config.verification_policy,
        },
    );

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "event=server_start module=cli status=ok addr={addr} password_scheme={} verification_policy={:?}",
        config.password_scheme.as_str(),
        config.verification_policy
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=cli status=error error={err}");
    }
}
