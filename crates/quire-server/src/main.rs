//! Quire post service binary.
//!
//! Wires configuration, logging, the primary/replica database router, and
//! the HTTP API together.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `quire-config.yaml` plus environment
//! 2. Initialize structured logging (tracing)
//! 3. Build the database router (no I/O yet)
//! 4. Connect the primary, then the replica (fatal on failure)
//! 5. Serve HTTP until Ctrl-C or SIGTERM
//! 6. Release both database handles

mod config;
mod error;

use std::sync::Arc;

use quire_api::AppState;
use quire_db::Database;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSection, ServiceConfig};
use crate::error::ServerError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the initial database connection, or
/// the HTTP listener fails.
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // 1. Load configuration.
    let config_path = ServiceConfig::path();
    let config = ServiceConfig::load(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        path = %config_path.display(),
        file_found = config_path.exists(),
        replica_enabled = config.database.replica_enabled,
        fallback_to_primary = config.database.fallback_to_primary,
        port = config.server.port,
        "Configuration loaded"
    );

    // 3. Build the router.
    let db = Arc::new(Database::new(&config.database.to_database_config())?);

    // 4. Connect. The service does not start without its databases.
    if let Err(e) = db.connect().await {
        error!(error = %e, "Database connection failed");
        if let Err(release) = db.disconnect().await {
            error!(error = %release, "Failed to release database handles");
        }
        return Err(e.into());
    }

    // 5. Serve until shutdown.
    let state = Arc::new(AppState::new(Arc::clone(&db)));
    let served =
        quire_api::start_server(&config.server.to_server_config(), state, shutdown_signal()).await;

    // 6. Release the handles whether or not serving succeeded.
    if let Err(e) = db.disconnect().await {
        error!(error = %e, "Database disconnect failed");
    }

    served?;
    info!("quire-server stopped");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`.
fn init_logging(logging: &LoggingSection) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ServerError::Logging {
        message: e.to_string(),
    })
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
