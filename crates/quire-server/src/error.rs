//! Error types for the server binary.

use quire_db::ConnectionError;

use crate::config::ConfigError;

/// Top-level error returned from `main`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Building or connecting the database router failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying connection error.
        #[from]
        source: ConnectionError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("http error: {source}")]
    Http {
        /// The underlying server error.
        #[from]
        source: quire_api::ServerError,
    },

    /// The logging subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
