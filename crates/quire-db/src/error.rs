//! Error type for the data layer.
//!
//! [`ConnectionError`] is the only error the routing layer surfaces. Its
//! variants record where a failure came from, but the router treats every
//! variant the same way: a failed replica read is retried once on the
//! primary regardless of cause.

/// Any failure to connect, disconnect, or execute against a connection
/// handle.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// A `PostgreSQL` driver call failed (pool acquire, query, or connect).
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// The connection target could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The handle was disconnected and can no longer serve operations.
    #[error("Connection unavailable: {0}")]
    Unavailable(String),

    /// A stored row held a value this service does not understand.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}
