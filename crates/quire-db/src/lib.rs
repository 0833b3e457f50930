//! Data layer for the Quire post service (`PostgreSQL` primary + optional
//! read replica).
//!
//! Writes always go to the primary. Reads go to the replica when one is
//! configured and enabled, fall back to the primary once if the replica
//! read fails, and go straight to the primary when the caller needs a
//! strongly consistent result.
//!
//! # Architecture
//!
//! ```text
//! PostStore / AnalyticsStore
//!     |
//!     +-- execute_write(op) ----------------------> primary  (PostgresHandle)
//!     |
//!     +-- execute_read(op, Strong) ---------------> primary
//!     |
//!     +-- execute_read(op, Eventual) --> replica --(error, fallback)--> primary
//! ```
//!
//! # Modules
//!
//! - [`handle`] -- The [`ConnectionHandle`] abstraction and pool settings
//! - [`postgres`] -- `PostgreSQL` handle over a lazily built pool
//! - [`router`] -- [`Database`], the read/write router
//! - [`config`] -- Routing configuration
//! - [`post_store`] -- Post queries
//! - [`analytics_store`] -- Analytics event queries
//! - [`error`] -- [`ConnectionError`]

pub mod analytics_store;
pub mod config;
pub mod error;
pub mod handle;
pub mod post_store;
pub mod postgres;
pub mod router;

// Re-export primary types for convenience.
pub use analytics_store::{AnalyticsRow, AnalyticsStore};
pub use config::DatabaseConfig;
pub use error::ConnectionError;
pub use handle::{ConnectionHandle, HandleState, PoolSettings};
pub use post_store::{PostRow, PostStore};
pub use postgres::PostgresHandle;
pub use router::{Consistency, Database};
