//! HTTP API for the Quire post service.
//!
//! This crate exposes post CRUD, view counting, and listings over Axum.
//! Handlers validate input and call [`PostService`], which composes the
//! post and analytics stores from `quire-db`. Which database endpoint
//! serves a request is decided entirely by the `quire-db` router; the API
//! only says when a read must be strong (`?consistent=true` and the
//! read-back after a view).

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod service;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use service::{PostService, ServiceError};
pub use state::AppState;
