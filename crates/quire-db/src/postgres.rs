//! `PostgreSQL` connection handle.
//!
//! Wraps a [`sqlx::PgPool`]. The pool is built lazily in
//! [`PostgresHandle::open`] so constructing the router performs no I/O;
//! [`connect`](ConnectionHandle::connect) is where reachability is proven.
//!
//! Queries are built at runtime (not compile-time checked) so builds do
//! not need a live database. All queries are parameterized.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::error::ConnectionError;
use crate::handle::{ConnectionHandle, HandleState, PoolSettings, StateCell};

/// Connection handle for one `PostgreSQL` endpoint.
#[derive(Debug)]
pub struct PostgresHandle {
    pool: PgPool,
    label: String,
    state: StateCell,
}

impl ConnectionHandle for PostgresHandle {
    type Client = PgPool;

    fn open(target: &str, settings: &PoolSettings) -> Result<Self, ConnectionError> {
        let connect_options: PgConnectOptions = target
            .parse()
            .map_err(|e: sqlx::Error| ConnectionError::Config(format!("Invalid database URL: {e}")))?;

        let label = describe(&connect_options);

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.connect_timeout)
            .idle_timeout(settings.idle_timeout)
            .connect_lazy_with(connect_options);

        Ok(Self {
            pool,
            label,
            state: StateCell::new(),
        })
    }

    fn target(&self) -> &str {
        &self.label
    }

    fn state(&self) -> HandleState {
        self.state.get()
    }

    async fn connect(&self) -> Result<(), ConnectionError> {
        match self.pool.acquire().await {
            Ok(conn) => {
                drop(conn);
                self.state.set(HandleState::Connected);
                tracing::info!(
                    target_db = %self.label,
                    max_connections = self.pool.options().get_max_connections(),
                    "Connected to PostgreSQL"
                );
                Ok(())
            }
            Err(e) => {
                self.state.set(HandleState::Failed);
                tracing::error!(target_db = %self.label, error = %e, "PostgreSQL connect failed");
                Err(ConnectionError::Postgres(e))
            }
        }
    }

    async fn disconnect(&self) -> Result<(), ConnectionError> {
        self.pool.close().await;
        self.state.set(HandleState::Disconnected);
        tracing::info!(target_db = %self.label, "PostgreSQL pool closed");
        Ok(())
    }

    fn client(&self) -> Result<PgPool, ConnectionError> {
        if self.pool.is_closed() {
            return Err(ConnectionError::Unavailable(self.label.clone()));
        }
        Ok(self.pool.clone())
    }
}

/// `host:port/database`, never the password.
fn describe(options: &PgConnectOptions) -> String {
    format!(
        "{}:{}/{}",
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or_default()
    )
}
