//! Read/write routing across a primary and an optional read replica.
//!
//! [`Database`] owns one write handle and one read handle. When no replica
//! is in use the read handle *is* the write handle (the same [`Arc`]), so
//! every read observes every committed write.
//!
//! # Routing
//!
//! ```text
//! execute_write(op)            --> primary
//! execute_read(op, Strong)     --> primary
//! execute_read(op, Eventual)   --> replica --(any error, fallback on)--> primary (once)
//! ```
//!
//! There is exactly one fallback hop per call: no backoff, no circuit
//! breaker, no retry of the primary. Timeouts are the handle's concern.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::error::ConnectionError;
use crate::handle::ConnectionHandle;
use crate::postgres::PostgresHandle;

/// Consistency a caller requires from a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consistency {
    /// May be served by a lagging replica.
    #[default]
    Eventual,
    /// Must observe every prior write; always served by the primary.
    Strong,
}

impl Consistency {
    /// `Strong` when `strong` is true, `Eventual` otherwise.
    pub const fn strong_if(strong: bool) -> Self {
        if strong { Self::Strong } else { Self::Eventual }
    }
}

/// The routing layer: a stateless dispatcher over two long-lived handles.
///
/// Cheap to share behind an [`Arc`]; holds no per-operation state and
/// takes no locks.
#[derive(Debug)]
pub struct Database<H: ConnectionHandle = PostgresHandle> {
    write: Arc<H>,
    read: Arc<H>,
    fallback_to_primary: bool,
}

impl<H: ConnectionHandle> Database<H> {
    /// Build both handles from configuration. No I/O is performed.
    ///
    /// The read handle is a separate endpoint only when the replica is
    /// enabled *and* a replica URL is present; otherwise it is the write
    /// handle itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Config`] if either URL is malformed.
    pub fn new(config: &DatabaseConfig) -> Result<Self, ConnectionError> {
        let write = H::open(&config.primary_url, &config.pool)?;
        let replica = config
            .effective_replica_url()
            .map(|url| H::open(url, &config.pool))
            .transpose()?;

        Ok(Self::from_handles(write, replica, config.fallback_to_primary))
    }

    /// Wire already-built handles together.
    ///
    /// Passing `None` for `replica` makes reads share the write handle.
    pub fn from_handles(write: H, replica: Option<H>, fallback_to_primary: bool) -> Self {
        let write = Arc::new(write);
        let read = match replica {
            Some(replica) => {
                info!(
                    primary = write.target(),
                    replica = replica.target(),
                    fallback_to_primary,
                    "Read replica enabled"
                );
                Arc::new(replica)
            }
            None => {
                info!(primary = write.target(), "Using primary for reads (replica disabled)");
                Arc::clone(&write)
            }
        };

        Self {
            write,
            read,
            fallback_to_primary,
        }
    }

    /// Whether reads are served by a distinct replica handle.
    pub fn has_replica(&self) -> bool {
        !Arc::ptr_eq(&self.write, &self.read)
    }

    /// Whether failed replica reads are retried on the primary.
    pub const fn fallback_to_primary(&self) -> bool {
        self.fallback_to_primary
    }

    /// The primary handle.
    pub fn write_handle(&self) -> &H {
        &self.write
    }

    /// The handle ordinary reads go to (the primary when no replica is in
    /// use).
    pub fn read_handle(&self) -> &H {
        &self.read
    }

    /// Connect the primary, then the replica if there is one.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConnectionError`]. A primary failure stops
    /// before the replica is attempted. Whether a replica failure should
    /// stop the process is the caller's decision.
    pub async fn connect(&self) -> Result<(), ConnectionError> {
        self.write.connect().await?;
        info!(primary = self.write.target(), "Connected to primary database");

        if self.has_replica() {
            self.read.connect().await?;
            info!(replica = self.read.target(), "Connected to read replica");
        }
        Ok(())
    }

    /// Release both handles. The read handle is skipped when it is the
    /// write handle.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConnectionError`]; the replica is still released
    /// when releasing the primary fails.
    pub async fn disconnect(&self) -> Result<(), ConnectionError> {
        let primary = self.write.disconnect().await;
        let replica = if self.has_replica() {
            self.read.disconnect().await
        } else {
            Ok(())
        };
        info!("Database handles released");
        primary.and(replica)
    }

    /// Run a write on the primary. Errors propagate unchanged.
    ///
    /// # Errors
    ///
    /// Returns the [`ConnectionError`] produced by the primary.
    pub async fn execute_write<T, E, F, Fut>(&self, op: F) -> Result<T, ConnectionError>
    where
        F: Fn(H::Client) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<ConnectionError>,
    {
        op(self.write.client()?).await.map_err(Into::into)
    }

    /// Run a read.
    ///
    /// `Strong` reads go straight to the primary. `Eventual` reads go to
    /// the read handle; if that fails, fallback is enabled, and the read
    /// handle is a real replica, `op` is run once more on the primary and
    /// that outcome is final.
    ///
    /// # Errors
    ///
    /// Returns the [`ConnectionError`] of the last handle tried.
    pub async fn execute_read<T, E, F, Fut>(
        &self,
        op: F,
        consistency: Consistency,
    ) -> Result<T, ConnectionError>
    where
        F: Fn(H::Client) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<ConnectionError>,
    {
        if consistency == Consistency::Strong {
            debug!("Using primary for read (consistency required)");
            return op(self.write.client()?).await.map_err(Into::into);
        }

        // A replica that cannot hand out a client is a failed read too.
        let replica_result = match self.read.client() {
            Ok(client) => op(client).await.map_err(Into::into),
            Err(e) => Err(e),
        };

        match replica_result {
            Ok(value) => Ok(value),
            Err(replica_err) if self.fallback_to_primary && self.has_replica() => {
                warn!(
                    replica = self.read.target(),
                    error = %replica_err,
                    "Replica read failed, falling back to primary"
                );
                let primary_result = match self.write.client() {
                    Ok(client) => op(client).await.map_err(Into::into),
                    Err(e) => Err(e),
                };
                primary_result.inspect_err(|primary_err| {
                    warn!(
                        primary = self.write.target(),
                        error = %primary_err,
                        "Primary fallback read also failed"
                    );
                })
            }
            Err(err) => Err(err),
        }
    }
}
