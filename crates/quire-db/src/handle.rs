//! The connection handle abstraction the router dispatches to.
//!
//! A handle wraps one database endpoint. It owns its own pool, knows
//! whether it is connected, and hands out clients for units of work. It
//! never retries; that policy belongs to
//! [`Database`](crate::router::Database), which runs each unit of work
//! directly on the client it gets here.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use crate::error::ConnectionError;

/// Default maximum number of connections in each pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default pool acquire timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default idle timeout in seconds.
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;

/// Lifecycle state of a connection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleState {
    /// Not connected yet, or released by `disconnect`.
    Disconnected,
    /// `connect` succeeded.
    Connected,
    /// The last `connect` attempt failed.
    Failed,
}

impl HandleState {
    const fn to_u8(self) -> u8 {
        match self {
            Self::Disconnected => 0,
            Self::Connected => 1,
            Self::Failed => 2,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connected,
            2 => Self::Failed,
            _ => Self::Disconnected,
        }
    }
}

/// Lock-free cell holding a [`HandleState`].
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    /// Create a cell in the `Disconnected` state.
    pub const fn new() -> Self {
        Self(AtomicU8::new(HandleState::Disconnected.to_u8()))
    }

    /// Read the current state.
    pub fn get(&self) -> HandleState {
        HandleState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Replace the current state.
    pub fn set(&self, state: HandleState) {
        self.0.store(state.to_u8(), Ordering::Release);
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Pool tuning shared by the primary and replica handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// How long to wait for a pooled connection before failing.
    pub connect_timeout: Duration,
    /// Idle connection timeout.
    pub idle_timeout: Duration,
}

impl PoolSettings {
    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the acquire timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }
}

/// A single database endpoint.
///
/// Handles are used through concrete types only (the router is generic
/// over `H`), so `async fn` here never needs to be object safe.
#[allow(async_fn_in_trait)]
pub trait ConnectionHandle: Send + Sync + Sized + 'static {
    /// What a unit of work receives. Must be cheap to clone (a pool).
    type Client: Clone + Send + Sync + 'static;

    /// Build a handle for `target` without performing any I/O.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Config`] if the target is malformed.
    fn open(target: &str, settings: &PoolSettings) -> Result<Self, ConnectionError>;

    /// A log-safe description of the endpoint (no credentials).
    fn target(&self) -> &str;

    /// Current lifecycle state.
    fn state(&self) -> HandleState;

    /// Establish the connection.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectionError`] if the endpoint is unreachable. The
    /// handle is left in [`HandleState::Failed`].
    async fn connect(&self) -> Result<(), ConnectionError>;

    /// Release all resources. Safe to call on a handle that never
    /// connected.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectionError`] if releasing fails.
    async fn disconnect(&self) -> Result<(), ConnectionError>;

    /// Hand out a client for one unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Unavailable`] once the handle has been
    /// disconnected.
    fn client(&self) -> Result<Self::Client, ConnectionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_cell_round_trips_every_state() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), HandleState::Disconnected);
        for state in [HandleState::Connected, HandleState::Failed, HandleState::Disconnected] {
            cell.set(state);
            assert_eq!(cell.get(), state);
        }
    }

    #[test]
    fn pool_settings_builders() {
        let settings = PoolSettings::default()
            .with_max_connections(3)
            .with_connect_timeout(Duration::from_millis(250))
            .with_idle_timeout(Duration::from_secs(1));
        assert_eq!(settings.max_connections, 3);
        assert_eq!(settings.connect_timeout, Duration::from_millis(250));
        assert_eq!(settings.idle_timeout, Duration::from_secs(1));
    }
}
