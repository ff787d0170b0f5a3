use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use deadpool::managed::{Hook, Pool};
use derive_more::{Deref, DerefMut};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};

use super::hooks;
use crate::{
    ConnectionPool, PgConfig, PgError, PgResult, PooledConnection, TRACING_TARGET_CONNECTION,
};

/// Connection pool status information.
#[derive(Debug, Clone)]
pub struct PgPoolStatus {
    /// Maximum number of connections in the pool.
    pub max_size: usize,
    /// Current number of connections in the pool.
    pub size: usize,
    /// Number of available connections.
    pub available: usize,
    /// Number of requests waiting for connections.
    pub waiting: usize,
}

impl PgPoolStatus {
    /// Returns the utilization percentage of the pool (0.0 to 1.0).
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            (self.size - self.available) as f64 / self.max_size as f64
        }
    }

    /// Returns whether the pool is under pressure (high utilization or waiting requests).
    #[inline]
    pub fn is_under_pressure(&self) -> bool {
        self.waiting > 0 || self.utilization() > 0.8
    }
}

/// High-level database client that manages the connection pool.
///
/// This struct provides the main interface for database operations,
/// encapsulating pool management and configuration. It is cheap to clone and
/// safe to share across request handlers.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

/// Inner data for PgClient.
struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// This will establish a connection pool without touching the database;
    /// connections are created lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or pool settings are invalid.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        config.validate()?;
        tracing::info!(target: TRACING_TARGET_CONNECTION, "Initializing database client");

        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(hooks::setup_callback);
        let manager =
            AsyncDieselConnectionManager::new_with_config(&config.postgres_url, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::sync_fn(hooks::post_create))
            .pre_recycle(Hook::sync_fn(hooks::pre_recycle))
            .post_recycle(Hook::sync_fn(hooks::post_recycle))
            .build()
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %e,
                    "Failed to create connection pool"
                );
                PgError::Unexpected(format!("Failed to build connection pool: {}", e).into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Gets a connection from the pool.
    ///
    /// Returns a [`PgConn`] wrapper that implements all repository traits.
    /// This method will wait up to the configured timeout for an available
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available within the timeout period.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let start = std::time::Instant::now();
        let conn = self.inner.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                elapsed = ?start.elapsed(),
                "Failed to acquire connection from pool"
            );
            PgError::from(e)
        })?;

        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(100) {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                elapsed = ?elapsed,
                "Connection acquisition took longer than expected"
            );
        }

        Ok(PgConn::new(conn))
    }

    /// Gets the current pool status and statistics.
    #[inline]
    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Gets the database configuration used by this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool_status = self.pool_status();
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field(
                "pool_max_connections",
                &self.inner.config.postgres_max_connections,
            )
            .field("pool_current_size", &pool_status.size)
            .field("pool_available", &pool_status.available)
            .field("pool_waiting", &pool_status.waiting)
            .finish()
    }
}

/// A wrapper around a pooled database connection.
///
/// `PgConn` owns a connection obtained from the connection pool and implements
/// all repository traits (e.g., [`UserRepository`]) via [`Deref`] to the
/// underlying [`AsyncPgConnection`]. When dropped, the connection is
/// automatically returned to the pool.
///
/// ```ignore
/// let mut conn = pg_client.get_connection().await?;
/// let user = conn.find_user_by_email("user@example.com").await?;
/// ```
///
/// [`UserRepository`]: crate::query::UserRepository
/// [`AsyncPgConnection`]: crate::PgConnection
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Creates a new connection wrapper from a pooled connection.
    pub fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_status_has_zero_utilization() {
        let status = PgPoolStatus {
            max_size: 0,
            size: 0,
            available: 0,
            waiting: 0,
        };
        assert_eq!(status.utilization(), 0.0);
        assert!(!status.is_under_pressure());
    }

    #[test]
    fn waiting_requests_put_pool_under_pressure() {
        let status = PgPoolStatus {
            max_size: 10,
            size: 4,
            available: 2,
            waiting: 1,
        };
        assert!(status.is_under_pressure());
    }
}
