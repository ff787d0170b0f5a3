#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for client-related operations.
///
/// Use this target for logging client initialization, configuration, and lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "keygate_postgres::client";

/// Tracing target for database query operations.
///
/// Use this target for logging query execution, results, and query-related errors.
pub const TRACING_TARGET_QUERY: &str = "keygate_postgres::query";

/// Tracing target for database connection operations.
///
/// Use this target for logging connection establishment, pool management, and connection errors.
pub const TRACING_TARGET_CONNECTION: &str = "keygate_postgres::connection";

mod client;
pub mod model;
pub mod query;
mod schema;
pub mod types;

pub mod prelude;

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::ConnectionError;
use diesel::result::Error;
pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{ConnectionPool, PgClient, PgConfig, PgConn, PgPoolStatus, PooledConnection};
use crate::types::ConstraintViolation;

pub mod error {
    //! Error types and utilities for database operations.
    //!
    //! See [`PgError`] for the main error type used throughout this crate.
    //!
    //! [`PgError`]: crate::PgError

    /// Type-erased error type for dynamic error handling.
    pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

    pub use deadpool::managed::TimeoutType;
    pub use diesel::result::{ConnectionError as DieselConnectionError, Error as DieselError};
    pub use diesel_async::pooled_connection::PoolError as DieselPoolError;
    pub use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;
}

/// Error type for all PostgreSQL user-store operations.
///
/// Covers connection issues, query failures, timeouts, and configuration
/// problems. Constraint violations stay inside the [`Query`] variant and are
/// surfaced in structured form through [`constraint_violation`].
///
/// [`Query`]: PgError::Query
/// [`constraint_violation`]: PgError::constraint_violation
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Configuration error.
    ///
    /// Invalid configuration parameters or missing required settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation timed out.
    ///
    /// This can occur during connection creation, waiting for available
    /// connections, or connection recycling.
    #[error("Database operation timed out")]
    Timeout(TimeoutType),

    /// Failed to establish or maintain a database connection.
    #[error("Database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Database query execution failed.
    ///
    /// Includes constraint violations, type mismatches, and other
    /// query-related failures.
    #[error("Database query error: {0}")]
    Query(#[from] Error),

    /// Unexpected error occurred.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Extracts the constraint name from a constraint violation error.
    ///
    /// # Returns
    ///
    /// - `Some(constraint_name)` if this error represents a constraint violation
    /// - `None` otherwise
    pub fn constraint(&self) -> Option<&str> {
        let PgError::Query(err) = self else {
            return None;
        };

        let Error::DatabaseError(_, err) = err else {
            return None;
        };

        err.constraint_name()
    }

    /// Returns a structured constraint violation if this error represents one.
    ///
    /// Unknown constraint names (for example from tables outside this crate's
    /// schema) return `None`; callers should treat those as plain query errors.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    /// Returns whether this error indicates a transient failure that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_) | PgError::Connection(ConnectionError::BadConnection(_))
        )
    }

    /// Returns whether this error indicates a permanent failure that won't succeed on retry.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

impl From<error::DeadpoolError> for PgError {
    fn from(value: error::DeadpoolError) -> Self {
        use error::{DeadpoolError, DieselPoolError};

        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => {
                tracing::warn!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %err,
                    "Unexpected post-create hook error"
                );
                Self::Unexpected(err.to_string().into())
            }
            DeadpoolError::NoRuntimeSpecified => {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    "No tokio runtime specified for connection pool"
                );
                Self::Unexpected("No runtime specified".into())
            }
            DeadpoolError::Closed => Self::Connection(ConnectionError::InvalidConnectionUrl(
                "Connection pool is closed".into(),
            )),
        }
    }
}

/// Specialized [`Result`] type for database operations.
pub type PgResult<T, E = PgError> = Result<T, E>;
