//! Prelude module for keygate-postgres.
//!
//! Re-exports the most commonly used types and traits so a single
//! `use keygate_postgres::prelude::*;` is enough for most callers.

// Common query traits
pub use diesel::prelude::*;
pub use diesel_async::RunQueryDsl;

pub use crate::client::{ConnectionPool, PgClient, PgConfig, PgConn, PgPoolStatus};
pub use crate::model::{NewUser, User};
pub use crate::query::UserRepository;
pub use crate::types::{ConstraintCategory, ConstraintViolation};
// Connection and error types
pub use crate::{PgConnection, PgError, PgResult};
