//! User store abstraction.
//!
//! The credential service talks to persistence through the [`UserStore`]
//! trait so that the production Postgres store and in-memory fakes are
//! interchangeable. The store owns identifier generation, timestamp
//! bookkeeping, and uniqueness enforcement: when two concurrent creates race
//! on the same credential, the store decides which one wins and reports the
//! loser as [`StoreError::Duplicate`].

mod memory;
mod postgres;

use async_trait::async_trait;
use jiff::Timestamp;
pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;
use uuid::Uuid;

/// Type-erased error type for store backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A stored user record, including credential material.
///
/// This is the store-internal shape; it must never cross the API boundary.
/// Public responses use [`PublicUser`] instead.
///
/// [`PublicUser`]: crate::PublicUser
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Unique identifier, generated by the store at creation time.
    pub id: Uuid,
    /// Primary login credential, unique across all users.
    pub email: String,
    /// One-way password digest.
    pub password_hash: String,
    /// Optional alternate login credential, unique when present.
    pub biometric_key: Option<String>,
    /// Set by the store when the record is created.
    pub created_at: Timestamp,
    /// Maintained by the store; this core never updates records.
    pub updated_at: Timestamp,
}

/// Data for creating a new user record.
#[derive(Debug, Clone, Default)]
pub struct NewUserRecord {
    /// Primary login credential.
    pub email: String,
    /// One-way password digest.
    pub password_hash: String,
    /// Optional alternate login credential.
    pub biometric_key: Option<String>,
}

/// The error type for user store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    ///
    /// The constraint name identifies which credential collided; it is
    /// diagnostic detail and must not be echoed to users.
    #[error("Unique constraint violated: {constraint}")]
    Duplicate {
        /// Name of the violated constraint.
        constraint: String,
    },

    /// The store could not be reached or failed internally.
    #[error("Store unavailable: {0}")]
    Unavailable(#[source] BoxError),
}

/// Persistence interface for user records.
///
/// Implementations must enforce the email and biometric-key unique
/// constraints atomically at insert time; callers never pre-check.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a new user, assigning its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] when the email or biometric key is
    /// already registered.
    async fn create_user(&self, new_user: NewUserRecord) -> Result<UserRecord, StoreError>;

    /// Finds a user by its unique identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Finds a user by email address (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Finds a user by exact biometric key.
    async fn find_by_biometric_key(&self, key: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Returns the total number of registered users.
    async fn count_users(&self) -> Result<u64, StoreError>;
}
