//! User model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`User`] - Full user record including the password digest
//! - [`NewUser`] - Data structure for creating new users
//!
//! There is no update model: this store only mutates `updated_at` through
//! its own bookkeeping trigger, and users are never modified by the core.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::users;

/// A user record as stored in the database.
///
/// Contains the password digest and the optional biometric key; neither field
/// may ever appear in a public-facing projection. The id and both timestamps
/// are generated and maintained by the database.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier, generated at insert time.
    pub id: Uuid,
    /// Primary login credential, unique across all users.
    pub email: String,
    /// One-way password digest (bcrypt PHC string).
    pub password_hash: String,
    /// Optional alternate login credential, unique when present.
    pub biometric_key: Option<String>,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Primary login credential.
    pub email: String,
    /// One-way password digest.
    pub password_hash: String,
    /// Optional alternate login credential.
    pub biometric_key: Option<String>,
}

impl User {
    /// Returns the creation timestamp as a [`jiff::Timestamp`].
    pub fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }

    /// Returns the last-update timestamp as a [`jiff::Timestamp`].
    pub fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}
