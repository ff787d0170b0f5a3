//! Public-facing response types.
//!
//! These are the only user shapes allowed to cross the API boundary. The
//! password digest and biometric key exist solely on [`UserRecord`] and are
//! structurally absent here, so no serializer configuration can leak them.
//!
//! [`UserRecord`]: crate::store::UserRecord

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::UserRecord;

/// A user projection safe for client consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// Unique user identifier.
    pub id: Uuid,
    /// Registered email address.
    pub email: String,
    /// When the user was registered.
    pub created_at: Timestamp,
    /// When the user record was last modified.
    pub updated_at: Timestamp,
}

impl From<UserRecord> for PublicUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Successful authentication result: a bearer token plus the public
/// projection of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Signed bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: PublicUser,
}
