//! Error taxonomy for credential operations.
//!
//! Domain errors are recoverable at the API boundary and safe to translate
//! into transport-level error responses. Infrastructure errors (store
//! unavailable, hasher or signing misconfiguration) are not: they should
//! abort the request with a generic failure and never surface store-level
//! diagnostic detail to callers.

use std::borrow::Cow;

use crate::store::StoreError;

/// Specialized [`Result`] type for credential operations.
pub type AuthResult<T, E = AuthError> = std::result::Result<T, E>;

/// The error type for all credential operations.
///
/// Display messages are safe for client consumption; diagnostic detail such
/// as the violated constraint name is carried separately and must only be
/// logged, never echoed to users.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors do nothing unless handled"]
pub enum AuthError {
    /// A required argument was missing or empty.
    #[error("Invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),

    /// The email or biometric key is already registered.
    ///
    /// Registration is intentionally not idempotent: a second register call
    /// with the same email fails with this error by design.
    #[error("Credential already registered")]
    DuplicateCredential {
        /// Name of the violated unique constraint, for diagnostics only.
        constraint: Option<String>,
    },

    /// No user is registered under the given email.
    #[error("User not found")]
    UserNotFound,

    /// The password did not match the stored digest.
    #[error("Invalid password")]
    InvalidCredential,

    /// No user is enrolled under the given biometric key.
    #[error("Invalid biometric key")]
    InvalidBiometricKey,

    /// The token is malformed, unsigned, or signed with the wrong key.
    #[error("Invalid token")]
    InvalidToken,

    /// The token is well-formed but its expiry has passed.
    #[error("Token expired")]
    TokenExpired,

    /// The subject id no longer resolves to a user.
    #[error("Not found")]
    NotFound,

    /// Configuration error (infrastructure).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Password hashing failure (infrastructure).
    #[error("Password processing failed")]
    Hasher(#[source] bcrypt::BcryptError),

    /// The user store failed for reasons other than a uniqueness conflict
    /// (infrastructure).
    #[error("User store unavailable")]
    Store(#[source] StoreError),
}

impl AuthError {
    /// Returns whether this error is a domain error, recoverable at the API
    /// boundary.
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            AuthError::Config(_) | AuthError::Hasher(_) | AuthError::Store(_)
        )
    }

    /// Returns whether this error is an infrastructure failure.
    pub fn is_infrastructure(&self) -> bool {
        !self.is_domain()
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate { constraint } => AuthError::DuplicateCredential {
                constraint: Some(constraint),
            },
            error => AuthError::Store(error),
        }
    }
}
