#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for credential service operations.
pub const TRACING_TARGET_SERVICE: &str = "keygate_auth::service";

/// Tracing target for password hashing operations.
pub const TRACING_TARGET_HASHER: &str = "keygate_auth::hasher";

/// Tracing target for token issuance and verification.
pub const TRACING_TARGET_TOKEN: &str = "keygate_auth::token";

mod config;
mod error;
mod hasher;
mod service;
pub mod store;
mod token;
mod types;

pub use crate::config::AuthConfig;
pub use crate::error::{AuthError, AuthResult as Result};
pub use crate::hasher::PasswordHasher;
pub use crate::service::CredentialService;
pub use crate::store::{MemoryUserStore, NewUserRecord, PgUserStore, StoreError, UserRecord, UserStore};
pub use crate::token::{AuthClaims, TokenIssuer};
pub use crate::types::{AuthResponse, PublicUser};
