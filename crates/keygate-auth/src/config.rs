//! Authentication configuration.
//!
//! All values are loaded once at process start and treated as immutable
//! afterwards. The token secret ships with an insecure development default
//! that [`AuthConfig::validate`] rejects in release builds; rotating the
//! secret invalidates all previously issued tokens.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{AuthError, Result};

/// Insecure default secret, usable in development builds only.
const INSECURE_DEFAULT_SECRET: &str = "keygate-insecure-dev-secret";

/// Default token lifetime in minutes.
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Default bcrypt cost factor.
const DEFAULT_BCRYPT_COST: u32 = 10;

// bcrypt-legal cost range.
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

const MIN_TOKEN_TTL_MINUTES: i64 = 1;
const MAX_TOKEN_TTL_MINUTES: i64 = 24 * 60;

/// Configuration for the credential service.
///
/// ## Example
///
/// ```rust
/// use keygate_auth::AuthConfig;
///
/// let config = AuthConfig::new("a-long-random-secret");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "configurations do nothing unless used to build services"]
pub struct AuthConfig {
    /// Secret used to sign and verify bearer tokens.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "token-secret",
            env = "TOKEN_SECRET",
            default_value = INSECURE_DEFAULT_SECRET,
            hide_env_values = true
        )
    )]
    pub token_secret: String,

    /// Bearer token lifetime in minutes.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "token-ttl-minutes",
            env = "TOKEN_TTL_MINUTES",
            default_value = "60"
        )
    )]
    pub token_ttl_minutes: i64,

    /// bcrypt cost factor used when hashing passwords.
    #[cfg_attr(
        feature = "config",
        arg(long = "bcrypt-cost", env = "BCRYPT_COST", default_value = "10")
    )]
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Creates a configuration with the given secret and default TTL and cost.
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the secret is empty, if the insecure
    /// development default is used in a release build, or if the TTL or cost
    /// falls outside its legal range.
    pub fn validate(&self) -> Result<()> {
        if self.token_secret.is_empty() {
            return Err(AuthError::Config("Token secret must not be empty".into()));
        }

        if self.token_secret == INSECURE_DEFAULT_SECRET && !cfg!(debug_assertions) {
            return Err(AuthError::Config(
                "Insecure default token secret must be overridden in production".into(),
            ));
        }

        if !(MIN_TOKEN_TTL_MINUTES..=MAX_TOKEN_TTL_MINUTES).contains(&self.token_ttl_minutes) {
            return Err(AuthError::Config(format!(
                "Token TTL must be between {} and {} minutes, got {}",
                MIN_TOKEN_TTL_MINUTES, MAX_TOKEN_TTL_MINUTES, self.token_ttl_minutes
            )));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(AuthError::Config(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, self.bcrypt_cost
            )));
        }

        Ok(())
    }

    /// Sets the token lifetime in minutes.
    pub fn with_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.token_ttl_minutes = minutes;
        self
    }

    /// Sets the bcrypt cost factor.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

impl Default for AuthConfig {
    /// Development defaults: insecure secret, 60 minute TTL, cost 10.
    fn default() -> Self {
        Self::new(INSECURE_DEFAULT_SECRET)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"***")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_development_values() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl_minutes, 60);
        assert_eq!(config.bcrypt_cost, 10);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let config = AuthConfig::new("");
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn insecure_default_is_rejected_in_release_builds() {
        let config = AuthConfig::default();
        if cfg!(debug_assertions) {
            assert!(config.validate().is_ok());
        } else {
            assert!(matches!(config.validate(), Err(AuthError::Config(_))));
        }
    }

    #[test]
    fn out_of_range_cost_is_rejected() {
        let config = AuthConfig::new("secret").with_bcrypt_cost(32);
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn out_of_range_ttl_is_rejected() {
        let config = AuthConfig::new("secret").with_token_ttl_minutes(0);
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn debug_output_does_not_leak_secret() {
        let config = AuthConfig::new("super-secret-value");
        assert!(!format!("{config:?}").contains("super-secret-value"));
    }
}
