//! Password hashing and verification using bcrypt.
//!
//! The hasher wraps the bcrypt adaptive hash with a configurable cost factor.
//! Hashing salts every digest independently, so two hashes of the same
//! password never compare equal; verification runs in time independent of
//! where a mismatch occurs.

use crate::{AuthError, Result, TRACING_TARGET_HASHER};

/// Fixed input for the precomputed decoy digest.
const DUMMY_PASSWORD: &str = "keygate-decoy-password";

/// Password hashing and verification service.
///
/// Cheap to clone; the cost factor and the decoy digest are fixed at
/// construction time.
///
/// # Example
///
/// ```rust
/// use keygate_auth::PasswordHasher;
///
/// # fn main() -> Result<(), keygate_auth::AuthError> {
/// let hasher = PasswordHasher::new(4)?;
/// let digest = hasher.hash("secure_password_123")?;
/// assert!(hasher.verify("secure_password_123", &digest)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_digest: String,
}

impl PasswordHasher {
    /// Creates a new hasher with the given bcrypt cost factor.
    ///
    /// A decoy digest is precomputed here so that [`verify_dummy`] costs the
    /// same as a real verification without hashing on the hot path.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Hasher`] if the cost factor is outside the range
    /// bcrypt accepts.
    ///
    /// [`verify_dummy`]: PasswordHasher::verify_dummy
    pub fn new(cost: u32) -> Result<Self> {
        let dummy_digest = bcrypt::hash(DUMMY_PASSWORD, cost).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_HASHER,
                error = %e,
                cost = cost,
                "Failed to initialize password hasher"
            );
            AuthError::Hasher(e)
        })?;

        Ok(Self { cost, dummy_digest })
    }

    /// Returns the configured cost factor.
    #[inline]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// The returned digest embeds the algorithm, cost, and salt, and is
    /// suitable for long-term storage.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Hasher`] only for library-level failures; these
    /// are infrastructure errors, not user errors.
    pub fn hash(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.cost).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_HASHER,
                error = %e,
                "Password hashing operation failed"
            );
            AuthError::Hasher(e)
        })
    }

    /// Verifies a password against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch; a mismatch is never an error. The
    /// comparison is constant-time with respect to the position of the first
    /// differing byte.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Hasher`] if the stored digest is malformed, which
    /// indicates data corruption rather than a bad credential.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        bcrypt::verify(password, digest).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_HASHER,
                error = %e,
                "Stored password digest is malformed"
            );
            AuthError::Hasher(e)
        })
    }

    /// Performs a decoy verification to keep timing consistent.
    ///
    /// Used when no user was found for a login attempt, so the missing-user
    /// path costs the same as a real password check and timing analysis
    /// cannot distinguish the two. Always returns `false`.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = bcrypt::verify(password, &self.dummy_digest);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum legal cost keeps the test suite fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new(TEST_COST)?;
        let digest = hasher.hash("secure_password_123")?;

        assert!(digest.starts_with("$2"));
        assert!(hasher.verify("secure_password_123", &digest)?);
        assert!(!hasher.verify("wrong_password", &digest)?);

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new(TEST_COST)?;

        let first = hasher.hash("test_password")?;
        let second = hasher.hash("test_password")?;

        assert_ne!(first, second);
        assert!(hasher.verify("test_password", &first)?);
        assert!(hasher.verify("test_password", &second)?);

        Ok(())
    }

    #[test]
    fn malformed_digest_is_an_infrastructure_error() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new(TEST_COST)?;
        let result = hasher.verify("password", "not_a_bcrypt_digest");
        assert!(matches!(result, Err(AuthError::Hasher(_))));
        Ok(())
    }

    #[test]
    fn dummy_verification_always_fails() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new(TEST_COST)?;
        assert!(!hasher.verify_dummy("any_password"));
        assert!(!hasher.verify_dummy(DUMMY_PASSWORD));
        Ok(())
    }

    #[test]
    fn illegal_cost_is_rejected() {
        assert!(matches!(PasswordHasher::new(64), Err(AuthError::Hasher(_))));
    }
}
