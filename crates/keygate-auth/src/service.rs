//! Credential service: registration, login, and current-user lookup.
//!
//! The service composes the password hasher, the token issuer, and a
//! [`UserStore`] into the four credential operations. It never pre-checks
//! uniqueness; duplicate credentials are detected by the store at insert time
//! so concurrent registrations cannot race past a read-then-write gap.

use std::sync::Arc;

use uuid::Uuid;

use crate::store::{NewUserRecord, UserStore};
use crate::{
    AuthClaims, AuthConfig, AuthError, AuthResponse, PasswordHasher, PublicUser, Result,
    TRACING_TARGET_SERVICE, TokenIssuer,
};

/// Registration, login, and identity lookup over a [`UserStore`].
///
/// Cheap to clone; all fields are shared behind [`Arc`]s.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl CredentialService {
    /// Creates a service from explicit parts.
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Creates a service from configuration and a user store.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the configuration fails validation,
    /// or [`AuthError::Hasher`] if the hasher cannot be initialized.
    pub fn from_config(config: &AuthConfig, store: Arc<dyn UserStore>) -> Result<Self> {
        config.validate()?;

        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        let tokens = TokenIssuer::new(&config.token_secret, config.token_ttl_minutes);

        Ok(Self::new(store, hasher, tokens))
    }

    /// Returns the token issuer used by this service.
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Registers a new user with an email, a password, and an optional
    /// biometric key.
    ///
    /// The password is hashed before anything is persisted; the plaintext is
    /// never stored or logged. Registration does not issue a token: callers
    /// log in afterwards.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidRequest`] if the email or password is empty, or
    ///   the biometric key is present but empty
    /// - [`AuthError::DuplicateCredential`] if the email or biometric key is
    ///   already registered
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        biometric_key: Option<&str>,
    ) -> Result<PublicUser> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::InvalidRequest("email must not be empty".into()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidRequest(
                "password must not be empty".into(),
            ));
        }
        if biometric_key.is_some_and(|key| key.trim().is_empty()) {
            return Err(AuthError::InvalidRequest(
                "biometric key must not be empty when provided".into(),
            ));
        }

        let password_hash = self.hasher.hash(password)?;
        let record = self
            .store
            .create_user(NewUserRecord {
                email: email.to_owned(),
                password_hash,
                biometric_key: biometric_key.map(str::to_owned),
            })
            .await
            .inspect_err(|e| {
                if let crate::store::StoreError::Duplicate { constraint } = e {
                    tracing::warn!(
                        target: TRACING_TARGET_SERVICE,
                        constraint = %constraint,
                        "Registration rejected by unique constraint"
                    );
                }
            })?;

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            user_id = %record.id,
            biometric = record.biometric_key.is_some(),
            "User registered"
        );

        Ok(record.into())
    }

    /// Authenticates a user by email and password, issuing a bearer token.
    ///
    /// The missing-user and wrong-password paths run a password verification
    /// either way, so their timing is indistinguishable even though the
    /// errors differ.
    ///
    /// # Errors
    ///
    /// - [`AuthError::UserNotFound`] if no user exists under the email
    /// - [`AuthError::InvalidCredential`] if the password does not match
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let Some(record) = self.store.find_by_email(email).await? else {
            self.hasher.verify_dummy(password);
            tracing::warn!(
                target: TRACING_TARGET_SERVICE,
                "Login attempt for unknown email"
            );
            return Err(AuthError::UserNotFound);
        };

        if !self.hasher.verify(password, &record.password_hash)? {
            tracing::warn!(
                target: TRACING_TARGET_SERVICE,
                user_id = %record.id,
                "Login rejected: password mismatch"
            );
            return Err(AuthError::InvalidCredential);
        }

        let token = self.tokens.issue(record.id, &record.email)?;

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            user_id = %record.id,
            "User logged in with password"
        );

        Ok(AuthResponse {
            token,
            user: record.into(),
        })
    }

    /// Authenticates a user by exact biometric key, issuing a bearer token.
    ///
    /// Biometric keys are opaque device-bound identifiers matched verbatim.
    /// An unknown key is reported without revealing whether any key is close
    /// to it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidBiometricKey`] if no user is enrolled
    /// under the key.
    pub async fn biometric_login(&self, biometric_key: &str) -> Result<AuthResponse> {
        let Some(record) = self.store.find_by_biometric_key(biometric_key).await? else {
            tracing::warn!(
                target: TRACING_TARGET_SERVICE,
                "Login attempt with unknown biometric key"
            );
            return Err(AuthError::InvalidBiometricKey);
        };

        let token = self.tokens.issue(record.id, &record.email)?;

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            user_id = %record.id,
            "User logged in with biometric key"
        );

        Ok(AuthResponse {
            token,
            user: record.into(),
        })
    }

    /// Finds a user by id, returning its public projection.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PublicUser>> {
        let record = self.store.find_by_id(id).await?;
        Ok(record.map(Into::into))
    }

    /// Resolves a bearer token to the current user.
    ///
    /// Verifies the token, then looks up the subject. A valid token whose
    /// subject no longer exists (for example after account deletion) fails
    /// with [`AuthError::NotFound`] rather than trusting the token's claims.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidToken`] or [`AuthError::TokenExpired`] if the
    ///   token does not verify
    /// - [`AuthError::NotFound`] if the subject id resolves to no user
    pub async fn current_user(&self, token: &str) -> Result<PublicUser> {
        let claims = self.tokens.verify(token)?;
        self.resolve_claims(&claims).await
    }

    /// Looks up the user behind already-verified claims.
    pub async fn resolve_claims(&self, claims: &AuthClaims) -> Result<PublicUser> {
        let user = self
            .find_by_id(claims.subject_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        tracing::debug!(
            target: TRACING_TARGET_SERVICE,
            user_id = %user.id,
            "Resolved current user from token"
        );

        Ok(user)
    }
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
