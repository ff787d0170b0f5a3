//! Bearer token issuance and verification.
//!
//! Tokens are JWTs signed with HS256 over a process-wide secret. Claims carry
//! the subject id and email plus standard issuer, audience, issued-at, and
//! expiry fields; the expiry is fixed at issuance time as `iat + TTL`.
//! Rotating the secret invalidates all previously issued tokens.

use std::borrow::Cow;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuthError, Result, TRACING_TARGET_TOKEN};

/// Claims embedded in a signed bearer token.
///
/// Contains both RFC 7519 registered claims and the keygate-specific email
/// claim. Timestamps are encoded as integer Unix seconds so that standard
/// JWT expiry validation applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthClaims {
    /// Issuer (who created the token).
    #[serde(rename = "iss")]
    issued_by: Cow<'static, str>,
    /// Audience (who the token is intended for).
    #[serde(rename = "aud")]
    audience: Cow<'static, str>,

    /// Subject id (unique identifier of the authenticated user).
    #[serde(rename = "sub")]
    pub subject_id: Uuid,
    /// Email of the authenticated user.
    pub email: String,

    /// Issued at (as UTC timestamp).
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time (as UTC timestamp).
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

impl AuthClaims {
    /// JWT issuer identifier for authentication tokens.
    const JWT_ISSUER: &'static str = "keygate";
    /// JWT audience identifier for authentication tokens.
    const JWT_AUDIENCE: &'static str = "keygate:auth";

    /// Creates claims for the given subject with the given lifetime.
    ///
    /// A lifetime that would overflow the timestamp range saturates to the
    /// maximum representable expiry instead of failing.
    fn new(subject_id: Uuid, email: impl Into<String>, ttl: SignedDuration) -> Self {
        let issued_at = Timestamp::now();
        Self {
            issued_by: Cow::Borrowed(Self::JWT_ISSUER),
            audience: Cow::Borrowed(Self::JWT_AUDIENCE),
            subject_id,
            email: email.into(),
            issued_at,
            expires_at: issued_at.checked_add(ttl).unwrap_or(Timestamp::MAX),
        }
    }

    /// Checks if the token has expired based on current UTC time.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    /// Returns the remaining lifetime, or zero if already expired.
    #[inline]
    #[must_use]
    pub fn remaining_lifetime(&self) -> SignedDuration {
        let remaining = self.expires_at.duration_since(Timestamp::now());
        remaining.max(SignedDuration::ZERO)
    }
}

/// Issues and verifies signed bearer tokens.
///
/// Cheap to clone; the signing keys and TTL are derived once from
/// configuration and immutable afterwards.
#[derive(Clone)]
pub struct TokenIssuer {
    inner: Arc<TokenIssuerInner>,
}

struct TokenIssuerInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: SignedDuration,
}

impl TokenIssuer {
    /// Creates a new issuer from a signing secret and a TTL in minutes.
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            inner: Arc::new(TokenIssuerInner {
                encoding_key: EncodingKey::from_secret(secret.as_bytes()),
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                ttl: SignedDuration::from_mins(ttl_minutes),
            }),
        }
    }

    /// Returns the configured token lifetime.
    #[inline]
    pub fn ttl(&self) -> SignedDuration {
        self.inner.ttl
    }

    /// Issues a signed token over the given subject id and email.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if encoding fails, which indicates a
    /// misconfigured signing key rather than a bad credential.
    pub fn issue(&self, subject_id: Uuid, email: &str) -> Result<String> {
        self.issue_with_ttl(subject_id, email, self.inner.ttl)
    }

    /// Issues a signed token with an explicit lifetime.
    ///
    /// A non-positive lifetime produces an already-expired token; useful for
    /// exercising expiry handling.
    pub fn issue_with_ttl(
        &self,
        subject_id: Uuid,
        email: &str,
        ttl: SignedDuration,
    ) -> Result<String> {
        let claims = AuthClaims::new(subject_id, email, ttl);
        let header = Header::new(Algorithm::HS256);

        let token = encode(&header, &claims, &self.inner.encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_TOKEN,
                error = %e,
                subject_id = %subject_id,
                "Failed to encode bearer token"
            );
            AuthError::Config("Token signing failed".into())
        })?;

        tracing::debug!(
            target: TRACING_TARGET_TOKEN,
            subject_id = %subject_id,
            expires_at = %claims.expires_at,
            "Bearer token issued"
        );

        Ok(token)
    }

    /// Parses and validates a signed token.
    ///
    /// Validation covers the signature, issuer, audience, and expiry.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenExpired`] for well-formed tokens past their expiry
    /// - [`AuthError::InvalidToken`] for everything else (malformed, unsigned,
    ///   wrong key, wrong issuer or audience)
    pub fn verify(&self, token: &str) -> Result<AuthClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_audience(&[AuthClaims::JWT_AUDIENCE]);
        validation.set_issuer(&[AuthClaims::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "sub", "iat", "exp"]);

        let token_data =
            decode::<AuthClaims>(token, &self.inner.decoding_key, &validation).map_err(|e| {
                let error = match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                };
                tracing::warn!(
                    target: TRACING_TARGET_TOKEN,
                    error = %e,
                    "Bearer token validation failed"
                );
                error
            })?;

        let claims = token_data.claims;

        // Double-check expiry against our own clock
        if claims.is_expired() {
            tracing::warn!(
                target: TRACING_TARGET_TOKEN,
                subject_id = %claims.subject_id,
                expired_at = %claims.expires_at,
                "Bearer token expired"
            );
            return Err(AuthError::TokenExpired);
        }

        tracing::debug!(
            target: TRACING_TARGET_TOKEN,
            subject_id = %claims.subject_id,
            remaining = ?claims.remaining_lifetime(),
            "Bearer token validated"
        );

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.inner.ttl)
            .finish_non_exhaustive()
    }
}
