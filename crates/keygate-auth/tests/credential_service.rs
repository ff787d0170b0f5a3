//! End-to-end tests for the credential service over the in-memory store.

use std::sync::Arc;

use jiff::SignedDuration;
use keygate_auth::{
    AuthError, CredentialService, MemoryUserStore, PasswordHasher, TokenIssuer, UserStore,
};
use uuid::Uuid;

// Minimum legal bcrypt cost keeps the suite fast.
const TEST_COST: u32 = 4;
const TEST_SECRET: &str = "integration-test-secret";

struct Harness {
    service: CredentialService,
    store: Arc<MemoryUserStore>,
}

fn harness() -> anyhow::Result<Harness> {
    let store = Arc::new(MemoryUserStore::new());
    let service = CredentialService::new(
        store.clone(),
        PasswordHasher::new(TEST_COST)?,
        TokenIssuer::new(TEST_SECRET, 60),
    );
    Ok(Harness { service, store })
}

#[tokio::test]
async fn register_then_login_roundtrip() -> anyhow::Result<()> {
    let h = harness()?;

    let user = h
        .service
        .register("user@example.com", "correct-horse", None)
        .await?;
    assert_eq!(user.email, "user@example.com");

    let auth = h.service.login("user@example.com", "correct-horse").await?;
    assert!(!auth.token.is_empty());
    assert_eq!(auth.user.id, user.id);
    assert_eq!(auth.user.email, user.email);

    Ok(())
}

#[tokio::test]
async fn register_returns_the_normalized_email() -> anyhow::Result<()> {
    let h = harness()?;

    // Mixed-case input is canonicalized before storage, so the response
    // reflects the stored identity rather than echoing the raw input.
    let user = h
        .service
        .register("  Alice@Example.COM ", "password", None)
        .await?;
    assert_eq!(user.email, "alice@example.com");

    Ok(())
}

#[tokio::test]
async fn login_email_is_case_insensitive() -> anyhow::Result<()> {
    let h = harness()?;
    h.service
        .register("User@Example.COM", "correct-horse", None)
        .await?;

    let auth = h.service.login("user@example.com", "correct-horse").await?;
    assert_eq!(auth.user.email, "user@example.com");

    Ok(())
}

#[tokio::test]
async fn empty_email_or_password_is_rejected() -> anyhow::Result<()> {
    let h = harness()?;

    let result = h.service.register("", "password", None).await;
    assert!(matches!(result, Err(AuthError::InvalidRequest(_))));

    let result = h.service.register("user@example.com", "", None).await;
    assert!(matches!(result, Err(AuthError::InvalidRequest(_))));

    let result = h
        .service
        .register("user@example.com", "password", Some("  "))
        .await;
    assert!(matches!(result, Err(AuthError::InvalidRequest(_))));

    assert_eq!(h.store.count_users().await?, 0);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_fails_and_leaves_store_unchanged() -> anyhow::Result<()> {
    let h = harness()?;
    h.service
        .register("user@example.com", "first-password", None)
        .await?;

    let result = h
        .service
        .register("USER@example.com", "second-password", None)
        .await;
    assert!(matches!(
        result,
        Err(AuthError::DuplicateCredential { .. })
    ));
    assert_eq!(h.store.count_users().await?, 1);

    // The original credential still works after the failed attempt.
    h.service.login("user@example.com", "first-password").await?;

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_registers_resolve_to_one_winner() -> anyhow::Result<()> {
    let h = harness()?;

    let first = tokio::spawn({
        let service = h.service.clone();
        async move { service.register("race@example.com", "password-a", None).await }
    });
    let second = tokio::spawn({
        let service = h.service.clone();
        async move { service.register("race@example.com", "password-b", None).await }
    });

    let results = [first.await?, second.await?];
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let losers = results
        .iter()
        .filter(|r| matches!(r, Err(AuthError::DuplicateCredential { .. })))
        .count();

    // Which create wins is the store's business; exactly one must.
    assert_eq!(winners, 1);
    assert_eq!(losers, 1);
    assert_eq!(h.store.count_users().await?, 1);

    Ok(())
}

#[tokio::test]
async fn duplicate_error_message_hides_constraint_name() -> anyhow::Result<()> {
    let h = harness()?;
    h.service
        .register("user@example.com", "password", None)
        .await?;

    let error = h
        .service
        .register("user@example.com", "password", None)
        .await
        .expect_err("duplicate must fail");

    assert_eq!(error.to_string(), "Credential already registered");

    Ok(())
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_distinct_errors() -> anyhow::Result<()> {
    let h = harness()?;
    h.service
        .register("user@example.com", "correct-horse", None)
        .await?;

    let result = h.service.login("ghost@example.com", "correct-horse").await;
    assert!(matches!(result, Err(AuthError::UserNotFound)));

    let result = h.service.login("user@example.com", "wrong-horse").await;
    assert!(matches!(result, Err(AuthError::InvalidCredential)));

    Ok(())
}

#[tokio::test]
async fn biometric_login_issues_token_for_enrolled_user() -> anyhow::Result<()> {
    let h = harness()?;
    let user = h
        .service
        .register("user@example.com", "password", Some("device-key-1"))
        .await?;

    let auth = h.service.biometric_login("device-key-1").await?;
    assert_eq!(auth.user.id, user.id);

    let claims = h.service.tokens().verify(&auth.token)?;
    assert_eq!(claims.subject_id, user.id);
    assert_eq!(claims.email, "user@example.com");

    Ok(())
}

#[tokio::test]
async fn unknown_biometric_key_is_rejected() -> anyhow::Result<()> {
    let h = harness()?;
    h.service
        .register("user@example.com", "password", Some("device-key-1"))
        .await?;

    // Keys match verbatim; a prefix or different case is a different key.
    let result = h.service.biometric_login("device-key").await;
    assert!(matches!(result, Err(AuthError::InvalidBiometricKey)));

    let result = h.service.biometric_login("DEVICE-KEY-1").await;
    assert!(matches!(result, Err(AuthError::InvalidBiometricKey)));

    Ok(())
}

#[tokio::test]
async fn second_user_cannot_enroll_same_biometric_key() -> anyhow::Result<()> {
    let h = harness()?;
    h.service
        .register("a@example.com", "password", Some("shared-key"))
        .await?;

    let result = h
        .service
        .register("b@example.com", "password", Some("shared-key"))
        .await;
    assert!(matches!(
        result,
        Err(AuthError::DuplicateCredential { .. })
    ));
    assert_eq!(h.store.count_users().await?, 1);

    Ok(())
}

#[tokio::test]
async fn current_user_resolves_a_fresh_token() -> anyhow::Result<()> {
    let h = harness()?;
    let user = h
        .service
        .register("user@example.com", "password", None)
        .await?;
    let auth = h.service.login("user@example.com", "password").await?;

    let current = h.service.current_user(&auth.token).await?;
    assert_eq!(current.id, user.id);
    assert_eq!(current.email, "user@example.com");

    Ok(())
}

#[tokio::test]
async fn current_user_rejects_garbage_and_expired_tokens() -> anyhow::Result<()> {
    let h = harness()?;
    let user = h
        .service
        .register("user@example.com", "password", None)
        .await?;

    let result = h.service.current_user("not.a.token").await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));

    let expired = h.service.tokens().issue_with_ttl(
        user.id,
        &user.email,
        SignedDuration::from_mins(-5),
    )?;
    let result = h.service.current_user(&expired).await;
    assert!(matches!(result, Err(AuthError::TokenExpired)));

    Ok(())
}

#[tokio::test]
async fn valid_token_for_deleted_subject_is_not_found() -> anyhow::Result<()> {
    let h = harness()?;

    // Token verifies, but its subject id never existed in this store.
    let token = h
        .service
        .tokens()
        .issue(Uuid::new_v4(), "ghost@example.com")?;

    let result = h.service.current_user(&token).await;
    assert!(matches!(result, Err(AuthError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn find_by_id_returns_public_projection() -> anyhow::Result<()> {
    let h = harness()?;
    let user = h
        .service
        .register("user@example.com", "password", Some("device-key-1"))
        .await?;

    let found = h
        .service
        .find_by_id(user.id)
        .await?
        .expect("user must exist");
    let json = serde_json::to_string(&found)?;
    assert!(!json.contains("password"));
    assert!(!json.contains("device-key-1"));

    assert!(h.service.find_by_id(Uuid::new_v4()).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn auth_response_serializes_for_transport() -> anyhow::Result<()> {
    let h = harness()?;
    h.service
        .register("user@example.com", "password", None)
        .await?;
    let auth = h.service.login("user@example.com", "password").await?;

    let json: serde_json::Value = serde_json::to_value(&auth)?;
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["email"], "user@example.com");
    assert!(json["user"].get("passwordHash").is_none());
    assert!(json["user"].get("biometricKey").is_none());

    Ok(())
}
