//! Postgres-backed user store.
//!
//! Adapts [`keygate_postgres`] to the [`UserStore`] trait: repository calls
//! go through a pooled connection per operation, and uniqueness violations
//! reported by the database are translated into [`StoreError::Duplicate`]
//! without assuming which of two racing creates was rejected.

use async_trait::async_trait;
use keygate_postgres::model::{NewUser, User};
use keygate_postgres::query::UserRepository;
use keygate_postgres::{PgClient, PgError};
use uuid::Uuid;

use super::{NewUserRecord, StoreError, UserRecord, UserStore};

/// Production [`UserStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    client: PgClient,
}

impl PgUserStore {
    /// Creates a store over an existing database client.
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }

    /// Returns the underlying database client.
    pub fn client(&self) -> &PgClient {
        &self.client
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            biometric_key: user.biometric_key,
        }
    }
}

impl From<PgError> for StoreError {
    fn from(error: PgError) -> Self {
        // Only uniqueness conflicts are domain-meaningful; validation and
        // chronological constraint failures indicate a bug or corruption.
        match error.constraint_violation() {
            Some(violation) if violation.is_uniqueness() => StoreError::Duplicate {
                constraint: violation.to_string(),
            },
            _ => StoreError::Unavailable(Box::new(error)),
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, new_user: NewUserRecord) -> Result<UserRecord, StoreError> {
        let mut conn = self.client.get_connection().await?;
        let user = conn
            .create_user(NewUser {
                email: new_user.email,
                password_hash: new_user.password_hash,
                biometric_key: new_user.biometric_key,
            })
            .await?;
        Ok(user.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let mut conn = self.client.get_connection().await?;
        let user = conn.find_user_by_id(id).await?;
        Ok(user.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let mut conn = self.client.get_connection().await?;
        let user = conn.find_user_by_email(email).await?;
        Ok(user.map(Into::into))
    }

    async fn find_by_biometric_key(&self, key: &str) -> Result<Option<UserRecord>, StoreError> {
        let mut conn = self.client.get_connection().await?;
        let user = conn.find_user_by_biometric_key(key).await?;
        Ok(user.map(Into::into))
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        let mut conn = self.client.get_connection().await?;
        let count = conn.count_users().await?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    use super::*;

    struct ConstraintInfo(&'static str);

    impl diesel::result::DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation(constraint: &'static str) -> PgError {
        PgError::Query(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintInfo(constraint)),
        ))
    }

    #[test]
    fn unique_violation_maps_to_duplicate() {
        let error = StoreError::from(unique_violation("users_email_unique_idx"));
        assert!(matches!(
            error,
            StoreError::Duplicate { ref constraint } if constraint == "users_email_unique_idx"
        ));
    }

    #[test]
    fn biometric_unique_violation_maps_to_duplicate() {
        let error = StoreError::from(unique_violation("users_biometric_key_unique_idx"));
        assert!(matches!(error, StoreError::Duplicate { .. }));
    }

    #[test]
    fn non_unique_constraint_is_infrastructure() {
        let error = StoreError::from(unique_violation("users_email_format"));
        assert!(matches!(error, StoreError::Unavailable(_)));
    }

    #[test]
    fn unknown_constraint_is_infrastructure() {
        let error = StoreError::from(unique_violation("other_table_unique_idx"));
        assert!(matches!(error, StoreError::Unavailable(_)));
    }
}
