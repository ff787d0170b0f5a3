//! User repository for credential lookups and registration.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewUser, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
///
/// Handles the full lifecycle this store exposes: creation and unique-key
/// lookups. Uniqueness of `email` and `biometric_key` is enforced by the
/// database at insert time, so two concurrent creates with the same
/// credential resolve to exactly one winner; the loser surfaces as a
/// constraint-violation [`PgError`].
pub trait UserRepository {
    /// Creates a new user record.
    ///
    /// The email is normalized to trimmed lowercase before insertion. The id
    /// and timestamps are assigned by the database.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by email address.
    ///
    /// Email comparison is case-insensitive via lowercase normalization.
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by its enrolled biometric key.
    ///
    /// The key is compared exactly; no normalization is applied.
    fn find_user_by_biometric_key(
        &mut self,
        biometric_key: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Returns the total number of registered users.
    fn count_users(&mut self) -> impl Future<Output = PgResult<i64>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, mut new_user: NewUser) -> PgResult<User> {
        use schema::users;

        new_user.email = new_user.email.trim().to_lowercase();

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_by_id(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::email.eq(email.trim().to_lowercase()))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_biometric_key(&mut self, biometric_key: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::biometric_key.eq(biometric_key))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn count_users(&mut self) -> PgResult<i64> {
        use schema::users;

        users::table
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)
    }
}
