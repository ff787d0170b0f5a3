//! In-memory user store for tests and embedded use.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use jiff::Timestamp;
use uuid::Uuid;

use super::{NewUserRecord, StoreError, UserRecord, UserStore};

// Constraint names mirror the Postgres schema so error mapping behaves
// identically across backends.
const EMAIL_UNIQUE: &str = "users_email_unique_idx";
const BIOMETRIC_KEY_UNIQUE: &str = "users_biometric_key_unique_idx";

/// An in-process [`UserStore`] with the same observable behavior as the
/// Postgres store: generated ids, store-managed timestamps, normalized
/// emails, and atomic uniqueness enforcement.
///
/// Intended for unit and integration testing; all data is lost on drop.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, new_user: NewUserRecord) -> Result<UserRecord, StoreError> {
        let email = new_user.email.trim().to_lowercase();
        let mut users = self.users.lock().expect("user store lock poisoned");

        // Uniqueness checks and the insert happen under one lock, matching
        // the atomicity of the database's insert-time constraints.
        if users.values().any(|user| user.email == email) {
            return Err(StoreError::Duplicate {
                constraint: EMAIL_UNIQUE.to_owned(),
            });
        }

        if let Some(ref key) = new_user.biometric_key
            && users.values().any(|user| user.biometric_key.as_ref() == Some(key))
        {
            return Err(StoreError::Duplicate {
                constraint: BIOMETRIC_KEY_UNIQUE.to_owned(),
            });
        }

        let now = Timestamp::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email,
            password_hash: new_user.password_hash,
            biometric_key: new_user.biometric_key,
            created_at: now,
            updated_at: now,
        };

        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.lock().expect("user store lock poisoned");
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let email = email.trim().to_lowercase();
        let users = self.users.lock().expect("user store lock poisoned");
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_biometric_key(&self, key: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.lock().expect("user store lock poisoned");
        Ok(users
            .values()
            .find(|user| user.biometric_key.as_deref() == Some(key))
            .cloned())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        let users = self.users.lock().expect("user store lock poisoned");
        Ok(users.len() as u64)
    }
}
