//! Users table constraint violations.
//!
//! Every named constraint on the `users` table has a variant here so that a
//! raw Postgres constraint name can be turned into a typed value. Callers use
//! [`ConstraintViolation::is_uniqueness`] to tell a duplicate credential apart
//! from a validation failure.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Users table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    // User validation constraints
    #[strum(serialize = "users_email_format")]
    EmailFormat,
    #[strum(serialize = "users_email_length_max")]
    EmailLengthMax,
    #[strum(serialize = "users_password_hash_not_empty")]
    PasswordHashNotEmpty,
    #[strum(serialize = "users_biometric_key_not_empty")]
    BiometricKeyNotEmpty,

    // User chronological constraints
    #[strum(serialize = "users_updated_after_created")]
    UpdatedAfterCreated,

    // User unique constraints
    #[strum(serialize = "users_email_unique_idx")]
    EmailUnique,
    #[strum(serialize = "users_biometric_key_unique_idx")]
    BiometricKeyUnique,
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::EmailFormat
            | ConstraintViolation::EmailLengthMax
            | ConstraintViolation::PasswordHashNotEmpty
            | ConstraintViolation::BiometricKeyNotEmpty => ConstraintCategory::Validation,

            ConstraintViolation::UpdatedAfterCreated => ConstraintCategory::Chronological,

            ConstraintViolation::EmailUnique | ConstraintViolation::BiometricKeyUnique => {
                ConstraintCategory::Uniqueness
            }
        }
    }

    /// Returns whether this violation is a uniqueness conflict.
    pub fn is_uniqueness(&self) -> bool {
        self.categorize() == ConstraintCategory::Uniqueness
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn constraint_names_roundtrip() {
        for violation in ConstraintViolation::iter() {
            let name = violation.to_string();
            assert_eq!(ConstraintViolation::new(&name), Some(violation));
        }
    }

    #[test]
    fn unknown_constraint_is_none() {
        assert_eq!(ConstraintViolation::new("users_unknown_constraint"), None);
        assert_eq!(ConstraintViolation::new(""), None);
    }

    #[test]
    fn unique_constraints_are_uniqueness() {
        assert!(ConstraintViolation::EmailUnique.is_uniqueness());
        assert!(ConstraintViolation::BiometricKeyUnique.is_uniqueness());
        assert!(!ConstraintViolation::EmailFormat.is_uniqueness());
    }
}
