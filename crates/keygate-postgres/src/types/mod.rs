//! Shared types for the user store.

mod constraints;

pub use constraints::{ConstraintCategory, ConstraintViolation};
