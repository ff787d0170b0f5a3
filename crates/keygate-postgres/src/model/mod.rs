//! Database models for the user store.
//!
//! This module contains Diesel model definitions for the `users` table,
//! including structs for querying and inserting records.

mod user;

pub use user::{NewUser, User};
