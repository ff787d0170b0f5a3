//! Database query repositories for the user store.
//!
//! This module contains repository implementations that provide high-level,
//! type-safe database operations over the `users` table.

pub mod user;

pub use user::UserRepository;
