/// Database models for Taskboard
///
/// This module contains the database models and their PostgreSQL operations.
///
/// # Models
///
/// - `user`: User identities
/// - `task`: Scheduled tasks owned by users, with the pending/complete lifecycle
///
/// Callers outside the persistence layer should prefer the repository traits
/// in [`crate::store`], which have both PostgreSQL and in-memory backends.

pub mod task;
pub mod user;
