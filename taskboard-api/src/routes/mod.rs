/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Root greeting and health check
/// - `auth`: Token issuance
/// - `users`: User management
/// - `tasks`: Task management, scoped to a user

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
