//! # Taskboard Shared Library
//!
//! This crate contains shared types, persistence and authentication used by
//! the Taskboard API server and the due-date sweeper worker.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their PostgreSQL operations
//! - `store`: Repository traits with PostgreSQL and in-memory implementations
//! - `db`: Connection pool and migrations
//! - `auth`: JWT issuance/validation and bearer authentication
//! - `clock`: Time source abstraction used for due-date comparisons
//! - `seed`: Demo data seeding
//! - `telemetry`: Tracing subscriber setup shared by the binaries

pub mod auth;
pub mod clock;
pub mod db;
pub mod models;
pub mod seed;
pub mod store;
pub mod telemetry;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
