/// Repository layer for users and tasks
///
/// The HTTP handlers and the due-date sweeper talk to storage only through
/// the traits in this module, so they can run against PostgreSQL in
/// production and against an in-memory store in tests.
///
/// # Backends
///
/// - [`postgres::PgStore`]: sqlx/PostgreSQL, built on the `models` operations
/// - [`memory::InMemoryStore`]: process-local maps with the same semantics
///
/// # Example
///
/// ```
/// use taskboard_shared::store::{memory::InMemoryStore, TaskStore, UserStore};
/// use taskboard_shared::models::user::CreateUser;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryStore::new();
/// let user = store.create_user(CreateUser {
///     username: "testuser".to_string(),
///     first_name: "Test".to_string(),
///     last_name: "User".to_string(),
/// }).await?;
/// assert!(store.find_user(user.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use crate::models::task::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User};
use async_trait::async_trait;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unclassified database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A unique constraint was violated (e.g. duplicate username)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested status change is not allowed from the stored status
    #[error("Cannot change task status from {from} to {to}")]
    InvalidTransition {
        /// Status the task currently has
        from: TaskStatus,
        /// Status the update asked for
        to: TaskStatus,
    },

    /// A referenced record does not exist (foreign key violation)
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique");
                if constraint.contains("username") {
                    return StoreError::Conflict("Username already exists".to_string());
                }
                return StoreError::Conflict(format!("Constraint violation: {}", constraint));
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::InvalidReference(db_err.message().to_string());
            }
        }

        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// User repository
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a user; fails with [`StoreError::Conflict`] on a duplicate username
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Finds a user by ID
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    /// Lists all users ordered by ID
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Updates a user; None if the user doesn't exist
    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>>;
}

/// Task repository
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Creates a task; fails with [`StoreError::InvalidReference`] if the owner doesn't exist
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Finds a task by ID scoped to its owner
    async fn find_task(&self, user_id: i64, task_id: i64) -> StoreResult<Option<Task>>;

    /// Finds all tasks matching a filter, ordered by ID
    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// Updates a task scoped to its owner; None if not found
    ///
    /// Fails with [`StoreError::InvalidTransition`] if the stored task is
    /// complete and `data` sets it back to pending.
    async fn update_task(
        &self,
        user_id: i64,
        task_id: i64,
        data: UpdateTask,
    ) -> StoreResult<Option<Task>>;

    /// Sets a pending task's status to complete
    ///
    /// Returns None when the task no longer exists or is not pending.
    async fn complete_task(&self, task_id: i64) -> StoreResult<Option<Task>>;

    /// Deletes a task scoped to its owner; true if something was deleted
    async fn delete_task(&self, user_id: i64, task_id: i64) -> StoreResult<bool>;
}

/// Full store used by the API: users, tasks and a liveness probe
#[async_trait]
pub trait Store: UserStore + TaskStore {
    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Conflict("Username already exists".to_string());
        assert_eq!(err.to_string(), "Conflict: Username already exists");

        let err = StoreError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Store unavailable: connection refused");
    }

    #[test]
    fn test_pool_errors_map_to_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }
}
