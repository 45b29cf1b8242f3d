/// PostgreSQL store
///
/// Implements the repository traits on top of the `models` active-record
/// operations and a shared [`PgPool`].
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::store::{postgres::PgStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let store = PgStore::new(pool);
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use super::{Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::task::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User};
use async_trait::async_trait;
use sqlx::PgPool;

/// Store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(User::list(&self.pool).await?)
    }

    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        Ok(User::update(&self.pool, id, data).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, user_id: i64, task_id: i64) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id_and_user(&self.pool, task_id, user_id).await?)
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        Ok(Task::find(&self.pool, filter).await?)
    }

    async fn update_task(
        &self,
        user_id: i64,
        task_id: i64,
        data: UpdateTask,
    ) -> StoreResult<Option<Task>> {
        let reopening = data.status == Some(TaskStatus::Pending);

        if let Some(task) = Task::update(&self.pool, task_id, user_id, data).await? {
            return Ok(Some(task));
        }

        // The guarded UPDATE matched nothing; tell a completed task from a missing one
        if reopening {
            if let Some(current) = Task::find_by_id_and_user(&self.pool, task_id, user_id).await? {
                return Err(StoreError::InvalidTransition {
                    from: current.status,
                    to: TaskStatus::Pending,
                });
            }
        }

        Ok(None)
    }

    async fn complete_task(&self, task_id: i64) -> StoreResult<Option<Task>> {
        Ok(Task::complete_if_pending(&self.pool, task_id).await?)
    }

    async fn delete_task(&self, user_id: i64, task_id: i64) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, task_id, user_id).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
