/// Task model and database operations
///
/// This module provides the Task model: a unit of scheduled work owned by
/// exactly one user. Tasks carry a `next_execute_date_time` due time that the
/// due-date sweeper uses to auto-complete pending work.
///
/// # State Machine
///
/// ```text
/// pending → complete
/// ```
///
/// The only transition is forward. It is triggered either by an explicit
/// update request or by the sweeper observing an overdue due time.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'complete');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     status task_status NOT NULL DEFAULT 'pending',
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     date_time TIMESTAMPTZ NOT NULL,
///     next_execute_date_time TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task, TaskFilter, TaskStatus};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::{Duration, Utc};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     user_id: 1,
///     status: TaskStatus::Pending,
///     name: "Take out the trash".to_string(),
///     description: None,
///     date_time: Utc::now(),
///     next_execute_date_time: Some(Utc::now() + Duration::hours(1)),
/// }).await?;
///
/// let overdue = Task::find(&pool, &TaskFilter::overdue(Utc::now())).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

/// Task lifecycle status
///
/// `pending` and `complete` are the only accepted values. Anything else is
/// rejected when parsed or deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Work not yet finished
    #[default]
    Pending,

    /// Work finished, either by request or by the due-date sweeper
    Complete,
}

impl TaskStatus {
    /// Converts status to its canonical string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Complete => "complete",
        }
    }

    /// Checks if the status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Complete)
    }

    /// Checks if a transition to `target` is allowed
    ///
    /// Staying in the same status is always allowed. Nothing leaves `complete`.
    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        !self.is_terminal() || *self == target
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a non-canonical status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid task status '{0}', expected 'pending' or 'complete'")]
pub struct ParseTaskStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "complete" => Ok(TaskStatus::Complete),
            other => Err(ParseTaskStatusError(other.to_string())),
        }
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Lifecycle status
    pub status: TaskStatus,

    /// Task name
    pub name: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Scheduled execution time
    pub date_time: DateTime<Utc>,

    /// Due time checked by the sweeper (None = never auto-completed)
    pub next_execute_date_time: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user ID
    pub user_id: i64,

    /// Initial status
    #[serde(default)]
    pub status: TaskStatus,

    /// Task name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Scheduled execution time
    pub date_time: DateTime<Utc>,

    /// Optional due time for auto-completion
    pub next_execute_date_time: Option<DateTime<Utc>>,
}

/// Input for updating a task
///
/// Only `Some` fields are written. Nullable columns use `Option<Option<_>>`
/// so that `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTask {
    /// New status
    pub status: Option<TaskStatus>,

    /// New name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New scheduled time
    pub date_time: Option<DateTime<Utc>>,

    /// New due time (use Some(None) to disable auto-completion)
    pub next_execute_date_time: Option<Option<DateTime<Utc>>>,
}

/// Filter for task queries
///
/// All set conditions are combined with AND. Results are ordered by ID.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    /// Only tasks owned by this user
    pub user_id: Option<i64>,

    /// Only tasks with this status
    pub status: Option<TaskStatus>,

    /// Only tasks whose `next_execute_date_time` is strictly before this instant
    ///
    /// Tasks with a null due time never match.
    pub due_before: Option<DateTime<Utc>>,
}

impl TaskFilter {
    /// Filter selecting every pending task that is overdue at `now`
    pub fn overdue(now: DateTime<Utc>) -> Self {
        Self {
            user_id: None,
            status: Some(TaskStatus::Pending),
            due_before: Some(now),
        }
    }

    /// Filter selecting every task of one user
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    /// Checks whether a task satisfies this filter
    pub fn matches(&self, task: &Task) -> bool {
        if self.user_id.is_some_and(|user_id| task.user_id != user_id) {
            return false;
        }
        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }
        match self.due_before {
            Some(cutoff) => task.next_execute_date_time.is_some_and(|due| due < cutoff),
            None => true,
        }
    }
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the owning user doesn't exist (foreign key
    /// violation) or the database operation fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, status, name, description, date_time, next_execute_date_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, status, name, description, date_time,
                      next_execute_date_time, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.status)
        .bind(data.name)
        .bind(data.description)
        .bind(data.date_time)
        .bind(data.next_execute_date_time)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID scoped to its owner
    ///
    /// A task that exists but belongs to another user is not returned.
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, status, name, description, date_time,
                   next_execute_date_time, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds tasks matching a filter, ordered by ID
    pub async fn find(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT id, user_id, status, name, description, date_time, \
             next_execute_date_time, created_at, updated_at FROM tasks WHERE TRUE",
        );
        let mut bind_count = 0;

        if filter.user_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND user_id = ${}", bind_count));
        }
        if filter.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${}", bind_count));
        }
        if filter.due_before.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND next_execute_date_time < ${}", bind_count));
        }

        query.push_str(" ORDER BY id ASC");

        let mut q = sqlx::query_as::<_, Task>(&query);

        if let Some(user_id) = filter.user_id {
            q = q.bind(user_id);
        }
        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(cutoff) = filter.due_before {
            q = q.bind(cutoff);
        }

        q.fetch_all(pool).await
    }

    /// Updates a task scoped to its owner
    ///
    /// Only `Some` fields in `data` are written; `updated_at` is always bumped.
    /// Setting `pending` only matches rows that are still pending, so a task
    /// completed concurrently is never reopened.
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task with this ID belongs to the user
    /// or the row is complete and `data` asks for `pending`
    pub async fn update(
        pool: &PgPool,
        id: i64,
        user_id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.date_time.is_some() {
            bind_count += 1;
            query.push_str(&format!(", date_time = ${}", bind_count));
        }
        if data.next_execute_date_time.is_some() {
            bind_count += 1;
            query.push_str(&format!(", next_execute_date_time = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 AND user_id = $2");
        if data.status == Some(TaskStatus::Pending) {
            query.push_str(" AND status <> 'complete'");
        }
        query.push_str(
            " RETURNING id, user_id, status, name, description, \
             date_time, next_execute_date_time, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(user_id);

        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(date_time) = data.date_time {
            q = q.bind(date_time);
        }
        if let Some(next_execute) = data.next_execute_date_time {
            q = q.bind(next_execute);
        }

        q.fetch_optional(pool).await
    }

    /// Transitions a task from pending to complete
    ///
    /// The update is guarded by `status = 'pending'`, so a task that was
    /// completed or deleted concurrently yields None instead of being touched.
    pub async fn complete_if_pending(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = 'complete',
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, user_id, status, name, description, date_time,
                      next_execute_date_time, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task scoped to its owner
    ///
    /// # Returns
    ///
    /// True if a task was deleted
    pub async fn delete(pool: &PgPool, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
