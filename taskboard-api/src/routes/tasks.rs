/// Task endpoints
///
/// Tasks are always addressed through their owner. A task that exists but
/// belongs to a different user is reported as not found.
///
/// # Endpoints
///
/// - `POST /api/users/:user_id/tasks` - Create a task
/// - `GET /api/users/:user_id/tasks` - List the user's tasks
/// - `GET /api/users/:user_id/tasks/:task_id` - Get a task
/// - `PUT /api/users/:user_id/tasks/:task_id` - Update a task
/// - `DELETE /api/users/:user_id/tasks/:task_id` - Delete a task
///
/// # Status
///
/// `status` accepts exactly `pending` or `complete`. A complete task can't
/// be moved back to pending.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    routes::users::user_not_found,
};
use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use taskboard_shared::models::task::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};
use taskboard_shared::store::StoreError;
use validator::Validate;

/// Create task request
///
/// A `user_id` in the body is ignored; the path decides the owner.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Initial status (default: pending)
    #[serde(default)]
    pub status: TaskStatus,

    /// Task name
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Scheduled execution time
    pub date_time: DateTime<Utc>,

    /// Optional due time for auto-completion
    #[serde(default)]
    pub next_execute_date_time: Option<DateTime<Utc>>,
}

/// Update task request
///
/// Absent fields are left unchanged. `description` and
/// `next_execute_date_time` may be set to `null` to clear them.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New status
    pub status: Option<TaskStatus>,

    /// New name
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: Option<String>,

    /// New description, or null to clear
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New scheduled time
    pub date_time: Option<DateTime<Utc>>,

    /// New due time, or null to disable auto-completion
    #[serde(default, deserialize_with = "double_option")]
    pub next_execute_date_time: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        UpdateTask {
            status: req.status,
            name: req.name,
            description: req.description,
            date_time: req.date_time,
            next_execute_date_time: req.next_execute_date_time,
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

/// Create a task for a user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or unknown status
/// - `404 Not Found`: User not found
pub async fn create_task(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    let task = state
        .store
        .create_task(CreateTask {
            user_id,
            status: req.status,
            name: req.name,
            description: req.description,
            date_time: req.date_time,
            next_execute_date_time: req.next_execute_date_time,
        })
        .await?;

    tracing::info!(user_id, task_id = task.id, status = %task.status, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// List a user's tasks, ordered by ID
///
/// # Errors
///
/// - `404 Not Found`: User not found
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<Task>>> {
    state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    let tasks = state.store.find_tasks(&TaskFilter::for_user(user_id)).await?;

    Ok(Json(tasks))
}

/// Get a task
///
/// # Errors
///
/// - `404 Not Found`: Task not found for this user
pub async fn get_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Task>> {
    let task = state
        .store
        .find_task(user_id, task_id)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(task))
}

/// Update a task
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, unknown status, or complete → pending
/// - `404 Not Found`: Task not found for this user
pub async fn update_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let current = state
        .store
        .find_task(user_id, task_id)
        .await?
        .ok_or_else(task_not_found)?;

    if let Some(target) = req.status {
        if !current.status.can_transition_to(target) {
            return Err(StoreError::InvalidTransition {
                from: current.status,
                to: target,
            }
            .into());
        }
    }

    let task = state
        .store
        .update_task(user_id, task_id, req.into())
        .await?
        .ok_or_else(task_not_found)?;

    tracing::info!(user_id, task_id, status = %task.status, "Updated task");

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: Task not found for this user
pub async fn delete_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_task(user_id, task_id).await? {
        return Err(task_not_found());
    }

    tracing::info!(user_id, task_id, "Deleted task");

    Ok(StatusCode::NO_CONTENT)
}
