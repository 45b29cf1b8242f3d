/// User endpoints
///
/// # Endpoints
///
/// - `POST /api/users` - Create a user
/// - `GET /api/users` - List users
/// - `GET /api/users/:user_id` - Get a user
/// - `PUT /api/users/:user_id` - Update a user
///
/// All endpoints require a bearer token.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use taskboard_shared::models::user::{CreateUser, UpdateUser, User};
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Unique username
    #[validate(length(min = 1, max = 255, message = "Username must be 1 to 255 characters"))]
    pub username: String,

    /// First name
    #[validate(length(min = 1, max = 255, message = "First name must be 1 to 255 characters"))]
    pub first_name: String,

    /// Last name
    #[validate(length(min = 1, max = 255, message = "Last name must be 1 to 255 characters"))]
    pub last_name: String,
}

/// Update user request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New username
    #[validate(length(min = 1, max = 255, message = "Username must be 1 to 255 characters"))]
    pub username: Option<String>,

    /// New first name
    #[validate(length(min = 1, max = 255, message = "First name must be 1 to 255 characters"))]
    pub first_name: Option<String>,

    /// New last name
    #[validate(length(min = 1, max = 255, message = "Last name must be 1 to 255 characters"))]
    pub last_name: Option<String>,
}

pub(crate) fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// Create a new user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or username already exists
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    let user = state
        .store
        .create_user(CreateUser {
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Created user");

    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users, ordered by ID
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

/// Get a user by ID
///
/// # Errors
///
/// - `404 Not Found`: User not found
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user))
}

/// Update a user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or username taken
/// - `404 Not Found`: User not found
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let user = state
        .store
        .update_user(
            user_id,
            UpdateUser {
                username: req.username,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = user.id, "Updated user");

    Ok(Json(user))
}
