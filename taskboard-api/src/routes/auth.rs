/// Authentication endpoint
///
/// # Endpoints
///
/// - `POST /api/login` - Exchange a username for a bearer token
///
/// Any non-empty username receives a token. The users API itself sits
/// behind authentication, so login cannot require an existing user.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Json,
};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::jwt;

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username to put in the token subject
    #[serde(default)]
    pub username: Option<String>,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token
    pub token: String,
}

/// Login and get a token
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// { "username": "nik_123456" }
/// ```
///
/// # Response
///
/// ```json
/// { "token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Username missing or empty
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let username = req
        .username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Username is required".to_string()))?;

    let token = jwt::issue_token(
        &username,
        state.jwt_secret(),
        state.config.jwt.expiration_minutes,
    )?;

    tracing::info!(username = %username, "Issued token");

    Ok(Json(LoginResponse { token }))
}
