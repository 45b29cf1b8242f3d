/// Error handling for the API server
///
/// Every handler returns `Result<T, ApiError>`, which converts into an
/// HTTP status and a JSON body of the form:
///
/// ```json
/// { "error": "User not found" }
/// ```
///
/// Validation failures add a `details` array of `{field, message}`.
///
/// # Example
///
/// ```
/// use taskboard_api::error::{ApiError, ApiResult};
///
/// fn find(id: i64) -> ApiResult<i64> {
///     if id == 0 {
///         return Err(ApiError::NotFound("User not found".to_string()));
///     }
///     Ok(id)
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::auth::{jwt::JwtError, middleware::AuthError};
use taskboard_shared::store::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Field validation failed (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500); the message is logged, never returned
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, details) = match self {
            ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) | ApiError::NotFound(msg) => {
                (msg, None)
            }
            ApiError::ValidationError(errors) => ("Validation failed".to_string(), Some(errors)),
            ApiError::InternalError(msg) => {
                // Logged here, hidden from clients
                tracing::error!("Internal error: {}", msg);
                ("An internal error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::BadRequest(msg),
            StoreError::InvalidReference(msg) => ApiError::BadRequest(msg),
            StoreError::InvalidTransition { .. } => ApiError::BadRequest(err.to_string()),
            StoreError::Database(_) | StoreError::Unavailable(_) => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

/// Convert bearer authentication errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.message().to_string())
    }
}

/// Convert JWT errors to API errors
///
/// Failing to sign is a server fault; anything else is a bad token.
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert validator errors into a `details` list, sorted by field
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(errors)
    }
}

/// Malformed or mistyped JSON bodies are 400s
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Non-numeric path IDs are 400s
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_shared::models::task::TaskStatus;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::ValidationError(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("No token provided".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InternalError("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_mapping() {
        let err = ApiError::from(StoreError::Conflict("Username already exists".to_string()));
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "Username already exists"));

        let err = ApiError::from(StoreError::InvalidTransition {
            from: TaskStatus::Complete,
            to: TaskStatus::Pending,
        });
        assert!(matches!(
            err,
            ApiError::BadRequest(ref msg) if msg == "Cannot change task status from complete to pending"
        ));

        let err = ApiError::from(StoreError::Unavailable("down".to_string()));
        assert!(matches!(err, ApiError::InternalError(_)));
    }

    #[test]
    fn test_auth_error_mapping() {
        let err = ApiError::from(AuthError::MissingCredentials);
        assert!(matches!(err, ApiError::Unauthorized(ref msg) if msg == "No token provided"));

        let err = ApiError::from(JwtError::Expired);
        assert!(matches!(err, ApiError::Unauthorized(ref msg) if msg == "Invalid token"));
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail {
                field: "first_name".to_string(),
                message: "First name is required".to_string(),
            },
            ValidationErrorDetail {
                field: "username".to_string(),
                message: "Username is required".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }
}
