/// Bearer authentication for Axum
///
/// Parses `Authorization: Bearer <token>` headers and turns a valid token
/// into an [`AuthContext`] that the API's JWT layer stores in the request
/// extensions.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, Claims};
/// use taskboard_shared::auth::middleware::authenticate_bearer;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-test-secret-that-is-at-least-32-bytes";
/// let token = create_token(&Claims::new("nik_123456"), secret)?;
///
/// let auth = authenticate_bearer(Some(&format!("Bearer {}", token)), secret)?;
/// assert_eq!(auth.username, "nik_123456");
/// # Ok(())
/// # }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{validate_token, JwtError};

/// Authenticated caller, stored in request extensions by the JWT layer
///
/// Handlers can take it directly as an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Username from the token subject
    pub username: String,
}

/// Error type for bearer authentication
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or an empty token
    #[error("No token provided")]
    MissingCredentials,

    /// Header present but the token is malformed, forged or expired
    #[error("Invalid token")]
    InvalidToken(String),
}

impl AuthError {
    /// Client-facing message
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "No token provided",
            AuthError::InvalidToken(_) => "Invalid token",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": self.message() })),
        )
            .into_response()
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::InvalidToken(err.to_string())
    }
}

/// Validates an `Authorization` header value
///
/// The `Bearer ` prefix is optional: a bare token is accepted as well.
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] if the header is absent or carries no token
/// - [`AuthError::InvalidToken`] if the header isn't valid text or the token fails validation
pub fn authenticate_bearer(header: Option<&str>, secret: &str) -> Result<AuthContext, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;

    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let claims = validate_token(token, secret)?;

    Ok(AuthContext {
        username: claims.sub,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims};
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_valid_bearer_header() {
        let token = create_token(&Claims::new("testuser"), SECRET).unwrap();
        let header = format!("Bearer {}", token);

        let auth = authenticate_bearer(Some(&header), SECRET).unwrap();
        assert_eq!(auth.username, "testuser");
    }

    #[test]
    fn test_bare_token_is_accepted() {
        let token = create_token(&Claims::new("testuser"), SECRET).unwrap();

        let auth = authenticate_bearer(Some(&token), SECRET).unwrap();
        assert_eq!(auth.username, "testuser");
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            authenticate_bearer(None, SECRET),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            authenticate_bearer(Some("Bearer "), SECRET),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_invalid_and_expired_tokens() {
        let result = authenticate_bearer(Some("Bearer garbage"), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));

        let expired = create_token(
            &Claims::with_expiration("testuser", Duration::minutes(-5)),
            SECRET,
        )
        .unwrap();
        let result = authenticate_bearer(Some(&format!("Bearer {}", expired)), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
