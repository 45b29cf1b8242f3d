/// JWT token generation and validation
///
/// Tokens are signed with HS256 (HMAC-SHA256) and identify the caller by
/// username.
///
/// # Security
///
/// - **Algorithm**: HS256
/// - **Expiration**: 60 minutes by default, configurable
/// - **Validation**: Signature, expiration, not-before and issuer checks
/// - **Secret**: At least 32 bytes, enforced by the API configuration
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-test-secret-that-is-at-least-32-bytes";
/// let token = create_token(&Claims::new("nik_123456"), secret)?;
///
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, "nik_123456");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim placed in and required of every token
pub const ISSUER: &str = "taskboard";

/// Default token lifetime in minutes
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 60;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token signature, format or claims are invalid
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims
///
/// - `sub`: Username of the caller
/// - `iss`: Always [`ISSUER`]
/// - `iat` / `nbf` / `exp`: Unix timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Creates claims with the default one hour lifetime
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_expiration(username, Duration::minutes(DEFAULT_EXPIRATION_MINUTES))
    }

    /// Creates claims expiring `expires_in` from now
    pub fn with_expiration(username: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: username.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns [`JwtError::CreateError`] if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and returns its claims
///
/// Checks the signature, `exp`, `nbf` and that `iss` is [`ISSUER`].
///
/// # Errors
///
/// - [`JwtError::Expired`] if the token is past its expiration
/// - [`JwtError::InvalidIssuer`] if the issuer doesn't match
/// - [`JwtError::ValidationError`] for anything else
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Issues a token for `username` valid for `expiration_minutes`
///
/// # Errors
///
/// Returns [`JwtError::CreateError`] if encoding fails
pub fn issue_token(username: &str, secret: &str, expiration_minutes: i64) -> Result<String, JwtError> {
    let claims = Claims::with_expiration(username, Duration::minutes(expiration_minutes));
    create_token(&claims, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("testuser");

        assert_eq!(claims.sub, "testuser");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, DEFAULT_EXPIRATION_MINUTES * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new("testuser");
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated, claims);
    }

    #[test]
    fn test_issue_token_uses_custom_expiration() {
        let token = issue_token("testuser", SECRET, 5).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();

        assert_eq!(claims.exp - claims.iat, 5 * 60);
    }

    #[test]
    fn test_invalid_secret() {
        let token = create_token(&Claims::new("testuser"), SECRET).unwrap();

        let result = validate_token(&token, "wrong-secret-key-also-32-bytes-long!!");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token() {
        // Past the default 60 second leeway
        let claims = Claims::with_expiration("testuser", Duration::minutes(-5));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_issuer() {
        let mut claims = Claims::new("testuser");
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::InvalidIssuer)
        ));
    }

    #[test]
    fn test_malformed_token() {
        let result = validate_token("not.a.token", SECRET);
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }
}
