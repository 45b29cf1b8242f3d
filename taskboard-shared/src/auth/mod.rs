/// Authentication utilities
///
/// Bearer-token authentication for the Taskboard API.
///
/// # Modules
///
/// - [`jwt`]: HS256 token issuance and validation
/// - [`middleware`]: `Authorization` header parsing and the request-level
///   [`middleware::AuthContext`]
///
/// Tokens identify a caller by username only. There are no passwords,
/// refresh tokens or roles.

pub mod jwt;
pub mod middleware;
