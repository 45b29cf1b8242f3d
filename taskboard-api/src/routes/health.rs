/// Health check endpoints
///
/// # Endpoints
///
/// ```text
/// GET /         -> "Hello World!"
/// GET /health
/// ```
///
/// # Health Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```

use crate::{app::AppState, error::ApiResult, extract::Json};
use axum::extract::State;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status (`healthy` or `degraded`)
    pub status: String,

    /// Application version
    pub version: String,

    /// Store status (`connected` or `disconnected`)
    pub database: String,
}

/// Root greeting
pub async fn hello() -> &'static str {
    "Hello World!"
}

/// Health check handler
///
/// Always 200; a failing store ping reports `degraded`.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };

    Ok(Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    }))
}
