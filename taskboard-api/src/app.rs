/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
/// use taskboard_shared::store::memory::InMemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(InMemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use taskboard_shared::auth::middleware::{authenticate_bearer, AuthError};
use taskboard_shared::store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// User and task persistence
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /                                    # Hello World (public)
/// ├── GET  /health                              # Health check (public)
/// ├── POST /api/login                           # Issue a token (public)
/// └── /api/users                                # JWT required below
///     ├── POST   /                              # Create user
///     ├── GET    /                              # List users
///     ├── GET    /:user_id                      # Get user
///     ├── PUT    /:user_id                      # Update user
///     └── /:user_id/tasks
///         ├── POST   /                          # Create task
///         ├── GET    /                          # List the user's tasks
///         ├── GET    /:task_id                  # Get task
///         ├── PUT    /:task_id                  # Update task
///         └── DELETE /:task_id                  # Delete task
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. JWT authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::health::hello))
        .route("/health", get(routes::health::health_check))
        .route("/api/login", post(routes::auth::login));

    let protected_routes = Router::new()
        .route(
            "/api/users",
            post(routes::users::create_user).get(routes::users::list_users),
        )
        .route(
            "/api/users/:user_id",
            get(routes::users::get_user).put(routes::users::update_user),
        )
        .route(
            "/api/users/:user_id/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/api/users/:user_id/tasks/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = if state.config.cors_allows_any() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the `Authorization` header and injects the caller's
/// `AuthContext` into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            AuthError::InvalidToken("Authorization header is not valid text".to_string())
        })?),
        None => None,
    };

    let auth_context = authenticate_bearer(header, state.jwt_secret()).map_err(|e| {
        tracing::debug!(error = ?e, "Rejected request");
        e
    })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
