//! # Taskboard API Server
//!
//! Serves the users/tasks HTTP API and runs the due-date sweeper in the same
//! process.
//!
//! ## Startup
//!
//! 1. Load configuration (`.env` is honored)
//! 2. Create the database if needed, connect and apply migrations
//! 3. Optionally seed one demo user with a handful of tasks
//! 4. Start the sweeper and the HTTP server
//!
//! Ctrl-C or SIGTERM stops the server, waits for an in-flight sweep and
//! closes the pool.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskboard \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p taskboard-api
//! ```

use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::db::{migrations, pool};
use taskboard_shared::seed::seed_demo_data;
use taskboard_shared::store::{postgres::PgStore, Store, TaskStore};
use taskboard_worker::scheduler::SweepScheduler;
use taskboard_worker::shutdown::shutdown_signal;
use taskboard_worker::sweeper::DueDateSweeper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    taskboard_shared::telemetry::init_tracing(
        "taskboard_api=debug,taskboard_worker=debug,taskboard_shared=info,tower_http=debug",
    )?;

    tracing::info!(
        "Taskboard API Server v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    migrations::ensure_database_exists(&config.database.url).await?;

    let pool = pool::create_pool(pool::DatabaseConfig {
        max_connections: config.database.max_connections,
        ..pool::DatabaseConfig::new(config.database.url.clone())
    })
    .await?;
    migrations::run_migrations(&pool).await?;

    let pg_store = Arc::new(PgStore::new(pool.clone()));
    let store: Arc<dyn Store> = pg_store.clone();
    let task_store: Arc<dyn TaskStore> = pg_store;

    if config.seed_demo_data {
        match seed_demo_data(store.as_ref()).await {
            Ok(report) => tracing::info!(
                username = %report.user.username,
                tasks = report.tasks.len(),
                "Seeded demo data"
            ),
            Err(e) => tracing::error!(error = %e, "Failed to seed demo data"),
        }
    }

    let scheduler = if config.sweeper.enabled {
        let sweeper = DueDateSweeper::with_system_clock(task_store);
        Some(SweepScheduler::from_config(sweeper, &config.sweeper).start())
    } else {
        tracing::warn!("Due-date sweeper disabled");
        None
    };

    let addr = config.bind_address();
    let state = AppState::new(store, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = scheduler {
        handle.stop().await;
    }
    pool::close_pool(&pool).await;

    tracing::info!("Server shut down");
    Ok(())
}
