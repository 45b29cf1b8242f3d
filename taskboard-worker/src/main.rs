//! # Taskboard Worker
//!
//! Standalone due-date sweeper. Connects to PostgreSQL, applies migrations
//! and completes overdue pending tasks on a fixed interval until Ctrl-C or
//! SIGTERM.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskboard cargo run -p taskboard-worker
//! ```

use std::sync::Arc;
use taskboard_shared::db::{migrations::run_migrations, pool};
use taskboard_shared::store::postgres::PgStore;
use taskboard_worker::config::WorkerConfig;
use taskboard_worker::scheduler::SweepScheduler;
use taskboard_worker::shutdown::shutdown_signal;
use taskboard_worker::sweeper::DueDateSweeper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = WorkerConfig::from_env()?;

    taskboard_shared::telemetry::init_tracing("taskboard_worker=debug,taskboard_shared=info")?;

    tracing::info!("Taskboard Worker v{} starting", env!("CARGO_PKG_VERSION"));

    if !config.sweeper.enabled {
        tracing::warn!("SWEEPER_ENABLED is false, nothing to do");
        return Ok(());
    }

    let pool = pool::create_pool(pool::DatabaseConfig {
        max_connections: config.database_max_connections,
        ..pool::DatabaseConfig::new(config.database_url.clone())
    })
    .await?;
    run_migrations(&pool).await?;

    let store = Arc::new(PgStore::new(pool.clone()));
    let sweeper = DueDateSweeper::with_system_clock(store);
    let handle = SweepScheduler::from_config(sweeper, &config.sweeper).start();

    shutdown_signal().await;

    handle.stop().await;
    pool::close_pool(&pool).await;

    tracing::info!("Worker shut down");
    Ok(())
}
