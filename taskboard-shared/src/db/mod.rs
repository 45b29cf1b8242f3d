/// Database layer for Taskboard
///
/// Connection pooling and schema migrations for the PostgreSQL backend.
/// Row mapping lives in [`crate::models`] and the repository traits in
/// [`crate::store`].
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a liveness probe
/// - `migrations`: Embedded schema migrations (`users`, `tasks`)
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
