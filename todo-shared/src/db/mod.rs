/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool creation and health checks
/// - `migrations`: embedded schema migrations for `users` and `todo_items`
///
/// Row types and their queries live in [`crate::models`].
///
/// # Example
///
/// ```no_run
/// use todo_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
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
