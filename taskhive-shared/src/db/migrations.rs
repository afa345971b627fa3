/// Database migration runner
///
/// Runs the SQL migrations embedded from the workspace `migrations/`
/// directory using sqlx's migration system. Each migration is a
/// `{timestamp}_{name}.sql` file applied exactly once.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::db::migrations::run_migrations;
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed or fails to execute;
/// the failing migration is rolled back where PostgreSQL allows it.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
