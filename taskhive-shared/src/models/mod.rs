/// Database models for Taskhive
///
/// One module per entity, each with its row struct, creation/update inputs,
/// and async CRUD operations against the PostgreSQL pool.
///
/// # Models
///
/// - `position`: Controlled vocabulary of job positions held by workers
/// - `task_type`: Controlled vocabulary of task categories
/// - `worker`: User accounts with a position and team memberships
/// - `team`: Named worker groups that tasks can be attached to
/// - `task`: Units of work with priority, deadline, type, and assignees
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::position::{CreatePosition, Position};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let position = Position::create(&pool, CreatePosition {
///     name: "Engineer".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod position;
pub mod task;
pub mod task_type;
pub mod team;
pub mod worker;
