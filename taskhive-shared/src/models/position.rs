/// Position model and database operations
///
/// Positions are a controlled vocabulary referenced by every worker.
/// Deleting a position deletes the workers holding it (CASCADE).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE positions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Position row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Position {
    /// Unique position ID
    pub id: Uuid,

    /// Position name, unique across all positions
    pub name: String,
}

/// Input for creating a new position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePosition {
    /// Position name
    pub name: String,
}

impl Position {
    /// Creates a new position
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists (unique constraint) or
    /// the database operation fails.
    pub async fn create(pool: &PgPool, data: CreatePosition) -> Result<Self, sqlx::Error> {
        let position = sqlx::query_as::<_, Position>(
            "INSERT INTO positions (name) VALUES ($1) RETURNING id, name",
        )
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(position)
    }

    /// Finds a position by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let position =
            sqlx::query_as::<_, Position>("SELECT id, name FROM positions WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(position)
    }

    /// Lists all positions ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let positions =
            sqlx::query_as::<_, Position>("SELECT id, name FROM positions ORDER BY name ASC")
                .fetch_all(pool)
                .await?;

        Ok(positions)
    }

    /// Counts all positions
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM positions")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deletes a position
    ///
    /// Workers holding the position are deleted as well (CASCADE).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM positions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
