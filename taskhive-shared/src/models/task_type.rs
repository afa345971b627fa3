/// TaskType model and database operations
///
/// Task types are a controlled vocabulary referenced by every task.
/// Deleting a type deletes the tasks that reference it (CASCADE).
/// Listings are always alphabetical by name.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_types (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task type row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskType {
    /// Unique task type ID
    pub id: Uuid,

    /// Type name, unique across all task types
    pub name: String,
}

/// Input for creating a new task type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskType {
    /// Type name
    pub name: String,
}

impl TaskType {
    /// Creates a new task type
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists (unique constraint) or
    /// the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateTaskType) -> Result<Self, sqlx::Error> {
        let task_type = sqlx::query_as::<_, TaskType>(
            "INSERT INTO task_types (name) VALUES ($1) RETURNING id, name",
        )
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(task_type)
    }

    /// Finds a task type by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task_type =
            sqlx::query_as::<_, TaskType>("SELECT id, name FROM task_types WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(task_type)
    }

    /// Lists all task types, alphabetical by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let task_types =
            sqlx::query_as::<_, TaskType>("SELECT id, name FROM task_types ORDER BY name ASC")
                .fetch_all(pool)
                .await?;

        Ok(task_types)
    }

    /// Counts all task types
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_types")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deletes a task type
    ///
    /// Tasks referencing the type are deleted as well (CASCADE).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
