/// Team model and database operations
///
/// Teams are named groups of workers that tasks can be attached to.
/// Deleting a team removes its membership rows but leaves the member
/// workers intact, and any task referencing the team has its reference
/// nulled (SET NULL), not deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     description TEXT NOT NULL DEFAULT '',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::team::{CreateTeam, Team};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let team = Team::create(&pool, CreateTeam {
///     name: "Backend".to_string(),
///     description: "Server-side crew".to_string(),
///     worker_ids: vec![],
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use super::worker::{add_team_members, WorkerSummary};

/// Team row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID
    pub id: Uuid,

    /// Team name, unique across all teams
    pub name: String,

    /// Free-text description
    pub description: String,

    /// When the team was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Team name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Initial member workers (may be empty)
    #[serde(default)]
    pub worker_ids: Vec<Uuid>,
}

/// Input for updating a team
///
/// `worker_ids` is the complete desired member set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTeam {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub worker_ids: Vec<Uuid>,
}

impl Team {
    /// Creates a new team with its initial members
    ///
    /// Row insert and membership inserts run on one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists (unique constraint), a
    /// member worker does not exist (foreign key), or the database
    /// operation fails.
    pub async fn create(pool: &PgPool, data: CreateTeam) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(
            "INSERT INTO teams (name, description) VALUES ($1, $2) \
             RETURNING id, name, description, created_at",
        )
        .bind(data.name)
        .bind(data.description)
        .fetch_one(&mut *tx)
        .await?;

        add_team_members(&mut *tx, team.id, &data.worker_ids).await?;

        tx.commit().await?;
        Ok(team)
    }

    /// Finds a team by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            "SELECT id, name, description, created_at FROM teams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Lists all teams ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let teams = sqlx::query_as::<_, Team>(
            "SELECT id, name, description, created_at FROM teams ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// Lists the member workers of a team with their position names
    pub async fn members(pool: &PgPool, team_id: Uuid) -> Result<Vec<WorkerSummary>, sqlx::Error> {
        let members = sqlx::query_as::<_, WorkerSummary>(
            r#"
            SELECT w.id, w.username, w.email, w.first_name, w.last_name,
                   p.name AS position_name
            FROM team_members tm
            JOIN workers w ON w.id = tm.worker_id
            JOIN positions p ON p.id = w.position_id
            WHERE tm.team_id = $1
            ORDER BY w.username ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Updates a team and replaces its member set
    ///
    /// Scalar fields are persisted first, then the membership rows are
    /// diffed against `data.worker_ids` and reconciled, all on one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the new name collides with another team, a
    /// member worker does not exist, or the database operation fails. Any
    /// error rolls back the whole update.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTeam,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(
            "UPDATE teams SET name = $2, description = $3 WHERE id = $1 \
             RETURNING id, name, description, created_at",
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(team) = team else {
            tx.rollback().await?;
            return Ok(None);
        };

        let current: Vec<Uuid> =
            sqlx::query_scalar("SELECT worker_id FROM team_members WHERE team_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let desired: HashSet<Uuid> = data.worker_ids.iter().copied().collect();
        let existing: HashSet<Uuid> = current.iter().copied().collect();

        let removed: Vec<Uuid> = current
            .iter()
            .copied()
            .filter(|w| !desired.contains(w))
            .collect();
        let added: Vec<Uuid> = data
            .worker_ids
            .iter()
            .copied()
            .filter(|w| !existing.contains(w))
            .collect();

        if !removed.is_empty() {
            sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND worker_id = ANY($2)")
                .bind(id)
                .bind(&removed)
                .execute(&mut *tx)
                .await?;
        }

        add_team_members(&mut *tx, id, &added).await?;

        tx.commit().await?;
        Ok(Some(team))
    }

    /// Deletes a team
    ///
    /// Membership rows go with it (CASCADE); member workers remain, and
    /// tasks referencing the team keep existing with a null team (SET NULL).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
