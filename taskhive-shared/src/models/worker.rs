/// Worker model and database operations
///
/// Workers are the user accounts of the system. Every worker holds exactly
/// one position and may belong to any number of teams. Username and email
/// are each globally unique; passwords are stored as Argon2id hashes.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE workers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(255) NOT NULL UNIQUE,
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(255) NOT NULL,
///     last_name VARCHAR(255) NOT NULL,
///     position_id UUID NOT NULL REFERENCES positions(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
///
/// CREATE TABLE team_members (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     worker_id UUID NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, worker_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::worker::{CreateWorker, Worker};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(position_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let worker = Worker::create(&pool, CreateWorker {
///     username: "john".to_string(),
///     email: "john@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     first_name: "John".to_string(),
///     last_name: "Doe".to_string(),
///     position_id,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use std::collections::HashSet;
use uuid::Uuid;

const WORKER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                              position_id, created_at, updated_at, last_login_at";

/// Worker row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Worker {
    /// Unique worker ID
    pub id: Uuid,

    /// Login name, unique across all workers
    pub username: String,

    /// Email address, unique and case-insensitive (CITEXT)
    pub email: String,

    /// Argon2id password hash, never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Position held by the worker
    pub position_id: Uuid,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the worker last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Worker listing row joined with the position name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkerSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position_name: String,
}

impl WorkerSummary {
    /// Human-readable display string, e.g. "John Doe > Position: Engineer"
    pub fn display(&self) -> String {
        format!(
            "{} {} > Position: {}",
            self.first_name, self.last_name, self.position_name
        )
    }
}

/// Input for creating a new worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorker {
    /// Login name
    pub username: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Position held by the worker; must reference an existing position
    pub position_id: Uuid,
}

/// Input for a worker updating their own profile
///
/// `team_ids` is the complete desired membership set; teams absent from it
/// are removed and teams new to it are added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position_id: Uuid,
    pub team_ids: Vec<Uuid>,
}

impl Worker {
    /// Creates a new worker
    ///
    /// # Errors
    ///
    /// Returns an error if username or email is already taken (unique
    /// constraint), the position does not exist (foreign key), or the
    /// database operation fails.
    pub async fn create(pool: &PgPool, data: CreateWorker) -> Result<Self, sqlx::Error> {
        let worker = sqlx::query_as::<_, Worker>(&format!(
            "INSERT INTO workers (username, email, password_hash, first_name, last_name, position_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {WORKER_COLUMNS}"
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.position_id)
        .fetch_one(pool)
        .await?;

        Ok(worker)
    }

    /// Finds a worker by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let worker = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(worker)
    }

    /// Finds a worker by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let worker = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(worker)
    }

    /// Finds a worker by email (case-insensitive via CITEXT)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let worker = sqlx::query_as::<_, Worker>(&format!(
            "SELECT {WORKER_COLUMNS} FROM workers WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(worker)
    }

    /// Lists workers with their position names, paginated
    ///
    /// Ordered by username so pages are stable.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkerSummary>, sqlx::Error> {
        let workers = sqlx::query_as::<_, WorkerSummary>(
            r#"
            SELECT w.id, w.username, w.email, w.first_name, w.last_name,
                   p.name AS position_name
            FROM workers w
            JOIN positions p ON p.id = w.position_id
            ORDER BY w.username ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(workers)
    }

    /// Lists every worker with their position name, for choice lists
    pub async fn list_all(pool: &PgPool) -> Result<Vec<WorkerSummary>, sqlx::Error> {
        let workers = sqlx::query_as::<_, WorkerSummary>(
            r#"
            SELECT w.id, w.username, w.email, w.first_name, w.last_name,
                   p.name AS position_name
            FROM workers w
            JOIN positions p ON p.id = w.position_id
            ORDER BY w.username ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(workers)
    }

    /// Counts all workers
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workers")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Lists the IDs of the teams a worker belongs to
    pub async fn team_ids(pool: &PgPool, worker_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT team_id FROM team_members WHERE worker_id = $1")
                .bind(worker_id)
                .fetch_all(pool)
                .await?;

        Ok(ids)
    }

    /// Updates a worker's own profile
    ///
    /// Scalar fields are persisted first, then the team membership set is
    /// replaced with `data.team_ids`. Both steps run on one transaction, so
    /// readers never observe a partially applied membership change.
    ///
    /// # Errors
    ///
    /// Returns an error if the new username/email collides with another
    /// worker, a referenced team or position does not exist, or the
    /// database operation fails. Any error rolls back the whole update.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let worker = sqlx::query_as::<_, Worker>(&format!(
            "UPDATE workers \
             SET username = $2, email = $3, first_name = $4, last_name = $5, \
                 position_id = $6, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {WORKER_COLUMNS}"
        ))
        .bind(id)
        .bind(data.username)
        .bind(data.email)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.position_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(worker) = worker else {
            tx.rollback().await?;
            return Ok(None);
        };

        replace_team_memberships(&mut tx, id, &data.team_ids).await?;

        tx.commit().await?;
        Ok(Some(worker))
    }

    /// Updates the last login timestamp for a worker
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE workers SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a worker
    ///
    /// Team membership and task assignment rows are removed as well (CASCADE).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Replaces a worker's team membership set with `team_ids`
///
/// Diff-and-apply on the caller's transaction: current memberships are
/// read, rows not in the desired set are deleted, rows new to it are
/// inserted. Memberships present in both are left untouched.
pub(crate) async fn replace_team_memberships(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    worker_id: Uuid,
    team_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    let current: Vec<Uuid> =
        sqlx::query_scalar("SELECT team_id FROM team_members WHERE worker_id = $1")
            .bind(worker_id)
            .fetch_all(&mut **tx)
            .await?;

    let desired: HashSet<Uuid> = team_ids.iter().copied().collect();
    let existing: HashSet<Uuid> = current.iter().copied().collect();

    let removed: Vec<Uuid> = current
        .iter()
        .copied()
        .filter(|id| !desired.contains(id))
        .collect();
    let added: Vec<Uuid> = team_ids
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect();

    if !removed.is_empty() {
        sqlx::query("DELETE FROM team_members WHERE worker_id = $1 AND team_id = ANY($2)")
            .bind(worker_id)
            .bind(&removed)
            .execute(&mut **tx)
            .await?;
    }

    if !added.is_empty() {
        sqlx::query(
            "INSERT INTO team_members (team_id, worker_id) \
             SELECT team_id, $1 FROM UNNEST($2::uuid[]) AS t(team_id)",
        )
        .bind(worker_id)
        .bind(&added)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Inserts membership rows linking `worker_ids` to a team
pub(crate) async fn add_team_members(
    conn: &mut PgConnection,
    team_id: Uuid,
    worker_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    if worker_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO team_members (team_id, worker_id) \
         SELECT $1, worker_id FROM UNNEST($2::uuid[]) AS w(worker_id)",
    )
    .bind(team_id)
    .bind(worker_ids)
    .execute(conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_summary_display() {
        let summary = WorkerSummary {
            id: Uuid::new_v4(),
            username: "john".to_string(),
            email: "john@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            position_name: "Engineer".to_string(),
        };

        let display = summary.display();
        assert!(display.contains("John"));
        assert!(display.contains("Engineer"));
        assert_eq!(display, "John Doe > Position: Engineer");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let worker = Worker {
            id: Uuid::new_v4(),
            username: "john".to_string(),
            email: "john@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            position_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let json = serde_json::to_string(&worker).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("john"));
    }

    // Integration tests for database operations are in taskhive-api/tests/
}
