/// Task model and database operations
///
/// Tasks are the units of work of the system: named, described, carrying a
/// deadline and a priority, categorized by a required task type, optionally
/// attached to a team, and assigned to any number of workers.
///
/// # State Machine
///
/// ```text
/// incomplete --(mark done)--> complete
/// ```
///
/// Complete is terminal; no transition back is exposed.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'high', 'urgent');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     deadline TIMESTAMPTZ NOT NULL,
///     is_complete BOOLEAN NOT NULL DEFAULT FALSE,
///     priority task_priority NOT NULL DEFAULT 'low',
///     task_type_id UUID NOT NULL REFERENCES task_types(id) ON DELETE CASCADE,
///     team_id UUID REFERENCES teams(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE task_assignees (
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     worker_id UUID NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (task_id, worker_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::task::{CreateTask, Task, TaskPriority};
/// use taskhive_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::{Duration, Utc};
/// use uuid::Uuid;
///
/// # async fn example(task_type_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     name: "Ship release".to_string(),
///     description: "Cut and publish 1.0".to_string(),
///     deadline: Utc::now() + Duration::days(7),
///     is_complete: false,
///     priority: TaskPriority::Urgent,
///     task_type_id,
///     team_id: None,
///     assignee_ids: vec![],
/// }).await?;
///
/// // Later: mark it done (idempotent)
/// Task::mark_done(&pool, task.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use super::worker::WorkerSummary;

const TASK_COLUMNS: &str = "id, name, description, deadline, is_complete, priority, \
                            task_type_id, team_id, created_at, updated_at";

/// Ordering applied to every task listing: incomplete before complete,
/// then by priority rank (urgent > high > low), then by name so pages are
/// stable.
const TASK_ORDERING: &str = "ORDER BY is_complete ASC, \
     CASE priority WHEN 'urgent' THEN 2 WHEN 'high' THEN 1 ELSE 0 END DESC, \
     name ASC";

/// Task priority
///
/// The total order is urgent > high > low — not the lexical order of the
/// labels — so sorting always goes through [`TaskPriority::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Default priority
    Low,

    /// Should be picked up soon
    High,

    /// Drop everything
    Urgent,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Low
    }
}

impl TaskPriority {
    /// Converts priority to its storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }

    /// Parses a storage label
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "high" => Some(TaskPriority::High),
            "urgent" => Some(TaskPriority::Urgent),
            _ => None,
        }
    }

    /// Numeric sort rank: urgent=2, high=1, low=0
    pub fn rank(&self) -> i16 {
        match self {
            TaskPriority::Urgent => 2,
            TaskPriority::High => 1,
            TaskPriority::Low => 0,
        }
    }

    /// CSS badge class for display
    pub fn badge_class(&self) -> &'static str {
        match self {
            TaskPriority::Urgent => "priority-urgent",
            TaskPriority::High => "priority-high",
            TaskPriority::Low => "priority-low",
        }
    }

    /// Badge class for a raw label; unrecognized values fall back to low
    pub fn badge_class_for(label: &str) -> &'static str {
        Self::parse(label)
            .unwrap_or(TaskPriority::Low)
            .badge_class()
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// When the task is due
    pub deadline: DateTime<Utc>,

    /// Whether the task has been completed
    pub is_complete: bool,

    /// Task priority
    pub priority: TaskPriority,

    /// Category of the task
    pub task_type_id: Uuid,

    /// Team the task is attached to, if any
    pub team_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// When the task is due
    pub deadline: DateTime<Utc>,

    /// Initial completion flag
    #[serde(default)]
    pub is_complete: bool,

    /// Priority (defaults to low)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Category; must reference an existing task type
    pub task_type_id: Uuid,

    /// Optional team attachment
    pub team_id: Option<Uuid>,

    /// Assigned workers (may be empty)
    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,
}

/// Input for updating a task
///
/// Every field is submitted; `assignee_ids` is the complete desired set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    pub name: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub is_complete: bool,
    pub priority: TaskPriority,
    pub task_type_id: Uuid,
    pub team_id: Option<Uuid>,
    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,
}

impl Task {
    /// CSS badge class for this task's priority
    pub fn priority_badge_class(&self) -> &'static str {
        self.priority.badge_class()
    }

    /// Creates a new task with its initial assignees
    ///
    /// Row insert and assignee inserts run on one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the task type, team, or an assignee does not
    /// exist (foreign key), or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (name, description, deadline, is_complete, priority, task_type_id, team_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.deadline)
        .bind(data.is_complete)
        .bind(data.priority)
        .bind(data.task_type_id)
        .bind(data.team_id)
        .fetch_one(&mut *tx)
        .await?;

        if !data.assignee_ids.is_empty() {
            sqlx::query(
                "INSERT INTO task_assignees (task_id, worker_id) \
                 SELECT $1, worker_id FROM UNNEST($2::uuid[]) AS w(worker_id)",
            )
            .bind(task.id)
            .bind(&data.assignee_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks with an optional case-insensitive substring filter on
    /// name, paginated
    ///
    /// Ordering: incomplete tasks first, then urgent > high > low, then
    /// name.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = like_pattern(search);

        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE name ILIKE $1 \
             {TASK_ORDERING} \
             LIMIT $2 OFFSET $3"
        ))
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts tasks matching the optional name filter
    pub async fn count_filtered(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let pattern = like_pattern(search);

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE name ILIKE $1")
            .bind(pattern)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts all tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts completed tasks
    pub async fn count_completed(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE is_complete = TRUE")
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Updates a task and replaces its assignee set
    ///
    /// Scalar fields are persisted first, then the assignee rows are
    /// diffed against `data.assignee_ids` and reconciled, all on one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced row does not exist or the database
    /// operation fails. Any error rolls back the whole update.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks \
             SET name = $2, description = $3, deadline = $4, is_complete = $5, \
                 priority = $6, task_type_id = $7, team_id = $8, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.deadline)
        .bind(data.is_complete)
        .bind(data.priority)
        .bind(data.task_type_id)
        .bind(data.team_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(task) = task else {
            tx.rollback().await?;
            return Ok(None);
        };

        let current: Vec<Uuid> =
            sqlx::query_scalar("SELECT worker_id FROM task_assignees WHERE task_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let desired: HashSet<Uuid> = data.assignee_ids.iter().copied().collect();
        let existing: HashSet<Uuid> = current.iter().copied().collect();

        let removed: Vec<Uuid> = current
            .iter()
            .copied()
            .filter(|w| !desired.contains(w))
            .collect();
        let added: Vec<Uuid> = data
            .assignee_ids
            .iter()
            .copied()
            .filter(|w| !existing.contains(w))
            .collect();

        if !removed.is_empty() {
            sqlx::query("DELETE FROM task_assignees WHERE task_id = $1 AND worker_id = ANY($2)")
                .bind(id)
                .bind(&removed)
                .execute(&mut *tx)
                .await?;
        }

        if !added.is_empty() {
            sqlx::query(
                "INSERT INTO task_assignees (task_id, worker_id) \
                 SELECT $1, worker_id FROM UNNEST($2::uuid[]) AS w(worker_id)",
            )
            .bind(id)
            .bind(&added)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(task))
    }

    /// Marks a task complete
    ///
    /// Idempotent: marking an already complete task succeeds and leaves it
    /// complete. Completion is terminal; nothing transitions back.
    pub async fn mark_done(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET is_complete = TRUE, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a task's assignees with their position names
    pub async fn assignees(
        pool: &PgPool,
        task_id: Uuid,
    ) -> Result<Vec<WorkerSummary>, sqlx::Error> {
        let assignees = sqlx::query_as::<_, WorkerSummary>(
            r#"
            SELECT w.id, w.username, w.email, w.first_name, w.last_name,
                   p.name AS position_name
            FROM task_assignees ta
            JOIN workers w ON w.id = ta.worker_id
            JOIN positions p ON p.id = w.position_id
            WHERE ta.task_id = $1
            ORDER BY w.username ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(assignees)
    }

    /// Deletes a task along with its assignee rows (CASCADE)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Builds the ILIKE pattern for the optional name filter
///
/// LIKE metacharacters in the user input are escaped so the filter is a
/// plain substring match; no filter matches everything.
fn like_pattern(search: Option<&str>) -> String {
    match search {
        Some(s) if !s.is_empty() => {
            let escaped = s
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{}%", escaped)
        }
        _ => "%".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::High.as_str(), "high");
        assert_eq!(TaskPriority::Urgent.as_str(), "urgent");
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(TaskPriority::parse("low"), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::parse("high"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("urgent"), Some(TaskPriority::Urgent));
        assert_eq!(TaskPriority::parse("critical"), None);
    }

    #[test]
    fn test_priority_rank_total_order() {
        // urgent > high > low, which is not the lexical order of the labels
        assert!(TaskPriority::Urgent.rank() > TaskPriority::High.rank());
        assert!(TaskPriority::High.rank() > TaskPriority::Low.rank());
        assert_eq!(TaskPriority::Urgent.rank(), 2);
        assert_eq!(TaskPriority::High.rank(), 1);
        assert_eq!(TaskPriority::Low.rank(), 0);
    }

    #[test]
    fn test_priority_badge_class() {
        assert_eq!(TaskPriority::Urgent.badge_class(), "priority-urgent");
        assert_eq!(TaskPriority::High.badge_class(), "priority-high");
        assert_eq!(TaskPriority::Low.badge_class(), "priority-low");
    }

    #[test]
    fn test_priority_badge_class_unrecognized_falls_back_to_low() {
        assert_eq!(TaskPriority::badge_class_for("urgent"), "priority-urgent");
        assert_eq!(TaskPriority::badge_class_for("high"), "priority-high");
        assert_eq!(TaskPriority::badge_class_for("low"), "priority-low");
        assert_eq!(TaskPriority::badge_class_for("whenever"), "priority-low");
        assert_eq!(TaskPriority::badge_class_for(""), "priority-low");
    }

    #[test]
    fn test_priority_default_is_low() {
        assert_eq!(TaskPriority::default(), TaskPriority::Low);
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern(None), "%");
        assert_eq!(like_pattern(Some("")), "%");
        assert_eq!(like_pattern(Some("Task")), "%Task%");
        assert_eq!(like_pattern(Some("100%")), "%100\\%%");
        assert_eq!(like_pattern(Some("a_b")), "%a\\_b%");
    }
}
