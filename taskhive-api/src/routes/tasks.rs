/// Task endpoints
///
/// One handler per operation, each authenticating via the session
/// extension, validating input, calling the model layer, and responding
/// with JSON (reads) or a redirect (mutations).
///
/// # Endpoints
///
/// - `GET  /list/` - paginated list, optional `?search=` substring filter
/// - `GET  /task_detail/{id}/` - detail with type, team, and assignees
/// - `GET/POST /task_create/create/` - form context / create
/// - `GET/POST /task_update/{id}/update/` - form context / update
/// - `GET/POST /task_delete/{id}/delete/` - confirmation context / delete
/// - `GET  /task/{id}/done/` - mark complete, redirect to detail

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskhive_shared::auth::middleware::Session;
use taskhive_shared::models::{
    task::{CreateTask, Task, TaskPriority, UpdateTask},
    task_type::TaskType,
    team::Team,
    worker::{Worker, WorkerSummary},
};
use uuid::Uuid;
use validator::Validate;

/// Fixed page size for task listings
const TASK_PAGE_SIZE: i64 = 8;

/// Priority choices offered in form contexts
const PRIORITY_CHOICES: [&str; 3] = ["urgent", "high", "low"];

/// Task representation returned to clients
#[derive(Debug, Serialize)]
pub struct TaskView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub is_complete: bool,
    pub priority: TaskPriority,
    pub priority_badge_class: &'static str,
    pub task_type_id: Uuid,
    pub team_id: Option<Uuid>,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            description: task.description,
            deadline: task.deadline,
            is_complete: task.is_complete,
            priority: task.priority,
            priority_badge_class: task.priority.badge_class(),
            task_type_id: task.task_type_id,
            team_id: task.team_id,
        }
    }
}

/// Query parameters for the task list
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Case-insensitive substring filter on name
    pub search: Option<String>,

    /// 1-based page number
    pub page: Option<i64>,
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskView>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

/// Task detail response
#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    #[serde(flatten)]
    pub task: TaskView,
    pub task_type: TaskType,
    pub team: Option<Team>,
    pub assignees: Vec<WorkerSummary>,
}

/// Choice lists for the task form
#[derive(Debug, Serialize)]
pub struct TaskFormContext {
    pub task_types: Vec<TaskType>,
    pub teams: Vec<Team>,
    pub workers: Vec<WorkerSummary>,
    pub priorities: Vec<&'static str>,
}

/// Form context plus the task being edited
#[derive(Debug, Serialize)]
pub struct TaskUpdateFormContext {
    pub task: TaskView,
    pub assignee_ids: Vec<Uuid>,
    #[serde(flatten)]
    pub context: TaskFormContext,
}

/// Create/update payload
///
/// Every field is submitted on update as well; `assignee_ids` is the
/// complete desired set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskPayload {
    /// Task name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// When the task is due; must not be in the past
    pub deadline: DateTime<Utc>,

    /// Completion flag
    #[serde(default)]
    pub is_complete: bool,

    /// Priority (defaults to low)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Category id
    pub task_type_id: Uuid,

    /// Optional team id
    pub team_id: Option<Uuid>,

    /// Assigned workers (may be empty)
    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,
}

/// Rejects a deadline earlier than the current time
fn ensure_future_deadline(deadline: &DateTime<Utc>) -> ApiResult<()> {
    if *deadline < Utc::now() {
        return Err(ApiError::field(
            "deadline",
            "Deadline cannot be in the past!",
        ));
    }
    Ok(())
}

fn detail_path(id: Uuid) -> String {
    format!("/task_detail/{}/", id)
}

async fn form_context(state: &AppState) -> ApiResult<TaskFormContext> {
    Ok(TaskFormContext {
        task_types: TaskType::list(&state.db).await?,
        teams: Team::list(&state.db).await?,
        workers: Worker::list_all(&state.db).await?,
        priorities: PRIORITY_CHOICES.to_vec(),
    })
}

/// Task list handler
///
/// Ordering is fixed: incomplete before complete, then urgent > high > low,
/// then name. Page size is 8.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * TASK_PAGE_SIZE;
    let search = query.search.as_deref();

    let tasks = Task::list(&state.db, search, TASK_PAGE_SIZE, offset).await?;
    let total = Task::count_filtered(&state.db, search).await?;

    Ok(Json(TaskListResponse {
        tasks: tasks.into_iter().map(TaskView::from).collect(),
        page,
        page_size: TASK_PAGE_SIZE,
        total,
    }))
}

/// Task detail handler
pub async fn task_detail(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetailResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let task_type = TaskType::find_by_id(&state.db, task.task_type_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task type not found".to_string()))?;

    let team = match task.team_id {
        Some(team_id) => Team::find_by_id(&state.db, team_id).await?,
        None => None,
    };

    let assignees = Task::assignees(&state.db, id).await?;

    Ok(Json(TaskDetailResponse {
        task: TaskView::from(task),
        task_type,
        team,
        assignees,
    }))
}

/// Task creation form context handler
pub async fn create_task_form(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
) -> ApiResult<Json<TaskFormContext>> {
    Ok(Json(form_context(&state).await?))
}

/// Task creation handler
///
/// Redirects to the new task's detail path on success.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<TaskPayload>,
) -> ApiResult<Redirect> {
    req.validate()?;
    ensure_future_deadline(&req.deadline)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            name: req.name,
            description: req.description,
            deadline: req.deadline,
            is_complete: req.is_complete,
            priority: req.priority,
            task_type_id: req.task_type_id,
            team_id: req.team_id,
            assignee_ids: req.assignee_ids,
        },
    )
    .await?;

    tracing::info!(
        task_id = %task.id,
        worker_id = %session.worker_id,
        priority = task.priority.as_str(),
        "Task created"
    );

    Ok(Redirect::to(&detail_path(task.id)))
}

/// Task update form context handler
pub async fn update_task_form(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskUpdateFormContext>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let assignee_ids = Task::assignees(&state.db, id)
        .await?
        .into_iter()
        .map(|w| w.id)
        .collect();

    Ok(Json(TaskUpdateFormContext {
        task: TaskView::from(task),
        assignee_ids,
        context: form_context(&state).await?,
    }))
}

/// Task update handler
///
/// Replaces every field and the assignee set, then redirects to the task's
/// detail path.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskPayload>,
) -> ApiResult<Redirect> {
    req.validate()?;
    ensure_future_deadline(&req.deadline)?;

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            name: req.name,
            description: req.description,
            deadline: req.deadline,
            is_complete: req.is_complete,
            priority: req.priority,
            task_type_id: req.task_type_id,
            team_id: req.team_id,
            assignee_ids: req.assignee_ids,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(task_id = %task.id, worker_id = %session.worker_id, "Task updated");

    Ok(Redirect::to(&detail_path(task.id)))
}

/// Task delete confirmation context handler
pub async fn delete_task_confirm(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskView>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskView::from(task)))
}

/// Task delete handler
///
/// Removes the row and its assignee rows, then redirects to the list.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<Redirect> {
    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %id, worker_id = %session.worker_id, "Task deleted");

    Ok(Redirect::to("/list/"))
}

/// Mark-done handler
///
/// Idempotent: marking an already complete task succeeds. Always redirects
/// to the task's detail path.
pub async fn mark_task_done(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<Redirect> {
    let task = Task::mark_done(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(task_id = %task.id, worker_id = %session.worker_id, "Task marked done");

    Ok(Redirect::to(&detail_path(task.id)))
}
