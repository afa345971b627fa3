/// Dashboard endpoint
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```
///
/// Returns the entity counts shown on the landing page: workers, tasks,
/// completed tasks, task types, and positions.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskhive_shared::auth::middleware::Session;
use taskhive_shared::models::{
    position::Position, task::Task, task_type::TaskType, worker::Worker,
};

/// Dashboard counts response
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub num_workers: i64,
    pub num_tasks: i64,
    pub num_completed_tasks: i64,
    pub num_task_types: i64,
    pub num_positions: i64,
}

/// Dashboard handler
pub async fn index(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
) -> ApiResult<Json<DashboardResponse>> {
    let num_workers = Worker::count(&state.db).await?;
    let num_tasks = Task::count(&state.db).await?;
    let num_completed_tasks = Task::count_completed(&state.db).await?;
    let num_task_types = TaskType::count(&state.db).await?;
    let num_positions = Position::count(&state.db).await?;

    Ok(Json(DashboardResponse {
        num_workers,
        num_tasks,
        num_completed_tasks,
        num_task_types,
        num_positions,
    }))
}
