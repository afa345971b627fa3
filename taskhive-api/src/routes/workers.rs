/// Worker endpoints
///
/// # Endpoints
///
/// - `GET  /workers/` - paginated list (page size 10)
/// - `GET/POST /workers/update/` - self profile form context / update
///
/// The profile update path carries no target id: the edited worker is
/// always the one resolved from the session, so editing someone else's
/// profile is structurally impossible.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    response::Redirect,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskhive_shared::auth::middleware::Session;
use taskhive_shared::models::{
    position::Position,
    team::Team,
    worker::{UpdateProfile, Worker, WorkerSummary},
};
use uuid::Uuid;
use validator::Validate;

/// Fixed page size for worker listings
const WORKER_PAGE_SIZE: i64 = 10;

/// Worker listing entry with the rendered display string
#[derive(Debug, Serialize)]
pub struct WorkerItem {
    #[serde(flatten)]
    pub worker: WorkerSummary,
    pub display: String,
}

impl From<WorkerSummary> for WorkerItem {
    fn from(worker: WorkerSummary) -> Self {
        let display = worker.display();
        Self { worker, display }
    }
}

/// Query parameters for the worker list
#[derive(Debug, Deserialize)]
pub struct WorkerListQuery {
    /// 1-based page number
    pub page: Option<i64>,
}

/// Worker list response
#[derive(Debug, Serialize)]
pub struct WorkerListResponse {
    pub workers: Vec<WorkerItem>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

/// Profile form context: the caller's current values and the choice lists
#[derive(Debug, Serialize)]
pub struct ProfileFormContext {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position_id: Uuid,
    pub team_ids: Vec<Uuid>,
    pub positions: Vec<Position>,
    pub teams: Vec<Team>,
}

/// Self profile update payload
///
/// `team_ids` is the complete desired membership set; teams absent from it
/// are removed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfilePayload {
    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "First name must be 1-255 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255, message = "Last name must be 1-255 characters"))]
    pub last_name: String,

    pub position_id: Uuid,

    #[serde(default)]
    pub team_ids: Vec<Uuid>,
}

/// Worker list handler
pub async fn list_workers(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Query(query): Query<WorkerListQuery>,
) -> ApiResult<Json<WorkerListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * WORKER_PAGE_SIZE;

    let workers = Worker::list(&state.db, WORKER_PAGE_SIZE, offset).await?;
    let total = Worker::count(&state.db).await?;

    Ok(Json(WorkerListResponse {
        workers: workers.into_iter().map(WorkerItem::from).collect(),
        page,
        page_size: WORKER_PAGE_SIZE,
        total,
    }))
}

/// Profile form context handler
///
/// The target is always the session's worker.
pub async fn update_profile_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<ProfileFormContext>> {
    let worker = Worker::find_by_id(&state.db, session.worker_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let team_ids = Worker::team_ids(&state.db, worker.id).await?;

    Ok(Json(ProfileFormContext {
        username: worker.username,
        email: worker.email,
        first_name: worker.first_name,
        last_name: worker.last_name,
        position_id: worker.position_id,
        team_ids,
        positions: Position::list(&state.db).await?,
        teams: Team::list(&state.db).await?,
    }))
}

/// Profile update handler
///
/// Scalar fields are persisted first, then the team membership set is
/// replaced with the submitted one on the same transaction. The target id
/// comes from the session, never from request input. Redirects to the
/// worker list on success.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<ProfilePayload>,
) -> ApiResult<Redirect> {
    req.validate()?;

    let worker = Worker::update_profile(
        &state.db,
        session.worker_id,
        UpdateProfile {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            position_id: req.position_id,
            team_ids: req.team_ids,
        },
    )
    .await?
    .ok_or(ApiError::Unauthorized)?;

    tracing::info!(worker_id = %worker.id, "Worker profile updated");

    Ok(Redirect::to("/workers/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_payload_validation() {
        let valid: ProfilePayload = serde_json::from_value(json!({
            "username": "john",
            "email": "john@example.com",
            "first_name": "John",
            "last_name": "Doe",
            "position_id": "550e8400-e29b-41d4-a716-446655440000"
        }))
        .unwrap();
        assert!(valid.validate().is_ok());
        assert!(valid.team_ids.is_empty());

        let bad_email: ProfilePayload = serde_json::from_value(json!({
            "username": "john",
            "email": "not-an-email",
            "first_name": "John",
            "last_name": "Doe",
            "position_id": "550e8400-e29b-41d4-a716-446655440000"
        }))
        .unwrap();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_worker_item_display() {
        let item = WorkerItem::from(WorkerSummary {
            id: Uuid::new_v4(),
            username: "john".to_string(),
            email: "john@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            position_name: "Engineer".to_string(),
        });

        assert!(item.display.contains("John"));
        assert!(item.display.contains("Engineer"));
    }
}
