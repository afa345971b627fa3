/// Team endpoints
///
/// Same CRUD contract pattern as tasks, with the member worker set as the
/// multi-valued relation.
///
/// # Endpoints
///
/// - `GET  /teams/` - list
/// - `GET/POST /team/create/` - form context / create
/// - `GET  /team/{id}/` - detail with members
/// - `GET/POST /teams/{id}/update/` - form context / update
/// - `GET/POST /teams/{id}/delete/` - confirmation context / delete

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    response::Redirect,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskhive_shared::auth::middleware::Session;
use taskhive_shared::models::{
    team::{CreateTeam, Team, UpdateTeam},
    worker::{Worker, WorkerSummary},
};
use uuid::Uuid;
use validator::Validate;

/// Team list response
#[derive(Debug, Serialize)]
pub struct TeamListResponse {
    pub teams: Vec<Team>,
}

/// Team detail response
#[derive(Debug, Serialize)]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    pub team: Team,
    pub members: Vec<WorkerSummary>,
}

/// Choice lists for the team form
#[derive(Debug, Serialize)]
pub struct TeamFormContext {
    pub workers: Vec<WorkerSummary>,
}

/// Form context plus the team being edited
#[derive(Debug, Serialize)]
pub struct TeamUpdateFormContext {
    pub team: Team,
    pub worker_ids: Vec<Uuid>,
    pub workers: Vec<WorkerSummary>,
}

/// Create/update payload
///
/// `worker_ids` is the complete desired member set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TeamPayload {
    /// Team name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Member workers (may be empty)
    #[serde(default)]
    pub worker_ids: Vec<Uuid>,
}

fn detail_path(id: Uuid) -> String {
    format!("/team/{}/", id)
}

/// Team list handler
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
) -> ApiResult<Json<TeamListResponse>> {
    let teams = Team::list(&state.db).await?;

    Ok(Json(TeamListResponse { teams }))
}

/// Team creation form context handler
pub async fn create_team_form(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
) -> ApiResult<Json<TeamFormContext>> {
    Ok(Json(TeamFormContext {
        workers: Worker::list_all(&state.db).await?,
    }))
}

/// Team creation handler
///
/// Redirects to the new team's detail path on success.
pub async fn create_team(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<TeamPayload>,
) -> ApiResult<Redirect> {
    req.validate()?;

    let team = Team::create(
        &state.db,
        CreateTeam {
            name: req.name,
            description: req.description,
            worker_ids: req.worker_ids,
        },
    )
    .await?;

    tracing::info!(team_id = %team.id, worker_id = %session.worker_id, "Team created");

    Ok(Redirect::to(&detail_path(team.id)))
}

/// Team detail handler
pub async fn team_detail(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TeamDetailResponse>> {
    let team = Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let members = Team::members(&state.db, id).await?;

    Ok(Json(TeamDetailResponse { team, members }))
}

/// Team update form context handler
pub async fn update_team_form(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TeamUpdateFormContext>> {
    let team = Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let worker_ids = Team::members(&state.db, id)
        .await?
        .into_iter()
        .map(|w| w.id)
        .collect();

    Ok(Json(TeamUpdateFormContext {
        team,
        worker_ids,
        workers: Worker::list_all(&state.db).await?,
    }))
}

/// Team update handler
///
/// Replaces the scalar fields and the member set, then redirects to the
/// team's detail path.
pub async fn update_team(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(req): Json<TeamPayload>,
) -> ApiResult<Redirect> {
    req.validate()?;

    let team = Team::update(
        &state.db,
        id,
        UpdateTeam {
            name: req.name,
            description: req.description,
            worker_ids: req.worker_ids,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    tracing::info!(team_id = %team.id, worker_id = %session.worker_id, "Team updated");

    Ok(Redirect::to(&detail_path(team.id)))
}

/// Team delete confirmation context handler
pub async fn delete_team_confirm(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Team>> {
    let team = Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    Ok(Json(team))
}

/// Team delete handler
///
/// Member workers are left intact and referencing tasks keep existing with
/// a null team. Redirects to the team list.
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> ApiResult<Redirect> {
    let deleted = Team::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Team not found".to_string()));
    }

    tracing::info!(team_id = %id, worker_id = %session.worker_id, "Team deleted");

    Ok(Redirect::to("/teams/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_team_payload_defaults() {
        let payload: TeamPayload = serde_json::from_value(json!({
            "name": "Backend"
        }))
        .unwrap();

        assert_eq!(payload.description, "");
        assert!(payload.worker_ids.is_empty());
    }

    #[test]
    fn test_team_payload_empty_name_rejected() {
        let payload: TeamPayload = serde_json::from_value(json!({
            "name": ""
        }))
        .unwrap();

        assert!(payload.validate().is_err());
    }
}
