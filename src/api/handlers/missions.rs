use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::api::extract::{AgencyJson, AgencyPath};
use crate::api::AppState;
use crate::error::AgencyError;
use crate::models::*;

pub async fn list_missions(
    State(state): State<AppState>,
) -> Result<Json<Vec<MissionWithTargets>>, AgencyError> {
    state.missions.list_missions().map(Json)
}

pub async fn create_mission(
    State(state): State<AppState>,
    AgencyJson(input): AgencyJson<CreateMissionInput>,
) -> Result<(StatusCode, Json<MissionWithTargets>), AgencyError> {
    state
        .missions
        .create_mission(input)
        .map(|m| (StatusCode::CREATED, Json(m)))
}

pub async fn get_mission(
    State(state): State<AppState>,
    AgencyPath(id): AgencyPath<Uuid>,
) -> Result<Json<MissionWithTargets>, AgencyError> {
    state.missions.get_mission(id).map(Json)
}

pub async fn delete_mission(
    State(state): State<AppState>,
    AgencyPath(id): AgencyPath<Uuid>,
) -> Result<StatusCode, AgencyError> {
    state
        .missions
        .delete_mission(id)
        .map(|_| StatusCode::NO_CONTENT)
}

pub async fn assign_cat(
    State(state): State<AppState>,
    AgencyPath((id, cat_id)): AgencyPath<(Uuid, Uuid)>,
) -> Result<Json<MissionWithTargets>, AgencyError> {
    state.missions.assign_cat(id, cat_id).map(Json)
}

/// Update notes and/or completion of a target. Returns the updated target;
/// the mission's status is visible through `GET /missions/{id}`.
pub async fn update_target(
    State(state): State<AppState>,
    AgencyPath((id, target_id)): AgencyPath<(Uuid, Uuid)>,
    AgencyJson(input): AgencyJson<UpdateTargetInput>,
) -> Result<Json<Target>, AgencyError> {
    state
        .missions
        .update_target(id, target_id, input)
        .map(Json)
}
