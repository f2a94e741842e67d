use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::api::extract::{AgencyJson, AgencyPath};
use crate::api::AppState;
use crate::error::AgencyError;
use crate::models::*;

pub async fn list_cats(State(state): State<AppState>) -> Result<Json<Vec<Cat>>, AgencyError> {
    state.cats.list().map(Json)
}

/// Hire a cat. The breed is checked against TheCatAPI before anything is stored.
pub async fn create_cat(
    State(state): State<AppState>,
    AgencyJson(input): AgencyJson<CreateCatInput>,
) -> Result<(StatusCode, Json<Cat>), AgencyError> {
    state
        .cats
        .create(input)
        .await
        .map(|c| (StatusCode::CREATED, Json(c)))
}

pub async fn get_cat(
    State(state): State<AppState>,
    AgencyPath(id): AgencyPath<Uuid>,
) -> Result<Json<Cat>, AgencyError> {
    state.cats.get(id).map(Json)
}

pub async fn update_cat_salary(
    State(state): State<AppState>,
    AgencyPath(id): AgencyPath<Uuid>,
    AgencyJson(input): AgencyJson<UpdateCatSalaryInput>,
) -> Result<Json<Cat>, AgencyError> {
    state.cats.update_salary(id, input).map(Json)
}

pub async fn delete_cat(
    State(state): State<AppState>,
    AgencyPath(id): AgencyPath<Uuid>,
) -> Result<StatusCode, AgencyError> {
    state.cats.delete(id).map(|_| StatusCode::NO_CONTENT)
}
