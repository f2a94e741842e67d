mod error;
mod extract;
mod handlers;

pub use error::status_for;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::breeds::BreedValidator;
use crate::db::Database;
use crate::service::{CatService, MissionService};

/// Shared handler state: one service per aggregate.
#[derive(Clone)]
pub struct AppState {
    pub cats: CatService,
    pub missions: MissionService,
}

impl AppState {
    pub fn new(db: Database, breeds: BreedValidator) -> Self {
        Self {
            cats: CatService::new(db.clone(), breeds),
            missions: MissionService::new(db),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Cats
        .route("/cats", get(handlers::list_cats).post(handlers::create_cat))
        .route(
            "/cats/{id}",
            get(handlers::get_cat)
                .patch(handlers::update_cat_salary)
                .delete(handlers::delete_cat),
        )
        // Missions
        .route(
            "/missions",
            get(handlers::list_missions).post(handlers::create_mission),
        )
        .route(
            "/missions/{id}",
            get(handlers::get_mission).delete(handlers::delete_mission),
        )
        .route("/missions/{id}/assign/{cat_id}", post(handlers::assign_cat))
        .route(
            "/missions/{id}/targets/{target_id}",
            patch(handlers::update_target),
        )
        // Health
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
