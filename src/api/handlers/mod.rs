mod cats;
mod missions;

pub use cats::*;
pub use missions::*;

use axum::{response::IntoResponse, Json};

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
