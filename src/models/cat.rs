use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spy cat employed by the agency.
///
/// The breed is stored in the canonical spelling returned by the breed lookup,
/// so `"siamese"` on input is persisted as `"Siamese"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cat {
    pub id: Uuid,
    pub name: String,
    pub breed: String,
    pub years_of_experience: i64,
    pub salary: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for hiring a new cat.
///
/// Range checks happen in the service's validation stage, not in the decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCatInput {
    pub name: String,
    pub breed: String,
    pub years_of_experience: i64,
    pub salary: f64,
}

/// Input for changing a cat's salary, the only mutable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCatSalaryInput {
    pub salary: f64,
}
