use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A target inside a mission.
///
/// Targets have no lifecycle of their own: they are created with their mission
/// and deleted with it. `(name, country)` is unique within a mission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Target {
    pub id: Uuid,
    pub mission_id: Uuid,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a target when creating a mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTargetInput {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: String,
}

impl CreateTargetInput {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            notes: String::new(),
        }
    }
}

/// Input for updating a target. All fields are optional for partial updates.
///
/// - `notes`: rejected once the target or its mission is completed.
/// - `completed`: only `true` has an effect; completion cannot be undone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTargetInput {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}
