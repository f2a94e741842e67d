use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::target::{CreateTargetInput, Target};

/// A mission assigned (eventually) to a single cat.
///
/// # Lifecycle
/// Missions start `Active` and become `Completed` automatically when the last
/// open target is completed. There is no way back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mission {
    pub id: Uuid,
    pub status: MissionStatus,
    pub assigned_cat_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mission {
    pub fn is_completed(&self) -> bool {
        self.status == MissionStatus::Completed
    }
}

/// The status of a mission.
///
/// - `Active`: At least one target is still open
/// - `Completed`: Every target is completed (terminal)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Active,
    Completed,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Input for creating a mission together with all of its targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMissionInput {
    pub targets: Vec<CreateTargetInput>,
}

/// A mission with its targets, used for every mission response.
///
/// The `mission` fields are flattened into the JSON response, with an
/// additional `targets` array in creation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionWithTargets {
    #[serde(flatten)]
    pub mission: Mission,
    pub targets: Vec<Target>,
}
