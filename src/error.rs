//! Typed failures shared by the services and the HTTP layer.

use thiserror::Error;

/// Result type used by the service and repository layers.
pub type AgencyResult<T> = Result<T, AgencyError>;

/// Every way an agency operation can fail.
///
/// Business rule violations are detected inside the services and never leak as
/// raw storage errors. `Database` is reserved for genuine infrastructure failures.
#[derive(Debug, Error)]
pub enum AgencyError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown cat breed: {0}")]
    InvalidBreed(String),

    #[error("breed lookup service unavailable: {0}")]
    ExternalServiceUnavailable(String),

    #[error("a mission needs between 1 and 3 targets, got {0}")]
    InvalidTargetCount(usize),

    #[error("targets must be unique within a mission, duplicate: {name} ({country})")]
    DuplicateTarget { name: String, country: String },

    #[error("mission is already assigned to a cat")]
    MissionAlreadyAssigned,

    #[error("mission is already completed")]
    MissionCompleted,

    #[error("cat already has an active mission")]
    CatBusy,

    #[error("notes are frozen once the target or its mission is completed")]
    TargetFrozen,

    #[error("cannot delete a mission that is assigned to a cat")]
    MissionAssigned,

    #[error("cannot delete a cat with an active mission")]
    CatHasActiveMission,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl AgencyError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Stable machine-readable code, part of the HTTP error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidBreed(_) => "INVALID_BREED",
            Self::ExternalServiceUnavailable(_) => "EXTERNAL_SERVICE_UNAVAILABLE",
            Self::InvalidTargetCount(_) => "INVALID_TARGET_COUNT",
            Self::DuplicateTarget { .. } => "DUPLICATE_TARGET",
            Self::MissionAlreadyAssigned => "MISSION_ALREADY_ASSIGNED",
            Self::MissionCompleted => "MISSION_COMPLETED",
            Self::CatBusy => "CAT_BUSY",
            Self::TargetFrozen => "TARGET_FROZEN",
            Self::MissionAssigned => "MISSION_ASSIGNED",
            Self::CatHasActiveMission => "CAT_HAS_ACTIVE_MISSION",
            Self::Database(_) => "INTERNAL_ERROR",
        }
    }

    /// Only an unreachable breed service is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalServiceUnavailable(_))
    }
}
