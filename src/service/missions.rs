use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use super::validation::validate_targets;
use crate::db::{self, Database};
use crate::error::{AgencyError, AgencyResult};
use crate::models::*;

/// Business rules spanning missions, targets and cats.
///
/// Every mutating operation runs as a single immediate transaction, so checks
/// and writes cannot interleave with another request.
#[derive(Clone)]
pub struct MissionService {
    db: Database,
}

fn load_mission(conn: &Connection, id: Uuid) -> AgencyResult<Mission> {
    db::find_mission(conn, id)?.ok_or_else(|| AgencyError::not_found("Mission"))
}

impl MissionService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a mission with its 1..=3 targets in one transaction.
    pub fn create_mission(&self, input: CreateMissionInput) -> AgencyResult<MissionWithTargets> {
        let targets = validate_targets(&input.targets)?;

        let now = Utc::now();
        let mission = Mission {
            id: Uuid::new_v4(),
            status: MissionStatus::Active,
            assigned_cat_id: None,
            created_at: now,
            updated_at: now,
        };
        let targets: Vec<Target> = targets
            .into_iter()
            .map(|t| Target {
                id: Uuid::new_v4(),
                mission_id: mission.id,
                name: t.name,
                country: t.country,
                notes: t.notes,
                completed: false,
                created_at: now,
                updated_at: now,
            })
            .collect();

        self.db.transaction(|tx| {
            db::insert_mission(tx, &mission)?;
            for target in &targets {
                db::insert_target(tx, target)?;
            }
            Ok(())
        })?;

        tracing::info!(mission_id = %mission.id, targets = targets.len(), "Mission created");
        Ok(MissionWithTargets { mission, targets })
    }

    pub fn list_missions(&self) -> AgencyResult<Vec<MissionWithTargets>> {
        self.db.get_all_missions()
    }

    pub fn get_mission(&self, id: Uuid) -> AgencyResult<MissionWithTargets> {
        self.db
            .get_mission(id)?
            .ok_or_else(|| AgencyError::not_found("Mission"))
    }

    /// Assign `cat_id` to `mission_id`.
    ///
    /// A mission is assigned exactly once, even to the same cat. A cat holds at
    /// most one active mission.
    pub fn assign_cat(&self, mission_id: Uuid, cat_id: Uuid) -> AgencyResult<MissionWithTargets> {
        let assigned = self.db.transaction(|tx| {
            let mut mission = load_mission(tx, mission_id)?;
            db::find_cat(tx, cat_id)?.ok_or_else(|| AgencyError::not_found("Cat"))?;

            if mission.assigned_cat_id.is_some() {
                return Err(AgencyError::MissionAlreadyAssigned);
            }
            if mission.is_completed() {
                return Err(AgencyError::MissionCompleted);
            }
            if db::find_active_mission_for_cat(tx, cat_id)?.is_some() {
                return Err(AgencyError::CatBusy);
            }

            let now = Utc::now();
            db::assign_mission_cat(tx, mission_id, cat_id, now)?;
            mission.assigned_cat_id = Some(cat_id);
            mission.updated_at = now;
            Ok(db::with_targets(tx, mission)?)
        })?;

        tracing::info!(mission_id = %mission_id, cat_id = %cat_id, "Cat assigned to mission");
        Ok(assigned)
    }

    /// Update a target's notes and/or completion.
    ///
    /// Notes are frozen once the target or its mission is completed. Completion
    /// is one-way: `completed: false` and repeated `completed: true` are no-ops.
    /// Completing the last open target completes the mission in the same
    /// transaction.
    pub fn update_target(
        &self,
        mission_id: Uuid,
        target_id: Uuid,
        input: UpdateTargetInput,
    ) -> AgencyResult<Target> {
        let (target, mission_completed) = self.db.transaction(|tx| {
            let mission = load_mission(tx, mission_id)?;
            let mut target = db::find_target(tx, target_id)?
                .filter(|t| t.mission_id == mission_id)
                .ok_or_else(|| AgencyError::not_found("Target"))?;

            if input.notes.is_some() && (target.completed || mission.is_completed()) {
                return Err(AgencyError::TargetFrozen);
            }

            let completes = input.completed == Some(true) && !target.completed;
            if input.notes.is_none() && !completes {
                return Ok((target, false));
            }

            let now = Utc::now();
            if let Some(notes) = input.notes {
                target.notes = notes;
            }
            if completes {
                target.completed = true;
            }
            target.updated_at = now;
            db::save_target(tx, &target)?;

            let mut mission_completed = false;
            if completes && db::count_open_targets(tx, mission_id)? == 0 {
                db::set_mission_status(tx, mission_id, MissionStatus::Completed, now)?;
                mission_completed = true;
            }

            Ok((target, mission_completed))
        })?;

        tracing::info!(
            mission_id = %mission_id,
            target_id = %target_id,
            completed = target.completed,
            "Target updated"
        );
        if mission_completed {
            tracing::info!(mission_id = %mission_id, "All targets completed, mission completed");
        }
        Ok(target)
    }

    /// Delete an unassigned mission together with its targets.
    pub fn delete_mission(&self, id: Uuid) -> AgencyResult<()> {
        self.db.transaction(|tx| {
            let mission = load_mission(tx, id)?;
            if mission.assigned_cat_id.is_some() {
                return Err(AgencyError::MissionAssigned);
            }
            db::delete_targets_by_mission(tx, id)?;
            db::delete_mission(tx, id)?;
            Ok(())
        })?;

        tracing::info!(mission_id = %id, "Mission deleted");
        Ok(())
    }
}
