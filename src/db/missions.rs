use chrono::{DateTime, Utc};
use rusqlite::{types::Type, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::models::{Mission, MissionStatus, MissionWithTargets, Target};

const MISSION_COLUMNS: &str = "id, status, assigned_cat_id, created_at, updated_at";
const TARGET_COLUMNS: &str =
    "id, mission_id, name, country, notes, completed, created_at, updated_at";

fn mission_from_row(row: &Row<'_>) -> rusqlite::Result<Mission> {
    let status: String = row.get(1)?;
    let status = MissionStatus::from_str(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            format!("unknown mission status: {status}").into(),
        )
    })?;

    Ok(Mission {
        id: parse_uuid(row.get::<_, String>(0)?),
        status,
        assigned_cat_id: row.get::<_, Option<String>>(2)?.map(parse_uuid),
        created_at: parse_datetime(row.get::<_, String>(3)?),
        updated_at: parse_datetime(row.get::<_, String>(4)?),
    })
}

fn target_from_row(row: &Row<'_>) -> rusqlite::Result<Target> {
    Ok(Target {
        id: parse_uuid(row.get::<_, String>(0)?),
        mission_id: parse_uuid(row.get::<_, String>(1)?),
        name: row.get(2)?,
        country: row.get(3)?,
        notes: row.get(4)?,
        completed: row.get::<_, i32>(5)? != 0,
        created_at: parse_datetime(row.get::<_, String>(6)?),
        updated_at: parse_datetime(row.get::<_, String>(7)?),
    })
}

// ============================================================
// Missions
// ============================================================

pub fn list_missions(conn: &Connection) -> rusqlite::Result<Vec<Mission>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {MISSION_COLUMNS} FROM missions ORDER BY rowid"))?;
    let missions = stmt
        .query_map([], mission_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(missions)
}

pub fn find_mission(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Mission>> {
    conn.query_row(
        &format!("SELECT {MISSION_COLUMNS} FROM missions WHERE id = ?"),
        [id.to_string()],
        mission_from_row,
    )
    .optional()
}

/// The active mission currently held by `cat_id`, if any.
pub fn find_active_mission_for_cat(
    conn: &Connection,
    cat_id: Uuid,
) -> rusqlite::Result<Option<Mission>> {
    conn.query_row(
        &format!(
            "SELECT {MISSION_COLUMNS} FROM missions
             WHERE assigned_cat_id = ? AND status = 'active'
             ORDER BY rowid LIMIT 1"
        ),
        [cat_id.to_string()],
        mission_from_row,
    )
    .optional()
}

pub fn insert_mission(conn: &Connection, mission: &Mission) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO missions (id, status, assigned_cat_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
        (
            mission.id.to_string(),
            mission.status.as_str(),
            mission.assigned_cat_id.map(|u| u.to_string()),
            mission.created_at.to_rfc3339(),
            mission.updated_at.to_rfc3339(),
        ),
    )?;
    Ok(())
}

pub fn assign_mission_cat(
    conn: &Connection,
    id: Uuid,
    cat_id: Uuid,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE missions SET assigned_cat_id = ?, updated_at = ? WHERE id = ?",
        (cat_id.to_string(), now.to_rfc3339(), id.to_string()),
    )?;
    Ok(rows > 0)
}

pub fn set_mission_status(
    conn: &Connection,
    id: Uuid,
    status: MissionStatus,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE missions SET status = ?, updated_at = ? WHERE id = ?",
        (status.as_str(), now.to_rfc3339(), id.to_string()),
    )?;
    Ok(rows > 0)
}

pub fn delete_mission(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM missions WHERE id = ?", [id.to_string()])?;
    Ok(rows > 0)
}

pub fn with_targets(conn: &Connection, mission: Mission) -> rusqlite::Result<MissionWithTargets> {
    let targets = targets_by_mission(conn, mission.id)?;
    Ok(MissionWithTargets { mission, targets })
}

// ============================================================
// Targets
// ============================================================

pub fn targets_by_mission(conn: &Connection, mission_id: Uuid) -> rusqlite::Result<Vec<Target>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TARGET_COLUMNS} FROM targets WHERE mission_id = ? ORDER BY rowid"
    ))?;
    let targets = stmt
        .query_map([mission_id.to_string()], target_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(targets)
}

pub fn find_target(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Target>> {
    conn.query_row(
        &format!("SELECT {TARGET_COLUMNS} FROM targets WHERE id = ?"),
        [id.to_string()],
        target_from_row,
    )
    .optional()
}

pub fn insert_target(conn: &Connection, target: &Target) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO targets (id, mission_id, name, country, notes, completed, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        (
            target.id.to_string(),
            target.mission_id.to_string(),
            &target.name,
            &target.country,
            &target.notes,
            if target.completed { 1 } else { 0 },
            target.created_at.to_rfc3339(),
            target.updated_at.to_rfc3339(),
        ),
    )?;
    Ok(())
}

/// Persist the mutable fields of a target (`notes`, `completed`).
pub fn save_target(conn: &Connection, target: &Target) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE targets SET notes = ?, completed = ?, updated_at = ? WHERE id = ?",
        (
            &target.notes,
            if target.completed { 1 } else { 0 },
            target.updated_at.to_rfc3339(),
            target.id.to_string(),
        ),
    )?;
    Ok(rows > 0)
}

pub fn count_open_targets(conn: &Connection, mission_id: Uuid) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM targets WHERE mission_id = ? AND completed = 0",
        [mission_id.to_string()],
        |row| row.get(0),
    )
}

pub fn delete_targets_by_mission(conn: &Connection, mission_id: Uuid) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM targets WHERE mission_id = ?",
        [mission_id.to_string()],
    )
}
