use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row};
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::models::Cat;

const CAT_COLUMNS: &str = "id, name, breed, years_of_experience, salary, created_at, updated_at";

fn cat_from_row(row: &Row<'_>) -> rusqlite::Result<Cat> {
    Ok(Cat {
        id: parse_uuid(row.get::<_, String>(0)?),
        name: row.get(1)?,
        breed: row.get(2)?,
        years_of_experience: row.get(3)?,
        salary: row.get(4)?,
        created_at: parse_datetime(row.get::<_, String>(5)?),
        updated_at: parse_datetime(row.get::<_, String>(6)?),
    })
}

pub fn list_cats(conn: &Connection) -> rusqlite::Result<Vec<Cat>> {
    let mut stmt = conn.prepare(&format!("SELECT {CAT_COLUMNS} FROM cats ORDER BY rowid"))?;
    let cats = stmt
        .query_map([], cat_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cats)
}

pub fn find_cat(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Cat>> {
    let mut stmt = conn.prepare(&format!("SELECT {CAT_COLUMNS} FROM cats WHERE id = ?"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(cat_from_row(row)?)),
        None => Ok(None),
    }
}

pub fn insert_cat(conn: &Connection, cat: &Cat) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO cats (id, name, breed, years_of_experience, salary, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        (
            cat.id.to_string(),
            &cat.name,
            &cat.breed,
            cat.years_of_experience,
            cat.salary,
            cat.created_at.to_rfc3339(),
            cat.updated_at.to_rfc3339(),
        ),
    )?;
    Ok(())
}

pub fn update_cat_salary(
    conn: &Connection,
    id: Uuid,
    salary: f64,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE cats SET salary = ?, updated_at = ? WHERE id = ?",
        (salary, now.to_rfc3339(), id.to_string()),
    )?;
    Ok(rows > 0)
}

pub fn delete_cat(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM cats WHERE id = ?", [id.to_string()])?;
    Ok(rows > 0)
}
