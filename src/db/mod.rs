mod cats;
mod missions;
mod schema;

pub use cats::*;
pub use missions::*;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use uuid::Uuid;

use crate::error::AgencyResult;

/// Shared handle to the agency's SQLite database.
///
/// All handlers share one connection. Multi-step operations go through
/// [`Database::transaction`], which holds the connection lock for the whole
/// unit of work and starts an immediate (write-locking) transaction.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        tracing::debug!(path = %path.display(), "Opened database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "spy-cat-agency")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("sca.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    /// Run a read-only unit of work against a single snapshot.
    ///
    /// Every statement in `f` sees the same committed state, so a mission and
    /// its targets are never read from two different commits.
    pub fn read<T>(&self, f: impl FnOnce(&Connection) -> AgencyResult<T>) -> AgencyResult<T> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The transaction commits only when `f` returns `Ok`. Any error, including
    /// business rule violations raised halfway through, rolls back every write
    /// made by `f`.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> AgencyResult<T>,
    ) -> AgencyResult<T> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    // ============================================================
    // Read helpers
    // ============================================================

    pub fn get_all_cats(&self) -> AgencyResult<Vec<crate::models::Cat>> {
        self.read(|conn| Ok(list_cats(conn)?))
    }

    pub fn get_cat(&self, id: Uuid) -> AgencyResult<Option<crate::models::Cat>> {
        self.read(|conn| Ok(find_cat(conn, id)?))
    }

    pub fn get_all_missions(&self) -> AgencyResult<Vec<crate::models::MissionWithTargets>> {
        self.read(|conn| {
            let missions = list_missions(conn)?;
            let mut result = Vec::with_capacity(missions.len());
            for mission in missions {
                result.push(with_targets(conn, mission)?);
            }
            Ok(result)
        })
    }

    pub fn get_mission(&self, id: Uuid) -> AgencyResult<Option<crate::models::MissionWithTargets>> {
        self.read(|conn| match find_mission(conn, id)? {
            Some(mission) => Ok(Some(with_targets(conn, mission)?)),
            None => Ok(None),
        })
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
