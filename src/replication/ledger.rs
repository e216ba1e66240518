//! Spawn Ledger
//!
//! Append-only record of every child this habitat has launched. SQLite
//! keeps it durable across generations; WAL mode plus a busy timeout
//! lets sibling processes write without tripping over each other.
//! Nothing is ever awaited, updated, or deleted here: spawned children
//! are fire-and-forget, the ledger only preserves debuggability.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection};

use crate::types::SpawnRecord;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS spawns (
    id          TEXT PRIMARY KEY,
    parent      TEXT NOT NULL,
    child       TEXT NOT NULL,
    generation  INTEGER NOT NULL,
    artifact    TEXT NOT NULL,
    pid         INTEGER,
    spawned_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_spawns_parent ON spawns(parent);
";

/// Handle on the habitat's spawn ledger.
pub struct SpawnLedger {
    conn: Connection,
}

impl SpawnLedger {
    /// Open (or create) the ledger at `path`.
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(Duration::from_millis(5_000))?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self { conn })
    }

    /// Open an in-memory ledger (useful for testing).
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self { conn })
    }

    /// Append one spawn row.
    pub fn append(&self, record: &SpawnRecord) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO spawns (id, parent, child, generation, artifact, pid, spawned_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.parent,
                record.child,
                record.generation,
                record.artifact,
                record.pid,
                record.spawned_at,
            ],
        )?;
        Ok(())
    }

    /// The most recent `limit` spawns, oldest first.
    pub fn recent(&self, limit: i64) -> Result<Vec<SpawnRecord>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, parent, child, generation, artifact, pid, spawned_at
             FROM spawns ORDER BY rowid DESC LIMIT ?1",
        )?;
        let mut records: Vec<SpawnRecord> = stmt
            .query_map(params![limit], |row| {
                Ok(SpawnRecord {
                    id: row.get(0)?,
                    parent: row.get(1)?,
                    child: row.get(2)?,
                    generation: row.get(3)?,
                    artifact: row.get(4)?,
                    pid: row.get(5)?,
                    spawned_at: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        records.reverse();
        Ok(records)
    }

    /// Offspring counts per parent, busiest first.
    pub fn summary(&self) -> Result<Vec<(String, i64)>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT parent, COUNT(*) FROM spawns GROUP BY parent ORDER BY COUNT(*) DESC",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    /// Total rows ever appended.
    pub fn spawn_count(&self) -> Result<i64, rusqlite::Error> {
        self.conn
            .query_row("SELECT COUNT(*) FROM spawns", [], |row| row.get(0))
    }
}
