//! Schema upgrades for the saved-state database.
//!
//! The schema version lives in SQLite's `user_version` pragma. Step `n` of
//! [`SCHEMA_STEPS`] upgrades a database from version `n` to `n + 1`.

use rusqlite::Connection;
use tracing::{error, info};

use super::database::DatabaseError;

/// Upgrade steps in order. Append only; never edit a released step.
const SCHEMA_STEPS: &[&str] = &[
    // 1: slot headers
    "CREATE TABLE IF NOT EXISTS state_slots (
        name TEXT PRIMARY KEY,
        updated_at TEXT NOT NULL
    );",
    // 2: one row per persisted record, ordered within its slot
    "CREATE TABLE IF NOT EXISTS saved_states (
        slot TEXT NOT NULL,
        position INTEGER NOT NULL,
        record TEXT NOT NULL,
        PRIMARY KEY (slot, position),
        FOREIGN KEY (slot) REFERENCES state_slots(name) ON DELETE CASCADE
    );",
];

/// Schema version this build writes
pub const SCHEMA_VERSION: i64 = SCHEMA_STEPS.len() as i64;

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Bring `conn` up to [`SCHEMA_VERSION`].
///
/// Refuses databases written by a newer build rather than guessing at their layout.
pub fn upgrade(conn: &mut Connection) -> Result<(), DatabaseError> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DatabaseError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    for (index, sql) in SCHEMA_STEPS.iter().enumerate().skip(found as usize) {
        let version = index as i64 + 1;
        let tx = conn.transaction()?;
        let applied = tx
            .execute_batch(sql)
            .and_then(|_| tx.pragma_update(None, "user_version", version))
            .and_then(|_| tx.commit());
        if let Err(e) = applied {
            error!(version, error = %e, "Schema upgrade failed");
            return Err(e.into());
        }
        info!(version, "Upgraded saved-state schema");
    }

    Ok(())
}
