//! Saved state data access object
//!
//! Stores registry snapshots as ordered persisted-form JSON rows under a
//! named slot. Saving a slot replaces whatever it held before.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use super::database::DatabaseError;
use crate::state::{KeyParceler, PersistedState, RestorePolicy, StateRegistry};

/// Summary of one stored slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotInfo {
    pub name: String,
    /// `None` when the stored timestamp could not be parsed
    pub updated_at: Option<DateTime<Utc>>,
    pub records: usize,
}

/// Data access object for saved navigation state
#[derive(Clone)]
pub struct SavedStateStore {
    conn: Arc<Mutex<Connection>>,
}

impl SavedStateStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }

    /// Replace the contents of `slot` with `records`, in order
    pub fn save_snapshot(
        &self,
        slot: &str,
        records: &[PersistedState],
    ) -> Result<(), DatabaseError> {
        let rows = records
            .iter()
            .map(PersistedState::to_json)
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO state_slots (name, updated_at) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET updated_at = excluded.updated_at",
            params![slot, Utc::now().to_rfc3339()],
        )?;
        tx.execute("DELETE FROM saved_states WHERE slot = ?1", params![slot])?;
        for (position, record) in rows.iter().enumerate() {
            tx.execute(
                "INSERT INTO saved_states (slot, position, record) VALUES (?1, ?2, ?3)",
                params![slot, position as i64, record],
            )?;
        }
        tx.commit()?;

        debug!(slot, records = rows.len(), "Saved state snapshot");
        Ok(())
    }

    /// Load the records stored under `slot`, or `None` if the slot doesn't exist
    pub fn load_snapshot(
        &self,
        slot: &str,
    ) -> Result<Option<Vec<PersistedState>>, DatabaseError> {
        let conn = self.lock()?;
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM state_slots WHERE name = ?1",
            params![slot],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Ok(None);
        }

        let mut stmt =
            conn.prepare("SELECT record FROM saved_states WHERE slot = ?1 ORDER BY position")?;
        let rows = stmt
            .query_map(params![slot], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let records = rows
            .iter()
            .map(|json| PersistedState::from_json(json))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(records))
    }

    /// Flatten `registry` and store it under `slot`. Returns the record count.
    pub fn save_registry<K: PartialEq>(
        &self,
        slot: &str,
        registry: &StateRegistry<K>,
        parceler: &impl KeyParceler<K>,
    ) -> Result<usize, DatabaseError> {
        let records = registry.to_persisted(parceler)?;
        self.save_snapshot(slot, &records)?;
        Ok(records.len())
    }

    /// Rebuild a registry from `slot`
    pub fn load_registry<K: PartialEq>(
        &self,
        slot: &str,
        parceler: &impl KeyParceler<K>,
        policy: RestorePolicy,
    ) -> Result<Option<StateRegistry<K>>, DatabaseError> {
        let Some(records) = self.load_snapshot(slot)? else {
            return Ok(None);
        };
        let total = records.len();
        let registry = StateRegistry::from_persisted(records, parceler, policy)?;
        if registry.len() < total {
            warn!(
                slot,
                kept = registry.len(),
                total,
                "Some saved records were not restored"
            );
        }
        Ok(Some(registry))
    }

    /// All slots, most recently updated first
    pub fn slots(&self) -> Result<Vec<SlotInfo>, DatabaseError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT s.name, s.updated_at, COUNT(r.position)
             FROM state_slots s
             LEFT JOIN saved_states r ON r.slot = s.name
             GROUP BY s.name
             ORDER BY s.updated_at DESC, s.name",
        )?;

        let slots = stmt
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let raw_updated_at: String = row.get(1)?;
                let records: i64 = row.get(2)?;
                let updated_at = match DateTime::parse_from_rfc3339(&raw_updated_at) {
                    Ok(dt) => Some(dt.with_timezone(&Utc)),
                    Err(e) => {
                        warn!(
                            slot = %name,
                            value = %raw_updated_at,
                            error = %e,
                            "Unreadable slot timestamp"
                        );
                        None
                    }
                };
                Ok(SlotInfo {
                    name,
                    updated_at,
                    records: records as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(slots)
    }

    /// Delete a slot and its records. Returns whether it existed.
    pub fn delete_slot(&self, slot: &str) -> Result<bool, DatabaseError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM saved_states WHERE slot = ?1", params![slot])?;
        let deleted = conn.execute("DELETE FROM state_slots WHERE name = ?1", params![slot])?;
        Ok(deleted > 0)
    }
}
