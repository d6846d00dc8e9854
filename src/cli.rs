//! Command handlers behind the `navstate` binary
//!
//! Handlers return the lines to print; `main` only parses arguments and
//! writes output.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::info;

use crate::data::SavedStateStore;
use crate::state::{JsonKeyParceler, RestorePolicy, StateRegistry};

/// How `inspect` renders a slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InspectMode {
    /// One line per record: index, key, fields present
    #[default]
    Summary,
    /// Each record's persisted JSON
    Json,
    /// Rebuild the slot as a registry and report what survives
    Restore(RestorePolicy),
}

pub fn list_slots(store: &SavedStateStore) -> Result<Vec<String>> {
    let slots = store.slots()?;
    if slots.is_empty() {
        return Ok(vec!["No saved slots".to_string()]);
    }
    Ok(slots
        .into_iter()
        .map(|slot| {
            let updated = slot
                .updated_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string());
            format!("{}\t{} record(s)\tupdated {}", slot.name, slot.records, updated)
        })
        .collect())
}

pub fn inspect_slot(
    store: &SavedStateStore,
    slot: &str,
    mode: InspectMode,
) -> Result<Vec<String>> {
    let Some(records) = store.load_snapshot(slot)? else {
        bail!("No saved slot named {slot:?}");
    };

    match mode {
        InspectMode::Summary => Ok(records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let key = record
                    .key
                    .as_ref()
                    .map(|key| key.to_string())
                    .unwrap_or_else(|| "<missing>".to_string());
                format!("#{index}\tkey={key}\tfields={}", record.field_names().join(","))
            })
            .collect()),
        InspectMode::Json => records
            .iter()
            .map(|record| Ok::<_, anyhow::Error>(record.to_json()?))
            .collect(),
        InspectMode::Restore(policy) => {
            let total = records.len();
            // Keys are opaque here, so restore them as raw JSON values
            let registry: StateRegistry<Value> =
                StateRegistry::from_persisted(records, &JsonKeyParceler::new(), policy)
                    .with_context(|| format!("Restoring slot {slot:?}"))?;

            let mut lines: Vec<String> = registry
                .keys()
                .map(|key| format!("key={key}"))
                .collect();
            lines.push(format!(
                "restored {} of {} record(s) (on_decode_error = {})",
                registry.len(),
                total,
                policy.as_str()
            ));
            Ok(lines)
        }
    }
}

pub fn drop_slot(store: &SavedStateStore, slot: &str) -> Result<String> {
    if !store.delete_slot(slot)? {
        bail!("No saved slot named {slot:?}");
    }
    info!(slot, "Deleted saved slot");
    Ok(format!("Deleted {slot}"))
}
