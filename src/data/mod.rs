//! Optional SQLite persistence for saved navigation state
//!
//! Nothing in `state` or `scope` touches storage. Callers that want durable
//! snapshots open a [`Database`] and go through [`SavedStateStore`].

mod database;
mod migrations;
mod saved_state;

pub use database::{Database, DatabaseError};
pub use saved_state::{SavedStateStore, SlotInfo};
