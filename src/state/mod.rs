//! Per-screen navigation state
//!
//! A [`State`] pairs a screen's identity key with the captured hierarchy
//! state of its view tree and an auxiliary [`Bundle`]. Records convert to and
//! from a flattened [`PersistedState`] through an injected [`KeyParceler`],
//! and a [`StateRegistry`] keeps one record per key.

pub mod codec;
pub mod error;
pub mod persisted;
pub mod record;
pub mod registry;
pub mod view;

pub use codec::{JsonKeyParceler, KeyParceler};
pub use error::StateError;
pub use persisted::PersistedState;
pub use record::State;
pub use registry::{RestorePolicy, StateRegistry};
pub use view::{Bundle, Parcel, ViewHierarchy, ViewState};
