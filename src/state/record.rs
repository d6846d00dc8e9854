//! The per-screen state record

use std::fmt;
use std::hash::{Hash, Hasher};

use super::codec::KeyParceler;
use super::error::StateError;
use super::persisted::PersistedState;
use super::view::{Bundle, ViewHierarchy, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Live,
    /// Never holds state; every mutation is ignored
    Stateless,
}

/// Captured view state and auxiliary data for one screen, identified by `key`.
///
/// Equality and hashing look at the key only. Two records for the same screen
/// compare equal no matter what each has captured, so a collection can detect
/// "already have a record for this screen" without comparing state.
#[derive(Debug, Clone)]
pub struct State<K> {
    key: K,
    kind: Kind,
    view_state: Option<ViewState>,
    bundle: Option<Bundle>,
}

impl<K> State<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            kind: Kind::Live,
            view_state: None,
            bundle: None,
        }
    }

    /// Creates a record that has no state and is effectively immutable.
    ///
    /// Use for screens whose view state must never be kept, such as
    /// placeholders or screens that are already detached.
    pub fn empty(key: K) -> Self {
        Self {
            key,
            kind: Kind::Stateless,
            view_state: None,
            bundle: None,
        }
    }

    /// Rebuild a record from its persisted form.
    ///
    /// Fails when `KEY` is missing or the parceler cannot decode it.
    pub fn from_persisted(
        persisted: PersistedState,
        parceler: &impl KeyParceler<K>,
    ) -> Result<Self, StateError> {
        let encoded = persisted.key.ok_or(StateError::MissingKey)?;
        let key = parceler.to_key(&encoded)?;
        Ok(Self {
            key,
            kind: Kind::Live,
            view_state: persisted.view_state,
            bundle: persisted.bundle,
        })
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_key(self) -> K {
        self.key
    }

    pub fn is_stateless(&self) -> bool {
        self.kind == Kind::Stateless
    }

    /// Freeze the view tree's hierarchy state, replacing anything saved before
    pub fn save(&mut self, view: &impl ViewHierarchy) {
        if self.is_stateless() {
            return;
        }
        self.view_state = Some(view.capture_state());
    }

    /// Push saved hierarchy state back into the view tree, if any was saved
    pub fn restore(&self, view: &mut impl ViewHierarchy) {
        if self.is_stateless() {
            return;
        }
        if let Some(view_state) = &self.view_state {
            view.apply_state(view_state);
        }
    }

    pub fn view_state(&self) -> Option<&ViewState> {
        self.view_state.as_ref()
    }

    pub fn set_bundle(&mut self, bundle: Option<Bundle>) {
        if self.is_stateless() {
            return;
        }
        self.bundle = bundle;
    }

    pub fn bundle(&self) -> Option<&Bundle> {
        self.bundle.as_ref()
    }

    /// Flatten for persistence.
    ///
    /// `VIEW_STATE` and `BUNDLE` are only written when non-empty.
    pub fn to_persisted(
        &self,
        parceler: &impl KeyParceler<K>,
    ) -> Result<PersistedState, StateError> {
        Ok(PersistedState {
            key: Some(parceler.to_parcelable(&self.key)?),
            view_state: self.view_state.clone().filter(|state| !state.is_empty()),
            bundle: self.bundle.clone().filter(|bundle| !bundle.is_empty()),
        })
    }
}

/// Stateless and live records with the same key compare equal.
impl<K: PartialEq> PartialEq for State<K> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq> Eq for State<K> {}

impl<K: Hash> Hash for State<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<K: fmt::Display> fmt::Display for State<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}
