//! Keyed collection of state records

use serde::Deserialize;
use tracing::{debug, warn};

use super::codec::KeyParceler;
use super::error::StateError;
use super::persisted::PersistedState;
use super::record::State;

/// What to do with a persisted record whose key cannot be decoded
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RestorePolicy {
    /// Fail the whole restore on the first bad record
    Abort,
    /// Drop the bad record and keep going
    #[default]
    Discard,
}

impl RestorePolicy {
    /// Name as written in the config file
    pub fn as_str(self) -> &'static str {
        match self {
            RestorePolicy::Abort => "abort",
            RestorePolicy::Discard => "discard",
        }
    }
}

/// Holds at most one [`State`] per screen key, in insertion order
#[derive(Debug, Clone)]
pub struct StateRegistry<K> {
    states: Vec<State<K>>,
}

impl<K> Default for StateRegistry<K> {
    fn default() -> Self {
        Self { states: Vec::new() }
    }
}

impl<K: PartialEq> StateRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.states.iter().position(|state| state.key() == key)
    }

    pub fn get(&self, key: &K) -> Option<&State<K>> {
        self.position(key).map(|index| &self.states[index])
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut State<K>> {
        self.position(key).map(move |index| &mut self.states[index])
    }

    /// Get the record for `key`, creating a fresh one if none exists
    pub fn get_or_create(&mut self, key: K) -> &mut State<K> {
        let index = match self.position(&key) {
            Some(index) => index,
            None => {
                self.states.push(State::new(key));
                self.states.len() - 1
            }
        };
        &mut self.states[index]
    }

    /// Add a record, replacing any record with an equal key in place.
    ///
    /// Returns the replaced record.
    pub fn insert(&mut self, state: State<K>) -> Option<State<K>> {
        match self.states.iter().position(|existing| *existing == state) {
            Some(index) => {
                debug!(index, "Replacing state record with equal key");
                Some(std::mem::replace(&mut self.states[index], state))
            }
            None => {
                self.states.push(state);
                None
            }
        }
    }

    /// Replace whatever is held for `key` with a stateless record
    pub fn mark_stateless(&mut self, key: K) -> Option<State<K>> {
        self.insert(State::empty(key))
    }

    pub fn remove(&mut self, key: &K) -> Option<State<K>> {
        self.position(key).map(|index| self.states.remove(index))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &State<K>> {
        self.states.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.states.iter().map(State::key)
    }

    /// Flatten every record, in order
    pub fn to_persisted(
        &self,
        parceler: &impl KeyParceler<K>,
    ) -> Result<Vec<PersistedState>, StateError> {
        self.states
            .iter()
            .map(|state| state.to_persisted(parceler))
            .collect()
    }

    /// Rebuild a registry from persisted records.
    ///
    /// Later records win over earlier ones with the same key.
    pub fn from_persisted(
        forms: impl IntoIterator<Item = PersistedState>,
        parceler: &impl KeyParceler<K>,
        policy: RestorePolicy,
    ) -> Result<Self, StateError> {
        let mut registry = Self::new();
        for (index, form) in forms.into_iter().enumerate() {
            match State::from_persisted(form, parceler) {
                Ok(state) => {
                    registry.insert(state);
                }
                Err(e) if policy == RestorePolicy::Discard => {
                    warn!(index, error = %e, "Discarding undecodable state record");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(registry)
    }
}

impl<'a, K> IntoIterator for &'a StateRegistry<K> {
    type Item = &'a State<K>;
    type IntoIter = std::slice::Iter<'a, State<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}
