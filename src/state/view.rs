//! Hierarchy state containers and the view-tree capture/apply seam

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single captured component state. Opaque to this crate.
pub type Parcel = Value;

/// Sparse map from component index to its captured state.
///
/// Mirrors a view tree's frozen state: each component that saves state does so
/// under its own small integer id, and most ids are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewState(BTreeMap<i32, Parcel>);

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, index: i32, parcel: Parcel) {
        self.0.insert(index, parcel);
    }

    pub fn get(&self, index: i32) -> Option<&Parcel> {
        self.0.get(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Parcel)> {
        self.0.iter().map(|(index, parcel)| (*index, parcel))
    }
}

impl FromIterator<(i32, Parcel)> for ViewState {
    fn from_iter<I: IntoIterator<Item = (i32, Parcel)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Free-form auxiliary payload attached to a state record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle(Map<String, Value>);

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Bundle {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A view tree that can freeze and thaw its hierarchy state.
///
/// Implemented by the UI layer; records call it on save and restore.
pub trait ViewHierarchy {
    /// Capture the current state of every component in the tree
    fn capture_state(&self) -> ViewState;

    /// Push previously captured state back into the tree
    fn apply_state(&mut self, state: &ViewState);
}
