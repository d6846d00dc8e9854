//! Stub collaborators for integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use navstate::{Inflater, InflaterFactory, Layouts, ServiceScope, ViewHierarchy, ViewState};
use serde_json::json;

/// View tree that returns a preset capture and records every apply
#[derive(Debug, Default)]
pub struct RecordingView {
    pub current: ViewState,
    pub applied: Vec<ViewState>,
}

impl RecordingView {
    pub fn with_text(entries: &[(i32, &str)]) -> Self {
        Self {
            current: entries
                .iter()
                .map(|(index, text)| (*index, json!(text)))
                .collect(),
            applied: Vec::new(),
        }
    }
}

impl ViewHierarchy for RecordingView {
    fn capture_state(&self) -> ViewState {
        self.current.clone()
    }

    fn apply_state(&mut self, state: &ViewState) {
        self.applied.push(state.clone());
    }
}

/// Inflater factory that counts how often it is asked to build
#[derive(Debug, Default)]
pub struct CountingInflaterFactory {
    calls: AtomicUsize,
    layouts: Layouts,
}

impl CountingInflaterFactory {
    pub fn new(layouts: Layouts) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            layouts,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InflaterFactory for CountingInflaterFactory {
    fn create(&self, scope: &ServiceScope) -> Inflater {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Inflater::new(self.layouts.clone()).clone_in_context(scope.context())
    }
}
