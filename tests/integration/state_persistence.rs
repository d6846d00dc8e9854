//! Integration tests for saving, flattening and restoring screen state
//!
//! Walks records through the persisted form and the SQLite store the way an
//! application would around process teardown.

use super::common::fixtures::RecordingView;
use navstate::{
    Bundle, Database, JsonKeyParceler, KeyParceler, PersistedState, RestorePolicy,
    SavedStateStore, State, StateError, StateRegistry, ViewState,
};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
enum Screen {
    Inbox,
    Thread(u64),
    Compose { draft: String },
}

fn create_test_store() -> (Database, SavedStateStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::open(dir.path().join("test.db")).expect("Failed to open database");
    let store = SavedStateStore::new(db.connection());
    (db, store, dir)
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Capture, flatten, rebuild, restore: the restored view sees exactly what was captured
#[test]
fn test_screen_a_scenario() {
    let parceler = JsonKeyParceler::<String>::new();
    let mut view = RecordingView::with_text(&[(1, "x"), (2, "y")]);

    let mut state = State::new("ScreenA".to_string());
    state.save(&view);
    let mut bundle = Bundle::new();
    bundle.put("scroll", 42);
    state.set_bundle(Some(bundle));

    let persisted = state.to_persisted(&parceler).unwrap();
    assert_eq!(persisted.field_names(), vec!["KEY", "VIEW_STATE", "BUNDLE"]);

    let json = persisted.to_json().unwrap();
    let restored = State::from_persisted(PersistedState::from_json(&json).unwrap(), &parceler)
        .unwrap();
    assert_eq!(restored.key(), "ScreenA");
    assert_eq!(restored.bundle().unwrap().get("scroll"), Some(&json!(42)));

    view.current = ViewState::new();
    restored.restore(&mut view);

    let expected: ViewState = [(1, json!("x")), (2, json!("y"))].into_iter().collect();
    assert_eq!(view.applied, vec![expected]);
}

/// A record that never captured anything flattens to just its key
#[test]
fn test_minimal_persistence() {
    let parceler = JsonKeyParceler::<Screen>::new();
    let state = State::new(Screen::Inbox);

    let persisted = state.to_persisted(&parceler).unwrap();
    assert_eq!(persisted.field_names(), vec!["KEY"]);
    assert_eq!(persisted.to_json().unwrap(), r#"{"KEY":"Inbox"}"#);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct Splash;

/// Keys that encode to JSON null keep their KEY through text and storage
#[test]
fn test_unit_key_survives_json_and_store() {
    let parceler = JsonKeyParceler::<Splash>::new();
    let mut state = State::new(Splash);
    state.set_bundle(Some([("shown", true)].into_iter().collect()));

    let json = state.to_persisted(&parceler).unwrap().to_json().unwrap();
    assert_eq!(json, r#"{"KEY":null,"BUNDLE":{"shown":true}}"#);
    let restored =
        State::from_persisted(PersistedState::from_json(&json).unwrap(), &parceler).unwrap();
    assert_eq!(restored, state);

    let (_db, store, _dir) = create_test_store();
    let mut registry = StateRegistry::new();
    registry.insert(state);
    store.save_registry("splash", &registry, &parceler).unwrap();

    let loaded = store
        .load_registry::<Splash>("splash", &parceler, RestorePolicy::Discard)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(
        loaded.get(&Splash).unwrap().bundle().unwrap().get("shown"),
        Some(&json!(true))
    );
}

/// The stateless variant shrugs off any sequence of mutations
#[test]
fn test_stateless_record_stays_empty() {
    let parceler = JsonKeyParceler::<Screen>::new();
    let mut view = RecordingView::with_text(&[(1, "x")]);
    let mut state = State::empty(Screen::Compose {
        draft: "hi".to_string(),
    });

    for _ in 0..3 {
        state.save(&view);
        state.set_bundle(Some([("draft", "hi")].into_iter().collect()));
        state.restore(&mut view);
        state.set_bundle(None);
    }

    assert!(state.bundle().is_none());
    assert!(state.view_state().is_none());
    assert!(view.applied.is_empty());
    assert_eq!(
        state.to_persisted(&parceler).unwrap().field_names(),
        vec!["KEY"]
    );
}

/// Records for the same screen collapse into one entry regardless of contents
#[test]
fn test_identity_dedupes_collections() {
    let mut first = State::new(Screen::Thread(7));
    first.save(&RecordingView::with_text(&[(1, "draft")]));
    let second = State::new(Screen::Thread(7));

    let set: HashSet<_> = [first, second, State::new(Screen::Inbox)]
        .into_iter()
        .collect();
    assert_eq!(set.len(), 2);
}

/// A custom parceler that can reject keys it no longer understands
struct VersionedParceler;

impl KeyParceler<Screen> for VersionedParceler {
    fn to_parcelable(&self, key: &Screen) -> Result<serde_json::Value, StateError> {
        Ok(json!({ "v": 2, "screen": serde_json::to_value(key)? }))
    }

    fn to_key(&self, parcel: &serde_json::Value) -> Result<Screen, StateError> {
        if parcel.get("v") != Some(&json!(2)) {
            return Err(StateError::KeyDecode(format!("unsupported version in {}", parcel)));
        }
        let screen = parcel
            .get("screen")
            .cloned()
            .ok_or_else(|| StateError::KeyDecode("no screen".to_string()))?;
        Ok(serde_json::from_value(screen)?)
    }
}

/// Registry snapshot survives the store and respects the restore policy
#[test]
fn test_registry_survives_process_restart() {
    let (_db, store, _dir) = create_test_store();
    let parceler = VersionedParceler;

    let mut registry = StateRegistry::new();
    registry
        .get_or_create(Screen::Inbox)
        .save(&RecordingView::with_text(&[(10, "list")]));
    registry
        .get_or_create(Screen::Thread(3))
        .set_bundle(Some([("scroll", 120)].into_iter().collect()));
    registry.mark_stateless(Screen::Compose {
        draft: String::new(),
    });

    assert_eq!(store.save_registry("main", &registry, &parceler).unwrap(), 3);

    let restored = store
        .load_registry::<Screen>("main", &parceler, RestorePolicy::Abort)
        .unwrap()
        .expect("slot should exist");
    let keys: Vec<_> = restored.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            Screen::Inbox,
            Screen::Thread(3),
            Screen::Compose {
                draft: String::new()
            }
        ]
    );

    let mut view = RecordingView::default();
    restored.get(&Screen::Inbox).unwrap().restore(&mut view);
    assert_eq!(view.applied[0].get(10), Some(&json!("list")));
}

/// One stale record: abort fails the restore, discard keeps the others
#[test]
fn test_stale_record_policies() {
    let (_db, store, _dir) = create_test_store();
    let parceler = VersionedParceler;

    let good = State::new(Screen::Thread(1)).to_persisted(&parceler).unwrap();
    let stale = PersistedState {
        key: Some(json!({ "v": 1, "screen": "Inbox" })),
        ..Default::default()
    };
    store.save_snapshot("main", &[stale, good]).unwrap();

    let err = store
        .load_registry::<Screen>("main", &parceler, RestorePolicy::Abort)
        .unwrap_err();
    assert!(err.to_string().contains("unsupported version"));

    let kept = store
        .load_registry::<Screen>("main", &parceler, RestorePolicy::Discard)
        .unwrap()
        .unwrap();
    assert_eq!(kept.len(), 1);
    assert!(kept.contains(&Screen::Thread(1)));
}

fn any_bundle() -> impl Strategy<Value = Option<Bundle>> {
    proptest::option::of(
        proptest::collection::vec(("[a-z]{1,6}", any::<i64>()), 0..4)
            .prop_map(|entries| entries.into_iter().collect::<Bundle>()),
    )
}

proptest! {
    #[test]
    fn prop_equality_follows_key(
        k1 in "[a-c]{1,2}",
        k2 in "[a-c]{1,2}",
        b1 in any_bundle(),
        b2 in any_bundle(),
        captured in proptest::collection::vec((any::<i32>(), "[a-z]{0,4}"), 0..4),
    ) {
        let mut left = State::new(k1.clone());
        let mut right = State::new(k2.clone());
        left.set_bundle(b1);
        right.set_bundle(b2);
        let entries: Vec<(i32, &str)> =
            captured.iter().map(|(i, s)| (*i, s.as_str())).collect();
        left.save(&RecordingView::with_text(&entries));

        prop_assert_eq!(left == right, k1 == k2);
        if k1 == k2 {
            prop_assert_eq!(hash_of(&left), hash_of(&right));
        }
    }

    #[test]
    fn prop_persisted_round_trip(
        key in "[A-Za-z]{1,10}",
        bundle in any_bundle(),
        captured in proptest::collection::vec((0i32..64, "[a-z]{1,4}"), 1..6),
    ) {
        let parceler = JsonKeyParceler::<String>::new();
        let entries: Vec<(i32, &str)> =
            captured.iter().map(|(i, s)| (*i, s.as_str())).collect();
        let mut state = State::new(key.clone());
        state.save(&RecordingView::with_text(&entries));
        state.set_bundle(bundle.clone());

        let restored = State::from_persisted(state.to_persisted(&parceler).unwrap(), &parceler)
            .unwrap();

        prop_assert_eq!(restored.key(), &key);
        prop_assert_eq!(restored.view_state(), state.view_state());
        let expected_bundle = bundle.filter(|b| !b.is_empty());
        prop_assert_eq!(restored.bundle(), expected_bundle.as_ref());
    }
}
