pub mod cli;
pub mod config;
pub mod data;
pub mod scope;
pub mod state;
pub mod util;

pub use config::Config;
pub use data::{Database, DatabaseError, SavedStateStore, SlotInfo};
pub use scope::{
    downcast, Inflater, InflaterFactory, Layouts, ScopeError, ServiceKey, ServiceLookup, ServiceScope,
    Services, INFLATER, SERVICE_SCOPE,
};
pub use state::{
    Bundle, JsonKeyParceler, KeyParceler, PersistedState, RestorePolicy, State, StateError,
    StateRegistry, ViewHierarchy, ViewState,
};
