//! Scoped service lookup
//!
//! Components find services by asking their lookup context for a name. A
//! [`ServiceScope`] slots a [`Services`] registry into that chain without
//! anyone passing it around explicitly: any descendant can call
//! [`ServiceScope::find`] on its own context to reach the nearest scope.

mod error;
mod inflater;
mod services;
mod wrapper;

pub use error::ScopeError;
pub use inflater::{CloneBaseInflater, Inflater, InflaterFactory, Layouts};
pub use services::{downcast, Service, ServiceKey, ServiceLookup, Services, ServicesBuilder};
pub use wrapper::{ServiceScope, INFLATER, SERVICE_SCOPE};
