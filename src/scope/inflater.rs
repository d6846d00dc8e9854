//! Scope-bound view inflation
//!
//! [`Layouts`] is the static mapping from a screen key type to the factory
//! that builds its view. An [`Inflater`] pairs those layouts with the lookup
//! context that inflated views should see, so a view built through a scope's
//! inflater can find that scope's services.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use super::error::ScopeError;
use super::services::{downcast, ServiceLookup, Services};
use super::wrapper::{ServiceScope, INFLATER};
use crate::state::ViewHierarchy;

type ErasedFactory =
    Arc<dyn Fn(&dyn Any, Arc<dyn ServiceLookup>) -> Option<Box<dyn ViewHierarchy>> + Send + Sync>;

/// Screen key type to view factory mapping
#[derive(Clone, Default)]
pub struct Layouts {
    factories: HashMap<TypeId, ErasedFactory>,
}

impl Layouts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the view factory for screens keyed by `K`
    pub fn register<K, V, F>(mut self, factory: F) -> Self
    where
        K: Any,
        V: ViewHierarchy + 'static,
        F: Fn(&K, Arc<dyn ServiceLookup>) -> V + Send + Sync + 'static,
    {
        let erased: ErasedFactory =
            Arc::new(move |key: &dyn Any, context: Arc<dyn ServiceLookup>| {
                key.downcast_ref::<K>()
                    .map(|key| Box::new(factory(key, context)) as Box<dyn ViewHierarchy>)
            });
        self.factories.insert(TypeId::of::<K>(), erased);
        self
    }

    pub fn contains<K: Any>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<K>())
    }
}

impl fmt::Debug for Layouts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layouts")
            .field("count", &self.factories.len())
            .finish()
    }
}

/// Builds views for screen keys within one lookup context
#[derive(Clone)]
pub struct Inflater {
    layouts: Arc<Layouts>,
    context: Weak<dyn ServiceLookup>,
}

impl Inflater {
    /// An inflater not yet bound to any context
    pub fn new(layouts: Layouts) -> Self {
        let unbound: Weak<dyn ServiceLookup> = Weak::<Services>::new();
        Self {
            layouts: Arc::new(layouts),
            context: unbound,
        }
    }

    /// Same layouts, different context
    pub fn clone_in_context(&self, context: Weak<dyn ServiceLookup>) -> Self {
        Self {
            layouts: Arc::clone(&self.layouts),
            context,
        }
    }

    pub fn context(&self) -> Option<Arc<dyn ServiceLookup>> {
        self.context.upgrade()
    }

    pub fn layouts(&self) -> &Layouts {
        &self.layouts
    }

    /// Build the view registered for `key`'s type, handing it this inflater's context
    pub fn inflate<K: Any>(&self, key: &K) -> Result<Box<dyn ViewHierarchy>, ScopeError> {
        let context = self.context().ok_or(ScopeError::Unbound)?;
        let no_layout = || ScopeError::NoLayout(std::any::type_name::<K>());
        let factory = self
            .layouts
            .factories
            .get(&TypeId::of::<K>())
            .ok_or_else(no_layout)?;
        factory(key as &dyn Any, context).ok_or_else(no_layout)
    }
}

impl fmt::Debug for Inflater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inflater")
            .field("layouts", &self.layouts)
            .field("bound", &(self.context.strong_count() > 0))
            .finish()
    }
}

/// Builds the inflater a [`ServiceScope`] hands out.
///
/// Called at most once per scope.
pub trait InflaterFactory: Send + Sync {
    fn create(&self, scope: &ServiceScope) -> Inflater;
}

impl<F> InflaterFactory for F
where
    F: Fn(&ServiceScope) -> Inflater + Send + Sync,
{
    fn create(&self, scope: &ServiceScope) -> Inflater {
        self(scope)
    }
}

/// Clones the base chain's inflater into the new scope, or starts one with no
/// layouts when the base has none.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneBaseInflater;

impl InflaterFactory for CloneBaseInflater {
    fn create(&self, scope: &ServiceScope) -> Inflater {
        let base = scope
            .base()
            .lookup(INFLATER.name())
            .and_then(downcast::<Inflater>)
            .map(|inflater| (*inflater).clone())
            .unwrap_or_else(|| Inflater::new(Layouts::new()));
        base.clone_in_context(scope.context())
    }
}
