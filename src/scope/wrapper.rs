//! Service scope layered over an ambient lookup chain

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use tracing::debug;

use super::inflater::{CloneBaseInflater, Inflater, InflaterFactory};
use super::services::{downcast, Service, ServiceKey, ServiceLookup, Services};

/// Name under which a scope answers with itself
pub const SERVICE_SCOPE: ServiceKey<ServiceScope> = ServiceKey::new("navstate_service_scope");

/// Name of the scope-bound inflater
pub const INFLATER: ServiceKey<Inflater> = ServiceKey::new("layout_inflater");

/// Makes a [`Services`] registry discoverable through the lookup chain it wraps.
///
/// Lookups resolve in three steps:
/// 1. [`SERVICE_SCOPE`] answers with this scope
/// 2. [`INFLATER`] answers with an inflater bound to this scope, built on the
///    first request and reused afterwards
/// 3. anything else goes to the wrapped base
///
/// The inflater factory must not look up [`INFLATER`] on the scope it is
/// building for.
pub struct ServiceScope {
    services: Arc<Services>,
    base: Arc<dyn ServiceLookup>,
    inflater_factory: Arc<dyn InflaterFactory>,
    inflater: OnceLock<Arc<Inflater>>,
    this: Weak<ServiceScope>,
}

impl ServiceScope {
    pub fn wrap(services: Arc<Services>, base: Arc<dyn ServiceLookup>) -> Arc<Self> {
        Self::wrap_with(services, base, Arc::new(CloneBaseInflater))
    }

    /// Wrap with a custom builder for the scope-bound inflater
    pub fn wrap_with(
        services: Arc<Services>,
        base: Arc<dyn ServiceLookup>,
        inflater_factory: Arc<dyn InflaterFactory>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            services,
            base,
            inflater_factory,
            inflater: OnceLock::new(),
            this: this.clone(),
        })
    }

    /// Nearest scope visible from `context`, if any
    pub fn find(context: &dyn ServiceLookup) -> Option<Arc<ServiceScope>> {
        context.lookup(SERVICE_SCOPE.name()).and_then(downcast)
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    pub fn base(&self) -> &Arc<dyn ServiceLookup> {
        &self.base
    }

    /// This scope as a lookup context, for binding derived services to it
    pub fn context(&self) -> Weak<dyn ServiceLookup> {
        let context: Weak<dyn ServiceLookup> = self.this.clone();
        context
    }

    /// The scope-bound inflater, built on first call
    pub fn inflater(&self) -> Arc<Inflater> {
        let inflater = self.inflater.get_or_init(|| {
            debug!(services = self.services.len(), "Creating scope-bound inflater");
            Arc::new(self.inflater_factory.create(self))
        });
        Arc::clone(inflater)
    }

    /// Typed resolution through the scope chain.
    ///
    /// Checks this scope's registry, then its own answers, then the nearest
    /// enclosing scope, and finally the base.
    pub fn resolve<T: Any + Send + Sync>(&self, key: &ServiceKey<T>) -> Option<Arc<T>> {
        if let Some(service) = self.services.get(key) {
            return Some(service);
        }

        let name = key.name();
        if name == SERVICE_SCOPE.name() || name == INFLATER.name() {
            return self.lookup(name).and_then(downcast);
        }

        match ServiceScope::find(self.base.as_ref()) {
            Some(parent) => parent.resolve(key),
            None => self.base.lookup(name).and_then(downcast),
        }
    }
}

impl ServiceLookup for ServiceScope {
    fn lookup(&self, name: &str) -> Option<Service> {
        if name == SERVICE_SCOPE.name() {
            return self.this.upgrade().map(|this| this as Service);
        }
        if name == INFLATER.name() {
            return Some(self.inflater() as Service);
        }
        self.base.lookup(name)
    }
}

impl fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceScope")
            .field("services", &self.services)
            .field("inflater_created", &self.inflater.get().is_some())
            .finish_non_exhaustive()
    }
}
