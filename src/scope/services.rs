//! Service registry and the name-based lookup protocol

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A type-erased, shareable service instance
pub type Service = Arc<dyn Any + Send + Sync>;

/// One link of an ambient lookup chain.
///
/// Each link answers for the names it knows and delegates the rest to its
/// parent. Unknown names resolve to `None`, never an error.
pub trait ServiceLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Service>;
}

/// Typed token naming a service of type `T`
pub struct ServiceKey<T> {
    name: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T> ServiceKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _type: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ServiceKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ServiceKey<T> {}

impl<T> fmt::Debug for ServiceKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKey<{}>({})", std::any::type_name::<T>(), self.name)
    }
}

/// Downcast an erased service to its concrete type
pub fn downcast<T: Any + Send + Sync>(service: Service) -> Option<Arc<T>> {
    service.downcast::<T>().ok()
}

/// Immutable set of named services.
///
/// Also usable as the root of a lookup chain.
#[derive(Clone, Default)]
pub struct Services {
    entries: HashMap<String, Service>,
}

impl Services {
    pub fn builder() -> ServicesBuilder {
        ServicesBuilder::default()
    }

    /// Start a new registry that inherits every binding from this one
    pub fn build_upon(&self) -> ServicesBuilder {
        ServicesBuilder {
            entries: self.entries.clone(),
        }
    }

    pub fn get<T: Any + Send + Sync>(&self, key: &ServiceKey<T>) -> Option<Arc<T>> {
        self.entries.get(key.name()).cloned().and_then(downcast)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ServiceLookup for Services {
    fn lookup(&self, name: &str) -> Option<Service> {
        self.entries.get(name).cloned()
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Services").field("names", &names).finish()
    }
}

#[derive(Default)]
pub struct ServicesBuilder {
    entries: HashMap<String, Service>,
}

impl ServicesBuilder {
    pub fn bind<T: Any + Send + Sync>(self, key: ServiceKey<T>, service: T) -> Self {
        self.bind_arc(key, Arc::new(service))
    }

    pub fn bind_arc<T: Any + Send + Sync>(mut self, key: ServiceKey<T>, service: Arc<T>) -> Self {
        self.entries.insert(key.name().to_string(), service);
        self
    }

    pub fn build(self) -> Services {
        Services {
            entries: self.entries,
        }
    }
}
