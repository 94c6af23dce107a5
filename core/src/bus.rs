//! Bus - Request-Scoped Write Context
//!
//! The host hands every lifecycle hook a `Bus` for the duration of one write.
//! It carries whatever the host knows about the request (environment, actor,
//! request id) keyed by type, so hooks read exactly what they need without
//! string lookups.

use crate::environment::Environment;
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-keyed context container (TypeMap pattern).
///
/// One `Bus` lives for one pending write. Hooks may read and add entries;
/// nothing on the Bus outlives the write.
#[derive(Default)]
pub struct Bus {
    resources: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Bus {
    /// Create an empty Bus
    pub fn new() -> Self {
        Bus {
            resources: HashMap::new(),
        }
    }

    /// Create a Bus pre-loaded with the runtime environment of the write.
    pub fn with_environment(env: Environment) -> Self {
        let mut bus = Self::new();
        bus.insert(env);
        bus
    }

    /// Insert a value, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, resource: T) {
        self.resources.insert(TypeId::of::<T>(), Box::new(resource));
    }

    /// Get a reference to a value.
    ///
    /// Returns `None` if no value of that type was inserted.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.resources
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.resources.contains_key(&TypeId::of::<T>())
    }

    /// Remove a value from the Bus, returning it if present.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.resources
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok())
            .map(|boxed| *boxed)
    }

    /// The environment the host is running the write in.
    ///
    /// An inserted `Environment` wins; otherwise `PAYSYNC_ENV` is read on
    /// every call.
    pub fn environment(&self) -> Environment {
        self.get::<Environment>()
            .copied()
            .unwrap_or_else(Environment::from_env)
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("resource_count", &self.resources.len())
            .finish()
    }
}
