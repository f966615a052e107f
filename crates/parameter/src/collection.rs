use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::accessor::Accessor;
use crate::configurable::Parameters;
use crate::def::ParameterDescriptor;
use crate::error::ParameterError;
use crate::options::ParameterOptions;

/// An ordered collection of declared parameters, keyed by name.
///
/// Re-declaring a name replaces its descriptor but keeps its original
/// position.
#[derive(Debug, Clone, Default)]
pub struct ParameterRegistry {
    accessors: IndexMap<String, Accessor>,
}

impl ParameterRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with `options` and return its accessor.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        options: ParameterOptions,
    ) -> Result<&Accessor, ParameterError> {
        let descriptor = ParameterDescriptor::new(name, options)?;
        Ok(self.insert(descriptor))
    }

    /// Register an already-built descriptor.
    pub fn insert(&mut self, descriptor: ParameterDescriptor) -> &Accessor {
        let name = descriptor.name().to_owned();
        // `IndexMap::insert` keeps the slot of an existing key.
        let (index, previous) = self.accessors.insert_full(name, Accessor::new(descriptor));
        if previous.is_some() {
            tracing::debug!(parameter = self.accessors[index].name(), "parameter redeclared");
        }
        &self.accessors[index]
    }

    /// Get the accessor for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    /// Check whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.accessors.contains_key(name)
    }

    /// Declared names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Accessor> {
        self.accessors.values()
    }
}

/// Class-level scope: one registry shared by every instance created from it.
///
/// Declarations made here become visible to existing and future instances.
/// Declare during setup; the registry is not meant to change while
/// instances are being written to from other threads.
#[derive(Debug, Clone, Default)]
pub struct ParameterClass {
    registry: Arc<RwLock<ParameterRegistry>>,
}

impl ParameterClass {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a class-level parameter.
    pub fn param(
        &self,
        name: impl Into<String>,
        options: ParameterOptions,
    ) -> Result<&Self, ParameterError> {
        self.registry.write().declare(name, options)?;
        Ok(self)
    }

    /// Declared names, in declaration order.
    #[must_use]
    pub fn param_names(&self) -> Vec<String> {
        self.registry.read().names().map(str::to_owned).collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.registry.read().contains(name)
    }

    #[must_use]
    pub fn accessor(&self, name: &str) -> Option<Accessor> {
        self.registry.read().get(name).cloned()
    }

    /// Create a fresh instance with its own empty value store.
    #[must_use]
    pub fn instantiate(&self) -> Parameters {
        Parameters::of(self)
    }
}
