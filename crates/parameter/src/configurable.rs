use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::accessor::Accessor;
use crate::collection::{ParameterClass, ParameterRegistry};
use crate::convert::{ConvertTarget, MethodTable};
use crate::def::ParameterDescriptor;
use crate::error::ParameterError;
use crate::options::ParameterOptions;
use crate::values::{ValueSnapshot, ValueStore};

/// Per-instance parameter state.
///
/// Holds a reference to the class-level registry, instance-level
/// declarations (which shadow class declarations of the same name), the
/// value store with its lock flag, and the conversion delegate.
///
/// `convert` method names resolve against the delegate when one is set,
/// otherwise against this instance's own method table.
pub struct Parameters {
    class: ParameterClass,
    own: ParameterRegistry,
    store: ValueStore,
    methods: MethodTable,
    delegate: Option<Arc<dyn ConvertTarget>>,
}

impl Parameters {
    /// A standalone instance with a private class scope.
    #[must_use]
    pub fn new() -> Self {
        Self::of(&ParameterClass::new())
    }

    /// An instance of `class`.
    #[must_use]
    pub fn of(class: &ParameterClass) -> Self {
        Self {
            class: class.clone(),
            own: ParameterRegistry::new(),
            store: ValueStore::new(),
            methods: MethodTable::new(),
            delegate: None,
        }
    }

    #[must_use]
    pub fn class(&self) -> &ParameterClass {
        &self.class
    }

    /// Declare an instance-level parameter.
    pub fn param(
        &mut self,
        name: impl Into<String>,
        options: ParameterOptions,
    ) -> Result<&mut Self, ParameterError> {
        self.own.declare(name, options)?;
        Ok(self)
    }

    /// Class-level names followed by instance-only names.
    #[must_use]
    pub fn param_names(&self) -> Vec<String> {
        let mut names = self.class.param_names();
        names.extend(
            self.own
                .names()
                .filter(|n| !self.class.contains(n))
                .map(str::to_owned),
        );
        names
    }

    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.own.contains(name) || self.class.contains(name)
    }

    /// The accessor that serves `name`, instance-level first.
    #[must_use]
    pub fn accessor(&self, name: &str) -> Option<Accessor> {
        self.own
            .get(name)
            .cloned()
            .or_else(|| self.class.accessor(name))
    }

    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<Arc<ParameterDescriptor>> {
        self.accessor(name).map(|a| Arc::clone(a.descriptor()))
    }

    fn require(&self, name: &str) -> Result<Accessor, ParameterError> {
        self.accessor(name).ok_or_else(|| ParameterError::NotFound {
            key: name.to_owned(),
        })
    }

    /// Current value of `name`, or its default.
    pub fn get(&self, name: &str) -> Result<Value, ParameterError> {
        Ok(self.require(name)?.read(&self.store))
    }

    /// Current value of `name` deserialized into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, ParameterError> {
        let value = self.get(name)?;
        serde_json::from_value(value).map_err(|e| {
            ParameterError::invalid(
                name,
                format!("cannot read as {}: {e}", std::any::type_name::<T>()),
            )
        })
    }

    /// Validate and store a value for `name`; returns the stored value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Value, ParameterError> {
        let accessor = self.require(name)?;
        let target: &dyn ConvertTarget = match &self.delegate {
            Some(delegate) => delegate.as_ref(),
            None => &self.methods,
        };
        match accessor.write(&mut self.store, target, value.into()) {
            Ok(stored) => {
                tracing::debug!(parameter = name, value = %stored, "parameter set");
                Ok(stored)
            }
            Err(e) => {
                tracing::debug!(parameter = name, error = %e, "parameter write rejected");
                Err(e)
            }
        }
    }

    /// Lock lockable parameters against writes.
    pub fn lock(&mut self) {
        self.set_locked(true);
    }

    pub fn unlock(&mut self) {
        self.set_locked(false);
    }

    pub fn set_locked(&mut self, locked: bool) {
        tracing::debug!(locked, "lock flag changed");
        self.store.set_locked(locked);
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.store.is_locked()
    }

    /// Define a method on this instance for by-name conversions.
    pub fn define_method<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.methods.define(name, f);
        self
    }

    /// Resolve `convert` method names against `delegate` instead of self.
    pub fn set_delegate(&mut self, delegate: Arc<dyn ConvertTarget>) -> &mut Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn clear_delegate(&mut self) -> &mut Self {
        self.delegate = None;
        self
    }

    /// Every declared parameter with its current value or default.
    #[must_use]
    pub fn values(&self) -> Map<String, Value> {
        self.param_names()
            .into_iter()
            .filter_map(|name| {
                let value = self.accessor(&name)?.read(&self.store);
                Some((name, value))
            })
            .collect()
    }

    #[must_use]
    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> ValueSnapshot {
        self.store.snapshot()
    }

    pub fn restore(&mut self, snapshot: ValueSnapshot) {
        self.store.restore(snapshot);
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameters")
            .field("names", &self.param_names())
            .field("store", &self.store)
            .field("methods", &self.methods)
            .field("delegate", &self.delegate.is_some())
            .finish()
    }
}

/// Host attachment: anything that carries a [`Parameters`] instance.
///
/// Embed a `Parameters` field in a host struct and implement this trait to
/// get the loader and configure entry points from `tunable-config`.
pub trait Configurable {
    fn parameters(&self) -> &Parameters;
    fn parameters_mut(&mut self) -> &mut Parameters;
}

impl Configurable for Parameters {
    fn parameters(&self) -> &Parameters {
        self
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        self
    }
}
