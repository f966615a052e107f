//! Custom conversions applied to a raw value before coercion.
//!
//! A conversion is either a standalone function or the name of a method
//! resolved against an owner-delegate. Delegates expose their methods
//! through [`ConvertTarget`], usually backed by a [`MethodTable`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A unary conversion. The error string becomes the rejection reason.
pub type ConvertFn = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// How a parameter converts its raw value.
#[derive(Clone)]
pub enum Convert {
    /// Call this function with the raw value.
    Function(ConvertFn),
    /// Invoke the named method on the owner-delegate.
    Method(String),
}

impl Convert {
    /// Wrap a closure as a standalone conversion.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Refer to a method on the owner-delegate by name.
    pub fn method(name: impl Into<String>) -> Self {
        Self::Method(name.into())
    }

    /// Run the conversion. `target` resolves [`Convert::Method`].
    pub fn apply(&self, target: &dyn ConvertTarget, value: Value) -> Result<Value, String> {
        match self {
            Self::Function(f) => f(value),
            Self::Method(name) => target.invoke(name, value),
        }
    }
}

impl fmt::Debug for Convert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
        }
    }
}

// A declaration file can only name a method.
impl<'de> Deserialize<'de> for Convert {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::Method(name.trim_start_matches(':').to_owned()))
    }
}

/// An object that `convert` method names are resolved against.
pub trait ConvertTarget: Send + Sync {
    /// Invoke `method` with `value`. Unknown methods are an error.
    fn invoke(&self, method: &str, value: Value) -> Result<Value, String>;

    /// Whether `method` is defined.
    fn responds_to(&self, method: &str) -> bool;
}

/// A name → function dispatch table.
#[derive(Clone, Default)]
pub struct MethodTable {
    methods: IndexMap<String, ConvertFn>,
}

impl MethodTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a method.
    pub fn define<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Builder-style [`define`](Self::define).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.define(name, f);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl ConvertTarget for MethodTable {
    fn invoke(&self, method: &str, value: Value) -> Result<Value, String> {
        let f = self
            .methods
            .get(method)
            .ok_or_else(|| format!("undefined conversion method `{method}`"))?;
        f(value)
    }

    fn responds_to(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.methods.keys()).finish()
    }
}
