use std::sync::Arc;

use serde_json::Value;

use crate::convert::ConvertTarget;
use crate::def::ParameterDescriptor;
use crate::error::ParameterError;
use crate::values::ValueStore;

/// Read/write entry points bound to one descriptor.
///
/// Built once per declaration and kept in the registry; the value store is
/// supplied per call so one accessor serves every instance of a class.
#[derive(Debug, Clone)]
pub struct Accessor {
    descriptor: Arc<ParameterDescriptor>,
}

impl Accessor {
    #[must_use]
    pub fn new(descriptor: ParameterDescriptor) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    #[must_use]
    pub fn descriptor(&self) -> &Arc<ParameterDescriptor> {
        &self.descriptor
    }

    /// The stored value, or the default if nothing was written.
    #[must_use]
    pub fn read(&self, store: &ValueStore) -> Value {
        store
            .get(self.name())
            .cloned()
            .unwrap_or_else(|| self.descriptor.default_value().clone())
    }

    /// Validate `raw` and store the result.
    ///
    /// Fails with [`ParameterError::Locked`] when the store is locked and the
    /// parameter is lockable. On any error the store is left untouched.
    pub fn write(
        &self,
        store: &mut ValueStore,
        target: &dyn ConvertTarget,
        raw: Value,
    ) -> Result<Value, ParameterError> {
        if store.is_locked() && self.descriptor.is_lockable() {
            return Err(ParameterError::Locked {
                key: self.name().to_owned(),
            });
        }
        let accepted = self.descriptor.validate(raw, target)?;
        store.insert(self.name(), accepted.clone());
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::MethodTable;
    use crate::options::ParameterOptions;
    use serde_json::json;

    fn accessor(options: ParameterOptions) -> Accessor {
        Accessor::new(ParameterDescriptor::new("p", options).unwrap())
    }

    #[test]
    fn read_before_write_returns_default_without_storing() {
        let acc = accessor(ParameterOptions::new().with_default("fallback"));
        let store = ValueStore::new();
        assert_eq!(acc.read(&store), json!("fallback"));
        assert_eq!(acc.read(&store), json!("fallback"));
        assert!(store.is_empty());
    }

    #[test]
    fn write_then_read() {
        let acc = accessor(ParameterOptions::new());
        let mut store = ValueStore::new();
        assert_eq!(acc.write(&mut store, &MethodTable::new(), json!(5)).unwrap(), json!(5));
        assert_eq!(acc.read(&store), json!(5));
    }

    #[test]
    fn rejected_write_keeps_previous_value() {
        let acc = accessor(ParameterOptions::new().min(10));
        let mut store = ValueStore::new();
        acc.write(&mut store, &MethodTable::new(), json!(11)).unwrap();
        assert!(acc.write(&mut store, &MethodTable::new(), json!(9)).is_err());
        assert_eq!(acc.read(&store), json!(11));
    }

    #[test]
    fn locked_store_blocks_only_lockable() {
        let lockable = accessor(ParameterOptions::new().lockable());
        let free = Accessor::new(ParameterDescriptor::new("q", ParameterOptions::new()).unwrap());
        let mut store = ValueStore::new();
        store.set_locked(true);

        let err = lockable.write(&mut store, &MethodTable::new(), json!(1)).unwrap_err();
        assert_eq!(err, ParameterError::Locked { key: "p".into() });
        assert!(free.write(&mut store, &MethodTable::new(), json!(1)).is_ok());
    }
}
