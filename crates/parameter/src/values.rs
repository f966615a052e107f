use std::collections::HashMap;

use serde_json::Value;

/// Current values of one configurable instance, plus its lock flag.
///
/// A name is absent until its first successful write; reads of absent names
/// fall back to the descriptor default without touching the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueStore {
    values: HashMap<String, Value>,
    locked: bool,
}

impl ValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored value for `key`, if one was ever written.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Copy the current values for a later [`restore`](Self::restore).
    ///
    /// The lock flag is not part of the snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ValueSnapshot {
        ValueSnapshot {
            values: self.values.clone(),
        }
    }

    /// Put back the values captured by `snapshot`.
    pub fn restore(&mut self, snapshot: ValueSnapshot) {
        self.values = snapshot.values;
    }
}

/// A frozen copy of stored values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSnapshot {
    values: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_is_empty_and_unlocked() {
        let store = ValueStore::new();
        assert!(store.is_empty());
        assert!(!store.is_locked());
        assert!(store.get("x").is_none());
    }

    #[test]
    fn insert_overwrites() {
        let mut store = ValueStore::new();
        store.insert("x", json!(1));
        store.insert("x", json!(2));
        assert_eq!(store.get("x"), Some(&json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshot_and_restore_leave_lock_alone() {
        let mut store = ValueStore::new();
        store.insert("x", json!(1));
        let snap = store.snapshot();

        store.insert("x", json!(99));
        store.insert("y", json!(2));
        store.set_locked(true);

        store.restore(snap);
        assert_eq!(store.get("x"), Some(&json!(1)));
        assert!(!store.contains("y"));
        assert!(store.is_locked());
    }
}
