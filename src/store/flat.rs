//! Flat string-keyed variable store contract.
//!
//! Every durable value in a test run ultimately lives in a flat store of
//! string keys and string values; structured data is JSON-encoded by the
//! caller before it goes in. The store is expressed as a trait so the
//! higher layers ([`ScopedStore`](crate::store::ScopedStore) and
//! [`VariableProjector`](crate::projector::VariableProjector)) receive it as
//! an explicit capability rather than reaching for a global instance, and so
//! tests can substitute an in-memory store.

use std::collections::HashMap;

/// String-keyed variable store.
///
/// All values are strings. Callers that need to persist structured data
/// must JSON-encode it themselves before calling [`set`](Self::set).
pub trait VariableStore {
    /// Checks whether a key is set.
    fn has(&self, key: &str) -> bool;

    /// Gets the raw string value for a key, or `None` if unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Sets a key to a string value, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);

    /// Removes a key entirely.
    fn unset(&mut self, key: &str);
}

// Allows components to share one store serially: each takes `&mut store`
// for the duration of its use.
impl<S: VariableStore + ?Sized> VariableStore for &mut S {
    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn unset(&mut self, key: &str) {
        (**self).unset(key)
    }
}

/// HashMap-backed [`VariableStore`].
///
/// Durable for the lifetime of the process only. Used by the test suite and
/// by hosts that do not bring their own variable storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryStore {
    values: HashMap<String, String>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Returns the number of keys currently set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks whether the store has no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl VariableStore for InMemoryStore {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn unset(&mut self, key: &str) {
        self.values.remove(key);
    }
}
