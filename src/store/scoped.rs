//! Scoped persistent store.
//!
//! Multiplexes many logical entries under one physical flat-store key: every
//! value written for a logical key `K` lands in an [`EntryMap`] keyed by the
//! caller's scope id (endpoint identifier), and the whole map is persisted
//! as one JSON document under `"<namespace>.<K>"`. Reading without a scope
//! id yields the most recently written entry, which is the only recency
//! query the system supports.
//!
//! # Serial execution assumption
//!
//! Every mutation is a full read-modify-write of the entry map and is not
//! atomic across steps. The surrounding test runner executes steps strictly
//! one after another, and the store relies on that guarantee entirely: a
//! host that runs steps concurrently will corrupt entries. There is no lock
//! to fall back on.

use super::entry_map::EntryMap;
use super::error::StoreError;
use super::flat::VariableStore;
use crate::value::{is_truthy, literal};
use log::{debug, warn};
use serde_json::Value;

/// Default physical key prefix for persisted entry maps.
pub const DEFAULT_NAMESPACE: &str = "testkit.scoped";

/// Key/value store that records one entry per scope id under each logical key.
///
/// Holds the flat store as an explicit capability. Components that need the
/// same store in one flow pass `&mut store` and let each borrow end before
/// the next begins.
#[derive(Debug)]
pub struct ScopedStore<S: VariableStore> {
    store: S,
    namespace: String,
}

impl<S: VariableStore> ScopedStore<S> {
    /// Creates a scoped store over a flat store with the default namespace.
    pub fn new(store: S) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE)
    }

    /// Creates a scoped store with a custom physical key prefix.
    pub fn with_namespace(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Records a value for a logical key under the given scope id.
    ///
    /// If the scope id already has an entry for this key, the old entry is
    /// deleted first and the new one appended, so the entry becomes the most
    /// recent regardless of its original position. The whole entry map is
    /// serialized back to the physical key afterwards.
    ///
    /// As a side effect, scalar values are also mirrored directly under the
    /// unscoped key so templates can reference the key without a projection
    /// step. Objects, arrays, and null are not mirrored (logged and skipped).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyKey`] for an empty key and
    /// [`StoreError::EmptyScopeId`] when no scope id was resolved.
    pub fn set(&mut self, key: &str, value: Value, scope_id: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        if scope_id.is_empty() {
            return Err(StoreError::EmptyScopeId {
                key: key.to_string(),
            });
        }

        let mut entries = self.read_entries(key);
        if entries.contains(scope_id) {
            debug!(
                "scope '{}' already had a value for '{}', overwriting",
                scope_id, key
            );
        }
        entries.insert(scope_id, value.clone());
        self.write_entries(key, &entries);

        self.mirror_scalar(key, &value);
        Ok(())
    }

    /// Reads a value for a logical key.
    ///
    /// With a scope id: exact lookup, `None` if that scope has no entry (the
    /// miss is logged). Without one: the most recently written entry across
    /// all scopes, or `None` if nothing was ever recorded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyKey`] for an empty key.
    pub fn get(&self, key: &str, scope_id: Option<&str>) -> Result<Option<Value>, StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let entries = self.read_entries(key);
        let value = match scope_id {
            Some(scope) => {
                let found = entries.get(scope).cloned();
                if found.is_none() {
                    debug!("scope '{}' not found for key '{}'", scope, key);
                }
                found
            }
            None => entries.most_recent().cloned(),
        };
        Ok(value)
    }

    /// Appends a value to the sequence stored under a logical key.
    ///
    /// Reads the current most-recent value for the key with no scope id:
    /// whichever scope last wrote the sequence is the one extended, making
    /// it a single shared sequence rather than a per-endpoint one. A missing
    /// or falsy current value starts a fresh sequence. The result is written
    /// back via [`set`](Self::set) under the caller's scope id.
    ///
    /// # Errors
    ///
    /// In addition to the [`set`](Self::set) errors, returns
    /// [`StoreError::NotASequence`] if the key currently holds a truthy
    /// non-sequence value.
    pub fn push(&mut self, key: &str, value: Value, scope_id: &str) -> Result<(), StoreError> {
        let mut items = match self.get(key, None)? {
            Some(Value::Array(items)) => items,
            Some(existing) if is_truthy(&existing) => {
                return Err(StoreError::NotASequence {
                    key: key.to_string(),
                });
            }
            _ => Vec::new(),
        };
        items.push(value);
        self.set(key, Value::Array(items), scope_id)
    }

    /// Deletes the entire entry map for a logical key.
    ///
    /// All scope ids recorded under the key are lost atomically. The
    /// unscoped scalar mirror, if any, is left in place.
    pub fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let data_key = self.data_key(key);
        debug!("removing all entries under '{}'", data_key);
        self.store.unset(&data_key);
        Ok(())
    }

    /// Checks whether a truthy value is recorded for the key (and scope).
    ///
    /// Note the word *truthy*: a stored `0`, `""`, `false`, or empty
    /// sequence reads as absent, indistinguishable from a key that was never
    /// set. Kept for compatibility with the scripted flows this store
    /// replaces; callers that must distinguish the two should read with
    /// [`get`](Self::get) and match on `Some`.
    pub fn has(&self, key: &str, scope_id: Option<&str>) -> Result<bool, StoreError> {
        Ok(self
            .get(key, scope_id)?
            .map_or(false, |value| is_truthy(&value)))
    }

    /// Returns the physical flat-store key for a logical key.
    pub fn data_key(&self, key: &str) -> String {
        format!("{}.{}", self.namespace, key)
    }

    /// Gives access to the underlying flat store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_entries(&self, key: &str) -> EntryMap {
        let data_key = self.data_key(key);
        match self.store.get(&data_key) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    // Corrupted persisted data is recoverable: start over
                    // with an empty map rather than aborting the step.
                    warn!("failed to parse stored data for '{}': {}", data_key, err);
                    EntryMap::new()
                }
            },
            None => {
                debug!("no stored data for '{}'", data_key);
                EntryMap::new()
            }
        }
    }

    fn write_entries(&mut self, key: &str, entries: &EntryMap) {
        let data_key = self.data_key(key);
        let serialized = serde_json::to_string(entries)
            .unwrap_or_else(|_| "{}".to_string());
        debug!("writing {} entries to '{}'", entries.len(), data_key);
        self.store.set(&data_key, &serialized);
    }

    fn mirror_scalar(&mut self, key: &str, value: &Value) {
        match value {
            Value::Object(_) | Value::Array(_) | Value::Null => {
                debug!(
                    "not mirroring '{}' under its unscoped key: value is not a scalar",
                    key
                );
            }
            scalar => {
                self.store.set(key, &literal(scalar));
            }
        }
    }
}
