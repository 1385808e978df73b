//! Ordered scope-id to value mapping.
//!
//! An [`EntryMap`] holds every value recorded under one logical store key,
//! one entry per scope id (endpoint identifier). Insertion order is the only
//! recency signal in the system: there are no timestamps, and "most recent"
//! means the trailing entry. To keep that the case, [`insert`](EntryMap::insert)
//! removes an existing scope id before appending, so updating an entry moves
//! it to the end regardless of where it originally sat.
//!
//! The map serializes as a single JSON object whose member order matches the
//! pair order, which is what gets persisted under the physical store key.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Ordered mapping from scope id to recorded value.
///
/// Backed by a sequence of `(scope id, value)` pairs so that recency is an
/// explicit property of the structure: the trailing pair is always the most
/// recently inserted-or-updated entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryMap {
    entries: Vec<(String, Value)>,
}

impl EntryMap {
    /// Creates an empty entry map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a value under a scope id, moving the scope id to the end.
    ///
    /// If the scope id is already present its old entry is removed first, so
    /// the trailing position always reflects the latest write.
    pub fn insert(&mut self, scope_id: impl Into<String>, value: Value) {
        let scope_id = scope_id.into();
        self.entries.retain(|(existing, _)| *existing != scope_id);
        self.entries.push((scope_id, value));
    }

    /// Gets the value recorded under a specific scope id.
    pub fn get(&self, scope_id: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == scope_id)
            .map(|(_, value)| value)
    }

    /// Checks whether a scope id has an entry.
    pub fn contains(&self, scope_id: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == scope_id)
    }

    /// Returns the most recently written value, if any.
    pub fn most_recent(&self) -> Option<&Value> {
        self.entries.last().map(|(_, value)| value)
    }

    /// Returns the most recently written `(scope id, value)` pair, if any.
    pub fn most_recent_entry(&self) -> Option<(&str, &Value)> {
        self.entries
            .last()
            .map(|(scope_id, value)| (scope_id.as_str(), value))
    }

    /// Iterates entries in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(scope_id, value)| (scope_id.as_str(), value))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for EntryMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (scope_id, value) in &self.entries {
            map.serialize_entry(scope_id, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EntryMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntryMapVisitor;

        impl<'de> Visitor<'de> for EntryMapVisitor {
            type Value = EntryMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object of scope entries")
            }

            fn visit_map<A>(self, mut access: A) -> Result<EntryMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = EntryMap::new();
                // Duplicate keys in the document collapse through insert,
                // keeping the later occurrence at the end.
                while let Some((scope_id, value)) = access.next_entry::<String, Value>()? {
                    map.insert(scope_id, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(EntryMapVisitor)
    }
}
