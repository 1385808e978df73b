//! Persistent variable storage for test runs.
//!
//! Three layers: the [`VariableStore`] trait describes the flat string-only
//! store the host provides, [`EntryMap`] is the ordered per-key document the
//! scoped layer persists into it, and [`ScopedStore`] is the key/value API
//! test steps actually use.

pub mod entry_map;
pub mod error;
pub mod flat;
pub mod scoped;

pub use entry_map::EntryMap;
pub use error::StoreError;
pub use flat::{InMemoryStore, VariableStore};
pub use scoped::{ScopedStore, DEFAULT_NAMESPACE};
