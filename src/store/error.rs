//! Error types for scoped store operations.

use std::fmt;

/// Errors raised by [`ScopedStore`](crate::store::ScopedStore) operations.
///
/// Only caller mistakes are fatal. Recoverable conditions (a missing entry,
/// a corrupted persisted document) are handled in place and logged instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The key argument was empty.
    ///
    /// Every store operation requires a non-empty logical key.
    EmptyKey,

    /// The scope id argument was empty.
    ///
    /// Writes require a resolvable scope id for the current endpoint; an
    /// empty one means the caller failed to derive it and must not be
    /// silently accepted.
    EmptyScopeId {
        /// The logical key the write was addressed to
        key: String,
    },

    /// A push targeted a key whose current value is not a sequence.
    NotASequence {
        /// The logical key holding the non-sequence value
        key: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::EmptyKey => {
                write!(f, "A non-empty key must be passed to store operations")
            }
            StoreError::EmptyScopeId { key } => {
                write!(
                    f,
                    "No scope id could be resolved for writing key '{}'",
                    key
                )
            }
            StoreError::NotASequence { key } => {
                write!(
                    f,
                    "Cannot push to key '{}': the current value is not a sequence",
                    key
                )
            }
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let msg = format!("{}", StoreError::EmptyKey);
        assert!(msg.contains("non-empty key"));

        let msg = format!(
            "{}",
            StoreError::EmptyScopeId {
                key: "user".to_string()
            }
        );
        assert!(msg.contains("scope id"));
        assert!(msg.contains("user"));

        let msg = format!(
            "{}",
            StoreError::NotASequence {
                key: "counter".to_string()
            }
        );
        assert!(msg.contains("counter"));
        assert!(msg.contains("sequence"));
    }

    #[test]
    fn test_equality() {
        assert_eq!(StoreError::EmptyKey, StoreError::EmptyKey);
        assert_ne!(
            StoreError::NotASequence {
                key: "a".to_string()
            },
            StoreError::NotASequence {
                key: "b".to_string()
            }
        );
    }
}
