//! Scalar coercion helpers shared by the store and projection layers.

use serde_json::Value;

/// Renders a value in its natural string form for the flat store.
///
/// Strings are written as-is (no surrounding quotes); numbers, booleans, and
/// null use their JSON text. Objects and arrays fall back to their compact
/// JSON serialization, though callers generally route those through a
/// dedicated path instead.
pub fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Script-style truthiness for stored values.
///
/// `null`, `false`, `0`, the empty string, and the empty sequence all read
/// as absent. This mirrors the presence checks the scripted flows were
/// written against; see [`ScopedStore::has`](crate::store::ScopedStore::has)
/// for the consequence.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_strings_unquoted() {
        assert_eq!(literal(&json!("hello")), "hello");
        assert_eq!(literal(&json!("")), "");
    }

    #[test]
    fn test_literal_scalars() {
        assert_eq!(literal(&json!(42)), "42");
        assert_eq!(literal(&json!(2.5)), "2.5");
        assert_eq!(literal(&json!(true)), "true");
        assert_eq!(literal(&json!(null)), "null");
    }

    #[test]
    fn test_literal_structured() {
        assert_eq!(literal(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(literal(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!(-3)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([0])));
        assert!(is_truthy(&json!({})));
    }
}
