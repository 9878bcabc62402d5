//! Payload value helpers
//!
//! Request and signal payloads are plain JSON documents. Rules address them
//! with dot-separated paths (`signals.risk_score`, `request.items.0.sku`).

use std::borrow::Cow;

pub use serde_json::Value;

/// Resolve a dot-separated path inside a JSON document.
///
/// Object segments are looked up by key, array segments by numeric index.
/// Returns `None` when any segment is missing. A present `null` resolves to
/// `Some(&Value::Null)`.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = root;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Numeric view of a value. Only JSON numbers qualify; strings are never coerced.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Strict equality. Numbers compare by numeric value so that `1` equals `1.0`;
/// every other pairing requires the same JSON type.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (as_number(left), as_number(right)) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}

/// String form of a value, used for pattern matching.
pub fn display_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
