//! Normal/Hybrid → Canonical.

use serde_json::{Map, Value};
use tracing::debug;
use zobject_common::is_reference;
use zobject_common::keys::{LIST_HEAD, LIST_TAIL, OBJECT_TYPE, REFERENCE_ID, STRING_VALUE};

use crate::list::{list_item_type, terminal_payload};

/// Canonicalize a value that may be absent.
///
/// Absent input stays absent instead of becoming an error, so callers can
/// pass through optional fields unchanged.
pub fn canonicalize(value: Option<&Value>) -> Option<Value> {
    let value = value?;
    debug!("Canonicalizing ZObject");
    Some(canonicalize_value(value))
}

/// Canonicalize a value in Normal, Hybrid or Canonical encoding.
///
/// An empty array is a list of generic objects, `["Z1"]`.
pub fn canonicalize_value(value: &Value) -> Value {
    match value {
        Value::Array(items) if items.is_empty() => untyped_list(),
        Value::Array(items) => Value::Array(items.iter().map(canonicalize_value).collect()),
        Value::Object(map) => canonicalize_object(map),
        other => other.clone(),
    }
}

fn canonicalize_object(map: &Map<String, Value>) -> Value {
    let ty = map.get(OBJECT_TYPE).map(canonicalize_value);

    match ty.as_ref().and_then(Value::as_str) {
        Some("Z9") => return Value::String(terminal_payload(map.get(REFERENCE_ID)).to_string()),
        Some("Z6") => return collapse_string(terminal_payload(map.get(STRING_VALUE))),
        _ => {}
    }

    if let Some(item_type) = ty.as_ref().and_then(list_item_type) {
        return flatten_list(map, item_type);
    }

    let mut canonical = Map::with_capacity(map.len());
    for (key, value) in map {
        let value = match (key.as_str(), &ty) {
            (OBJECT_TYPE, Some(ty)) => ty.clone(),
            _ => canonicalize_value(value),
        };
        canonical.insert(key.clone(), value);
    }
    Value::Object(canonical)
}

/// Canonical form of a list that never recorded its element type
pub(crate) fn untyped_list() -> Value {
    Value::Array(vec![Value::String("Z1".to_string())])
}

/// A string payload collapses to a bare string unless it would then be read
/// back as a reference.
pub(crate) fn collapse_string(payload: &str) -> Value {
    if is_reference(payload) {
        let mut record = Map::new();
        record.insert(OBJECT_TYPE.to_string(), "Z6".into());
        record.insert(STRING_VALUE.to_string(), payload.into());
        Value::Object(record)
    } else {
        Value::String(payload.to_string())
    }
}

/// Walk a cons-cell list into `[itemType, ...items]`.
fn flatten_list(head: &Map<String, Value>, item_type: Value) -> Value {
    let mut items = vec![item_type];
    let mut cell = Some(head);

    while let Some(current) = cell {
        let Some(item) = current.get(LIST_HEAD) else {
            break;
        };
        items.push(canonicalize_value(item));
        cell = current.get(LIST_TAIL).and_then(Value::as_object);
    }

    Value::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_stays_absent() {
        assert_eq!(canonicalize(None), None);
        assert_eq!(canonicalize(Some(&json!("x"))), Some(json!("x")));
    }

    #[test]
    fn test_reference_collapses() {
        let value = json!({ "Z1K1": "Z9", "Z9K1": "Z1000" });
        assert_eq!(canonicalize_value(&value), json!("Z1000"));
    }

    #[test]
    fn test_id_like_string_stays_wrapped() {
        let value = json!({ "Z1K1": "Z6", "Z6K1": "Z1000" });
        assert_eq!(canonicalize_value(&value), value);
    }

    #[test]
    fn test_missing_string_payload_is_empty() {
        let value = json!({ "Z1K1": "Z6" });
        assert_eq!(canonicalize_value(&value), json!(""));
    }

    #[test]
    fn test_wrapped_type_tag_is_recognised() {
        let value = json!({
            "Z1K1": { "Z1K1": "Z9", "Z9K1": "Z6" },
            "Z6K1": "hello"
        });
        assert_eq!(canonicalize_value(&value), json!("hello"));
    }

    #[test]
    fn test_cons_list_flattens() {
        let list_type = json!({
            "Z1K1": { "Z1K1": "Z9", "Z9K1": "Z7" },
            "Z7K1": { "Z1K1": "Z9", "Z9K1": "Z881" },
            "Z881K1": { "Z1K1": "Z9", "Z9K1": "Z6" }
        });
        let value = json!({
            "Z1K1": list_type,
            "K1": { "Z1K1": "Z6", "Z6K1": "a" },
            "K2": {
                "Z1K1": list_type,
                "K1": { "Z1K1": "Z6", "Z6K1": "b" },
                "K2": { "Z1K1": list_type }
            }
        });

        assert_eq!(canonicalize_value(&value), json!(["Z6", "a", "b"]));
    }

    #[test]
    fn test_cons_list_without_tail_stops() {
        let value = json!({
            "Z1K1": { "Z1K1": "Z7", "Z7K1": "Z881", "Z881K1": "Z6" },
            "K1": "a"
        });
        assert_eq!(canonicalize_value(&value), json!(["Z6", "a"]));
    }

    #[test]
    fn test_empty_array_gets_generic_type() {
        assert_eq!(canonicalize_value(&json!([])), json!(["Z1"]));
        assert_eq!(
            canonicalize_value(&json!({ "Z1K1": "Z10001", "Z10001K1": [] })),
            json!({ "Z1K1": "Z10001", "Z10001K1": ["Z1"] })
        );
    }

    #[test]
    fn test_key_order_is_preserved() {
        let value = json!({
            "Z1K1": { "Z1K1": "Z9", "Z9K1": "Z11" },
            "Z11K2": { "Z1K1": "Z6", "Z6K1": "text" },
            "Z11K1": { "Z1K1": "Z9", "Z9K1": "Z1002" }
        });
        let canonical = canonicalize_value(&value);
        let keys: Vec<&String> = canonical.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Z1K1", "Z11K2", "Z11K1"]);
    }
}
