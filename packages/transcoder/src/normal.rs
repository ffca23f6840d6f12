//! Canonical/Hybrid → Normal.

use serde_json::{Map, Value};
use tracing::{debug, warn};
use zobject_common::keys::{LIST_HEAD, LIST_TAIL, OBJECT_TYPE, REFERENCE_ID, STRING_VALUE};

use crate::error::{TranscodeError, TranscodeResult};
use crate::list::{is_list_type, terminal_payload, typed_list_type};
use crate::wrap_terminal;

/// Normalize a value, synthesizing the empty tail of any typed list cell
/// that lacks one.
///
/// Every synthesized tail is reported with a `warn!` event so a missing
/// terminator in persisted data does not go unnoticed.
pub fn normalize(value: &Value) -> Value {
    debug!("Normalizing ZObject");
    let mut normalizer = Normalizer::new(false);
    match normalizer.normalize(value) {
        Ok(normal) => normal,
        // Lenient mode never reports MissingListTail
        Err(_) => unreachable!("lenient normalization does not fail"),
    }
}

/// Normalize a value, rejecting typed list cells without a tail.
pub fn normalize_strict(value: &Value) -> TranscodeResult<Value> {
    debug!("Normalizing ZObject (strict)");
    Normalizer::new(true).normalize(value)
}

struct Normalizer {
    strict: bool,
    /// Keys from the root to the value being normalized
    path: Vec<String>,
}

impl Normalizer {
    fn new(strict: bool) -> Self {
        Self {
            strict,
            path: Vec::new(),
        }
    }

    fn normalize(&mut self, value: &Value) -> TranscodeResult<Value> {
        match value {
            Value::String(s) => Ok(wrap_terminal(s)),
            Value::Array(items) => self.normalize_list(items),
            Value::Object(map) => self.normalize_object(map),
            other => Ok(other.clone()),
        }
    }

    fn normalize_child(&mut self, key: &str, value: &Value) -> TranscodeResult<Value> {
        self.path.push(key.to_string());
        let result = self.normalize(value);
        self.path.pop();
        result
    }

    fn normalize_object(&mut self, map: &Map<String, Value>) -> TranscodeResult<Value> {
        let mut normal = Map::with_capacity(map.len() + 1);

        match map.get(OBJECT_TYPE) {
            Some(Value::String(tag)) if tag == "Z6" || tag == "Z9" => {
                let payload_key = if tag == "Z6" { STRING_VALUE } else { REFERENCE_ID };
                normal.insert(OBJECT_TYPE.to_string(), Value::String(tag.clone()));
                normal.insert(
                    payload_key.to_string(),
                    terminal_payload(map.get(payload_key)).into(),
                );
                return Ok(Value::Object(normal));
            }
            Some(_) => {}
            None => {
                normal.insert(OBJECT_TYPE.to_string(), wrap_terminal("Z1"));
            }
        }

        for (key, value) in map {
            let value = self.normalize_child(key, value)?;
            normal.insert(key.clone(), value);
        }

        let is_list_cell = normal.get(OBJECT_TYPE).is_some_and(is_list_type);
        if is_list_cell && normal.contains_key(LIST_HEAD) && !normal.contains_key(LIST_TAIL) {
            let path = self.path_string();
            if self.strict {
                return Err(TranscodeError::MissingListTail { path });
            }
            warn!(path = %path, "Typed list cell has no tail, synthesizing an empty list");
            let mut tail = Map::new();
            tail.insert(OBJECT_TYPE.to_string(), normal[OBJECT_TYPE].clone());
            normal.insert(LIST_TAIL.to_string(), Value::Object(tail));
        }

        Ok(Value::Object(normal))
    }

    /// Expand `[itemType, ...items]` into cons cells.
    fn normalize_list(&mut self, items: &[Value]) -> TranscodeResult<Value> {
        let (item_type, rest) = match items.split_first() {
            Some((first, rest)) => (first.clone(), rest),
            None => (Value::String("Z1".to_string()), items),
        };
        let list_type = self.normalize_child("0", &typed_list_type(item_type))?;

        let mut normalized = Vec::with_capacity(rest.len());
        for (index, item) in rest.iter().enumerate() {
            normalized.push(self.normalize_child(&(index + 1).to_string(), item)?);
        }

        let mut tail = Map::new();
        tail.insert(OBJECT_TYPE.to_string(), list_type.clone());
        for item in normalized.into_iter().rev() {
            let mut cell = Map::new();
            cell.insert(OBJECT_TYPE.to_string(), list_type.clone());
            cell.insert(LIST_HEAD.to_string(), item);
            cell.insert(LIST_TAIL.to_string(), Value::Object(tail));
            tail = cell;
        }

        Ok(Value::Object(tail))
    }

    fn path_string(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path.join(".")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normal_list_type(item: &str) -> Value {
        json!({
            "Z1K1": { "Z1K1": "Z9", "Z9K1": "Z7" },
            "Z7K1": { "Z1K1": "Z9", "Z9K1": "Z881" },
            "Z881K1": { "Z1K1": "Z9", "Z9K1": item }
        })
    }

    #[test]
    fn test_strings_and_references() {
        assert_eq!(normalize(&json!("abc")), json!({ "Z1K1": "Z6", "Z6K1": "abc" }));
        assert_eq!(normalize(&json!("Z40")), json!({ "Z1K1": "Z9", "Z9K1": "Z40" }));
        assert_eq!(normalize(&json!("Z0")), json!({ "Z1K1": "Z9", "Z9K1": "Z0" }));
    }

    #[test]
    fn test_wrapped_id_like_string_stays_a_string() {
        let value = json!({ "Z1K1": "Z6", "Z6K1": "Z1000" });
        assert_eq!(normalize(&value), value);
    }

    #[test]
    fn test_list_becomes_cons_cells() {
        let list_type = normal_list_type("Z6");
        assert_eq!(
            normalize(&json!(["Z6", "a"])),
            json!({
                "Z1K1": list_type,
                "K1": { "Z1K1": "Z6", "Z6K1": "a" },
                "K2": { "Z1K1": list_type }
            })
        );
    }

    #[test]
    fn test_empty_array_is_list_of_objects() {
        assert_eq!(normalize(&json!([])), json!({ "Z1K1": normal_list_type("Z1") }));
    }

    #[test]
    fn test_missing_type_defaults_to_object() {
        assert_eq!(
            normalize(&json!({})),
            json!({ "Z1K1": { "Z1K1": "Z9", "Z9K1": "Z1" } })
        );
    }

    #[test]
    fn test_missing_tail_is_synthesized() {
        let list_type = normal_list_type("Z6");
        let value = json!({
            "Z1K1": list_type,
            "K1": { "Z1K1": "Z6", "Z6K1": "a" }
        });

        assert_eq!(
            normalize(&value),
            json!({
                "Z1K1": list_type,
                "K1": { "Z1K1": "Z6", "Z6K1": "a" },
                "K2": { "Z1K1": list_type }
            })
        );
    }

    #[test]
    fn test_strict_reports_missing_tail() {
        let value = json!({
            "Z1K1": "Z2",
            "Z2K2": {
                "Z1K1": { "Z1K1": "Z7", "Z7K1": "Z881", "Z881K1": "Z6" },
                "K1": "a"
            }
        });

        assert_eq!(
            normalize_strict(&value),
            Err(TranscodeError::MissingListTail {
                path: "Z2K2".to_string()
            })
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(&json!({ "Z1K1": "Z11", "Z11K1": "Z1002", "Z11K2": "hi" }));
        assert_eq!(normalize(&once), once);
    }
}
