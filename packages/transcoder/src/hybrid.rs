//! Canonical ⇄ Hybrid.
//!
//! Hybrid keeps the canonical container shape and wraps every terminal, so
//! the row table can treat every leaf the same way. A `Z6`/`Z9` record is
//! already a wrapped terminal: its type tag and payload stay bare.

use serde_json::{Map, Value};
use zobject_common::keys::{OBJECT_TYPE, REFERENCE_ID, STRING_VALUE};

use crate::canonical::{collapse_string, untyped_list};
use crate::list::terminal_payload;
use crate::wrap_terminal;

pub fn canonical_to_hybrid(value: &Value) -> Value {
    match value {
        Value::String(s) => wrap_terminal(s),
        Value::Array(items) if items.is_empty() => canonical_to_hybrid(&untyped_list()),
        Value::Array(items) => Value::Array(items.iter().map(canonical_to_hybrid).collect()),
        Value::Object(map) if is_terminal_record(map) => value.clone(),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), canonical_to_hybrid(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

pub fn hybrid_to_canonical(value: &Value) -> Value {
    match value {
        Value::Array(items) if items.is_empty() => untyped_list(),
        Value::Array(items) => Value::Array(items.iter().map(hybrid_to_canonical).collect()),
        Value::Object(map) => match map.get(OBJECT_TYPE).and_then(Value::as_str) {
            Some("Z9") => Value::String(terminal_payload(map.get(REFERENCE_ID)).to_string()),
            Some("Z6") => collapse_string(terminal_payload(map.get(STRING_VALUE))),
            _ => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), hybrid_to_canonical(value)))
                    .collect(),
            ),
        },
        other => other.clone(),
    }
}

fn is_terminal_record(map: &Map<String, Value>) -> bool {
    matches!(
        map.get(OBJECT_TYPE).and_then(Value::as_str),
        Some("Z6") | Some("Z9")
    )
}
