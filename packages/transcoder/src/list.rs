//! Helpers for reading type positions and typed lists in any encoding.

use serde_json::{Map, Value};
use zobject_common::keys::{
    FUNCTION_CALL_FUNCTION, OBJECT_TYPE, REFERENCE_ID, STRING_VALUE, TYPED_LIST_ITEM_TYPE,
};

/// The id a value refers to: a bare string or a `Z9` record.
pub fn reference_id(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(map) if type_tag(map) == Some("Z9") => map.get(REFERENCE_ID).and_then(Value::as_str),
        _ => None,
    }
}

/// Bare type tag of a composite, when it is a plain id
pub fn type_tag(map: &Map<String, Value>) -> Option<&str> {
    map.get(OBJECT_TYPE).and_then(reference_id)
}

/// Payload of a terminal in any encoding; absent becomes `""`.
pub fn terminal_payload(value: Option<&Value>) -> &str {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Object(map)) => map
            .get(STRING_VALUE)
            .or_else(|| map.get(REFERENCE_ID))
            .and_then(Value::as_str)
            .unwrap_or_default(),
        _ => "",
    }
}

/// Element type of a typed list type, i.e. a `Z7` call of `Z881`.
///
/// Returns `None` when `ty` is not a typed list type. A call without its
/// `Z881K1` argument is a list of generic objects.
pub fn list_item_type(ty: &Value) -> Option<Value> {
    let Value::Object(map) = ty else {
        return None;
    };
    if type_tag(map) != Some("Z7") {
        return None;
    }
    if map.get(FUNCTION_CALL_FUNCTION).and_then(reference_id) != Some("Z881") {
        return None;
    }
    Some(
        map.get(TYPED_LIST_ITEM_TYPE)
            .cloned()
            .unwrap_or_else(|| Value::String("Z1".to_string())),
    )
}

pub fn is_list_type(ty: &Value) -> bool {
    list_item_type(ty).is_some()
}

/// Canonical type of a typed list of `item_type`
pub fn typed_list_type(item_type: Value) -> Value {
    let mut call = Map::new();
    call.insert(OBJECT_TYPE.to_string(), "Z7".into());
    call.insert(FUNCTION_CALL_FUNCTION.to_string(), "Z881".into());
    call.insert(TYPED_LIST_ITEM_TYPE.to_string(), item_type);
    Value::Object(call)
}
