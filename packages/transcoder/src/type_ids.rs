//! Collect the type ids a tree depends on.
//!
//! Callers use the result to fetch type definitions before the tree can be
//! rendered. The order is depth-first pre-order and must stay stable.

use serde_json::{Map, Value};
use zobject_common::keys::{FUNCTION_CALL_FUNCTION, OBJECT_TYPE, TYPE_IDENTITY};
use zobject_common::{walk_composite, Visitor};

use crate::list::{reference_id, type_tag};

/// Every composite's type id, first-seen order, duplicates kept.
///
/// A type tag that is itself a function call (`Z881(Z6)`) contributes the
/// called function and then whatever its arguments contribute; a literal
/// type (`Z4`) contributes its identity. The leading element type of an
/// array is treated the same way as a type tag.
pub fn extract_type_ids(value: &Value) -> Vec<String> {
    let mut collector = TypeIdCollector::default();
    collector.visit_value(value);
    collector.ids
}

/// [`extract_type_ids`] without duplicates, keeping the first occurrence.
pub fn unique_type_ids(value: &Value) -> Vec<String> {
    let mut ids = extract_type_ids(value);
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
    ids
}

#[derive(Default)]
struct TypeIdCollector {
    ids: Vec<String>,
}

impl TypeIdCollector {
    fn collect_type(&mut self, ty: &Value) {
        if let Some(id) = reference_id(ty) {
            if !id.is_empty() {
                self.ids.push(id.to_string());
            }
            return;
        }

        let Value::Object(map) = ty else {
            return;
        };
        let identity_key = match type_tag(map) {
            Some("Z7") => FUNCTION_CALL_FUNCTION,
            Some("Z4") => TYPE_IDENTITY,
            _ => {
                self.visit_composite(map);
                return;
            }
        };

        if let Some(identity) = map.get(identity_key) {
            self.collect_type(identity);
        }
        for (key, value) in map {
            if key != OBJECT_TYPE && key != identity_key {
                self.visit_value(value);
            }
        }
    }
}

impl Visitor for TypeIdCollector {
    fn visit_composite(&mut self, fields: &Map<String, Value>) {
        match fields.get(OBJECT_TYPE) {
            Some(ty) => self.collect_type(ty),
            None => self.ids.push("Z1".to_string()),
        }
        walk_composite(self, fields);
    }

    fn visit_field(&mut self, key: &str, value: &Value) {
        if key != OBJECT_TYPE {
            self.visit_value(value);
        }
    }

    fn visit_list(&mut self, items: &[Value]) {
        if let Some((item_type, rest)) = items.split_first() {
            self.collect_type(item_type);
            for item in rest {
                self.visit_value(item);
            }
        }
    }
}
