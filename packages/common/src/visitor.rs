use serde_json::{Map, Value};

/// Visitor pattern for traversing ZObject trees immutably
///
/// Works over any of the three encodings since they share the JSON shape.
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_value(&mut self, value: &Value) {
        walk_value(self, value);
    }

    fn visit_composite(&mut self, fields: &Map<String, Value>) {
        walk_composite(self, fields);
    }

    fn visit_field(&mut self, _key: &str, value: &Value) {
        self.visit_value(value);
    }

    fn visit_list(&mut self, items: &[Value]) {
        walk_list(self, items);
    }

    fn visit_terminal(&mut self, _value: &str) {
        // Leaf node, no children to walk
    }
}

pub fn walk_value<V: Visitor>(visitor: &mut V, value: &Value) {
    match value {
        Value::String(s) => visitor.visit_terminal(s),
        Value::Array(items) => visitor.visit_list(items),
        Value::Object(fields) => visitor.visit_composite(fields),
        // Not part of the data model
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

pub fn walk_composite<V: Visitor>(visitor: &mut V, fields: &Map<String, Value>) {
    for (key, value) in fields {
        visitor.visit_field(key, value);
    }
}

pub fn walk_list<V: Visitor>(visitor: &mut V, items: &[Value]) {
    for item in items {
        visitor.visit_value(item);
    }
}
