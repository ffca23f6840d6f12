//! # Document Handle
//!
//! A Document is one ZObject being edited, held as a row table.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Hybrid → Rows → Mutations → Canonical
//!   ↓       ↓        ↓        ↓          ↓
//! JSON  transcoder  table   engine     JSON
//! ```
//!
//! Extra trees (an unsaved implementation, a detached fragment) are loaded
//! into the same table under their own namespace.

use serde_json::Value;
use tracing::{debug, info};
use zobject_transcoder::{
    canonical_to_hybrid, canonicalize_value, hybrid_to_canonical, normalize, normalize_strict,
    unique_type_ids,
};

use crate::key_path::MAIN_NAMESPACE;
use crate::scaffold::TypeCatalog;
use crate::table::RowTable;
use crate::{EditorError, Mutation, MutationResult};

/// Editable ZObject document
#[derive(Debug, Clone)]
pub struct Document {
    /// Current version number (increments on each applied mutation)
    pub version: u64,

    table: RowTable,

    /// Fetched type definitions used when scaffolding
    catalog: TypeCatalog,

    dirty: bool,
}

impl Document {
    /// Load a document from Normal form. Canonical and Hybrid input load
    /// the same way.
    pub fn from_normal(value: &Value, start_row: u32) -> Self {
        Self::from_canonical(&canonicalize_value(value), start_row)
    }

    /// Load a Normal document, rejecting list cells without a tail
    pub fn from_normal_strict(value: &Value, start_row: u32) -> Result<Self, EditorError> {
        let normal = normalize_strict(value)?;
        Ok(Self::from_normal(&normal, start_row))
    }

    /// Load a document from Canonical form
    pub fn from_canonical(value: &Value, start_row: u32) -> Self {
        let table = RowTable::from_tree(&canonical_to_hybrid(value), start_row);
        debug!(rows = table.len(), "Loaded document");
        Self::from_table(table)
    }

    pub fn from_table(table: RowTable) -> Self {
        Self {
            version: 0,
            table,
            catalog: TypeCatalog::new(),
            dirty: false,
        }
    }

    /// Load another tree into the table under `namespace`
    pub fn load_namespace(&mut self, namespace: &str, value: &Value) -> Result<(), EditorError> {
        if self.table.namespace_root(namespace).is_some() {
            return Err(EditorError::NamespaceExists(namespace.to_string()));
        }
        let hybrid = canonical_to_hybrid(&canonicalize_value(value));
        let root = self.table.add_namespace(namespace, &hybrid);
        info!(namespace, root = %root, "Loaded namespace");
        Ok(())
    }

    pub fn unload_namespace(&mut self, namespace: &str) -> Result<(), EditorError> {
        self.table
            .remove_namespace(namespace)
            .map(|_| ())
            .ok_or_else(|| EditorError::UnknownNamespace(namespace.to_string()))
    }

    /// Apply a mutation
    ///
    /// The version only moves when the mutation succeeds.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        mutation.apply_with(&mut self.table, &self.catalog)?;
        self.version += 1;
        self.dirty = true;

        Ok(MutationResult {
            version: self.version,
            row_count: self.table.len(),
        })
    }

    /// Hybrid tree of a namespace
    pub fn to_hybrid(&self, namespace: &str) -> Result<Value, EditorError> {
        let root = self
            .table
            .namespace_root(namespace)
            .ok_or_else(|| EditorError::UnknownNamespace(namespace.to_string()))?;
        let is_array = self.table.row(root).is_some_and(|row| row.is_array());
        Ok(self
            .table
            .to_tree(root, is_array)
            .unwrap_or_else(|| Value::Object(Default::default())))
    }

    pub fn to_canonical(&self, namespace: &str) -> Result<Value, EditorError> {
        Ok(hybrid_to_canonical(&self.to_hybrid(namespace)?))
    }

    pub fn to_normal(&self, namespace: &str) -> Result<Value, EditorError> {
        Ok(normalize(&self.to_canonical(namespace)?))
    }

    /// Type ids referenced by the main tree, first-seen order
    pub fn type_ids(&self) -> Result<Vec<String>, EditorError> {
        Ok(unique_type_ids(&self.to_canonical(MAIN_NAMESPACE)?))
    }

    pub fn table(&self) -> &RowTable {
        &self.table
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut TypeCatalog {
        &mut self.catalog
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPath;
    use serde_json::json;

    fn function() -> Value {
        json!({
            "Z1K1": "Z2",
            "Z2K1": { "Z1K1": "Z6", "Z6K1": "Z0" },
            "Z2K2": {
                "Z1K1": "Z8",
                "Z8K1": ["Z17", { "Z1K1": "Z17", "Z17K1": "Z6", "Z17K2": "Z0K1" }],
                "Z8K2": "Z6"
            }
        })
    }

    #[test]
    fn test_create_document() {
        let doc = Document::from_canonical(&function(), 0);
        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert_eq!(doc.to_canonical("main").unwrap(), function());
    }

    #[test]
    fn test_normal_and_canonical_load_alike() {
        let from_normal = Document::from_normal(&normalize(&function()), 0);
        assert_eq!(from_normal.to_canonical("main").unwrap(), function());
    }

    #[test]
    fn test_version_increments_on_success_only() {
        let mut doc = Document::from_canonical(&function(), 0);

        let bad = Mutation::SetValue {
            key_path: KeyPath::parse("main.Z2K9").unwrap(),
            value: "x".to_string(),
        };
        assert!(doc.apply(&bad).is_err());
        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());

        let good = Mutation::SetValue {
            key_path: KeyPath::parse("main.Z2K2.Z8K2").unwrap(),
            value: "Z40".to_string(),
        };
        let result = doc.apply(&good).unwrap();
        assert_eq!(result.version, 1);
        assert!(doc.is_dirty());
        assert_eq!(doc.to_canonical("main").unwrap()["Z2K2"]["Z8K2"], json!("Z40"));

        doc.mark_saved();
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_namespaces() {
        let mut doc = Document::from_canonical(&function(), 0);
        let implementation = json!({ "Z1K1": "Z14", "Z14K1": "Z0" });
        doc.load_namespace("impl", &implementation).unwrap();

        assert_eq!(doc.to_canonical("impl").unwrap(), implementation);
        assert!(matches!(
            doc.load_namespace("impl", &implementation),
            Err(EditorError::NamespaceExists(_))
        ));
        assert!(matches!(
            doc.to_canonical("nope"),
            Err(EditorError::UnknownNamespace(_))
        ));

        doc.unload_namespace("impl").unwrap();
        assert!(doc.to_canonical("impl").is_err());
    }

    #[test]
    fn test_type_ids() {
        let doc = Document::from_canonical(&function(), 0);
        assert_eq!(doc.type_ids().unwrap(), vec!["Z2", "Z6", "Z8", "Z17"]);
    }
}
