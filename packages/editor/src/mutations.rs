//! # Row table mutations
//!
//! Semantic edits addressed by key path, the way an editing surface
//! requests them.
//!
//! ## Mutation Semantics
//!
//! ### Lists
//! - Positions are 1-based in item paths (`main.Z12K1.1` is the first item)
//! - `DeleteListItems` takes 0-based item indexes
//! - Keys stay contiguous after every mutation
//!
//! ### Replacement
//! - `ReplaceSubtree` and `ChangeType` keep the row's id and key and
//!   rebuild everything below it with fresh ids
//!
//! ### Failure
//! - Every mutation is validated first; a rejected mutation changes nothing

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use zobject_common::ZType;

use crate::key_path::{KeyPath, KeyPathError};
use crate::row::{RowId, RowValue};
use crate::scaffold::{ChangeTypeOptions, ScaffoldContext, Scaffolder, TypeCatalog};
use crate::table::RowTable;

/// Semantic mutations over a row table. Values are Hybrid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert an item at a list position, shifting later items
    InsertListItem { key_path: KeyPath, value: Value },

    /// Remove items by 0-based index
    DeleteListItems {
        list_path: KeyPath,
        indexes: Vec<usize>,
    },

    /// Swap an item with its neighbor `offset` positions away
    MoveListItem { key_path: KeyPath, offset: isize },

    /// Append items to a list
    PushItems {
        list_path: KeyPath,
        values: Vec<Value>,
    },

    /// Replace a subtree with a scaffolded value of another type, or append
    /// one to a list
    ChangeType {
        key_path: KeyPath,
        new_type: ZType,
        #[serde(default)]
        options: ChangeTypeOptions,
    },

    /// Overwrite a terminal (or the payload of a string/reference record)
    SetValue { key_path: KeyPath, value: String },

    /// Replace everything at a path with a new value
    ReplaceSubtree { key_path: KeyPath, value: Value },

    /// Renumber a list by its current order
    RecalculateListKeys { list_path: KeyPath },

    /// Renumber an argument list and its argument keys
    RecalculateArgumentKeys { list_path: KeyPath },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Key path not found: {0}")]
    NotFound(String),

    #[error("Row not found: {0}")]
    RowNotFound(RowId),

    #[error("Not a list: {0}")]
    NotAList(String),

    #[error("Not a list item: {0}")]
    NotAListItem(String),

    #[error("Not a terminal: {0}")]
    NotATerminal(String),

    #[error("Index {index} out of range for a list of {len} items")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Invalid key path: {0}")]
    InvalidKeyPath(#[from] KeyPathError),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl MutationError {
    pub fn out_of_range(index: i64, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

impl Mutation {
    /// Apply with an empty type catalog
    pub fn apply(&self, table: &mut RowTable) -> Result<(), MutationError> {
        self.apply_with(table, &TypeCatalog::default())
    }

    /// Apply mutation to the table with validation
    pub fn apply_with(&self, table: &mut RowTable, catalog: &TypeCatalog) -> Result<(), MutationError> {
        // Validate first
        self.validate(table)?;
        debug!(mutation = self.name(), "Applying mutation");

        match self {
            Mutation::InsertListItem { key_path, value } => {
                table.insert_list_item(key_path, value)?;
            }
            Mutation::DeleteListItems { list_path, indexes } => {
                table.delete_list_items(list_path, indexes)?;
            }
            Mutation::MoveListItem { key_path, offset } => {
                table.move_list_item(key_path, *offset)?;
            }
            Mutation::PushItems { list_path, values } => {
                table.push_items(list_path, values)?;
            }
            Mutation::ChangeType {
                key_path,
                new_type,
                options,
            } => {
                table.change_type(key_path, new_type, options, catalog)?;
            }
            Mutation::SetValue { key_path, value } => {
                table.set_value(key_path, value.clone())?;
            }
            Mutation::ReplaceSubtree { key_path, value } => {
                table.replace_subtree(key_path, value)?;
            }
            Mutation::RecalculateListKeys { list_path } => {
                let list = table.list_at(list_path)?;
                table.recalculate_typed_list_keys(list)?;
            }
            Mutation::RecalculateArgumentKeys { list_path } => {
                let list = table.list_at(list_path)?;
                table.recalculate_argument_keys(list)?;
            }
        }
        Ok(())
    }

    /// Validate without applying
    pub fn validate(&self, table: &RowTable) -> Result<(), MutationError> {
        match self {
            Mutation::InsertListItem { key_path, .. } => table.check_insert(key_path).map(|_| ()),
            Mutation::DeleteListItems { list_path, indexes } => {
                table.check_delete(list_path, indexes).map(|_| ())
            }
            Mutation::MoveListItem { key_path, offset } => {
                table.check_move(key_path, *offset).map(|_| ())
            }
            Mutation::PushItems { list_path, .. }
            | Mutation::RecalculateListKeys { list_path }
            | Mutation::RecalculateArgumentKeys { list_path } => {
                table.list_at(list_path).map(|_| ())
            }
            Mutation::ChangeType {
                key_path, options, ..
            } => table.check_change_type(key_path, options).map(|_| ()),
            Mutation::SetValue { key_path, .. } => table.check_set_value(key_path).map(|_| ()),
            Mutation::ReplaceSubtree { key_path, .. } => table
                .resolve_id(key_path)
                .map(|_| ())
                .ok_or_else(|| MutationError::NotFound(key_path.to_string())),
        }
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertListItem { .. } => "insert_list_item",
            Mutation::DeleteListItems { .. } => "delete_list_items",
            Mutation::MoveListItem { .. } => "move_list_item",
            Mutation::PushItems { .. } => "push_items",
            Mutation::ChangeType { .. } => "change_type",
            Mutation::SetValue { .. } => "set_value",
            Mutation::ReplaceSubtree { .. } => "replace_subtree",
            Mutation::RecalculateListKeys { .. } => "recalculate_list_keys",
            Mutation::RecalculateArgumentKeys { .. } => "recalculate_argument_keys",
        }
    }
}

impl RowTable {
    /// Replace everything at `path` with `value`, keeping the row's id and key.
    pub fn replace_subtree(&mut self, path: &KeyPath, value: &Value) -> Result<RowId, MutationError> {
        let id = self
            .resolve_id(path)
            .ok_or_else(|| MutationError::NotFound(path.to_string()))?;
        self.clear_children(id);
        self.fill_row(id, value);
        debug!(path = %path, row = id.0, "Replaced subtree");
        Ok(id)
    }

    pub(crate) fn check_set_value(&self, path: &KeyPath) -> Result<RowId, MutationError> {
        let row = self
            .resolve(path)
            .ok_or_else(|| MutationError::NotFound(path.to_string()))?;
        let writable = match &row.value {
            RowValue::Terminal(_) => true,
            RowValue::Object => self.terminal_text(row.id).is_some(),
            RowValue::Array => false,
        };
        if writable {
            Ok(row.id)
        } else {
            Err(MutationError::NotATerminal(path.to_string()))
        }
    }

    /// Overwrite the terminal at `path`. A path to a string or reference
    /// record writes its payload.
    pub fn set_value(&mut self, path: &KeyPath, value: String) -> Result<(), MutationError> {
        let id = self.check_set_value(path)?;
        if self.set_terminal_text(id, value) {
            Ok(())
        } else {
            Err(MutationError::NotATerminal(path.to_string()))
        }
    }

    pub(crate) fn check_change_type(
        &self,
        path: &KeyPath,
        options: &ChangeTypeOptions,
    ) -> Result<RowId, MutationError> {
        if options.append {
            self.list_at(path)
        } else {
            self.resolve_id(path)
                .ok_or_else(|| MutationError::NotFound(path.to_string()))
        }
    }

    /// Scaffold a value of `new_type` and either append it to the list at
    /// `path` (`options.append`) or put it in place of what is at `path`.
    /// Returns the id of the row holding the new value.
    pub fn change_type(
        &mut self,
        path: &KeyPath,
        new_type: &ZType,
        options: &ChangeTypeOptions,
        catalog: &TypeCatalog,
    ) -> Result<RowId, MutationError> {
        let target = self.check_change_type(path, options)?;

        let owner_zid = self
            .root_of(target)
            .map(|root| self.persistent_zid(root))
            .ok_or(MutationError::RowNotFound(target))?;
        let context = ScaffoldContext {
            next_key: self.find_latest_key(&owner_zid) + 1,
            owner_zid,
        };
        let value = Scaffolder::new(catalog, context).scaffold(new_type, &options.init);
        debug!(path = %path, new_type = %new_type, append = options.append, "Changing type");

        if options.append {
            let ids = self.push_items(path, std::slice::from_ref(&value))?;
            ids.first()
                .copied()
                .ok_or_else(|| MutationError::InvalidStructure("nothing appended".to_string()))
        } else {
            self.replace_subtree(path, &value)
        }
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    /// Rows in the table after the mutation
    pub row_count: usize,
}
