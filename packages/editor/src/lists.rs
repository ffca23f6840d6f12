//! # List operations
//!
//! Typed lists are `array` rows whose children are keyed `"0".."n"`: `"0"`
//! holds the element type, `"1".."n"` the items. Every operation here checks
//! its preconditions before touching the table, and leaves the keys
//! contiguous when it returns.
//!
//! Ids are identities and never change; keys are positions and do.

use serde_json::Value;
use tracing::debug;
use zobject_common::global_key;
use zobject_common::keys::ARGUMENT_KEY;
use zobject_transcoder::wrap_terminal;

use crate::key_path::KeyPath;
use crate::mutations::MutationError;
use crate::row::{RowId, RowValue};
use crate::table::RowTable;

impl RowTable {
    /// Resolve `path` and require an array row.
    pub fn list_at(&self, path: &KeyPath) -> Result<RowId, MutationError> {
        let row = self
            .resolve(path)
            .ok_or_else(|| MutationError::NotFound(path.to_string()))?;
        if !row.is_array() {
            return Err(MutationError::NotAList(path.to_string()));
        }
        Ok(row.id)
    }

    /// Number of items in a list, not counting the type slot
    pub fn item_count(&self, list: RowId) -> usize {
        self.children(list)
            .iter()
            .filter(|row| row.index().is_some_and(|index| index > 0))
            .count()
    }

    /// Item rows of a list in position order, not counting the type slot
    pub fn list_items(&self, list: RowId) -> Vec<RowId> {
        self.list_children(list)
            .into_iter()
            .filter(|row| row.index().is_some_and(|index| index > 0))
            .map(|row| row.id)
            .collect()
    }

    /// Split an item path into its list and a 1-based position.
    fn item_position(&self, path: &KeyPath) -> Result<(RowId, usize), MutationError> {
        let (Some(position), Some(list_path)) = (path.last_index(), path.parent()) else {
            return Err(MutationError::NotAListItem(path.to_string()));
        };
        if position == 0 {
            return Err(MutationError::NotAListItem(path.to_string()));
        }
        Ok((self.list_at(&list_path)?, position))
    }

    pub(crate) fn check_insert(&self, path: &KeyPath) -> Result<(RowId, usize), MutationError> {
        let (list, position) = self.item_position(path)?;
        let len = self.item_count(list);
        if position > len + 1 {
            return Err(MutationError::out_of_range(position as i64, len));
        }
        Ok((list, position))
    }

    /// Insert `value` at the position `path` names, moving that item and
    /// everything after it one position later. Returns the new item's id.
    pub fn insert_list_item(&mut self, path: &KeyPath, value: &Value) -> Result<RowId, MutationError> {
        let (list, position) = self.check_insert(path)?;
        Ok(self.insert_at(list, position, value))
    }

    fn insert_at(&mut self, list: RowId, position: usize, value: &Value) -> RowId {
        self.ensure_type_slot(list);
        let shifted: Vec<(RowId, usize)> = self
            .children(list)
            .iter()
            .filter_map(|row| row.index().map(|index| (row.id, index)))
            .filter(|(_, index)| *index >= position)
            .collect();
        for (id, index) in shifted {
            self.set_key(id, index + 1);
        }

        let fragment = Self::flatten(value, self.next_id(), Some(position.to_string()));
        let id = self
            .attach(fragment, Some(list))
            .unwrap_or_else(|| unreachable!("flatten always yields a row"));
        debug!(list = list.0, position, item = id.0, "Inserted list item");
        id
    }

    pub(crate) fn check_delete(
        &self,
        path: &KeyPath,
        indexes: &[usize],
    ) -> Result<RowId, MutationError> {
        let list = self.list_at(path)?;
        let len = self.item_count(list);
        if let Some(&bad) = indexes.iter().find(|&&index| index >= len) {
            return Err(MutationError::out_of_range(bad as i64, len));
        }
        Ok(list)
    }

    /// Remove the items at 0-based `indexes` and everything below them,
    /// then close the gaps. Returns the ids of the removed items.
    pub fn delete_list_items(
        &mut self,
        path: &KeyPath,
        indexes: &[usize],
    ) -> Result<Vec<RowId>, MutationError> {
        let list = self.check_delete(path, indexes)?;
        let items = self.list_items(list);

        let mut removed: Vec<RowId> = indexes.iter().map(|&index| items[index]).collect();
        removed.sort();
        removed.dedup();
        for &id in &removed {
            self.remove_subtree(id);
        }

        self.recalculate_typed_list_keys(list)?;
        debug!(list = list.0, removed = removed.len(), "Deleted list items");
        Ok(removed)
    }

    pub(crate) fn check_move(
        &self,
        path: &KeyPath,
        offset: isize,
    ) -> Result<(RowId, usize, usize), MutationError> {
        let (list, position) = self.item_position(path)?;
        let len = self.item_count(list);
        if position > len {
            return Err(MutationError::out_of_range(position as i64, len));
        }
        let target = (position as i64)
            .checked_add(offset as i64)
            .ok_or_else(|| MutationError::out_of_range(i64::MAX, len))?;
        if target < 1 || target > len as i64 {
            return Err(MutationError::out_of_range(target, len));
        }
        Ok((list, position, target as usize))
    }

    /// Swap the item at `path` with the one `offset` positions away.
    pub fn move_list_item(&mut self, path: &KeyPath, offset: isize) -> Result<(), MutationError> {
        let (list, position, target) = self.check_move(path, offset)?;
        if position == target {
            return Ok(());
        }

        let items = self.list_items(list);
        let (moving, other) = (items[position - 1], items[target - 1]);
        self.set_key(moving, target);
        self.set_key(other, position);
        debug!(list = list.0, from = position, to = target, "Moved list item");
        Ok(())
    }

    /// Append `values` after the last item, in order.
    pub fn push_items(&mut self, path: &KeyPath, values: &[Value]) -> Result<Vec<RowId>, MutationError> {
        let list = self.list_at(path)?;
        let mut ids = Vec::with_capacity(values.len());
        for value in values {
            let position = self.item_count(list) + 1;
            ids.push(self.insert_at(list, position, value));
        }
        Ok(ids)
    }

    /// A list written to for the first time without an element type gets
    /// the generic one, so its items start at 1.
    fn ensure_type_slot(&mut self, list: RowId) {
        if self.type_slot(list).is_some() {
            return;
        }
        let fragment = Self::flatten(&wrap_terminal("Z1"), self.next_id(), Some("0".to_string()));
        self.attach(fragment, Some(list));
        debug!(list = list.0, "Added generic type slot");
    }

    fn type_slot(&self, list: RowId) -> Option<RowId> {
        self.children(list)
            .into_iter()
            .find(|row| row.index() == Some(0))
            .map(|row| row.id)
    }

    /// Renumber a list's items `1..=n` by their current order. The type slot
    /// keeps key `0`.
    ///
    /// Running it twice changes nothing the second time.
    pub fn recalculate_typed_list_keys(&mut self, list: RowId) -> Result<(), MutationError> {
        let row = self.row(list).ok_or(MutationError::RowNotFound(list))?;
        if !row.is_array() {
            return Err(MutationError::NotAList(list.to_string()));
        }

        let slot = self.type_slot(list);
        let ordered: Vec<RowId> = self
            .list_children(list)
            .iter()
            .map(|row| row.id)
            .filter(|&id| Some(id) != slot)
            .collect();
        for (index, id) in ordered.into_iter().enumerate() {
            self.set_key(id, index + 1);
        }
        Ok(())
    }

    /// Renumber an argument list and rewrite each argument's key to
    /// `<zid>K<position>`, where `zid` is the owning object's id.
    pub fn recalculate_argument_keys(&mut self, list: RowId) -> Result<(), MutationError> {
        self.recalculate_typed_list_keys(list)?;

        let zid = self
            .root_of(list)
            .map(|root| self.persistent_zid(root))
            .ok_or(MutationError::RowNotFound(list))?;

        for (position, item) in self.list_items(list).into_iter().enumerate() {
            let Some(key_row) = self.child_by_key(item, ARGUMENT_KEY).map(|row| row.id) else {
                continue;
            };
            self.set_terminal_text(key_row, global_key(&zid, position as u32 + 1));
        }
        Ok(())
    }

    fn set_key(&mut self, id: RowId, index: usize) {
        if let Some(row) = self.row_mut(id) {
            row.key = Some(index.to_string());
        }
    }

    /// Overwrite a terminal row, or the payload of a `Z6`/`Z9` record.
    pub(crate) fn set_terminal_text(&mut self, id: RowId, text: String) -> bool {
        let target = match self.row(id).map(|row| &row.value) {
            Some(RowValue::Terminal(_)) => Some(id),
            Some(RowValue::Object) => self
                .children(id)
                .iter()
                .find(|row| {
                    matches!(row.key.as_deref(), Some("Z6K1") | Some("Z9K1"))
                        && !row.value.is_container()
                })
                .map(|row| row.id),
            _ => None,
        };

        match target.and_then(|id| self.row_mut(id)) {
            Some(row) => {
                row.value = RowValue::Terminal(text);
                true
            }
            None => false,
        }
    }
}
