//! # Row table
//!
//! Flat, id-addressed store for one or more ZObject trees in Hybrid form.
//!
//! ## Layout
//!
//! ```text
//! id  key     value    parent
//! 0   -       object   -        ← root of namespace "main"
//! 1   Z1K1    object   0
//! 2   Z1K1    Z9       1
//! 3   Z9K1    Z11      1
//! 4   Z11K2   object   0
//! ...
//! ```
//!
//! Rows are stored in allocation order. Object fields are read back in
//! storage order, list items in key order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;
use zobject_common::keys::{
    OBJECT_TYPE, PERSISTENT_ID, REFERENCE_ID, STRING_VALUE, UNSAVED_PLACEHOLDER,
};
use zobject_common::{is_reference, split_global_key};

use crate::key_path::{KeyPath, Segment, MAIN_NAMESPACE};
use crate::row::{Row, RowFragment, RowId, RowValue};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowTable {
    rows: Vec<Row>,

    /// Row id → position in `rows`
    index: HashMap<RowId, usize>,

    /// Parent id → child ids in storage order
    child_ids: HashMap<RowId, Vec<RowId>>,

    /// Namespace name → root row
    namespaces: BTreeMap<String, RowId>,

    /// Lowest id that was never handed out
    high_water: u32,
}

/// Serialized shape of a table
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RowTableData {
    rows: Vec<Row>,
    #[serde(default)]
    namespaces: BTreeMap<String, RowId>,
    #[serde(default)]
    high_water: u32,
}

impl Serialize for RowTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RowTableData {
            rows: self.rows.clone(),
            namespaces: self.namespaces.clone(),
            high_water: self.high_water,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RowTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = RowTableData::deserialize(deserializer)?;
        let mut table = RowTable::from_rows(data.rows, data.namespaces);
        table.high_water = table.high_water.max(data.high_water);
        Ok(table)
    }
}

impl RowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `value` into a new table whose root, registered as the
    /// `main` namespace, gets id `start_row`.
    pub fn from_tree(value: &Value, start_row: u32) -> Self {
        let mut table = Self::new();
        let fragment = Self::flatten(value, RowId(start_row), None);
        let root = table.attach(fragment, None);
        if let Some(root) = root {
            table.namespaces.insert(MAIN_NAMESPACE.to_string(), root);
        }
        debug!(rows = table.len(), start_row, "Built row table");
        table
    }

    /// Rebuild a table from rows that were produced elsewhere.
    pub fn from_rows(rows: Vec<Row>, namespaces: BTreeMap<String, RowId>) -> Self {
        let mut table = Self {
            rows,
            namespaces,
            ..Self::default()
        };
        table.reindex();
        table.high_water = table.max_id().map_or(0, |id| id.0 + 1);
        table
    }

    /// Flatten `value` depth-first into a detached fragment, containers
    /// before their children, ids counting up from `start`.
    pub fn flatten(value: &Value, start: RowId, key: Option<String>) -> RowFragment {
        let mut rows = Vec::new();
        let mut next = start.0;
        flatten_into(&mut rows, value, &mut next, key, None);
        RowFragment { rows }
    }

    /// Attach a fragment below `parent` (or as a new root) and return the
    /// id of its top row.
    pub fn attach(&mut self, fragment: RowFragment, parent: Option<RowId>) -> Option<RowId> {
        let top = fragment.root()?.id;
        for mut row in fragment.rows {
            if row.id == top {
                row.parent = parent;
            }
            self.high_water = self.high_water.max(row.id.0 + 1);
            self.push_row(row);
        }
        Some(top)
    }

    /// Ingest another tree as a separately named root.
    pub fn add_namespace(&mut self, name: impl Into<String>, value: &Value) -> RowId {
        let name = name.into();
        let fragment = Self::flatten(value, self.next_id(), None);
        let root = fragment.rows[0].id;
        self.attach(fragment, None);
        debug!(namespace = %name, root = root.0, "Added namespace");
        self.namespaces.insert(name, root);
        root
    }

    pub fn remove_namespace(&mut self, name: &str) -> Option<RowId> {
        let root = self.namespaces.remove(name)?;
        self.remove_subtree(root);
        Some(root)
    }

    pub fn namespace_root(&self, name: &str) -> Option<RowId> {
        self.namespaces.get(name).copied()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (&str, RowId)> {
        self.namespaces.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Rebuild the tree below `root`.
    ///
    /// An object without children is absent (`None`); the parent then omits
    /// the key. A list position holding one becomes `{}` so later items keep
    /// their positions. `root_is_array` builds the root as a list.
    pub fn to_tree(&self, root: RowId, root_is_array: bool) -> Option<Value> {
        let row = self.row(root)?;
        match &row.value {
            RowValue::Terminal(s) => Some(Value::String(s.clone())),
            _ if root_is_array || row.is_array() => Some(self.collect_array(root)),
            _ => self.collect_object(root),
        }
    }

    fn collect_object(&self, id: RowId) -> Option<Value> {
        let mut map = Map::new();
        for child in self.children(id) {
            let Some(key) = child.key.clone() else {
                continue;
            };
            if let Some(value) = self.to_tree(child.id, false) {
                map.insert(key, value);
            }
        }
        if map.is_empty() {
            None
        } else {
            Some(Value::Object(map))
        }
    }

    fn collect_array(&self, id: RowId) -> Value {
        let items = self
            .list_children(id)
            .into_iter()
            .map(|child| {
                self.to_tree(child.id, false)
                    .unwrap_or_else(|| Value::Object(Map::new()))
            })
            .collect();
        Value::Array(items)
    }

    /// One past the highest id present or ever allocated; 0 when empty.
    pub fn next_id(&self) -> RowId {
        let present = self.max_id().map_or(0, |id| id.0 + 1);
        RowId(present.max(self.high_water))
    }

    fn max_id(&self) -> Option<RowId> {
        self.rows.iter().map(|row| row.id).max()
    }

    /// Highest `n` of any terminal `<zid>K<n>` in the table, 0 when none.
    pub fn find_latest_key(&self, zid: &str) -> u32 {
        latest_key(self.rows.iter(), zid)
    }

    /// Highest `n` of any terminal `<zid>K<n>` below `list`, 0 when none.
    pub fn find_latest_list_key(&self, list: RowId, zid: &str) -> u32 {
        latest_key(self.descendants(list).into_iter(), zid)
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.index.get(&id).map(|&position| &self.rows[position])
    }

    pub(crate) fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        let position = *self.index.get(&id)?;
        self.rows.get_mut(position)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Direct children in storage order
    pub fn children(&self, id: RowId) -> Vec<&Row> {
        self.child_ids
            .get(&id)
            .map(|ids| ids.iter().filter_map(|&child| self.row(child)).collect())
            .unwrap_or_default()
    }

    /// Direct children ordered by numeric key; non-numeric keys last.
    pub fn list_children(&self, id: RowId) -> Vec<&Row> {
        let mut children = self.children(id);
        children.sort_by_key(|row| row.index().unwrap_or(usize::MAX));
        children
    }

    pub fn child_by_key(&self, id: RowId, key: &str) -> Option<&Row> {
        self.children(id)
            .into_iter()
            .find(|row| row.key.as_deref() == Some(key))
    }

    /// Every row below `id`, not including `id`
    pub fn descendants(&self, id: RowId) -> Vec<&Row> {
        let mut found = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            for child in self.children(current) {
                frontier.push(child.id);
                found.push(child);
            }
        }
        found
    }

    /// Find the row a key path addresses. `None` is the "not found" answer.
    pub fn resolve(&self, path: &KeyPath) -> Option<&Row> {
        let mut current = self.row(self.namespace_root(path.namespace())?)?;
        for segment in path.segments() {
            current = self
                .children(current.id)
                .into_iter()
                .find(|row| segment.matches(row.key.as_deref()))?;
        }
        Some(current)
    }

    pub fn resolve_id(&self, path: &KeyPath) -> Option<RowId> {
        self.resolve(path).map(|row| row.id)
    }

    /// Key path of a row, from its namespace root down
    pub fn key_path_of(&self, id: RowId) -> Option<KeyPath> {
        let mut segments = Vec::new();
        let mut current = self.row(id)?;
        while let Some(parent) = current.parent {
            let key = current.key.as_deref()?;
            let parent_row = self.row(parent)?;
            segments.push(match (parent_row.is_array(), crate::row::parse_index(key)) {
                (true, Some(index)) => Segment::Index(index),
                _ => Segment::Key(key.to_string()),
            });
            current = parent_row;
        }

        let namespace = self
            .namespaces
            .iter()
            .find(|(_, root)| **root == current.id)
            .map(|(name, _)| name.clone())?;

        let mut path = KeyPath::root(namespace);
        for segment in segments.into_iter().rev() {
            path = path.child(segment);
        }
        Some(path)
    }

    /// Root of the tree containing `id`
    pub fn root_of(&self, id: RowId) -> Option<RowId> {
        let mut current = self.row(id)?;
        while let Some(parent) = current.parent {
            current = self.row(parent)?;
        }
        Some(current.id)
    }

    /// Persistent id of the object rooted at `root`, or the unsaved
    /// placeholder when it has none.
    pub fn persistent_zid(&self, root: RowId) -> String {
        self.child_by_key(root, PERSISTENT_ID)
            .and_then(|row| self.terminal_text(row.id))
            .filter(|zid| is_reference(zid))
            .unwrap_or_else(|| UNSAVED_PLACEHOLDER.to_string())
    }

    /// Text of a terminal row, or of the payload of a `Z6`/`Z9` record
    pub fn terminal_text(&self, id: RowId) -> Option<String> {
        let row = self.row(id)?;
        match &row.value {
            RowValue::Terminal(s) => Some(s.clone()),
            RowValue::Object => {
                let payload = self
                    .child_by_key(id, STRING_VALUE)
                    .or_else(|| self.child_by_key(id, REFERENCE_ID))?;
                payload.value.as_terminal().map(str::to_string)
            }
            RowValue::Array => None,
        }
    }

    /// Type id of an object row, when its `Z1K1` is a plain id
    pub fn type_of(&self, id: RowId) -> Option<String> {
        let tag = self.child_by_key(id, OBJECT_TYPE)?;
        self.terminal_text(tag.id)
    }

    /// Remove a row and everything below it. Returns the removed ids.
    pub(crate) fn remove_subtree(&mut self, id: RowId) -> HashSet<RowId> {
        let mut doomed: HashSet<RowId> = self.descendants(id).iter().map(|row| row.id).collect();
        doomed.insert(id);
        self.remove_rows(&doomed);
        doomed
    }

    /// Remove everything below `id`, keeping `id` itself.
    pub(crate) fn clear_children(&mut self, id: RowId) {
        let doomed: HashSet<RowId> = self.descendants(id).iter().map(|row| row.id).collect();
        self.remove_rows(&doomed);
    }

    fn remove_rows(&mut self, doomed: &HashSet<RowId>) {
        if doomed.is_empty() {
            return;
        }
        self.rows.retain(|row| !doomed.contains(&row.id));
        self.namespaces.retain(|_, root| !doomed.contains(root));
        self.reindex();
    }

    /// Flatten `value`'s children below an existing row and make the row's
    /// own value match `value`'s shape.
    pub(crate) fn fill_row(&mut self, id: RowId, value: &Value) {
        let mut next = self.next_id().0;
        let mut rows = Vec::new();
        let row_value = match value {
            Value::Object(map) => {
                for (key, child) in map {
                    flatten_into(&mut rows, child, &mut next, Some(key.clone()), Some(id));
                }
                RowValue::Object
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    flatten_into(&mut rows, child, &mut next, Some(index.to_string()), Some(id));
                }
                RowValue::Array
            }
            scalar => terminal_value(scalar),
        };

        if let Some(row) = self.row_mut(id) {
            row.value = row_value;
        }
        self.high_water = self.high_water.max(next);
        for row in rows {
            self.push_row(row);
        }
    }

    fn push_row(&mut self, row: Row) {
        self.index.insert(row.id, self.rows.len());
        if let Some(parent) = row.parent {
            self.child_ids.entry(parent).or_default().push(row.id);
        }
        self.rows.push(row);
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.child_ids.clear();
        for (position, row) in self.rows.iter().enumerate() {
            self.index.insert(row.id, position);
            if let Some(parent) = row.parent {
                self.child_ids.entry(parent).or_default().push(row.id);
            }
        }
    }
}

fn flatten_into(
    rows: &mut Vec<Row>,
    value: &Value,
    next: &mut u32,
    key: Option<String>,
    parent: Option<RowId>,
) -> RowId {
    let id = RowId(*next);
    *next += 1;

    let position = rows.len();
    rows.push(Row {
        id,
        key,
        value: RowValue::Object,
        parent,
    });

    rows[position].value = match value {
        Value::Object(map) => {
            for (child_key, child) in map {
                flatten_into(rows, child, next, Some(child_key.clone()), Some(id));
            }
            RowValue::Object
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(rows, child, next, Some(index.to_string()), Some(id));
            }
            RowValue::Array
        }
        scalar => terminal_value(scalar),
    };

    id
}

/// Scalars outside the data model keep their JSON text.
fn terminal_value(value: &Value) -> RowValue {
    match value {
        Value::String(s) => RowValue::Terminal(s.clone()),
        Value::Null => RowValue::Terminal(String::new()),
        other => RowValue::Terminal(other.to_string()),
    }
}

fn latest_key<'a>(rows: impl Iterator<Item = &'a Row>, zid: &str) -> u32 {
    rows.filter_map(|row| row.value.as_terminal())
        .filter_map(split_global_key)
        .filter(|(owner, _)| *owner == zid)
        .map(|(_, n)| n)
        .max()
        .unwrap_or(0)
}
