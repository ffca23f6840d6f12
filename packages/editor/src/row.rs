//! # Rows
//!
//! One row per node of a Hybrid ZObject tree. Containers carry `"object"`
//! or `"array"` as their value; terminals carry the string itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a row. Ids are never reused within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u32);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a row holds
///
/// Serialized as a single string. A terminal whose text is literally
/// `"object"` or `"array"` is written as `{"terminal": text}` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RowValueRepr", into = "RowValueRepr")]
pub enum RowValue {
    Object,
    Array,
    Terminal(String),
}

impl RowValue {
    pub fn is_container(&self) -> bool {
        !matches!(self, RowValue::Terminal(_))
    }

    pub fn as_terminal(&self) -> Option<&str> {
        match self {
            RowValue::Terminal(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RowValueRepr {
    Text(String),
    Tagged { terminal: String },
}

impl From<RowValueRepr> for RowValue {
    fn from(repr: RowValueRepr) -> Self {
        match repr {
            RowValueRepr::Text(text) => match text.as_str() {
                "object" => RowValue::Object,
                "array" => RowValue::Array,
                _ => RowValue::Terminal(text),
            },
            RowValueRepr::Tagged { terminal } => RowValue::Terminal(terminal),
        }
    }
}

impl From<RowValue> for RowValueRepr {
    fn from(value: RowValue) -> Self {
        match value {
            RowValue::Object => RowValueRepr::Text("object".to_string()),
            RowValue::Array => RowValueRepr::Text("array".to_string()),
            RowValue::Terminal(terminal) if terminal == "object" || terminal == "array" => {
                RowValueRepr::Tagged { terminal }
            }
            RowValue::Terminal(text) => RowValueRepr::Text(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,

    /// Field key, or the decimal position inside an array. Roots have none.
    pub key: Option<String>,

    pub value: RowValue,

    /// `None` for a namespace root, or for the top of a detached fragment
    pub parent: Option<RowId>,
}

impl Row {
    /// Position inside the parent array, when the key is numeric
    pub fn index(&self) -> Option<usize> {
        self.key.as_deref().and_then(parse_index)
    }

    pub fn is_array(&self) -> bool {
        self.value == RowValue::Array
    }

    pub fn is_object(&self) -> bool {
        self.value == RowValue::Object
    }
}

/// Decimal index without leading zeros (`"0"` itself is allowed)
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

/// A subtree built outside any table
///
/// Rows are in allocation order; the first row is the subtree root and has
/// no parent until the fragment is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFragment {
    pub rows: Vec<Row>,
}

impl RowFragment {
    pub fn root(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
