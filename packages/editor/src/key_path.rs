//! # Key paths
//!
//! Dot-separated addresses into a row table: a namespace followed by field
//! keys and list positions, e.g. `main.Z2K2.Z8K1.2`.
//!
//! There is no escaping, so a field key containing a dot cannot be
//! addressed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::row::parse_index;

/// Namespace of the object being edited
pub const MAIN_NAMESPACE: &str = "main";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyPathError {
    #[error("Key path is empty")]
    Empty,

    #[error("Empty segment at position {position} in {path:?}")]
    EmptySegment { path: String, position: usize },

    #[error("List index {segment:?} has a leading zero in {path:?}")]
    LeadingZero { path: String, segment: String },

    #[error("List index {segment:?} is too large in {path:?}")]
    IndexOverflow { path: String, segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// The row key this segment matches
    pub fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }

    pub fn matches(&self, key: Option<&str>) -> bool {
        match (self, key) {
            (Segment::Key(expected), Some(key)) => expected == key,
            (Segment::Index(expected), Some(key)) => parse_index(key) == Some(*expected),
            (_, None) => false,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPath {
    namespace: String,
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn parse(path: &str) -> Result<Self, KeyPathError> {
        if path.is_empty() {
            return Err(KeyPathError::Empty);
        }

        let mut parts = path.split('.');
        let namespace = parts.next().unwrap_or_default();
        if namespace.is_empty() {
            return Err(KeyPathError::EmptySegment {
                path: path.to_string(),
                position: 0,
            });
        }

        let mut segments = Vec::new();
        for (position, part) in parts.enumerate() {
            segments.push(parse_segment(path, position + 1, part)?);
        }

        Ok(Self {
            namespace: namespace.to_string(),
            segments,
        })
    }

    /// Path to a namespace root
    pub fn root(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            segments: Vec::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Position addressed by the last segment, if it is numeric
    pub fn last_index(&self) -> Option<usize> {
        match self.last() {
            Some(Segment::Index(index)) => Some(*index),
            _ => None,
        }
    }

    /// Path without its last segment; `None` at a namespace root
    pub fn parent(&self) -> Option<KeyPath> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            namespace: self.namespace.clone(),
            segments: rest.to_vec(),
        })
    }

    pub fn child(&self, segment: Segment) -> KeyPath {
        let mut path = self.clone();
        path.segments.push(segment);
        path
    }

    pub fn key(&self, key: impl Into<String>) -> KeyPath {
        self.child(Segment::Key(key.into()))
    }

    pub fn index(&self, index: usize) -> KeyPath {
        self.child(Segment::Index(index))
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

fn parse_segment(path: &str, position: usize, part: &str) -> Result<Segment, KeyPathError> {
    if part.is_empty() {
        return Err(KeyPathError::EmptySegment {
            path: path.to_string(),
            position,
        });
    }

    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(Segment::Key(part.to_string()));
    }

    if part.len() > 1 && part.starts_with('0') {
        return Err(KeyPathError::LeadingZero {
            path: path.to_string(),
            segment: part.to_string(),
        });
    }

    part.parse()
        .map(Segment::Index)
        .map_err(|_| KeyPathError::IndexOverflow {
            path: path.to_string(),
            segment: part.to_string(),
        })
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.namespace)?;
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = KeyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for KeyPath {
    type Error = KeyPathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.to_string()
    }
}
