//! Id patterns.
//!
//! A string that matches [`is_reference`] is read as a reference to another
//! ZObject (or one of its keys). Canonical form relies on this to decide
//! whether a bare string is a reference or a string literal.

use regex::Regex;
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Z\d+(K\d+)?$").expect("valid reference pattern"));

static GLOBAL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Z\d+)K(\d+)$").expect("valid global key pattern"));

static LOCAL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^K\d+$").expect("valid local key pattern"));

/// `Z<digits>` with an optional `K<digits>` suffix
pub fn is_reference(s: &str) -> bool {
    REFERENCE.is_match(s)
}

/// `Z<digits>K<digits>`
pub fn is_global_key(s: &str) -> bool {
    GLOBAL_KEY.is_match(s)
}

/// `K<digits>`
pub fn is_local_key(s: &str) -> bool {
    LOCAL_KEY.is_match(s)
}

/// Split a global key into its owning zid and key number.
///
/// `"Z8K2"` becomes `Some(("Z8", 2))`.
pub fn split_global_key(s: &str) -> Option<(&str, u32)> {
    let captures = GLOBAL_KEY.captures(s)?;
    let zid = captures.get(1)?.as_str();
    let number = captures.get(2)?.as_str().parse().ok()?;
    Some((zid, number))
}

/// Build `<zid>K<n>`
pub fn global_key(zid: &str, n: u32) -> String {
    format!("{}K{}", zid, n)
}
