//! # ZObject Transcoder
//!
//! Conversions between the three encodings of a ZObject.
//!
//! ```text
//!             normalize
//!   Canonical ──────────▶ Normal
//!      ▲  │  ◀──────────
//!      │  │   canonicalize
//!      │  ▼
//!    Hybrid
//! ```
//!
//! * **Normal**: every string and reference is a tagged record, lists are
//!   cons cells.
//! * **Canonical**: strings and references are bare where unambiguous, lists
//!   are `[elementType, ...items]` arrays. This is what gets persisted.
//! * **Hybrid**: canonical shape with tagged terminals. This is what the
//!   editor mutates.
//!
//! All functions here are pure and never fail on well-formed input.

pub mod canonical;
pub mod error;
pub mod hybrid;
pub mod list;
pub mod normal;
pub mod type_ids;

pub use canonical::{canonicalize, canonicalize_value};
pub use error::{TranscodeError, TranscodeResult};
pub use hybrid::{canonical_to_hybrid, hybrid_to_canonical};
pub use normal::{normalize, normalize_strict};
pub use type_ids::{extract_type_ids, unique_type_ids};

/// Wrap a terminal string into its tagged record.
///
/// Strings that look like ids become references (`Z9`), anything else a
/// string (`Z6`).
pub fn wrap_terminal(s: &str) -> serde_json::Value {
    use zobject_common::keys::{OBJECT_TYPE, REFERENCE_ID, STRING_VALUE};

    let mut record = serde_json::Map::new();
    if zobject_common::is_reference(s) {
        record.insert(OBJECT_TYPE.to_string(), "Z9".into());
        record.insert(REFERENCE_ID.to_string(), s.into());
    } else {
        record.insert(OBJECT_TYPE.to_string(), "Z6".into());
        record.insert(STRING_VALUE.to_string(), s.into());
    }
    serde_json::Value::Object(record)
}
