//! # ZObject Editor
//!
//! Editing engine for ZObjects held as flat rows.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ transcoder: Normal / Canonical → Hybrid     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: rows + key-path mutations           │
//! │  - Flatten trees into a row table           │
//! │  - Resolve `namespace.key.key.index` paths  │
//! │  - Apply list and subtree mutations         │
//! │  - Single-writer session queue              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ transcoder: Hybrid → Canonical (persisted)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Rows are the working copy**: trees are rebuilt from rows on demand
//! 2. **Row ids are stable**: an id names one row for the table's lifetime
//! 3. **Lists stay contiguous**: item keys are `1..=n` after every mutation
//! 4. **Failed mutations change nothing**: validation runs before any write
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zobject_editor::{Document, KeyPath, Mutation};
//!
//! let mut doc = Document::from_canonical(&function_json, 0);
//!
//! doc.apply(&Mutation::MoveListItem {
//!     key_path: KeyPath::parse("main.Z2K2.Z8K1.2")?,
//!     offset: -1,
//! })?;
//!
//! let canonical = doc.to_canonical("main")?;
//! ```

mod document;
mod errors;
mod key_path;
mod lists;
mod mutations;
mod row;
mod scaffold;
mod session;
mod table;

pub use document::Document;
pub use errors::EditorError;
pub use key_path::{KeyPath, KeyPathError, Segment, MAIN_NAMESPACE};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use row::{Row, RowFragment, RowId, RowValue};
pub use scaffold::{ChangeTypeOptions, InitValues, ScaffoldContext, Scaffolder, TypeCatalog};
pub use session::{EditSession, FlushOutcome, PendingMutation};
pub use table::RowTable;

// Re-export common types for convenience
pub use zobject_common::ZType;
