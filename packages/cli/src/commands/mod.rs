pub mod edit;
pub mod init;
pub mod input;
pub mod rows;
pub mod transcode;
pub mod type_ids;

pub use edit::{edit, EditArgs};
pub use init::{init, InitArgs};
pub use rows::{rows, RowsArgs};
pub use transcode::{transcode, TranscodeArgs};
pub use type_ids::{type_ids, TypeIdsArgs};

use crate::config::Config;
use anyhow::Result;
use serde_json::Value;
use zobject_editor::{Document, MAIN_NAMESPACE};

/// Load a ZObject in any encoding as configured
pub fn load_document(value: &Value, config: &Config) -> Result<Document> {
    Ok(if config.strict_lists {
        Document::from_normal_strict(value, config.start_row)?
    } else {
        Document::from_normal(value, config.start_row)
    })
}

/// Fail on a namespace the document does not hold
pub fn check_namespace(document: &Document, namespace: &str) -> Result<()> {
    if namespace != MAIN_NAMESPACE && document.table().namespace_root(namespace).is_none() {
        anyhow::bail!("Unknown namespace: {}", namespace);
    }
    Ok(())
}
