//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Invalid key path: {0}")]
    KeyPath(#[from] crate::key_path::KeyPathError),

    #[error("Transcode error: {0}")]
    Transcode(#[from] zobject_transcoder::TranscodeError),

    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),

    #[error("Namespace already loaded: {0}")]
    NamespaceExists(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
