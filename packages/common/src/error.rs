use thiserror::Error;

/// Common error type shared by the ZObject crates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommonError {
    #[error("Invalid zid: {0:?}")]
    InvalidZid(String),
}
