use thiserror::Error;

pub type TranscodeResult<T> = Result<T, TranscodeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscodeError {
    #[error("Typed list cell at {path} has a head but no tail")]
    MissingListTail { path: String },
}
