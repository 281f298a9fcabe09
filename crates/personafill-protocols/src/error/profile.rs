//! Profile record errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Unknown profile attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid profile record: {0}")]
    InvalidRecord(String),
}
