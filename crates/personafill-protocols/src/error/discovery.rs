//! Field discovery errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}
