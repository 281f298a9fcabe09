//! Engine construction errors.

use personafill_protocols::{DiscoveryError, PageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Page(#[from] PageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_error_is_transparent() {
        let err: EngineError = DiscoveryError::Selector {
            selector: "div:hover".to_string(),
            message: "pseudo-classes are not supported".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Invalid selector 'div:hover'"));
    }

    #[test]
    fn test_pattern_error_display() {
        let err: EngineError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid match pattern"));
    }
}
