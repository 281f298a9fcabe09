//! Live page errors.

use thiserror::Error;

use crate::snapshot::NodeId;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Snapshot failed: {0}")]
    Snapshot(String),

    #[error("Node {0} not found in the page")]
    NodeNotFound(NodeId),

    #[error("Write to node {node} failed: {message}")]
    WriteFailed { node: NodeId, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_not_found_display() {
        let err = PageError::NodeNotFound(NodeId(7));
        assert!(err.to_string().contains("#7"));
    }

    #[test]
    fn test_write_failed_display() {
        let err = PageError::WriteFailed {
            node: NodeId(2),
            message: "setter threw".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("#2"));
        assert!(display.contains("setter threw"));
    }

    #[test]
    fn test_all_error_variants_display() {
        let errors = vec![
            PageError::Snapshot("s".to_string()),
            PageError::NodeNotFound(NodeId(0)),
            PageError::WriteFailed {
                node: NodeId(1),
                message: "m".to_string(),
            },
            PageError::Transport("t".to_string()),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
