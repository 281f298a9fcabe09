//! Write planning errors.

use thiserror::Error;

use crate::error::PageError;
use crate::snapshot::NodeId;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Container {0} has no fillable descendant")]
    NoFillableTarget(NodeId),

    #[error("Node {0} is missing from the snapshot")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Page(#[from] PageError),
}
