//! The live page as seen by the engine.

use async_trait::async_trait;

use crate::error::PageError;
use crate::snapshot::{NodeId, PageSnapshot};
use crate::write::{WritePlan, WriteReceipt};

/// A live document that can be captured, probed and written to.
///
/// Implementations own all side effects. The engine reads the page only
/// through [`FormPage::snapshot`] and [`FormPage::is_empty`], and mutates it
/// only through [`FormPage::apply`].
#[async_trait]
pub trait FormPage: Send + Sync {
    /// Capture a fresh read-only snapshot of the document.
    async fn snapshot(&self) -> Result<PageSnapshot, PageError>;

    /// Whether the node currently holds no user-entered value.
    ///
    /// Node ids refer to the most recent snapshot.
    async fn is_empty(&self, node: NodeId) -> Result<bool, PageError>;

    /// Apply one write plan.
    async fn apply(&self, plan: &WritePlan) -> Result<WriteReceipt, PageError>;
}
