//! [`FormPage`] over a live Chrome tab.

use std::time::Duration;

use async_trait::async_trait;
use personafill_config::BrowserConfig;
use personafill_protocols::{
    FormPage, NodeId, PageError, PageSnapshot, WritePlan, WriteReceipt,
};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::client::CdpClient;
use crate::error::CdpError;
use crate::protocol::{ValueProbe, WriteOutcome};
use crate::scripts::{APPLY_WRITE, COLLECT_SNAPSHOT, READ_VALUE};
use crate::session::PageSession;

/// Object group holding the handles a single script call needs.
const OBJECT_GROUP: &str = "personafill";

/// A live page reached over CDP.
pub struct CdpFormPage {
    session: PageSession,
    url: String,
    // Owns the receive loop; dropping it closes the session.
    _client: CdpClient,
}

impl CdpFormPage {
    /// Connect to the browser and attach to the configured page.
    pub async fn connect(config: &BrowserConfig) -> Result<Self, CdpError> {
        let timeout = Duration::from_secs(config.command_timeout_secs);
        let client = CdpClient::connect(&config.endpoint, timeout).await?;
        let page = client.find_page(config.target.as_deref()).await?;
        let session = client.attach_page(&page.id).await?;
        info!("Attached to page {} ({})", page.id, page.url);

        Ok(Self {
            session,
            url: page.url,
            _client: client,
        })
    }

    /// URL of the page when it was attached.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Call `script` with `this` bound to `window`, then release the handles the
/// call created, whether it succeeded or not.
async fn run_script(
    session: &PageSession,
    script: &str,
    args: Vec<Value>,
) -> Result<Value, CdpError> {
    let result = call_on_window(session, script, args).await;
    if let Err(e) = session.release_object_group(OBJECT_GROUP).await {
        warn!("Failed to release object group {}: {}", OBJECT_GROUP, e);
    }
    result
}

async fn call_on_window(
    session: &PageSession,
    script: &str,
    args: Vec<Value>,
) -> Result<Value, CdpError> {
    let window = session.evaluate_handle("window", OBJECT_GROUP).await?;
    let object_id = window
        .object_id
        .ok_or_else(|| CdpError::InvalidResponse("window has no object id".to_string()))?;
    session.call_function_on(&object_id, script, args).await
}

#[async_trait]
impl FormPage for CdpFormPage {
    async fn snapshot(&self) -> Result<PageSnapshot, PageError> {
        let value = run_script(&self.session, COLLECT_SNAPSHOT, Vec::new()).await?;
        let snapshot: PageSnapshot = serde_json::from_value(value).map_err(CdpError::from)?;
        debug!(url = %snapshot.url, nodes = snapshot.len(), "Captured snapshot");
        Ok(snapshot)
    }

    async fn is_empty(&self, node: NodeId) -> Result<bool, PageError> {
        let value = run_script(&self.session, READ_VALUE, vec![json!(node.index())]).await?;
        let probe: ValueProbe = serde_json::from_value(value).map_err(CdpError::from)?;
        if !probe.found {
            return Err(PageError::NodeNotFound(node));
        }
        Ok(probe.empty)
    }

    async fn apply(&self, plan: &WritePlan) -> Result<WriteReceipt, PageError> {
        let plan_json = serde_json::to_value(plan).map_err(CdpError::from)?;
        let value = run_script(&self.session, APPLY_WRITE, vec![plan_json]).await?;
        let outcome: WriteOutcome = serde_json::from_value(value).map_err(CdpError::from)?;
        if !outcome.ok {
            return Err(PageError::WriteFailed {
                node: plan.target,
                message: outcome
                    .error
                    .unwrap_or_else(|| "write rejected by the page".to_string()),
            });
        }
        Ok(WriteReceipt {
            failed_events: outcome.failed_events,
            highlighted: outcome.highlighted,
        })
    }
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
