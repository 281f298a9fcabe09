//! In-memory [`FormPage`] over an owned snapshot.
//!
//! Used for offline replay of saved snapshots and throughout the tests. Writes
//! mutate the owned snapshot so a second pass observes the first one's values.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use personafill_protocols::{
    DomEvent, FormPage, Highlight, NodeId, PageError, PageSnapshot, SnapshotNode, WriteAction,
    WritePlan, WriteReceipt,
};

use crate::dom::Document;

/// One dispatched event, or one step of the focus cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedEvent {
    pub target: NodeId,
    pub event: DomEvent,
}

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: PageSnapshot,
    events: Vec<RecordedEvent>,
    highlights: Vec<(NodeId, Highlight)>,
    writes: usize,
    failing_events: HashSet<DomEvent>,
    read_only: HashSet<NodeId>,
    /// Edits applied right after the next snapshot is taken.
    pending_edits: HashMap<NodeId, String>,
}

/// A page held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<MemoryState>,
}

impl MemoryPage {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                snapshot,
                ..MemoryState::default()
            }),
        }
    }

    /// Current state of the page.
    pub fn current_snapshot(&self) -> PageSnapshot {
        self.state.lock().snapshot.clone()
    }

    /// User-visible value of a field right now.
    pub fn value_of(&self, node: NodeId) -> Option<String> {
        let doc = Document::from_snapshot(self.current_snapshot()).ok()?;
        doc.element(node)?;
        Some(doc.current_value(node))
    }

    /// Every event dispatched so far, in order.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.state.lock().events.clone()
    }

    /// Events dispatched on one node, in order.
    pub fn events_for(&self, node: NodeId) -> Vec<DomEvent> {
        self.state
            .lock()
            .events
            .iter()
            .filter(|e| e.target == node)
            .map(|e| e.event)
            .collect()
    }

    pub fn highlights(&self) -> Vec<(NodeId, Highlight)> {
        self.state.lock().highlights.clone()
    }

    /// Number of values written.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    /// Make dispatching `event` throw on every element.
    pub fn fail_event(&self, event: DomEvent) {
        self.state.lock().failing_events.insert(event);
    }

    /// Make setting a value on `node` throw.
    pub fn lock_node(&self, node: NodeId) {
        self.state.lock().read_only.insert(node);
    }

    /// Simulate a page script or the user writing into `node` after the next
    /// snapshot is captured.
    pub fn edit_after_snapshot(&self, node: NodeId, value: impl Into<String>) {
        self.state.lock().pending_edits.insert(node, value.into());
    }

    /// Set a field's value outside of any write plan.
    pub fn set_value(&self, node: NodeId, value: impl Into<String>) -> Result<(), PageError> {
        let mut state = self.state.lock();
        let target = state
            .snapshot
            .node_mut(node)
            .ok_or(PageError::NodeNotFound(node))?;
        target.value = Some(value.into());
        Ok(())
    }
}

/// Replace the rendered text of `target` with `text`.
fn set_content(snapshot: &mut PageSnapshot, target: NodeId, text: &str) {
    let mut inside: HashSet<NodeId> = HashSet::from([target]);
    for (index, node) in snapshot.nodes.iter_mut().enumerate() {
        if index <= target.index() {
            continue;
        }
        if node.parent.is_some_and(|p| inside.contains(&p)) {
            inside.insert(NodeId(index));
            if node.is_text() {
                node.text.clear();
            }
        }
    }
    let mut content = SnapshotNode::text(text);
    content.parent = Some(target);
    snapshot.nodes.push(content);
}

#[async_trait]
impl FormPage for MemoryPage {
    async fn snapshot(&self) -> Result<PageSnapshot, PageError> {
        let mut state = self.state.lock();
        let captured = state.snapshot.clone();
        let edits: Vec<(NodeId, String)> = state.pending_edits.drain().collect();
        for (node, value) in edits {
            if let Some(target) = state.snapshot.node_mut(node) {
                target.value = Some(value);
            }
        }
        Ok(captured)
    }

    async fn is_empty(&self, node: NodeId) -> Result<bool, PageError> {
        let doc = Document::from_snapshot(self.current_snapshot())
            .map_err(|e| PageError::Snapshot(e.to_string()))?;
        if doc.element(node).is_none() {
            return Err(PageError::NodeNotFound(node));
        }
        Ok(doc.is_field_empty(node))
    }

    async fn apply(&self, plan: &WritePlan) -> Result<WriteReceipt, PageError> {
        let mut state = self.state.lock();
        let target = plan.target;
        if state.read_only.contains(&target) {
            return Err(PageError::WriteFailed {
                node: target,
                message: "value setter rejected the write".to_string(),
            });
        }

        match &plan.action {
            WriteAction::SetValue { value, .. } | WriteAction::SelectOption { value } => {
                let node = state
                    .snapshot
                    .node_mut(target)
                    .ok_or(PageError::NodeNotFound(target))?;
                node.value = Some(value.clone());
            }
            WriteAction::SetContent { text } => {
                if state.snapshot.node(target).is_none() {
                    return Err(PageError::NodeNotFound(target));
                }
                set_content(&mut state.snapshot, target, text);
            }
        }
        state.writes += 1;

        let mut receipt = WriteReceipt::default();
        for event in &plan.events {
            if state.failing_events.contains(event) {
                receipt.failed_events.push(*event);
            } else {
                state.events.push(RecordedEvent {
                    target,
                    event: *event,
                });
            }
        }
        if plan.focus_cycle {
            for event in [DomEvent::Focus, DomEvent::Blur] {
                state.events.push(RecordedEvent { target, event });
            }
        }
        if let Some(highlight) = &plan.highlight {
            state.highlights.push((target, highlight.clone()));
            receipt.highlighted = true;
        }
        Ok(receipt)
    }
}
