//! Read-only document arena over a [`PageSnapshot`].
//!
//! The arena adds what the flat snapshot lacks: child lists, id lookup and
//! bounded tree walks. All walks are iterative.

mod text;
mod visibility;

use std::collections::HashMap;

use personafill_protocols::{DiscoveryError, NodeId, PageSnapshot, SnapshotNode};

/// Tags that accept a value directly.
const FORM_CONTROL_TAGS: [&str; 3] = ["input", "textarea", "select"];

/// Indexed, immutable view of one snapshot.
#[derive(Debug, Clone)]
pub struct Document {
    snapshot: PageSnapshot,
    children: Vec<Vec<NodeId>>,
    ids: HashMap<String, NodeId>,
}

impl Document {
    /// Index a snapshot.
    ///
    /// Every parent must precede its children, which also rules out cycles.
    pub fn from_snapshot(snapshot: PageSnapshot) -> Result<Self, DiscoveryError> {
        let mut children = vec![Vec::new(); snapshot.nodes.len()];
        let mut ids = HashMap::new();

        for (index, node) in snapshot.nodes.iter().enumerate() {
            match node.parent {
                Some(parent) if parent.index() >= index => {
                    return Err(DiscoveryError::InvalidSnapshot(format!(
                        "node #{} has parent {} which does not precede it",
                        index, parent
                    )));
                }
                Some(parent) => children[parent.index()].push(NodeId(index)),
                None if index != 0 => {
                    return Err(DiscoveryError::InvalidSnapshot(format!(
                        "node #{} has no parent",
                        index
                    )));
                }
                None => {}
            }
            if let Some(id) = node
                .attr("id")
                .filter(|id| node.is_element() && !id.is_empty())
            {
                ids.entry(id.to_string()).or_insert(NodeId(index));
            }
        }

        Ok(Self {
            snapshot,
            children,
            ids,
        })
    }

    pub fn snapshot(&self) -> &PageSnapshot {
        &self.snapshot
    }

    pub fn url(&self) -> &str {
        &self.snapshot.url
    }

    pub fn len(&self) -> usize {
        self.snapshot.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SnapshotNode> {
        self.snapshot.node(id)
    }

    /// Element node, or `None` for text nodes and unknown ids.
    pub fn element(&self, id: NodeId) -> Option<&SnapshotNode> {
        self.node(id).filter(|node| node.is_element())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id.index()).map_or(&[], Vec::as_slice)
    }

    /// Ancestors from the parent upward, at most `limit` of them.
    pub fn ancestors(&self, id: NodeId, limit: usize) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            if out.len() >= limit {
                break;
            }
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// All descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Element ids in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.snapshot
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_element())
            .map(|(index, _)| NodeId(index))
    }

    /// First element carrying `id="..."`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Whether `ancestor` strictly contains `node`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Whether the element is editable rich text: `contenteditable` or a textbox role.
    pub fn is_editable(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|node| {
            node.content_editable
                || node
                    .attr("contenteditable")
                    .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true"))
                || node
                    .attr("role")
                    .is_some_and(|v| v.eq_ignore_ascii_case("textbox"))
        })
    }

    /// Whether the element can receive a value directly.
    pub fn is_input_capable(&self, id: NodeId) -> bool {
        self.element(id)
            .is_some_and(|node| FORM_CONTROL_TAGS.contains(&node.tag.as_str()))
            || self.is_editable(id)
    }

    /// First input-capable descendant of `id`.
    pub fn first_input_descendant(&self, id: NodeId) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|node| self.is_input_capable(*node))
    }

    /// Current user-visible value of a field.
    ///
    /// Form controls report their live value; editable elements their text.
    pub fn current_value(&self, id: NodeId) -> String {
        let Some(node) = self.element(id) else {
            return String::new();
        };
        if FORM_CONTROL_TAGS.contains(&node.tag.as_str()) {
            if let Some(value) = &node.value {
                return value.clone();
            }
            if node.tag == "input" {
                return node.attr("value").unwrap_or("").to_string();
            }
        }
        self.text_content(id)
    }

    /// Whether a field holds no user-entered value.
    ///
    /// Containers are judged by their first input-capable descendant.
    pub fn is_field_empty(&self, id: NodeId) -> bool {
        let target = if self.is_input_capable(id) {
            Some(id)
        } else {
            self.first_input_descendant(id)
        };
        match target {
            Some(target) => self.current_value(target).trim().is_empty(),
            None => true,
        }
    }
}
