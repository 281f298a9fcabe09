//! Serialized capture of a live document.
//!
//! A snapshot is produced once per fill invocation by the host (the CDP
//! collector script, or a saved file for offline replay). Nodes are stored in
//! document order with the root at index 0; every node except the root points
//! at its parent by index.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a node inside a [`PageSnapshot`].
///
/// Only valid for the snapshot it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Page URL.
    pub url: String,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// All nodes in document order.
    pub nodes: Vec<SnapshotNode>,
}

impl PageSnapshot {
    /// Start building a snapshot rooted at `<html><body>`.
    pub fn builder(url: impl Into<String>) -> SnapshotBuilder {
        SnapshotBuilder::new(url)
    }

    pub fn node(&self, id: NodeId) -> Option<&SnapshotNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SnapshotNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Element,
    Text,
}

/// Computed style subset used for visibility checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    /// Kept as the raw CSS string; parsed at check time.
    pub opacity: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: "1".to_string(),
        }
    }
}

/// Rendered bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Whether the box has a positive area.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// One `<option>` of a `<select>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

/// A single node of the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    pub kind: NodeKind,
    /// Lowercase tag name; empty for text nodes.
    #[serde(default)]
    pub tag: String,
    /// Attributes in source order.
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    /// Character data of text nodes.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Live form value of `input`, `textarea` and `select` elements.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    /// `None` when the style could not be measured.
    #[serde(default)]
    pub style: Option<ComputedStyle>,
    /// `None` when the box could not be measured.
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub read_only: bool,
    /// `isContentEditable` as reported by the page.
    #[serde(default)]
    pub content_editable: bool,
}

impl SnapshotNode {
    /// A bare element node.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element,
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            text: String::new(),
            parent: None,
            value: None,
            options: Vec::new(),
            style: None,
            rect: None,
            disabled: false,
            read_only: false,
            content_editable: false,
        }
    }

    /// A text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            tag: String::new(),
            text: content.into(),
            ..Self::element("")
        }
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Attribute lookup. Names are compared case-insensitively.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_option(mut self, value: impl Into<String>, text: impl Into<String>) -> Self {
        self.options.push(SelectOption {
            value: value.into(),
            text: text.into(),
        });
        self
    }

    /// Mark as `contenteditable="true"`.
    pub fn editable(mut self) -> Self {
        self.content_editable = true;
        self.set_attr("contenteditable", "true");
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Whitespace-separated class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }
}

/// Incremental snapshot construction for hosts and tests.
///
/// Nodes are appended in document order, so children must be added after
/// their parent and before the parent's next sibling subtree.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    snapshot: PageSnapshot,
    body: NodeId,
}

impl SnapshotBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        let mut snapshot = PageSnapshot {
            url: url.into(),
            title: String::new(),
            nodes: vec![SnapshotNode::element("html")],
        };
        let mut body = SnapshotNode::element("body");
        body.parent = Some(NodeId(0));
        snapshot.nodes.push(body);
        Self {
            snapshot,
            body: NodeId(1),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.snapshot.title = title.into();
        self
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Append `node` under `parent`, returning its id.
    pub fn push(&mut self, parent: NodeId, mut node: SnapshotNode) -> NodeId {
        node.parent = Some(parent);
        self.snapshot.nodes.push(node);
        NodeId(self.snapshot.nodes.len() - 1)
    }

    /// Append a text node under `parent`.
    pub fn push_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push(parent, SnapshotNode::text(text))
    }

    pub fn build(self) -> PageSnapshot {
        self.snapshot
    }
}
