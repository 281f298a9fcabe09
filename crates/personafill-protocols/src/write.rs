//! Write plans: what to set on which node, and which events to dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::NodeId;

/// Synthetic DOM events dispatched after a value is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEvent {
    Input,
    Change,
    KeyUp,
    Blur,
    Focus,
}

impl DomEvent {
    /// DOM event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomEvent::Input => "input",
            DomEvent::Change => "change",
            DomEvent::KeyUp => "keyup",
            DomEvent::Blur => "blur",
            DomEvent::Focus => "focus",
        }
    }
}

impl fmt::Display for DomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prototype whose own `value` setter must be invoked, bypassing any
/// instance-level override installed by the page. Serialized as the DOM
/// interface name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NativeSetter {
    #[serde(rename = "HTMLInputElement")]
    Input,
    #[serde(rename = "HTMLTextAreaElement")]
    TextArea,
}

/// The mutation applied to the target element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WriteAction {
    /// Set `value` through the native setter.
    SetValue { value: String, setter: NativeSetter },
    /// Select the option with this value, through the native select setter.
    SelectOption { value: String },
    /// Set text content and inner markup. The text is not escaped.
    SetContent { text: String },
}

/// Transient visual feedback on a filled element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub background: String,
    pub border: String,
    pub revert_after_ms: u64,
}

impl Default for Highlight {
    fn default() -> Self {
        Self {
            background: "#d1fae5".to_string(),
            border: "2px solid #10b981".to_string(),
            revert_after_ms: 2000,
        }
    }
}

/// Pure description of one field write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritePlan {
    /// Element that receives the value; for containers, the resolved descendant.
    pub target: NodeId,
    pub action: WriteAction,
    /// Events dispatched in order, each bubbling and cancelable.
    pub events: Vec<DomEvent>,
    /// Explicit `focus()` / `blur()` after the events.
    pub focus_cycle: bool,
    pub highlight: Option<Highlight>,
}

impl WritePlan {
    /// Event order reactive frameworks need to observe a programmatic write.
    pub const DISPATCH_SEQUENCE: [DomEvent; 5] = [
        DomEvent::Input,
        DomEvent::Change,
        DomEvent::KeyUp,
        DomEvent::Blur,
        DomEvent::Focus,
    ];

    pub fn new(target: NodeId, action: WriteAction) -> Self {
        Self {
            target,
            action,
            events: Self::DISPATCH_SEQUENCE.to_vec(),
            focus_cycle: true,
            highlight: None,
        }
    }

    pub fn with_highlight(mut self, highlight: Option<Highlight>) -> Self {
        self.highlight = highlight;
        self
    }
}

/// What a page reports back after applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteReceipt {
    /// Events whose dispatch threw; these are not fatal.
    #[serde(default)]
    pub failed_events: Vec<DomEvent>,
    /// Whether the highlight was applied.
    #[serde(default)]
    pub highlighted: bool,
}
