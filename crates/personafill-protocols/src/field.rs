//! Candidate fields produced by discovery.

use serde::{Deserialize, Serialize};

use crate::snapshot::{NodeId, Rect};

/// What kind of element a candidate is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Native `<input>`; `input_type` is lowercase, `text` when missing.
    Input { input_type: String },
    TextArea,
    Select,
    /// `contenteditable` or `role="textbox"` element.
    Editable,
    /// Grouping element whose first input-capable descendant receives the value.
    Container,
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Input { input_type } => input_type,
            FieldKind::TextArea => "textarea",
            FieldKind::Select => "select",
            FieldKind::Editable => "editable",
            FieldKind::Container => "container",
        }
    }
}

/// Raw text signals attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSignals {
    pub label: String,
    pub name: String,
    pub id: String,
    pub placeholder: String,
    pub aria_label: String,
}

impl FieldSignals {
    /// Lower-cased `"label name id placeholder aria-label"`.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.label, self.name, self.id, self.placeholder, self.aria_label
        )
        .to_lowercase()
    }

    /// Individual signals in fixed order, tagged with their source.
    pub fn parts(&self) -> [(&'static str, &str); 5] {
        [
            ("label", self.label.as_str()),
            ("name", self.name.as_str()),
            ("id", self.id.as_str()),
            ("placeholder", self.placeholder.as_str()),
            ("aria-label", self.aria_label.as_str()),
        ]
    }
}

/// A discovered element plus its derived metadata.
///
/// Holds a non-owning [`NodeId`] into the snapshot of the current pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateField {
    pub node: NodeId,
    pub kind: FieldKind,
    pub signals: FieldSignals,
    /// Emptiness at discovery time; re-checked against the live page before writing.
    pub is_empty: bool,
    /// Used for ordering only.
    pub position: Rect,
}

impl CandidateField {
    pub fn label(&self) -> &str {
        &self.signals.label
    }

    /// The only text the matcher reasons over.
    pub fn search_text(&self) -> String {
        self.signals.search_text()
    }

    /// Name to report for this field: `name`, then `id`, then the label.
    pub fn identifier(&self) -> &str {
        [
            self.signals.name.as_str(),
            self.signals.id.as_str(),
            self.signals.label.as_str(),
        ]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("")
    }
}
