//! Label resolution chain.

use personafill_protocols::NodeId;
use tracing::debug;

use super::Pass;
use super::platform::is_question_title;
use crate::dom::Document;

/// Phrases that never make a label, matched case-insensitively as substrings.
const BOILERPLATE: [&str; 4] = ["your answer", "required", "switch account", "not shared"];

/// Words that make nearby free text plausible as a label.
const FIELD_KEYWORDS: [&str; 4] = ["first", "name", "email", "phone"];

/// Length and boilerplate filter for free-text labels.
#[derive(Debug, Clone)]
pub struct LabelFilter {
    min_len: usize,
    max_len: usize,
    phrases: Vec<String>,
}

impl LabelFilter {
    pub fn new(min_len: usize, max_len: usize, extra: &[String]) -> Self {
        let phrases = BOILERPLATE
            .iter()
            .map(|p| p.to_string())
            .chain(
                extra
                    .iter()
                    .map(|p| p.trim().to_lowercase())
                    .filter(|p| !p.is_empty()),
            )
            .collect();
        Self {
            min_len,
            max_len,
            phrases,
        }
    }

    /// Whether the text is form chrome rather than a question.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        let text = text.trim();
        if text == "*" {
            return true;
        }
        let lower = text.to_lowercase();
        self.phrases.iter().any(|p| lower.contains(p.as_str()))
    }

    /// Whether free text is acceptable as a label.
    pub fn accepts(&self, text: &str) -> bool {
        let len = text.chars().count();
        len >= self.min_len && len <= self.max_len && !self.is_boilerplate(text)
    }
}

fn has_field_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    FIELD_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Control a `<label>` is bound to: its `for` target, else the first control
/// it wraps.
fn label_control(doc: &Document, label: NodeId) -> Option<NodeId> {
    let node = doc.element(label).filter(|n| n.tag == "label")?;
    match node.attr("for").map(str::trim).filter(|v| !v.is_empty()) {
        Some(target) => doc.element_by_id(target),
        None => doc.first_input_descendant(label),
    }
}

fn is_answer_placeholder(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("your answer")
}

impl Pass<'_> {
    /// Resolve a label once per node and pass.
    pub(crate) fn label_for(&mut self, id: NodeId) -> Option<String> {
        if let Some(cached) = self.labels.get(&id) {
            return cached.clone();
        }
        let label = self.resolve_label(id);
        match &label {
            Some(text) => debug!(node = %id, label = %text, "Resolved label"),
            None => debug!(node = %id, "No label found"),
        }
        self.labels.insert(id, label.clone());
        label
    }

    fn resolve_label(&mut self, id: NodeId) -> Option<String> {
        let doc = self.doc;
        let node = doc.element(id)?;
        let attr = |name: &str| {
            node.attr(name)
                .map(str::trim)
                .filter(|v| !v.is_empty() && !is_answer_placeholder(v))
                .map(str::to_string)
        };

        self.from_labelledby(id)
            .or_else(|| self.from_question_container(id))
            .or_else(|| self.from_native_label(id))
            .or_else(|| self.from_nearby_text(id))
            .or_else(|| attr("aria-label"))
            .or_else(|| attr("placeholder"))
            .or_else(|| self.from_ancestor_lines(id))
    }

    /// `aria-labelledby` ids, in order.
    fn from_labelledby(&mut self, id: NodeId) -> Option<String> {
        let doc = self.doc;
        let refs = doc.element(id)?.attr("aria-labelledby")?;
        for target in refs.split_whitespace() {
            let Some(target) = doc.element_by_id(target) else {
                continue;
            };
            let text = self.text(target);
            if is_question_title(&text) {
                return Some(text);
            }
        }
        None
    }

    /// Title of the nearest enclosing question container, the field itself
    /// included, up to `container_depth` ancestors.
    fn from_question_container(&self, id: NodeId) -> Option<String> {
        let doc = self.doc;
        let discovery = self.discovery;
        let ancestors = doc.ancestors(id, discovery.limits.container_depth);
        for node in std::iter::once(id).chain(ancestors) {
            for platform in discovery.platforms() {
                if platform.is_label_container(doc, node) {
                    if let Some(title) = platform.title_of(doc, node) {
                        return Some(title);
                    }
                }
            }
        }
        None
    }

    /// Keyword-bearing free text around the field, nearest ancestor first.
    ///
    /// Text inside, or wrapping, a `<label>` bound to another control is
    /// never taken.
    fn from_nearby_text(&mut self, id: NodeId) -> Option<String> {
        let doc = self.doc;
        let depth = self.discovery.limits.nearby_text_depth;
        let foreign: Vec<NodeId> = doc
            .elements()
            .filter(|label| label_control(doc, *label).is_some_and(|owner| owner != id))
            .collect();
        for ancestor in doc.ancestors(id, depth) {
            for node in doc.descendants(ancestor) {
                if node == id || doc.contains(id, node) {
                    continue;
                }
                if foreign.iter().any(|&label| {
                    label == node || doc.contains(label, node) || doc.contains(node, label)
                }) {
                    continue;
                }
                let text = self.text(node);
                if self.discovery.filter.accepts(&text) && has_field_keyword(&text) {
                    return Some(text);
                }
            }
        }
        None
    }

    /// `<label for=id>` or a wrapping `<label>`.
    fn from_native_label(&mut self, id: NodeId) -> Option<String> {
        let doc = self.doc;
        let mut labels = Vec::new();
        if let Some(field_id) = doc.element(id)?.attr("id").filter(|v| !v.is_empty()) {
            labels.extend(doc.elements().filter(|candidate| {
                doc.element(*candidate)
                    .is_some_and(|n| n.tag == "label" && n.attr("for") == Some(field_id))
            }));
        }
        labels.extend(
            doc.ancestors(id, usize::MAX)
                .into_iter()
                .find(|a| doc.element(*a).is_some_and(|n| n.tag == "label")),
        );
        for label in labels {
            let text = self.text(label);
            if self.discovery.filter.accepts(&text) {
                return Some(text);
            }
        }
        None
    }

    /// First acceptable text line of the nearest ancestors.
    fn from_ancestor_lines(&self, id: NodeId) -> Option<String> {
        let doc = self.doc;
        let discovery = self.discovery;
        let filter = &discovery.filter;
        doc.ancestors(id, discovery.limits.ancestor_line_depth)
            .into_iter()
            .find_map(|ancestor| {
                doc.text_lines(ancestor)
                    .into_iter()
                    .find(|line| filter.accepts(line))
            })
    }
}
