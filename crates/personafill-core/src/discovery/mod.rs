//! Field discovery.
//!
//! Finds visible, fillable, labeled elements in a [`Document`] and returns
//! them in reading order. Discovery never mutates the document; per-pass
//! state (the label and text caches) lives in [`Pass`] and is dropped at the
//! end of [`Discovery::discover`].

mod label;
mod ordering;
mod platform;

use std::collections::{HashMap, HashSet};

use personafill_config::DiscoveryConfig;
use personafill_protocols::{CandidateField, DiscoveryError, FieldKind, FieldSignals, NodeId};
use tracing::debug;

use crate::dom::Document;
use crate::selector::Selector;

pub use label::LabelFilter;
pub use ordering::sort_by_position;
pub use platform::CompiledPlatform;

/// Elements the generic strategy considers.
const GENERIC_SELECTOR: &str =
    "input, textarea, select, [role=\"textbox\"], [contenteditable=\"true\"]";

/// `<input>` types that take free text.
const TEXT_INPUT_TYPES: [&str; 4] = ["text", "email", "tel", "url"];

/// Which strategy produced the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Question containers of a known platform.
    PlatformContainers,
    /// Fallback selector groups of a known platform.
    PlatformFallback,
    Generic,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::PlatformContainers => "platform-containers",
            Strategy::PlatformFallback => "platform-fallback",
            Strategy::Generic => "generic",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled discovery configuration. Built once, shared across passes.
#[derive(Debug, Clone)]
pub struct Discovery {
    limits: DiscoveryConfig,
    platforms: Vec<CompiledPlatform>,
    generic: Selector,
    filter: LabelFilter,
}

impl Discovery {
    /// Compile every configured selector.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        let platforms = config
            .platforms
            .iter()
            .map(CompiledPlatform::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            limits: config.clone(),
            platforms,
            generic: Selector::parse(GENERIC_SELECTOR)?,
            filter: LabelFilter::new(
                config.min_label_len,
                config.max_label_len,
                &config.extra_boilerplate,
            ),
        })
    }

    pub fn platforms(&self) -> &[CompiledPlatform] {
        &self.platforms
    }

    /// Discover candidate fields in reading order.
    pub fn discover(&self, doc: &Document) -> Result<Vec<CandidateField>, DiscoveryError> {
        self.discover_with_strategy(doc).map(|(fields, _)| fields)
    }

    /// Like [`Discovery::discover`], also reporting the winning strategy.
    pub fn discover_with_strategy(
        &self,
        doc: &Document,
    ) -> Result<(Vec<CandidateField>, Strategy), DiscoveryError> {
        if doc.is_empty() {
            return Err(DiscoveryError::InvalidSnapshot(
                "snapshot has no nodes".to_string(),
            ));
        }

        let mut pass = Pass::new(doc, self);
        let mut strategy = Strategy::Generic;
        let mut fields = Vec::new();

        if let Some(platform) = self.platforms.iter().find(|p| p.detect(doc)) {
            debug!(platform = %platform.name(), "Detected form platform");
            let (found, used) = pass.platform_candidates(platform);
            fields = found;
            strategy = used;
        }

        if fields.is_empty() {
            strategy = Strategy::Generic;
            fields = self
                .generic
                .select_all(doc)
                .into_iter()
                .filter_map(|id| pass.build_candidate(id, None))
                .collect();
        }

        let mut seen = HashSet::new();
        fields.retain(|field| seen.insert(field.node));
        sort_by_position(&mut fields, self.limits.row_tolerance_px);

        debug!(
            url = %doc.url(),
            %strategy,
            count = fields.len(),
            "Discovery complete"
        );
        Ok((fields, strategy))
    }
}

/// Classify an element.
pub fn field_kind(doc: &Document, id: NodeId) -> FieldKind {
    let tag = doc.element(id).map(|node| node.tag.as_str()).unwrap_or("");
    match tag {
        "input" => FieldKind::Input {
            input_type: doc
                .element(id)
                .and_then(|node| node.attr("type"))
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string()),
        },
        "textarea" => FieldKind::TextArea,
        "select" => FieldKind::Select,
        _ if doc.is_editable(id) => FieldKind::Editable,
        _ => FieldKind::Container,
    }
}

/// State of one discovery pass.
pub(crate) struct Pass<'a> {
    doc: &'a Document,
    discovery: &'a Discovery,
    labels: HashMap<NodeId, Option<String>>,
    texts: HashMap<NodeId, String>,
}

impl<'a> Pass<'a> {
    fn new(doc: &'a Document, discovery: &'a Discovery) -> Self {
        Self {
            doc,
            discovery,
            labels: HashMap::new(),
            texts: HashMap::new(),
        }
    }

    /// Trimmed text of a node, cached for the pass.
    fn text(&mut self, id: NodeId) -> String {
        if let Some(text) = self.texts.get(&id) {
            return text.clone();
        }
        let text = self.doc.trimmed_text(id);
        self.texts.insert(id, text.clone());
        text
    }

    fn platform_candidates(
        &mut self,
        platform: &CompiledPlatform,
    ) -> (Vec<CandidateField>, Strategy) {
        let doc = self.doc;
        let containers = platform.containers(doc);

        if !containers.is_empty() {
            let mut fields = Vec::new();
            for container in containers {
                let title = platform.title_of(doc, container);
                if title.is_none() {
                    debug!(container = %container, "Question container without title");
                }
                for input in platform.inputs_of(doc, container) {
                    if let Some(field) = self.build_candidate(input, title.clone()) {
                        fields.push(field);
                    }
                }
            }
            return (fields, Strategy::PlatformContainers);
        }

        for group in platform.fallback_groups() {
            let fields: Vec<CandidateField> = group
                .select_all(doc)
                .into_iter()
                .filter_map(|id| self.build_candidate(id, None))
                .collect();
            if !fields.is_empty() {
                debug!(selector = %group, count = fields.len(), "Fallback selector group matched");
                return (fields, Strategy::PlatformFallback);
            }
        }
        (Vec::new(), Strategy::PlatformFallback)
    }

    /// Apply every per-element check and build the candidate.
    fn build_candidate(&mut self, id: NodeId, title: Option<String>) -> Option<CandidateField> {
        let doc = self.doc;
        let Some(node) = doc.element(id) else {
            debug!(node = %id, "Skipping missing element");
            return None;
        };

        let kind = field_kind(doc, id);
        if let FieldKind::Input { input_type } = &kind {
            if !TEXT_INPUT_TYPES.contains(&input_type.as_str()) {
                debug!(node = %id, input_type = %input_type, "Skipping non-text input");
                return None;
            }
        }
        if node.disabled
            || node.read_only
            || node.attr("disabled").is_some()
            || node.attr("readonly").is_some()
        {
            debug!(node = %id, "Skipping disabled or read-only element");
            return None;
        }
        if kind == FieldKind::Container && doc.first_input_descendant(id).is_none() {
            debug!(node = %id, "Skipping container without an input");
            return None;
        }
        if !doc.is_visible(id) {
            debug!(node = %id, "Skipping invisible element");
            return None;
        }

        let label = match title.filter(|t| !t.is_empty()) {
            Some(title) => title,
            None => self.label_for(id).unwrap_or_default(),
        };
        let attr = |name: &str| node.attr(name).unwrap_or("").trim().to_string();
        let signals = FieldSignals {
            label,
            name: attr("name"),
            id: attr("id"),
            placeholder: attr("placeholder"),
            aria_label: attr("aria-label"),
        };
        if signals.parts().iter().all(|(_, text)| text.is_empty()) {
            debug!(node = %id, "Skipping field without any label signal");
            return None;
        }

        Some(CandidateField {
            node: id,
            kind,
            is_empty: doc.is_field_empty(id),
            position: node.rect.unwrap_or_default(),
            signals,
        })
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
