//! Platform-specific discovery for dense form frameworks.

use personafill_config::PlatformProfile;
use personafill_protocols::{DiscoveryError, NodeId};

use crate::dom::Document;
use crate::selector::Selector;

/// A [`PlatformProfile`] with its selectors parsed.
#[derive(Debug, Clone)]
pub struct CompiledPlatform {
    name: String,
    url_patterns: Vec<String>,
    fingerprint: Option<Selector>,
    container: Selector,
    titles: Vec<Selector>,
    inputs: Selector,
    label_containers: Vec<Selector>,
    fallback_groups: Vec<Selector>,
}

impl CompiledPlatform {
    pub fn compile(profile: &PlatformProfile) -> Result<Self, DiscoveryError> {
        let parse_all = |sources: &[String]| {
            sources
                .iter()
                .map(|s| Selector::parse(s))
                .collect::<Result<Vec<_>, _>>()
        };
        let fingerprint = match profile.fingerprint.trim() {
            "" => None,
            source => Some(Selector::parse(source)?),
        };
        Ok(Self {
            name: profile.name.clone(),
            url_patterns: profile
                .url_patterns
                .iter()
                .map(|p| p.to_ascii_lowercase())
                .collect(),
            fingerprint,
            container: Selector::parse(&profile.container_selector)?,
            titles: parse_all(&profile.title_selectors)?,
            inputs: Selector::parse(&profile.input_selector)?,
            label_containers: parse_all(&profile.label_containers)?,
            fallback_groups: parse_all(&profile.fallback_selector_groups)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the document belongs to this platform, by URL or markup.
    pub fn detect(&self, doc: &Document) -> bool {
        let url = doc.url().to_ascii_lowercase();
        self.url_patterns.iter().any(|p| url.contains(p.as_str()))
            || self
                .fingerprint
                .as_ref()
                .is_some_and(|selector| selector.matches_any(doc))
    }

    /// Question containers in document order.
    pub fn containers(&self, doc: &Document) -> Vec<NodeId> {
        self.container.select_all(doc)
    }

    /// Input-capable descendants of a container.
    pub fn inputs_of(&self, doc: &Document, container: NodeId) -> Vec<NodeId> {
        self.inputs.select_within(doc, container)
    }

    /// Title text of a question container.
    ///
    /// Title selectors are tried in order; for each, only the first match is
    /// considered.
    pub fn title_of(&self, doc: &Document, container: NodeId) -> Option<String> {
        self.titles.iter().find_map(|selector| {
            let title = doc.trimmed_text(selector.select_first_within(doc, container)?);
            is_question_title(&title).then_some(title)
        })
    }

    /// Whether `node` is one of this platform's question containers.
    pub fn is_label_container(&self, doc: &Document, node: NodeId) -> bool {
        self.label_containers
            .iter()
            .any(|selector| selector.matches(doc, node))
    }

    pub fn fallback_groups(&self) -> &[Selector] {
        &self.fallback_groups
    }
}

/// Titles are accepted unless empty or an answer placeholder.
pub(crate) fn is_question_title(text: &str) -> bool {
    !text.is_empty() && !text.to_lowercase().contains("your answer")
}
