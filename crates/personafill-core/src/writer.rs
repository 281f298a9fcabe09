//! Write planning.
//!
//! Turns a matched field and value into a [`WritePlan`]. Planning reads the
//! snapshot only; applying the plan is the page's job.

use personafill_protocols::{
    CandidateField, NativeSetter, NodeId, SelectOption, WriteAction, WriteError, WritePlan,
};

use crate::dom::Document;

/// Element that actually receives the value.
///
/// Containers resolve to their first input-capable descendant.
pub fn resolve_target(doc: &Document, field: &CandidateField) -> Result<NodeId, WriteError> {
    if doc.element(field.node).is_none() {
        return Err(WriteError::UnknownNode(field.node));
    }
    if doc.is_input_capable(field.node) {
        return Ok(field.node);
    }
    doc.first_input_descendant(field.node)
        .ok_or(WriteError::NoFillableTarget(field.node))
}

/// Plan the write of `value` into `field`.
pub fn plan_write(
    doc: &Document,
    field: &CandidateField,
    value: &str,
) -> Result<WritePlan, WriteError> {
    let target = resolve_target(doc, field)?;
    let node = doc.element(target).ok_or(WriteError::UnknownNode(target))?;

    let action = match node.tag.as_str() {
        "select" => WriteAction::SelectOption {
            value: preferred_option(&node.options, value),
        },
        "input" => WriteAction::SetValue {
            value: value.to_string(),
            setter: NativeSetter::Input,
        },
        "textarea" => WriteAction::SetValue {
            value: value.to_string(),
            setter: NativeSetter::TextArea,
        },
        _ => WriteAction::SetContent {
            text: value.to_string(),
        },
    };
    Ok(WritePlan::new(target, action))
}

/// Value of the first option whose value or text contains `wanted`,
/// case-insensitively; `wanted` itself when none does.
pub fn preferred_option(options: &[SelectOption], wanted: &str) -> String {
    let needle = wanted.to_lowercase();
    if needle.is_empty() {
        return wanted.to_string();
    }
    options
        .iter()
        .find(|option| {
            (!option.value.is_empty() && option.value.to_lowercase().contains(&needle))
                || option.text.to_lowercase().contains(&needle)
        })
        .map(|option| option.value.clone())
        .unwrap_or_else(|| wanted.to_string())
}
