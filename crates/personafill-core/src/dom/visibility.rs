//! Rendered visibility.

use personafill_protocols::NodeId;

use super::Document;

impl Document {
    /// Whether the element is rendered with a non-empty box.
    ///
    /// Missing style or box data counts as visible, as does an unparsable
    /// opacity.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(node) = self.element(id) else {
            return true;
        };
        if let Some(style) = &node.style {
            if style.display.trim().eq_ignore_ascii_case("none")
                || style.visibility.trim().eq_ignore_ascii_case("hidden")
            {
                return false;
            }
            if let Ok(opacity) = style.opacity.trim().parse::<f64>() {
                if opacity <= 0.0 {
                    return false;
                }
            }
        }
        node.rect.is_none_or(|rect| rect.has_area())
    }
}
