//! Text extraction.

use personafill_protocols::NodeId;

use super::Document;

/// Elements that start a new line in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "legend", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

impl Document {
    /// Concatenated character data of `id` and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        if node.is_text() {
            return node.text.clone();
        }
        let mut out = String::new();
        for descendant in self.descendants(id) {
            if let Some(text) = self.node(descendant).filter(|n| n.is_text()) {
                out.push_str(&text.text);
            }
        }
        out
    }

    /// Trimmed text content.
    pub fn trimmed_text(&self, id: NodeId) -> String {
        self.text_content(id).trim().to_string()
    }

    /// Non-empty trimmed lines of `id`'s text.
    ///
    /// Lines break at newlines inside text and at block element boundaries.
    pub fn text_lines(&self, id: NodeId) -> Vec<String> {
        let mut rendered = String::new();
        for descendant in self.descendants(id) {
            let Some(node) = self.node(descendant) else {
                continue;
            };
            if node.is_text() {
                rendered.push_str(&node.text);
            } else if BLOCK_TAGS.contains(&node.tag.as_str()) {
                rendered.push('\n');
            }
        }
        rendered
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use personafill_protocols::{PageSnapshot, SnapshotNode};

    use super::*;

    #[test]
    fn test_text_content_concatenates_in_document_order() {
        let mut b = PageSnapshot::builder("https://example.com");
        let label = b.push(b.body(), SnapshotNode::element("label"));
        b.push_text(label, "First ");
        let bold = b.push(label, SnapshotNode::element("b"));
        b.push_text(bold, "Name");
        let doc = Document::from_snapshot(b.build()).unwrap();

        assert_eq!(doc.text_content(label), "First Name");
        assert_eq!(doc.text_content(bold), "Name");
    }

    #[test]
    fn test_text_lines_split_on_blocks_and_newlines() {
        let mut b = PageSnapshot::builder("https://example.com");
        let root = b.push(b.body(), SnapshotNode::element("div"));
        let title = b.push(root, SnapshotNode::element("div"));
        b.push_text(title, "Phone number");
        let span = b.push(title, SnapshotNode::element("span"));
        b.push_text(span, " *");
        let hint = b.push(root, SnapshotNode::element("div"));
        b.push_text(hint, "  \n Your answer \n");
        let doc = Document::from_snapshot(b.build()).unwrap();

        assert_eq!(doc.text_lines(root), vec!["Phone number *", "Your answer"]);
    }
}
