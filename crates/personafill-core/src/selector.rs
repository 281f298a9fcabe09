//! Minimal CSS selector engine over a [`Document`].
//!
//! Supported: type and universal selectors, `.class`, `#id`, attribute
//! selectors (`[a]`, `[a=v]`, `[a~=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`), the
//! descendant and child combinators, and comma-separated lists. Pseudo-classes
//! are rejected at parse time.

use std::fmt;

use personafill_protocols::{DiscoveryError, NodeId, SnapshotNode};

use crate::dom::Document;

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq)]
struct Complex {
    /// Compounds left to right; the combinator links a compound to the previous one.
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeTest>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttributeTest {
    name: String,
    op: AttributeOp,
}

#[derive(Debug, Clone, PartialEq)]
enum AttributeOp {
    Exists,
    Equals(String),
    Includes(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
}

impl AttributeOp {
    fn test(&self, actual: &str) -> bool {
        match self {
            AttributeOp::Exists => true,
            AttributeOp::Equals(v) => actual == v,
            AttributeOp::Includes(v) => actual.split_whitespace().any(|word| word == v),
            AttributeOp::Prefix(v) => !v.is_empty() && actual.starts_with(v.as_str()),
            AttributeOp::Suffix(v) => !v.is_empty() && actual.ends_with(v.as_str()),
            AttributeOp::Substring(v) => !v.is_empty() && actual.contains(v.as_str()),
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.ids.is_empty()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }

    fn matches(&self, node: &SnapshotNode) -> bool {
        if !node.is_element() {
            return false;
        }
        if let Some(tag) = &self.tag {
            if tag != "*" && *tag != node.tag {
                return false;
            }
        }
        if !self.ids.iter().all(|id| node.attr("id") == Some(id.as_str())) {
            return false;
        }
        if !self
            .classes
            .iter()
            .all(|class| node.classes().any(|c| c == class))
        {
            return false;
        }
        self.attributes
            .iter()
            .all(|test| node.attr(&test.name).is_some_and(|v| test.op.test(v)))
    }
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(source: &str) -> Result<Self, DiscoveryError> {
        let mut alternatives = Vec::new();
        for part in split_top_level(source) {
            let part = part.trim();
            if part.is_empty() {
                return Err(error(source, "empty selector in list"));
            }
            alternatives.push(Parser::new(source, part).complex()?);
        }
        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `node` matches any alternative.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex_matches(doc, &complex.parts, node))
    }

    /// All matching elements in document order.
    pub fn select_all(&self, doc: &Document) -> Vec<NodeId> {
        doc.elements().filter(|id| self.matches(doc, *id)).collect()
    }

    /// Matching descendants of `scope` in document order, excluding `scope`.
    pub fn select_within(&self, doc: &Document, scope: NodeId) -> Vec<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .filter(|id| self.matches(doc, *id))
            .collect()
    }

    /// First matching descendant of `scope`.
    pub fn select_first_within(&self, doc: &Document, scope: NodeId) -> Option<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .find(|id| self.matches(doc, *id))
    }

    /// Whether any element in the document matches.
    pub fn matches_any(&self, doc: &Document) -> bool {
        doc.elements().any(|id| self.matches(doc, id))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Match the compounds right to left, backtracking over descendant combinators.
fn complex_matches(doc: &Document, parts: &[(Combinator, Compound)], node: NodeId) -> bool {
    let Some(((combinator, compound), rest)) = parts.split_last() else {
        return true;
    };
    let Some(element) = doc.element(node) else {
        return false;
    };
    if !compound.matches(element) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    match combinator {
        Combinator::Child => doc
            .parent(node)
            .is_some_and(|parent| complex_matches(doc, rest, parent)),
        Combinator::Descendant => {
            let mut current = doc.parent(node);
            while let Some(ancestor) = current {
                if complex_matches(doc, rest, ancestor) {
                    return true;
                }
                current = doc.parent(ancestor);
            }
            false
        }
    }
}

fn error(selector: &str, message: impl Into<String>) -> DiscoveryError {
    DiscoveryError::Selector {
        selector: selector.to_string(),
        message: message.into(),
    }
}

/// Split on commas outside brackets and quotes.
fn split_top_level(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, part: &str) -> Self {
        Self {
            source,
            chars: part.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn complex(&mut self) -> Result<Complex, DiscoveryError> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            let compound = self.compound()?;
            if compound.is_empty() {
                return Err(error(self.source, "expected a simple selector"));
            }
            parts.push((combinator, compound));

            let had_space = self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    combinator = Combinator::Child;
                }
                Some(_) if had_space => combinator = Combinator::Descendant,
                Some(c) => {
                    return Err(error(self.source, format!("unexpected character '{}'", c)));
                }
            }
        }
        Ok(Complex { parts })
    }

    fn compound(&mut self) -> Result<Compound, DiscoveryError> {
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.pos += 1;
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('#') => {
                    self.pos += 1;
                    compound.ids.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attributes.push(self.attribute()?);
                }
                Some(':') => {
                    return Err(error(self.source, "pseudo-classes are not supported"));
                }
                _ => break,
            }
        }
        Ok(compound)
    }

    fn ident(&mut self) -> Result<String, DiscoveryError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(error(self.source, "expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<AttributeTest, DiscoveryError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op_char = self.peek();
        let op: fn(String) -> AttributeOp = match op_char {
            Some(']') => {
                self.pos += 1;
                return Ok(AttributeTest {
                    name,
                    op: AttributeOp::Exists,
                });
            }
            Some('=') => AttributeOp::Equals,
            Some('~') => AttributeOp::Includes,
            Some('^') => AttributeOp::Prefix,
            Some('$') => AttributeOp::Suffix,
            Some('*') => AttributeOp::Substring,
            None => return Err(error(self.source, "unterminated attribute selector")),
            Some(c) => {
                return Err(error(self.source, format!("unexpected '{}' in attribute", c)));
            }
        };
        self.pos += 1;
        if op_char != Some('=') {
            if self.peek() != Some('=') {
                return Err(error(self.source, "expected '=' in attribute selector"));
            }
            self.pos += 1;
        }
        self.skip_whitespace();
        let value = self.attribute_value()?;
        self.skip_whitespace();
        if self.peek() != Some(']') {
            return Err(error(self.source, "unterminated attribute selector"));
        }
        self.pos += 1;
        Ok(AttributeTest {
            name,
            op: op(value),
        })
    }

    fn attribute_value(&mut self) -> Result<String, DiscoveryError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(error(self.source, "unterminated string"));
                }
                let value = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            _ => self.ident(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
