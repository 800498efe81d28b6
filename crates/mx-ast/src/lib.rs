//! Block-level MDX syntax tree shared by the mx pipeline.
//!
//! Documents are modeled as a tagged sum over block kinds. Inline content is
//! never rewritten by any transformer, so markdown blocks keep their raw
//! source text and only the structures the transformers care about (fenced
//! code blocks and JSX flow elements) are fully decomposed.
//!
//! The tree is built fresh per document, mutated by the directive
//! transformers, serialized, and discarded. Nothing here persists.

mod jsx;

pub use jsx::{AttrValue, JsxAttribute, JsxElement};

/// Source position of a block (1-indexed start line).
///
/// Positions survive tree rewrites so that authoring errors can point at the
/// directive that caused them. Spliced-in content (partials, code samples)
/// carries the position of the directive it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// 1-indexed line of the block's first source line.
    pub line: usize,
}

impl Position {
    /// Create a position at the given 1-indexed line.
    #[must_use]
    pub fn new(line: usize) -> Self {
        Self { line }
    }
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language token from the info string (`js`, `sql`, ...).
    pub lang: Option<String>,
    /// Rest of the info string after the language token.
    pub meta: Option<String>,
    /// Code content without the fences, no trailing newline.
    pub value: String,
    /// Source position.
    pub position: Position,
}

/// A block-level node in an MDX document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Document root.
    Document {
        /// Top-level blocks.
        children: Vec<Node>,
    },
    /// ATX heading (`# ...`), raw text including the marker.
    Heading {
        /// Heading level (1-6).
        depth: u8,
        /// Raw source line.
        text: String,
        /// Source position.
        position: Position,
    },
    /// Paragraph, raw inline MDX kept verbatim.
    Paragraph {
        /// Raw source text.
        text: String,
        /// Source position.
        position: Position,
    },
    /// List block (bullet or ordered), raw lines kept verbatim.
    List {
        /// Raw source text.
        text: String,
        /// Source position.
        position: Position,
    },
    /// Fenced code block.
    Code(CodeBlock),
    /// MDX JSX flow element.
    Jsx(JsxElement),
    /// Any other block (block quote, table, thematic break), raw.
    Other {
        /// Raw source text.
        text: String,
        /// Source position.
        position: Position,
    },
}

impl Node {
    /// Create an empty document root.
    #[must_use]
    pub fn document(children: Vec<Node>) -> Self {
        Node::Document { children }
    }

    /// Child nodes, if this node kind has any.
    #[must_use]
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Document { children } => Some(children),
            Node::Jsx(el) => Some(&el.children),
            _ => None,
        }
    }

    /// Mutable child nodes, if this node kind has any.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children } => Some(children),
            Node::Jsx(el) => Some(&mut el.children),
            _ => None,
        }
    }

    /// Source position of this node.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Node::Document { .. } => Position::new(1),
            Node::Heading { position, .. }
            | Node::Paragraph { position, .. }
            | Node::List { position, .. }
            | Node::Other { position, .. } => *position,
            Node::Code(code) => code.position,
            Node::Jsx(el) => el.position,
        }
    }

    /// The JSX element, if this node is one.
    #[must_use]
    pub fn as_jsx(&self) -> Option<&JsxElement> {
        match self {
            Node::Jsx(el) => Some(el),
            _ => None,
        }
    }

    /// The JSX element with the given name, if this node is one.
    #[must_use]
    pub fn as_jsx_named(&self, name: &str) -> Option<&JsxElement> {
        self.as_jsx().filter(|el| el.name == name)
    }

    /// True for fenced code blocks.
    #[must_use]
    pub fn is_code(&self) -> bool {
        matches!(self, Node::Code(_))
    }

    /// Look up a node by its child-index path from this node.
    ///
    /// An empty path returns `self`. Returns `None` when an index is out of
    /// bounds or a path segment descends into a childless node.
    #[must_use]
    pub fn node_at_path(&self, path: &[usize]) -> Option<&Node> {
        let mut node = self;
        for &idx in path {
            node = node.children()?.get(idx)?;
        }
        Some(node)
    }

    /// Mutable variant of [`node_at_path`](Self::node_at_path).
    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = self;
        for &idx in path {
            node = node.children_mut()?.get_mut(idx)?;
        }
        Some(node)
    }

    /// Replace the node at `path` with `replacement`, returning the old node.
    ///
    /// One-for-one replacement never shifts sibling indices, so a batch of
    /// replacements computed against the same tree stays valid in any order.
    pub fn replace_at_path(&mut self, path: &[usize], replacement: Node) -> Option<Node> {
        let (last, parent_path) = path.split_last()?;
        let parent = self.node_at_path_mut(parent_path)?;
        let children = parent.children_mut()?;
        let slot = children.get_mut(*last)?;
        Some(std::mem::replace(slot, replacement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph(text: &str) -> Node {
        Node::Paragraph {
            text: text.to_owned(),
            position: Position::new(1),
        }
    }

    #[test]
    fn test_node_at_path() {
        let tree = Node::document(vec![
            paragraph("a"),
            Node::Jsx(JsxElement::new("Wrapper").with_children(vec![paragraph("b")])),
        ]);

        assert_eq!(tree.node_at_path(&[]), Some(&tree));
        assert_eq!(tree.node_at_path(&[0]), Some(&paragraph("a")));
        assert_eq!(tree.node_at_path(&[1, 0]), Some(&paragraph("b")));
        assert_eq!(tree.node_at_path(&[2]), None);
        assert_eq!(tree.node_at_path(&[0, 0]), None);
    }

    #[test]
    fn test_replace_at_path() {
        let mut tree = Node::document(vec![
            paragraph("a"),
            Node::Jsx(JsxElement::new("Wrapper").with_children(vec![paragraph("b")])),
        ]);

        let old = tree.replace_at_path(&[1, 0], paragraph("c"));
        assert_eq!(old, Some(paragraph("b")));
        assert_eq!(tree.node_at_path(&[1, 0]), Some(&paragraph("c")));
    }

    #[test]
    fn test_as_jsx_named() {
        let node = Node::Jsx(JsxElement::new("$Show"));
        assert!(node.as_jsx_named("$Show").is_some());
        assert!(node.as_jsx_named("$Partial").is_none());
    }
}
