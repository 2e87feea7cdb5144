//! Arena document tree for editor markup
//!
//! Nodes are addressed by [`NodeId`], so a rewrite replaces exactly the node
//! it matched, never some other node that happens to serialize the same way.

use super::entity::decode;
use super::lexer::Attribute;
use crate::error::Span;
use crate::selector::SelectorList;

/// Stable handle to a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// An element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lower-cased tag name
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Span of the start tag in the source
    pub start_tag: Span,
    /// Span of the end tag, `None` for void, self-closing or unclosed elements
    pub end_tag: Option<Span>,
    pub self_closing: bool,
}

impl Element {
    /// Look up an attribute value by (lower-cased) name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_deref())
    }

    /// Check if an attribute is present, with or without a value
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Iterate the whitespace-separated tokens of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }
}

/// Markup inserted by a rewrite, serialized verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub html: String,
    /// Text content the fragment contributes to its ancestors
    pub text: String,
}

impl Fragment {
    pub fn new(html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    /// Character data, entity-encoded as written
    Text(Span),
    /// Comments, declarations and unmatched end tags
    Raw(Span),
    Fragment(Fragment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A parsed content document
#[derive(Debug, Clone)]
pub struct Document<'src> {
    source: &'src str,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl<'src> Document<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Append a node under `parent` (or at the top level) and return its id
    pub(crate) fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// The source text this document was parsed from
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Top-level nodes in document order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attribute(name))
    }

    /// All nodes reachable from the roots, in document order
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Elements matching `selector`, in document order.
    ///
    /// Fragments are never matched, so markup produced by an earlier rewrite
    /// is invisible to later selections.
    pub fn select(&self, selector: &SelectorList) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    /// Replace a node and its subtree with rewritten markup
    pub fn replace(&mut self, id: NodeId, fragment: Fragment) {
        let node = &mut self.nodes[id.0];
        node.kind = NodeKind::Fragment(fragment);
        node.children.clear();
    }

    /// Serialized markup of the node including its own tags
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialized markup of the node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in &self.nodes[id.0].children {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Decoded text content of the node and its descendants
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_text(id, &mut out);
        out
    }

    /// Serialize the whole document.
    ///
    /// Nodes that were not replaced are written back from their source spans,
    /// so an untouched document serializes to exactly its input.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for &id in &self.roots {
            self.write_node(id, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Element(el) => {
                out.push_str(&self.source[el.start_tag.clone()]);
                for &child in &node.children {
                    self.write_node(child, out);
                }
                if let Some(end) = &el.end_tag {
                    out.push_str(&self.source[end.clone()]);
                }
            }
            NodeKind::Text(span) | NodeKind::Raw(span) => {
                out.push_str(&self.source[span.clone()]);
            }
            NodeKind::Fragment(fragment) => out.push_str(&fragment.html),
        }
    }

    fn write_text(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Element(_) => {
                for &child in &node.children {
                    self.write_text(child, out);
                }
            }
            NodeKind::Text(span) => out.push_str(&decode(&self.source[span.clone()])),
            NodeKind::Raw(_) => {}
            NodeKind::Fragment(fragment) => out.push_str(&fragment.text),
        }
    }
}
