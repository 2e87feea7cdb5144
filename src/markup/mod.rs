//! Markup parsing for editor content
//!
//! Content produced by client editors is HTML-like but not guaranteed to be
//! well formed. This module builds a lenient tree that can be selected,
//! rewritten in place and serialized back without disturbing the parts of
//! the content that were not rewritten.

mod dom;
pub mod entity;
pub mod lexer;
mod tree;

pub use dom::{Document, Element, Fragment, Node, NodeId, NodeKind};
pub use lexer::Attribute;
pub use crate::error::Span;
pub use tree::parse;
