//! CSS-like selectors for locating inline entities in content
//!
//! Supports type, universal, class, id and attribute selectors, compound
//! selectors, the descendant combinator and comma-separated lists.

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::{ComplexSelector, CompoundSelector, SelectorList, SimpleSelector, TypeSelector};
pub use grammar::parse_selector;
