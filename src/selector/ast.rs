//! Selector syntax tree and element matching

use crate::markup::{Document, Element, NodeId};

/// Type part of a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSelector {
    /// `*`
    Universal,
    /// `img`, stored lower-cased
    Named(String),
}

/// One condition inside a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `.name`
    Class(String),
    /// `#name`
    Id(String),
    /// `[name]` or `[name="value"]`
    Attribute { name: String, value: Option<String> },
}

/// A run of conditions on a single element: `img.__xe_image[data-id]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub type_selector: Option<TypeSelector>,
    pub qualifiers: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn matches_element(&self, el: &Element) -> bool {
        let type_ok = match &self.type_selector {
            None | Some(TypeSelector::Universal) => true,
            Some(TypeSelector::Named(name)) => el.name.eq_ignore_ascii_case(name),
        };
        type_ok
            && self.qualifiers.iter().all(|q| match q {
                SimpleSelector::Class(class) => el.classes().any(|c| c == class),
                SimpleSelector::Id(id) => el.attribute("id") == Some(id.as_str()),
                SimpleSelector::Attribute { name, value: None } => el.has_attribute(name),
                SimpleSelector::Attribute {
                    name,
                    value: Some(value),
                } => el.attribute(name) == Some(value.as_str()),
            })
    }
}

/// Compound selectors joined by descendant combinators: `div .x`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// Outermost ancestor first, the subject last
    pub compounds: Vec<CompoundSelector>,
}

impl ComplexSelector {
    pub fn matches(&self, doc: &Document<'_>, id: NodeId) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        let Some(el) = doc.element(id) else {
            return false;
        };
        if !subject.matches_element(el) {
            return false;
        }

        // Greedy right-to-left ancestor walk is exact for descendant-only chains
        let mut remaining = ancestors.iter().rev().peekable();
        let mut current = doc.parent(id);
        while let Some(wanted) = remaining.peek() {
            let Some(ancestor) = current else {
                return false;
            };
            if doc
                .element(ancestor)
                .is_some_and(|el| wanted.matches_element(el))
            {
                remaining.next();
            }
            current = doc.parent(ancestor);
        }
        true
    }
}

/// Comma-separated selector list; an element matches if any entry matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

impl SelectorList {
    pub fn matches(&self, doc: &Document<'_>, id: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(doc, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;
    use crate::selector::parse_selector;

    fn matched_text(html: &str, selector: &str) -> Vec<String> {
        let doc = parse(html);
        let selector = parse_selector(selector).unwrap();
        doc.select(&selector)
            .into_iter()
            .map(|id| doc.text(id))
            .collect()
    }

    #[test]
    fn test_class_among_several() {
        assert_eq!(
            matched_text(r#"<span class="a __xe_hashtag b">#x</span>"#, ".__xe_hashtag"),
            vec!["#x"]
        );
    }

    #[test]
    fn test_class_is_whole_token() {
        assert!(matched_text(r#"<span class="__xe_hashtags">x</span>"#, ".__xe_hashtag").is_empty());
    }

    #[test]
    fn test_type_and_class() {
        let html = r#"<span class="__xe_image">no</span><img class="__xe_image" data-id="1">"#;
        let doc = parse(html);
        let selector = parse_selector("img.__xe_image").unwrap();
        let matched = doc.select(&selector);
        assert_eq!(matched.len(), 1);
        assert_eq!(doc.attribute(matched[0], "data-id"), Some("1"));
    }

    #[test]
    fn test_type_is_case_insensitive() {
        assert_eq!(matched_text("<SPAN>x</SPAN>", "span"), vec!["x"]);
    }

    #[test]
    fn test_attribute_presence_and_value() {
        let html = r#"<b class="m" data-id="1">a</b><b class="m">b</b><b data-id="2">c</b>"#;
        assert_eq!(matched_text(html, ".m[data-id]"), vec!["a"]);
        assert_eq!(matched_text(html, r#"[data-id="2"]"#), vec!["c"]);
    }

    #[test]
    fn test_id_selector() {
        assert_eq!(matched_text(r#"<p id="main">x</p><p>y</p>"#, "#main"), vec!["x"]);
    }

    #[test]
    fn test_descendant_combinator() {
        let html = r#"<div class="post"><p><b>in</b></p></div><b>out</b>"#;
        assert_eq!(matched_text(html, ".post b"), vec!["in"]);
        assert_eq!(matched_text(html, "div p b"), vec!["in"]);
        assert!(matched_text(html, "p div b").is_empty());
    }

    #[test]
    fn test_selector_list() {
        let html = "<b>1</b><i>2</i><u>3</u>";
        assert_eq!(matched_text(html, "b, u"), vec!["1", "3"]);
    }

    #[test]
    fn test_universal() {
        assert_eq!(matched_text("<b>1</b><i>2</i>", "*").len(), 2);
    }
}
