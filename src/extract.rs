//! Inline entity extraction
//!
//! An inline entity is a node in editor content tagged with a marker class:
//! a hashtag, a mention or an image reference.

use crate::markup::{self, Document, NodeId};
use crate::selector::{parse_selector, SelectorList};
use crate::EditorError;

/// Data extracted from one matched node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineEntity {
    /// The node's markup exactly as it appears in the content
    pub raw_markup: String,
    pub inner_markup: String,
    /// Decoded text content
    pub text: String,
    /// Requested attributes in request order; `None` when absent
    pub attributes: Vec<(String, Option<String>)>,
}

impl InlineEntity {
    /// Build the entity for one node of a document
    pub fn from_node(doc: &Document<'_>, id: NodeId, attribute_names: &[&str]) -> Self {
        let attributes = attribute_names
            .iter()
            .map(|name| {
                let key = name.to_ascii_lowercase();
                let value = doc.attribute(id, &key).map(str::to_string);
                (name.to_string(), value)
            })
            .collect();

        Self {
            raw_markup: doc.outer_html(id),
            inner_markup: doc.inner_html(id),
            text: doc.text(id),
            attributes,
        }
    }

    /// Value of a requested attribute, `None` if it was absent or not requested
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }
}

impl<'src> Document<'src> {
    /// Select nodes and extract their entity data, keeping each node's id
    /// so that it can be rewritten in place
    pub fn entities(
        &self,
        selector: &SelectorList,
        attribute_names: &[&str],
    ) -> Vec<(NodeId, InlineEntity)> {
        self.select(selector)
            .into_iter()
            .map(|id| (id, InlineEntity::from_node(self, id, attribute_names)))
            .collect()
    }
}

/// Extract every node of `content` matching `selector`, in document order.
///
/// Pure: the content is only read. A missing attribute is reported as
/// `None`, never as an error.
pub fn extract(
    content: &str,
    selector: &str,
    attribute_names: &[&str],
) -> Result<Vec<InlineEntity>, EditorError> {
    let selector_list = parse_selector(selector).map_err(|source| EditorError::Selector {
        selector: selector.to_string(),
        source,
    })?;
    let doc = markup::parse(content);

    Ok(doc
        .entities(&selector_list, attribute_names)
        .into_iter()
        .map(|(_, entity)| entity)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_hashtag() {
        let content = r#"<p>Hi <span class="__xe_hashtag">#rust</span>!</p>"#;
        let entities = extract(content, ".__xe_hashtag", &[]).unwrap();
        assert_eq!(
            entities,
            vec![InlineEntity {
                raw_markup: r#"<span class="__xe_hashtag">#rust</span>"#.to_string(),
                inner_markup: "#rust".to_string(),
                text: "#rust".to_string(),
                attributes: vec![],
            }]
        );
    }

    #[test]
    fn test_raw_markup_is_substring_of_content() {
        let content = r#"x <IMG  class='__xe_image'   data-id=3 > y"#;
        let entities = extract(content, "img.__xe_image", &["data-id"]).unwrap();
        assert_eq!(entities.len(), 1);
        assert!(content.contains(&entities[0].raw_markup));
        assert_eq!(entities[0].attribute("data-id"), Some("3"));
    }

    #[test]
    fn test_missing_attribute_is_absent() {
        let content = r#"<span class="__xe_mention">@bob</span>"#;
        let entities = extract(content, ".__xe_mention", &["data-id", "title"]).unwrap();
        assert_eq!(
            entities[0].attributes,
            vec![("data-id".to_string(), None), ("title".to_string(), None)]
        );
    }

    #[test]
    fn test_document_order() {
        let content = r#"<b class="m" data-id="2">b</b><i class="m" data-id="1">a</i>"#;
        let ids: Vec<_> = extract(content, ".m", &["data-id"])
            .unwrap()
            .into_iter()
            .map(|e| e.attribute("data-id").unwrap_or_default().to_string())
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_invalid_selector() {
        let err = extract("<b>x</b>", "b > i", &[]).unwrap_err();
        assert!(matches!(err, EditorError::Selector { .. }));
    }

    #[test]
    fn test_incomplete_markup_before_entity() {
        let entities = extract(r#"if a<b <span class="x">y</span> <b class="#, ".x", &[]).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].raw_markup, r#"<span class="x">y</span>"#);
    }
}
