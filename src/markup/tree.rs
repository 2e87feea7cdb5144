//! Tree construction from the markup token stream

use logos::Logos;

use super::dom::{Document, Element, NodeId, NodeKind};
use super::lexer::Token;

/// Elements that never have content
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is taken verbatim up to the matching end tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Parse editor content into a document tree
///
/// Parsing never fails: unknown end tags are kept verbatim, unclosed
/// elements are closed at the end of input, and markup that never
/// completes (`a<b`, `<!-- open`) stays in the document as text.
pub fn parse(source: &str) -> Document<'_> {
    let mut doc = Document::new(source);
    let mut open: Vec<NodeId> = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        let parent = open.last().copied();

        let token = match token {
            Ok(token) => token,
            Err(()) => {
                doc.push(NodeKind::Text(span), parent);
                continue;
            }
        };

        match token {
            Token::Text | Token::Lt => {
                doc.push(NodeKind::Text(span), parent);
            }
            Token::Comment | Token::Declaration | Token::ProcessingInstruction => {
                doc.push(NodeKind::Raw(span), parent);
            }
            Token::StartTag(tag) => {
                let is_void = VOID_ELEMENTS.contains(&tag.name.as_str());
                let is_raw_text = RAW_TEXT_ELEMENTS.contains(&tag.name.as_str());
                let self_closing = tag.self_closing;
                let name = tag.name.clone();

                let id = doc.push(
                    NodeKind::Element(Element {
                        name: tag.name,
                        attributes: tag.attributes,
                        start_tag: span.clone(),
                        end_tag: None,
                        self_closing,
                    }),
                    parent,
                );

                if is_void || self_closing {
                    continue;
                }

                if is_raw_text {
                    let (text_len, end_len) = raw_text_extent(lexer.remainder(), &name);
                    if text_len > 0 {
                        doc.push(NodeKind::Text(span.end..span.end + text_len), Some(id));
                    }
                    if end_len > 0 {
                        let end_start = span.end + text_len;
                        if let Some(el) = doc.element_mut(id) {
                            el.end_tag = Some(end_start..end_start + end_len);
                        }
                    }
                    lexer.bump(text_len + end_len);
                    continue;
                }

                open.push(id);
            }
            Token::EndTag(name) => {
                let position = open.iter().rposition(|&id| {
                    doc.element(id).is_some_and(|el| el.name == name)
                });
                match position {
                    Some(index) => {
                        let id = open[index];
                        open.truncate(index);
                        if let Some(el) = doc.element_mut(id) {
                            el.end_tag = Some(span);
                        }
                    }
                    None => {
                        doc.push(NodeKind::Raw(span), parent);
                    }
                }
            }
        }
    }

    doc
}

/// Length of the raw text content and of the closing tag that ends it.
///
/// Without a closing tag the content runs to the end of input.
fn raw_text_extent(remainder: &str, name: &str) -> (usize, usize) {
    let lowered = remainder.to_ascii_lowercase();
    let needle = format!("</{}", name);
    let mut from = 0;
    while let Some(found) = lowered[from..].find(&needle) {
        let start = from + found;
        let after = start + needle.len();
        let boundary = lowered[after..]
            .chars()
            .next()
            .map_or(true, |c| c.is_ascii_whitespace() || c == '>' || c == '/');
        if boundary {
            if let Some(close) = lowered[after..].find('>') {
                return (start, after + close + 1 - start);
            }
            break;
        }
        from = after;
    }
    (remainder.len(), 0)
}
