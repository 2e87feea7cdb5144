//! Lexer for editor markup using logos
//!
//! Every byte of the input belongs to exactly one token, which is what lets
//! the tree reproduce untouched content byte for byte. Lexer errors are
//! markup that never completes, such as `a<b` or `<!-- open`; the tree
//! keeps their bytes as text.

use logos::{Lexer, Logos};

use super::entity::decode;
use crate::error::Span;

/// A single `name="value"` pair from a start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lower-cased attribute name
    pub name: String,
    /// Entity-decoded value, `None` for bare boolean attributes
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A parsed start tag: `<img class="a" data-id=1 />`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
}

impl StartTag {
    /// Parse the full text of a start tag, including the angle brackets
    pub fn parse(slice: &str) -> Self {
        let inner = slice
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(slice);
        let name_len = inner
            .find(|c: char| c.is_ascii_whitespace() || c == '/')
            .unwrap_or(inner.len());
        let (name, rest) = inner.split_at(name_len);

        Self {
            name: name.to_ascii_lowercase(),
            attributes: parse_attributes(rest),
            self_closing: rest.trim_end().ends_with('/'),
        }
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Comments run to the first `-->`; an unterminated one is a lexer error
    #[token("<!--", comment)]
    Comment,

    // `<!DOCTYPE html>`, `<![CDATA[...]]>`
    #[regex(r"<![a-zA-Z\[][^>]*>")]
    Declaration,

    #[regex(r"<\?[^>]*>")]
    ProcessingInstruction,

    // The rest of the tag is scanned by hand so that quoted values may hold `>`
    #[regex(r"<[a-zA-Z]", start_tag)]
    StartTag(StartTag),

    #[regex(r"</[a-zA-Z][^>]*>", end_tag_name)]
    EndTag(String),

    #[regex(r"[^<]+")]
    Text,

    // A `<` that does not open a complete tag
    #[token("<")]
    Lt,
}

fn comment(lex: &mut Lexer<Token>) -> bool {
    match lex.remainder().find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            true
        }
        None => false,
    }
}

fn start_tag(lex: &mut Lexer<Token>) -> Option<StartTag> {
    let len = start_tag_extent(lex.remainder())?;
    lex.bump(len);
    Some(StartTag::parse(lex.slice()))
}

/// Length of the rest of a start tag, up to and including its `>`.
///
/// A quote opens a value only right after `=`, so `it's` in an unquoted
/// value is plain text. If a quoted value never closes, the tag ends at the
/// first `>`. A `<` before the tag ends means this was not a tag at all.
fn start_tag_extent(rest: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut last = 0u8;
    for (i, &b) in rest.as_bytes().iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => continue,
            None => match b {
                b'"' | b'\'' if last == b'=' => quote = Some(b),
                b'>' => return Some(i + 1),
                b'<' => return None,
                _ => {}
            },
        }
        if !b.is_ascii_whitespace() {
            last = b;
        }
    }

    let end = rest.find(|c| c == '<' || c == '>')?;
    (rest.as_bytes()[end] == b'>').then_some(end + 1)
}

fn end_tag_name(lex: &mut Lexer<Token>) -> String {
    let inner = &lex.slice()[2..lex.slice().len() - 1];
    inner
        .split(|c: char| c.is_ascii_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Split the interior of a start tag (everything after the tag name) into
/// attributes, following the HTML attribute-name and value rules.
fn parse_attributes(input: &str) -> Vec<Attribute> {
    let mut attributes: Vec<Attribute> = Vec::new();
    let bytes = input.as_bytes();
    let mut pos = 0;

    let skip_ws = |mut pos: usize| {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        pos
    };

    loop {
        while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'/' | b'=' | b'>')
        {
            pos += 1;
        }
        if pos == name_start {
            // A stray `=` with no name in front of it
            pos += 1;
            continue;
        }
        let name = input[name_start..pos].to_ascii_lowercase();

        let after_name = skip_ws(pos);
        let value = if after_name < bytes.len() && bytes[after_name] == b'=' {
            let value_start = skip_ws(after_name + 1);
            match bytes.get(value_start) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let body_start = value_start + 1;
                    let body_end = input[body_start..]
                        .find(quote as char)
                        .map(|i| body_start + i)
                        .unwrap_or(input.len());
                    pos = (body_end + 1).min(input.len());
                    Some(decode(&input[body_start..body_end]).into_owned())
                }
                Some(_) => {
                    let mut end = value_start;
                    while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
                        end += 1;
                    }
                    pos = end;
                    Some(decode(&input[value_start..end]).into_owned())
                }
                None => {
                    pos = value_start;
                    Some(String::new())
                }
            }
        } else {
            None
        };

        // First occurrence wins, as in browsers
        if !attributes.iter().any(|a| a.name == name) {
            attributes.push(Attribute::new(name, value));
        }
    }

    attributes
}

/// Lex input into tokens with spans, keeping lexer errors in the stream
pub fn lex(input: &str) -> impl Iterator<Item = (Result<Token, ()>, Span)> + '_ {
    Token::lexer(input).spanned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).filter_map(|(t, _)| t.ok()).collect()
    }

    #[test]
    fn test_text_and_tags() {
        let toks = tokens("<p>hello</p>");
        assert_eq!(toks.len(), 3);
        assert!(matches!(&toks[0], Token::StartTag(t) if t.name == "p"));
        assert_eq!(toks[1], Token::Text);
        assert_eq!(toks[2], Token::EndTag("p".to_string()));
    }

    #[test]
    fn test_spans_cover_input() {
        let input = r#"a <b class="x">c</b> <!-- d --> e < f"#;
        let mut expected_start = 0;
        for (_, span) in lex(input) {
            assert_eq!(span.start, expected_start);
            expected_start = span.end;
        }
        assert_eq!(expected_start, input.len());
    }

    #[test]
    fn test_start_tag_attributes() {
        let tag = StartTag::parse(r#"<IMG Class="__xe_image" data-id='7' alt=plain hidden>"#);
        assert_eq!(tag.name, "img");
        assert_eq!(
            tag.attributes,
            vec![
                Attribute::new("class", Some("__xe_image".to_string())),
                Attribute::new("data-id", Some("7".to_string())),
                Attribute::new("alt", Some("plain".to_string())),
                Attribute::new("hidden", None),
            ]
        );
        assert!(!tag.self_closing);
    }

    #[test]
    fn test_self_closing_tag() {
        let tag = StartTag::parse(r#"<img src="a.png" />"#);
        assert!(tag.self_closing);
        let tag = StartTag::parse("<br/>");
        assert_eq!(tag.name, "br");
        assert!(tag.self_closing);
        assert!(tag.attributes.is_empty());
    }

    #[test]
    fn test_quoted_value_with_angle_bracket() {
        let toks = tokens(r#"<span title="a > b">x</span>"#);
        match &toks[0] {
            Token::StartTag(tag) => {
                assert_eq!(tag.attributes[0].value.as_deref(), Some("a > b"));
            }
            other => panic!("expected start tag, got {:?}", other),
        }
    }

    #[test]
    fn test_attribute_entities_decoded() {
        let tag = StartTag::parse(r#"<a href="?a=1&amp;b=2">"#);
        assert_eq!(tag.attributes[0].value.as_deref(), Some("?a=1&b=2"));
    }

    #[test]
    fn test_duplicate_attribute_keeps_first() {
        let tag = StartTag::parse(r#"<span data-id="1" data-id="2">"#);
        assert_eq!(tag.attributes.len(), 1);
        assert_eq!(tag.attributes[0].value.as_deref(), Some("1"));
    }

    #[test]
    fn test_comment_and_declaration() {
        let toks = tokens("<!DOCTYPE html><!-- a <b> -->");
        assert_eq!(toks, vec![Token::Declaration, Token::Comment]);
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        let results: Vec<_> = lex("<!-- never closed").map(|(t, _)| t).collect();
        assert!(results[0].is_err());
    }

    #[test]
    fn test_end_tag_with_whitespace() {
        assert_eq!(tokens("</DIV >"), vec![Token::EndTag("div".to_string())]);
    }

    #[test]
    fn test_unquoted_apostrophe_in_value() {
        let toks = tokens("<p title=it's>x</p>");
        match &toks[0] {
            Token::StartTag(tag) => {
                assert_eq!(tag.attributes[0].value.as_deref(), Some("it's"));
            }
            other => panic!("expected start tag, got {:?}", other),
        }
        assert_eq!(toks.len(), 3);
    }

    #[test]
    fn test_unclosed_quote_ends_at_next_gt() {
        assert_eq!(start_tag_extent(r#"pan title="a>b</span>"#), Some(13));
    }

    #[test]
    fn test_incomplete_tags_are_lexer_errors() {
        assert_eq!(start_tag_extent("b then c"), None);
        assert_eq!(start_tag_extent("y <b>z"), None);
        let results: Vec<_> = lex("a<b c").map(|(t, span)| (t.is_ok(), span)).collect();
        assert_eq!(results, vec![(true, 0..1), (false, 1..3), (true, 3..5)]);
    }

    #[test]
    fn test_stray_less_than() {
        assert_eq!(tokens("1 < 2"), vec![Token::Text, Token::Lt, Token::Text]);
    }
}
