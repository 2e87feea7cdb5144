//! Lexer for CSS-like selectors using logos

use logos::Logos;

use crate::error::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Whitespace around a comma belongs to the comma, so `Space` is only
    // ever a descendant combinator
    #[regex(r"[ \t\n\r]*,[ \t\n\r]*")]
    Comma,
    #[regex(r"[ \t\n\r]+")]
    Space,

    #[token(".")]
    Dot,
    #[token("#")]
    Hash,
    #[token("*")]
    Star,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("=")]
    Equals,

    #[regex(r"[a-zA-Z0-9_-]+", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); s[1..s.len()-1].to_string() })]
    #[regex(r"'[^']*'", |lex| { let s = lex.slice(); s[1..s.len()-1].to_string() })]
    Str(String),

    /// Placeholder for input the lexer does not recognise (`>`, `:`, ...)
    Invalid(char),
}

/// Lex a selector into tokens with spans.
///
/// Unrecognised characters become [`Token::Invalid`] so the grammar can
/// report them instead of silently dropping them.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input).spanned().map(move |(tok, span)| {
        let tok = tok.unwrap_or_else(|()| {
            Token::Invalid(input[span.clone()].chars().next().unwrap_or('?'))
        });
        (tok, span)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_compound_selector() {
        assert_eq!(
            tokens("img.__xe_image"),
            vec![
                Token::Ident("img".to_string()),
                Token::Dot,
                Token::Ident("__xe_image".to_string()),
            ]
        );
    }

    #[test]
    fn test_attribute_selector() {
        assert_eq!(
            tokens(r#"[data-id="42"]"#),
            vec![
                Token::BracketOpen,
                Token::Ident("data-id".to_string()),
                Token::Equals,
                Token::Str("42".to_string()),
                Token::BracketClose,
            ]
        );
    }

    #[test]
    fn test_comma_absorbs_whitespace() {
        assert_eq!(
            tokens("a , b c"),
            vec![
                Token::Ident("a".to_string()),
                Token::Comma,
                Token::Ident("b".to_string()),
                Token::Space,
                Token::Ident("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            tokens("a>b"),
            vec![
                Token::Ident("a".to_string()),
                Token::Invalid('>'),
                Token::Ident("b".to_string()),
            ]
        );
    }
}
