//! Selector parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::*;
use super::lexer::{lex, Token};
use crate::error::SelectorError;

/// Parse a selector list such as `img.__xe_image[data-id], .post b`
pub fn parse_selector(input: &str) -> Result<SelectorList, SelectorError> {
    let input = input.trim();
    let len = input.len();

    let token_iter = lex(input).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    selector_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            errs.into_iter()
                .next()
                .map(SelectorError::from)
                .unwrap_or_else(|| SelectorError::Syntax {
                    span: 0..len,
                    message: "invalid selector".to_string(),
                    expected: vec![],
                })
        })
}

fn selector_parser<'a, I>() -> impl Parser<'a, I, SelectorList, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let name = select! {
        Token::Ident(s) => s,
    };

    let value = select! {
        Token::Ident(s) => s,
        Token::Str(s) => s,
    };

    let space = just(Token::Space).or_not();

    let class = just(Token::Dot)
        .ignore_then(name.clone())
        .map(SimpleSelector::Class);

    let id = just(Token::Hash)
        .ignore_then(name.clone())
        .map(SimpleSelector::Id);

    // [name] or [name="value"], whitespace allowed inside the brackets
    let attribute = space
        .clone()
        .ignore_then(name.clone())
        .then_ignore(space.clone())
        .then(
            just(Token::Equals)
                .ignore_then(space.clone())
                .ignore_then(value)
                .then_ignore(space.clone())
                .or_not(),
        )
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
        .map(|(name, value): (String, Option<String>)| SimpleSelector::Attribute {
            name: name.to_ascii_lowercase(),
            value,
        });

    let qualifier = choice((class, id, attribute));

    let type_selector = choice((
        just(Token::Star).to(TypeSelector::Universal),
        name.clone()
            .map(|n: String| TypeSelector::Named(n.to_ascii_lowercase())),
    ));

    let compound = type_selector
        .or_not()
        .then(qualifier.repeated().collect::<Vec<_>>())
        .try_map(|(type_selector, qualifiers), span| {
            if type_selector.is_none() && qualifiers.is_empty() {
                Err(Rich::custom(span, "expected a type, class, id or attribute selector"))
            } else {
                Ok(CompoundSelector {
                    type_selector,
                    qualifiers,
                })
            }
        });

    let complex = compound
        .separated_by(just(Token::Space))
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|compounds| ComplexSelector { compounds });

    complex
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(SelectorList)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_class_selector() {
        let list = parse_selector(".__xe_hashtag").unwrap();
        assert_eq!(
            list,
            SelectorList(vec![ComplexSelector {
                compounds: vec![CompoundSelector {
                    type_selector: None,
                    qualifiers: vec![SimpleSelector::Class("__xe_hashtag".to_string())],
                }],
            }])
        );
    }

    #[test]
    fn test_type_class_attribute() {
        let list = parse_selector("IMG.__xe_image[Data-Id]").unwrap();
        let compound = &list.0[0].compounds[0];
        assert_eq!(
            compound.type_selector,
            Some(TypeSelector::Named("img".to_string()))
        );
        assert_eq!(
            compound.qualifiers,
            vec![
                SimpleSelector::Class("__xe_image".to_string()),
                SimpleSelector::Attribute {
                    name: "data-id".to_string(),
                    value: None
                },
            ]
        );
    }

    #[test]
    fn test_attribute_value_with_spaces() {
        let list = parse_selector(r#"[ data-id = "7" ]"#).unwrap();
        assert_eq!(
            list.0[0].compounds[0].qualifiers,
            vec![SimpleSelector::Attribute {
                name: "data-id".to_string(),
                value: Some("7".to_string())
            }]
        );
    }

    #[test]
    fn test_list_and_descendants() {
        let list = parse_selector("  div .a , span  ").unwrap();
        assert_eq!(list.0.len(), 2);
        assert_eq!(list.0[0].compounds.len(), 2);
        assert_eq!(list.0[1].compounds.len(), 1);
    }

    #[test]
    fn test_empty_selector_is_error() {
        assert!(parse_selector("").is_err());
        assert!(parse_selector("   ").is_err());
    }

    #[test]
    fn test_trailing_comma_is_error() {
        assert!(parse_selector("a,").is_err());
    }

    #[test]
    fn test_child_combinator_is_error() {
        let err = parse_selector("div > p").unwrap_err();
        assert!(err.to_string().contains("selector error"));
    }

    #[test]
    fn test_pseudo_class_is_error() {
        let err = parse_selector("a:hover").unwrap_err();
        assert_eq!(err.span().start, 1);
    }

    #[test]
    fn test_error_format_shows_selector() {
        let err = parse_selector(".a..b").unwrap_err();
        let report = err.format(".a..b");
        assert!(report.contains("selector"));
    }
}
