//! Error types for selector parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors raised while parsing a selector such as `img.__xe_image`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("selector error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl SelectorError {
    pub fn span(&self) -> &Span {
        match self {
            Self::Syntax { span, .. } => span,
        }
    }

    /// Format the error with the selector text as context
    pub fn format(&self, selector: &str) -> String {
        match self {
            Self::Syntax {
                span,
                message,
                expected,
            } => report(selector, "selector", span, message, expected),
        }
    }
}

fn report(source: &str, filename: &str, span: &Span, message: &str, expected: &[String]) -> String {
    let expected_str = if expected.is_empty() {
        String::new()
    } else {
        format!("\nExpected: {}", expected.join(", "))
    };

    let mut buf = Vec::new();
    let written = Report::build(ReportKind::Error, filename, span.start)
        .with_message(message)
        .with_label(
            Label::new((filename, span.clone()))
                .with_message(format!("{}{}", message, expected_str))
                .with_color(Color::Red),
        )
        .finish()
        .write((filename, Source::from(source)), &mut buf);

    match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => format!("{}: {} at {:?}", filename, message, span),
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::selector::lexer::Token>> for SelectorError {
    fn from(err: chumsky::error::Rich<'a, crate::selector::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of selector".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of selector".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        SelectorError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a selector token for human-readable error messages
fn format_token(tok: &crate::selector::lexer::Token) -> String {
    use crate::selector::lexer::Token;
    match tok {
        Token::Ident(s) => format!("name '{}'", s),
        Token::Str(s) => format!("string \"{}\"", s),
        Token::Dot => "'.'".to_string(),
        Token::Hash => "'#'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::Equals => "'='".to_string(),
        Token::Comma => "','".to_string(),
        Token::Space => "whitespace".to_string(),
        Token::Invalid(c) => format!("unsupported character '{}'", c),
    }
}
