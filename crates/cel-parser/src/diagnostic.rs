use crate::lexer::LexError;
use crate::literal::LiteralError;
use crate::token::{Token, TokenKind};
use serde::Serialize;
use std::fmt;

/// One alternative the parser would have accepted at a failure point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Expectation {
    Token(TokenKind),
    Expression,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Token(kind) => write!(f, "{kind}"),
            Expectation::Expression => f.write_str("expression"),
        }
    }
}

/// Ordered, de-duplicated set of expectations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Expected(Vec<Expectation>);

impl Expected {
    pub fn new(items: impl IntoIterator<Item = Expectation>) -> Self {
        let mut items: Vec<Expectation> = items.into_iter().collect();
        items.sort();
        items.dedup();
        Self(items)
    }

    pub fn token(kind: TokenKind) -> Self {
        Self(vec![Expectation::Token(kind)])
    }

    pub fn tokens(kinds: impl IntoIterator<Item = TokenKind>) -> Self {
        Self::new(kinds.into_iter().map(Expectation::Token))
    }

    pub fn expression() -> Self {
        Self(vec![Expectation::Expression])
    }

    pub fn contains(&self, item: Expectation) -> bool {
        self.0.contains(&item)
    }

    pub fn items(&self) -> &[Expectation] {
        &self.0
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("nothing"),
            [single] => write!(f, "{single}"),
            items => {
                f.write_str("one of ")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    #[error("lexical error at {pos}: {message}")]
    Lexical { message: String, pos: usize },
    #[error("syntax error at {pos}: expected {expected}, found {found}")]
    Syntax {
        pos: usize,
        found: String,
        expected: Expected,
    },
    #[error("unexpected end of input at {pos}: expected {expected}")]
    Incomplete { pos: usize, expected: Expected },
    #[error("recursion limit of {limit} exceeded at {pos}")]
    RecursionLimitExceeded { pos: usize, limit: usize },
    #[error("unexpected trailing input at {pos}: {found}")]
    TrailingInput { pos: usize, found: String },
}

impl ParseError {
    /// Failure at `token` where one of `expected` was required; end of
    /// input becomes [`ParseError::Incomplete`].
    pub fn unexpected(token: &Token, expected: Expected) -> Self {
        if token.kind == TokenKind::Eof {
            ParseError::Incomplete {
                pos: token.pos,
                expected,
            }
        } else {
            ParseError::Syntax {
                pos: token.pos,
                found: describe(token),
                expected,
            }
        }
    }

    pub fn trailing(token: &Token) -> Self {
        ParseError::TrailingInput {
            pos: token.pos,
            found: describe(token),
        }
    }

    pub fn literal(error: LiteralError, token: &Token) -> Self {
        ParseError::Lexical {
            message: error.to_string(),
            pos: token.pos,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            ParseError::Lexical { pos, .. }
            | ParseError::Syntax { pos, .. }
            | ParseError::Incomplete { pos, .. }
            | ParseError::RecursionLimitExceeded { pos, .. }
            | ParseError::TrailingInput { pos, .. } => *pos,
        }
    }

    pub fn expected(&self) -> Option<&Expected> {
        match self {
            ParseError::Syntax { expected, .. } | ParseError::Incomplete { expected, .. } => {
                Some(expected)
            }
            _ => None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::RecursionLimitExceeded { .. })
    }

    /// Renders `line:column: message` followed by the offending source line
    /// and a caret under the failure position.
    pub fn render(&self, source: &str) -> String {
        let pos = self.position().min(source.len());
        let line_start = source[..pos].rfind('\n').map_or(0, |index| index + 1);
        let line_end = source[pos..].find('\n').map_or(source.len(), |index| pos + index);
        let line_number = source[..line_start].matches('\n').count() + 1;
        let column = source[line_start..pos].chars().count();
        format!(
            "{line_number}:{}: {self}\n{}\n{}^",
            column + 1,
            &source[line_start..line_end],
            " ".repeat(column)
        )
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::Lexical {
            message: error.to_string(),
            pos: error.pos(),
        }
    }
}

fn describe(token: &Token) -> String {
    match token.kind.symbol() {
        Some(_) => token.kind.to_string(),
        None => format!("{} `{}`", token.kind, token.text),
    }
}

/// Collects diagnostics for a single parse.
#[derive(Debug, Default)]
pub struct Reporter {
    errors: Vec<ParseError>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: ParseError) {
        log::debug!("recorded parse error: {error}");
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Diagnostics in source order.
    pub fn into_errors(mut self) -> Vec<ParseError> {
        self.errors.sort_by_key(ParseError::position);
        self.errors
    }
}

#[cfg(test)]
#[path = "diagnostic_test.rs"]
mod tests;
