use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }

    pub fn eof(pos: usize) -> Self {
        Self::new(TokenKind::Eof, "", pos)
    }

    pub fn end(&self) -> usize {
        self.pos + self.text.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TokenKind {
    Equals,
    NotEquals,
    In,
    Less,
    LessEquals,
    GreaterEquals,
    Greater,
    LogicalAnd,
    LogicalOr,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Dot,
    Comma,
    Minus,
    Exclam,
    QuestionMark,
    Colon,
    Plus,
    Star,
    Slash,
    Percent,
    True,
    False,
    Null,
    Whitespace,
    Comment,
    Float,
    Int,
    Uint,
    String,
    Bytes,
    Identifier,
    Eof,
}

impl TokenKind {
    /// Fixed spelling for punctuation and keywords, `None` for kinds whose
    /// text varies.
    pub fn symbol(self) -> Option<&'static str> {
        let symbol = match self {
            TokenKind::Equals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::In => "in",
            TokenKind::Less => "<",
            TokenKind::LessEquals => "<=",
            TokenKind::GreaterEquals => ">=",
            TokenKind::Greater => ">",
            TokenKind::LogicalAnd => "&&",
            TokenKind::LogicalOr => "||",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Minus => "-",
            TokenKind::Exclam => "!",
            TokenKind::QuestionMark => "?",
            TokenKind::Colon => ":",
            TokenKind::Plus => "+",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            _ => return None,
        };
        Some(symbol)
    }

    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(symbol) = self.symbol() {
            return write!(f, "`{symbol}`");
        }
        let name = match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::Float => "double literal",
            TokenKind::Int => "int literal",
            TokenKind::Uint => "uint literal",
            TokenKind::String => "string literal",
            TokenKind::Bytes => "bytes literal",
            TokenKind::Identifier => "identifier",
            _ => "end of input",
        };
        f.write_str(name)
    }
}

/// Pull-based supply of tokens for the parser.
///
/// Implementations must be total: once the input is exhausted every call
/// yields an [`TokenKind::Eof`] token.
pub trait TokenSource {
    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// Looks `n` tokens past the current one without consuming anything.
    fn peek_nth(&self, n: usize) -> &Token;

    fn advance(&mut self) -> Token;

    /// Source offset of the current token.
    fn position(&self) -> usize {
        self.peek().pos
    }
}

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|token| !token.kind.is_trivia())
            .collect();
        match tokens.iter().position(|token| token.kind == TokenKind::Eof) {
            Some(eof) => tokens.truncate(eof + 1),
            None => {
                let end = tokens.last().map(Token::end).unwrap_or(0);
                tokens.push(Token::eof(end));
            }
        }
        Self { tokens, index: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.index - 1
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl TokenSource for TokenStream {
    fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.index + n).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.index].clone();
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        token
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
