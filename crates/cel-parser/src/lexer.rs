use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, pos: usize },
    #[error("unterminated string")]
    UnterminatedString { pos: usize },
}

impl LexError {
    pub fn pos(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { pos, .. } | LexError::UnterminatedString { pos } => *pos,
        }
    }
}

/// Splits `input` into tokens terminated by [`TokenKind::Eof`].
///
/// Whitespace and `//` comments are dropped. Literal tokens keep their raw
/// text (quotes, prefixes and suffixes included); decoding happens in the
/// parser. Offsets are byte offsets into `input`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let bytes = input.as_bytes();
    let mut index = 0usize;
    let mut tokens = Vec::new();

    while index < bytes.len() {
        let byte = bytes[index];
        if matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0c) {
            index += 1;
            continue;
        }

        if byte == b'/' && bytes.get(index + 1) == Some(&b'/') {
            while index < bytes.len() && bytes[index] != b'\n' {
                index += 1;
            }
            continue;
        }

        if let Some(prefix_len) = string_prefix_len(bytes, index) {
            tokens.push(consume_string(input, &mut index, prefix_len)?);
            continue;
        }

        if byte.is_ascii_alphabetic() || byte == b'_' {
            tokens.push(consume_identifier(input, &mut index));
            continue;
        }

        if byte.is_ascii_digit() || (byte == b'.' && next_is_digit(bytes, index)) {
            tokens.push(consume_number(input, &mut index));
            continue;
        }

        let token = tokenize_symbol(input, &mut index)?;
        tokens.push(token);
    }

    tokens.push(Token::eof(input.len()));
    Ok(tokens)
}

fn next_is_digit(bytes: &[u8], index: usize) -> bool {
    bytes.get(index + 1).is_some_and(u8::is_ascii_digit)
}

/// Length of an `r`/`b` prefix (zero, one or one of each) that opens a
/// string literal at `index`, or `None` when no string starts here.
fn string_prefix_len(bytes: &[u8], index: usize) -> Option<usize> {
    let mut raw = false;
    let mut binary = false;
    let mut cursor = index;
    while let Some(&byte) = bytes.get(cursor) {
        match byte {
            b'r' | b'R' if !raw => raw = true,
            b'b' | b'B' if !binary => binary = true,
            b'\'' | b'"' => return Some(cursor - index),
            _ => return None,
        }
        cursor += 1;
    }
    None
}

fn consume_identifier(input: &str, index: &mut usize) -> Token {
    let bytes = input.as_bytes();
    let start = *index;
    *index += 1;
    while *index < bytes.len() && (bytes[*index].is_ascii_alphanumeric() || bytes[*index] == b'_') {
        *index += 1;
    }
    let text = &input[start..*index];
    let kind = match text {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "in" => TokenKind::In,
        _ => TokenKind::Identifier,
    };
    Token::new(kind, text, start)
}

fn consume_number(input: &str, index: &mut usize) -> Token {
    let bytes = input.as_bytes();
    let start = *index;

    let is_hex = bytes[start] == b'0'
        && matches!(bytes.get(start + 1), Some(b'x' | b'X'))
        && bytes.get(start + 2).is_some_and(u8::is_ascii_hexdigit);
    if is_hex {
        *index += 2;
        while *index < bytes.len() && bytes[*index].is_ascii_hexdigit() {
            *index += 1;
        }
        let kind = integer_suffix(bytes, index);
        return Token::new(kind, &input[start..*index], start);
    }

    let mut is_float = false;
    skip_digits(bytes, index);
    if *index < bytes.len() && bytes[*index] == b'.' && next_is_digit(bytes, *index) {
        is_float = true;
        *index += 1;
        skip_digits(bytes, index);
    }
    if matches!(bytes.get(*index), Some(b'e' | b'E')) {
        let mut cursor = *index + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        if bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            is_float = true;
            *index = cursor;
            skip_digits(bytes, index);
        }
    }

    let kind = if is_float {
        TokenKind::Float
    } else {
        integer_suffix(bytes, index)
    };
    Token::new(kind, &input[start..*index], start)
}

fn skip_digits(bytes: &[u8], index: &mut usize) {
    while *index < bytes.len() && bytes[*index].is_ascii_digit() {
        *index += 1;
    }
}

fn integer_suffix(bytes: &[u8], index: &mut usize) -> TokenKind {
    if matches!(bytes.get(*index), Some(b'u' | b'U')) {
        *index += 1;
        TokenKind::Uint
    } else {
        TokenKind::Int
    }
}

fn consume_string(input: &str, index: &mut usize, prefix_len: usize) -> Result<Token, LexError> {
    let bytes = input.as_bytes();
    let start = *index;
    let prefix = &input[start..start + prefix_len];
    let raw = prefix.contains(['r', 'R']);
    let kind = if prefix.contains(['b', 'B']) {
        TokenKind::Bytes
    } else {
        TokenKind::String
    };

    let quote = bytes[start + prefix_len];
    let triple = bytes.get(start + prefix_len + 1) == Some(&quote)
        && bytes.get(start + prefix_len + 2) == Some(&quote);
    *index = start + prefix_len + if triple { 3 } else { 1 };

    loop {
        let Some(&current) = bytes.get(*index) else {
            return Err(LexError::UnterminatedString { pos: start });
        };
        if current == b'\\' && !raw {
            *index += 2;
            continue;
        }
        if current == quote {
            if !triple {
                *index += 1;
                break;
            }
            if bytes.get(*index + 1) == Some(&quote) && bytes.get(*index + 2) == Some(&quote) {
                *index += 3;
                break;
            }
        }
        if !triple && matches!(current, b'\n' | b'\r') {
            return Err(LexError::UnterminatedString { pos: start });
        }
        *index += 1;
    }

    Ok(Token::new(kind, &input[start..*index], start))
}

fn tokenize_symbol(input: &str, index: &mut usize) -> Result<Token, LexError> {
    let pos = *index;
    let ch = input[pos..].chars().next().unwrap_or('\0');
    if let Some(token) = two_char_op(input.as_bytes(), ch, pos)? {
        *index += 2;
        return Ok(token);
    }
    let token = one_char_op(ch, pos).ok_or(LexError::UnexpectedCharacter { ch, pos })?;
    *index += 1;
    Ok(token)
}

fn two_char_op(bytes: &[u8], ch: char, pos: usize) -> Result<Option<Token>, LexError> {
    let kind = match ch {
        '!' if matches_next(bytes, pos, b'=') => TokenKind::NotEquals,
        '=' if matches_next(bytes, pos, b'=') => TokenKind::Equals,
        '<' if matches_next(bytes, pos, b'=') => TokenKind::LessEquals,
        '>' if matches_next(bytes, pos, b'=') => TokenKind::GreaterEquals,
        '&' if matches_next(bytes, pos, b'&') => TokenKind::LogicalAnd,
        '|' if matches_next(bytes, pos, b'|') => TokenKind::LogicalOr,
        '=' | '&' | '|' => return Err(LexError::UnexpectedCharacter { ch, pos }),
        _ => return Ok(None),
    };
    Ok(kind.symbol().map(|text| Token::new(kind, text, pos)))
}

fn one_char_op(ch: char, pos: usize) -> Option<Token> {
    let kind = match ch {
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        ',' => TokenKind::Comma,
        '.' => TokenKind::Dot,
        '?' => TokenKind::QuestionMark,
        ':' => TokenKind::Colon,
        '!' => TokenKind::Exclam,
        '<' => TokenKind::Less,
        '>' => TokenKind::Greater,
        _ => return None,
    };
    Some(Token::new(kind, ch.to_string(), pos))
}

fn matches_next(bytes: &[u8], index: usize, expected: u8) -> bool {
    bytes.get(index + 1).copied() == Some(expected)
}

#[cfg(test)]
#[path = "lexer_test.rs"]
mod tests;
