//! Conversion of raw literal token text into values.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("invalid int literal `{0}`")]
    InvalidInt(String),
    #[error("int literal `{0}` out of range")]
    IntOutOfRange(String),
    #[error("invalid uint literal `{0}`")]
    InvalidUint(String),
    #[error("invalid double literal `{0}`")]
    InvalidDouble(String),
    #[error("invalid quoted literal `{0}`")]
    InvalidQuoting(String),
    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),
    #[error("string literal is not valid utf-8")]
    InvalidUtf8,
}

const INT_PATTERN: &str = r"^(0[xX][0-9a-fA-F]+|[0-9]+)$";
const UINT_PATTERN: &str = r"^(0[xX][0-9a-fA-F]+|[0-9]+)[uU]$";
const DOUBLE_PATTERN: &str = r"^([0-9]+\.[0-9]+|\.[0-9]+|[0-9]+)([eE][+-]?[0-9]+)?$";

fn int_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(INT_PATTERN).expect("valid regex"))
}

fn uint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(UINT_PATTERN).expect("valid regex"))
}

fn double_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DOUBLE_PATTERN).expect("valid regex"))
}

fn magnitude(digits: &str) -> Option<u64> {
    match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => digits.parse::<u64>().ok(),
    }
}

/// Parses decimal or hex int text, applying a folded leading minus.
pub fn parse_int(text: &str, negative: bool) -> Result<i64, LiteralError> {
    if !int_pattern().is_match(text) {
        return Err(LiteralError::InvalidInt(text.to_string()));
    }
    let spelled = || {
        if negative {
            format!("-{text}")
        } else {
            text.to_string()
        }
    };
    let value = magnitude(text).ok_or_else(|| LiteralError::IntOutOfRange(spelled()))?;
    let signed = if negative {
        -i128::from(value)
    } else {
        i128::from(value)
    };
    i64::try_from(signed).map_err(|_| LiteralError::IntOutOfRange(spelled()))
}

pub fn parse_uint(text: &str) -> Result<u64, LiteralError> {
    if !uint_pattern().is_match(text) {
        return Err(LiteralError::InvalidUint(text.to_string()));
    }
    magnitude(&text[..text.len() - 1]).ok_or_else(|| LiteralError::InvalidUint(text.to_string()))
}

pub fn parse_double(text: &str, negative: bool) -> Result<f64, LiteralError> {
    if !double_pattern().is_match(text) {
        return Err(LiteralError::InvalidDouble(text.to_string()));
    }
    let value = text
        .parse::<f64>()
        .map_err(|_| LiteralError::InvalidDouble(text.to_string()))?;
    Ok(if negative { -value } else { value })
}

pub fn parse_string(text: &str) -> Result<String, LiteralError> {
    let bytes = unquote(text, false)?;
    String::from_utf8(bytes).map_err(|_| LiteralError::InvalidUtf8)
}

pub fn parse_bytes(text: &str) -> Result<Vec<u8>, LiteralError> {
    unquote(text, true)
}

/// Strips prefixes and quotes from a string or bytes token and decodes its
/// escape sequences.
fn unquote(text: &str, is_bytes: bool) -> Result<Vec<u8>, LiteralError> {
    let invalid = || LiteralError::InvalidQuoting(text.to_string());
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut body = normalized.as_str();
    let mut raw = false;
    let mut binary = false;
    while let Some(first) = body.chars().next() {
        match first {
            'r' | 'R' if !raw => raw = true,
            'b' | 'B' if !binary => binary = true,
            _ => break,
        }
        body = &body[1..];
    }
    if binary != is_bytes {
        return Err(invalid());
    }

    let quote = match body.chars().next() {
        Some(quote @ ('\'' | '"')) => quote,
        _ => return Err(invalid()),
    };
    let triple: String = std::iter::repeat(quote).take(3).collect();
    let inner = if body.len() >= 6 && body.starts_with(&triple) && body.ends_with(&triple) {
        &body[3..body.len() - 3]
    } else if body.len() >= 2 && body.ends_with(quote) {
        &body[1..body.len() - 1]
    } else {
        return Err(invalid());
    };

    if raw || !inner.contains('\\') {
        return Ok(inner.as_bytes().to_vec());
    }
    unescape(inner, is_bytes)
}

fn unescape(inner: &str, is_bytes: bool) -> Result<Vec<u8>, LiteralError> {
    let mut out = Vec::with_capacity(inner.len());
    let mut chars = inner.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let invalid = |end: usize| {
            let sequence = inner.get(start..end).unwrap_or(&inner[start..]);
            LiteralError::InvalidEscape(sequence.to_string())
        };
        let Some((_, escaped)) = chars.next() else {
            return Err(invalid(inner.len()));
        };
        let simple = match escaped {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            '\'' => Some(b'\''),
            '"' => Some(b'"'),
            '`' => Some(b'`'),
            '?' => Some(b'?'),
            _ => None,
        };
        if let Some(byte) = simple {
            out.push(byte);
            continue;
        }

        let (radix, width) = match escaped {
            'x' | 'X' => (16, 2),
            'u' if !is_bytes => (16, 4),
            'U' if !is_bytes => (16, 8),
            '0'..='3' => (8, 2),
            _ => return Err(invalid(start + 2)),
        };

        let mut value = if radix == 8 {
            escaped.to_digit(8).unwrap_or(0)
        } else {
            0
        };
        for _ in 0..width {
            let digit = chars
                .next()
                .and_then(|(_, ch)| ch.to_digit(radix))
                .ok_or_else(|| invalid(start + 2 + width))?;
            value = value * radix + digit;
        }

        let single_byte = matches!(escaped, 'x' | 'X' | '0'..='3');
        if is_bytes && single_byte {
            out.push(value as u8);
            continue;
        }
        let decoded = char::from_u32(value).ok_or_else(|| invalid(start + 2 + width))?;
        let mut buf = [0u8; 4];
        out.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
    }

    Ok(out)
}

#[cfg(test)]
#[path = "literal_test.rs"]
mod tests;
