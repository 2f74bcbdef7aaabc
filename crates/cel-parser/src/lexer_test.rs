use super::{tokenize, LexError};
use crate::token::TokenKind;

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .expect("tokenize")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn tokenizes_composite_expression() {
    assert_eq!(
        kinds("a.b[0] >= 10 && contains(name, 'x')"),
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::LBracket,
            TokenKind::Int,
            TokenKind::RBracket,
            TokenKind::GreaterEquals,
            TokenKind::Int,
            TokenKind::LogicalAnd,
            TokenKind::Identifier,
            TokenKind::LParen,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::String,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_numeric_forms() {
    assert_eq!(
        kinds("1 0x1F 7u 0xffU 1.5 .5 2e10 3E-2"),
        vec![
            TokenKind::Int,
            TokenKind::Int,
            TokenKind::Uint,
            TokenKind::Uint,
            TokenKind::Float,
            TokenKind::Float,
            TokenKind::Float,
            TokenKind::Float,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn integer_followed_by_member_is_not_a_float() {
    assert_eq!(
        kinds("1.foo"),
        vec![TokenKind::Int, TokenKind::Dot, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn keeps_raw_literal_text() {
    let tokens = tokenize(r#"b'\x00' r"a\n" '''multi'''"#).expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Bytes);
    assert_eq!(tokens[0].text, r"b'\x00'");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].text, r#"r"a\n""#);
    assert_eq!(tokens[2].text, "'''multi'''");
}

#[test]
fn prefix_letters_alone_are_identifiers() {
    assert_eq!(
        kinds("r + br"),
        vec![TokenKind::Identifier, TokenKind::Plus, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn skips_comments_and_records_byte_offsets() {
    let tokens = tokenize("'é' // trailing\n+ x").expect("tokenize");
    assert_eq!(tokens[0].text, "'é'");
    assert_eq!(tokens[1].kind, TokenKind::Plus);
    assert_eq!(tokens[1].pos, 17);
    assert_eq!(tokens[2].pos, 19);
    assert_eq!(tokens[3].pos, 20);
}

#[test]
fn keywords_are_recognized() {
    assert_eq!(
        kinds("true false null in"),
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::In,
            TokenKind::Eof
        ]
    );
}

#[test]
fn rejects_unknown_characters() {
    assert_eq!(
        tokenize("a = b"),
        Err(LexError::UnexpectedCharacter { ch: '=', pos: 2 })
    );
    assert_eq!(
        tokenize("é"),
        Err(LexError::UnexpectedCharacter { ch: 'é', pos: 0 })
    );
    assert!(tokenize("`").is_err());
}

#[test]
fn rejects_unterminated_strings() {
    assert_eq!(tokenize("'abc"), Err(LexError::UnterminatedString { pos: 0 }));
    assert_eq!(tokenize("x + 'a\nb'"), Err(LexError::UnterminatedString { pos: 4 }));
    assert_eq!(tokenize("'''abc''"), Err(LexError::UnterminatedString { pos: 0 }));
    assert_eq!(tokenize(r"'abc\"), Err(LexError::UnterminatedString { pos: 0 }));
}
