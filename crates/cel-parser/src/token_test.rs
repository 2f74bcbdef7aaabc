use super::{Token, TokenKind, TokenSource, TokenStream};

#[test]
fn appends_eof_when_missing() {
    let stream = TokenStream::new(vec![Token::new(TokenKind::Identifier, "abc", 2)]);
    assert_eq!(stream.peek_nth(1).kind, TokenKind::Eof);
    assert_eq!(stream.peek_nth(1).pos, 5);
    assert_eq!(stream.remaining(), 1);
}

#[test]
fn drops_trivia_and_tokens_after_eof() {
    let mut stream = TokenStream::new(vec![
        Token::new(TokenKind::Whitespace, " ", 0),
        Token::new(TokenKind::Int, "1", 1),
        Token::new(TokenKind::Comment, "// c", 2),
        Token::eof(6),
        Token::new(TokenKind::Int, "2", 7),
    ]);
    assert_eq!(stream.advance().kind, TokenKind::Int);
    assert_eq!(stream.peek().kind, TokenKind::Eof);
    assert_eq!(stream.position(), 6);
}

#[test]
fn keeps_returning_eof_at_end() {
    let mut stream = TokenStream::new(Vec::new());
    assert_eq!(stream.advance().kind, TokenKind::Eof);
    assert_eq!(stream.advance().kind, TokenKind::Eof);
    assert_eq!(stream.peek_nth(10).kind, TokenKind::Eof);
}

#[test]
fn displays_kinds_for_diagnostics() {
    assert_eq!(TokenKind::LessEquals.to_string(), "`<=`");
    assert_eq!(TokenKind::Identifier.to_string(), "identifier");
    assert_eq!(TokenKind::Eof.to_string(), "end of input");
}
