use super::{parse_bytes, parse_double, parse_int, parse_string, parse_uint, LiteralError};

#[test]
fn parses_int_forms_with_folded_sign() {
    assert_eq!(parse_int("42", false), Ok(42));
    assert_eq!(parse_int("0x1F", false), Ok(31));
    assert_eq!(parse_int("0X10", true), Ok(-16));
    assert_eq!(parse_int("9223372036854775808", true), Ok(i64::MIN));
}

#[test]
fn rejects_int_overflow() {
    assert_eq!(
        parse_int("9223372036854775808", false),
        Err(LiteralError::IntOutOfRange("9223372036854775808".to_string()))
    );
    assert_eq!(
        parse_int("99999999999999999999", true),
        Err(LiteralError::IntOutOfRange("-99999999999999999999".to_string()))
    );
    assert!(matches!(parse_int("1.5", false), Err(LiteralError::InvalidInt(_))));
}

#[test]
fn parses_uint_with_suffix() {
    assert_eq!(parse_uint("18446744073709551615u"), Ok(u64::MAX));
    assert_eq!(parse_uint("0xffU"), Ok(255));
    assert!(parse_uint("18446744073709551616u").is_err());
    assert!(parse_uint("12").is_err());
}

#[test]
fn parses_doubles() {
    assert_eq!(parse_double("1.5", false), Ok(1.5));
    assert_eq!(parse_double(".25", true), Ok(-0.25));
    assert_eq!(parse_double("2e3", false), Ok(2000.0));
    assert!(parse_double("inf", false).is_err());
    assert!(parse_double("1.", false).is_err());
}

#[test]
fn decodes_string_escapes() {
    assert_eq!(parse_string(r#""a\tb\n""#), Ok("a\tb\n".to_string()));
    assert_eq!(parse_string(r"'\x41é\U0001F600'"), Ok("Aé😀".to_string()));
    assert_eq!(parse_string(r"'\101\?\`'"), Ok("A?`".to_string()));
    assert_eq!(parse_string(r#"'it\'s'"#), Ok("it's".to_string()));
}

#[test]
fn raw_strings_keep_backslashes() {
    assert_eq!(parse_string(r"r'a\nb'"), Ok(r"a\nb".to_string()));
    assert_eq!(parse_string(r#"R"\d+""#), Ok(r"\d+".to_string()));
}

#[test]
fn triple_quoted_strings_normalize_newlines() {
    assert_eq!(parse_string("'''a\r\nb'''"), Ok("a\nb".to_string()));
    assert_eq!(parse_string("\"\"\"\"\"\""), Ok(String::new()));
}

#[test]
fn decodes_bytes() {
    assert_eq!(parse_bytes(r"b'\xff\000abc'"), Ok(vec![0xff, 0x00, b'a', b'b', b'c']));
    assert_eq!(parse_bytes("b'ÿ'"), Ok(vec![0xc3, 0xbf]));
    assert_eq!(parse_bytes(r"rb'\x'"), Ok(vec![b'\\', b'x']));
    assert!(matches!(parse_bytes(r"b'\u0041'"), Err(LiteralError::InvalidEscape(_))));
}

#[test]
fn rejects_malformed_escapes_and_quoting() {
    assert_eq!(
        parse_string(r"'\q'"),
        Err(LiteralError::InvalidEscape(r"\q".to_string()))
    );
    assert!(matches!(parse_string(r"'\x4'"), Err(LiteralError::InvalidEscape(_))));
    assert!(matches!(parse_string(r"'\uD800'"), Err(LiteralError::InvalidEscape(_))));
    assert!(matches!(parse_string(r"'\é'"), Err(LiteralError::InvalidEscape(_))));
    assert!(matches!(parse_string("'abc"), Err(LiteralError::InvalidQuoting(_))));
    assert!(matches!(parse_string("b'abc'"), Err(LiteralError::InvalidQuoting(_))));
}
