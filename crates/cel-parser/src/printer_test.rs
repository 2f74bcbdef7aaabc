use crate::ast::{Expr, ExprKind, Span};
use crate::parser::parse_expression;

fn render(input: &str) -> String {
    parse_expression(input).expect("parse").to_string()
}

fn assert_reparses(input: &str) {
    let first = parse_expression(input).expect("parse");
    let printed = first.to_string();
    let second = parse_expression(&printed)
        .unwrap_or_else(|error| panic!("reparse of `{printed}` failed: {error}"));
    assert!(
        first.same_shape(&second),
        "`{input}` printed as `{printed}` changed shape"
    );
}

#[test]
fn renders_canonical_forms() {
    assert_eq!(render("1+2*3"), "1 + 2 * 3");
    assert_eq!(render("(1+2)*3"), "(1 + 2) * 3");
    assert_eq!(render("a-(b-c)"), "a - (b - c)");
    assert_eq!(render("a?.b"), "a.?b");
    assert_eq!(render("m[?'k']"), "m[?\"k\"]");
    assert_eq!(render(".pkg.Msg{f:1,?g:x,}"), ".pkg.Msg{f: 1, ?g: x}");
    assert_eq!(render("{'a':1u,?2:2.0}"), "{\"a\": 1u, ?2: 2.0}");
    assert_eq!(render("!!a"), "!!a");
    assert_eq!(render("-(5)"), "-(5)");
    assert_eq!(render("--5"), "--5");
}

#[test]
fn renders_escaped_literals() {
    assert_eq!(render(r"'a\n\x01\u00e9'"), "\"a\\n\\u0001é\"");
    assert_eq!(render(r"b'\xff\x41'"), "b\"\\xffA\"");
}

#[test]
fn printed_trees_parse_back_to_the_same_shape() {
    for input in [
        "1 + 2 * 3",
        "a < b < c",
        "a ? b : c ? d : e",
        "(a ? b : c) ? d : e",
        "a || b || c && d",
        "(a || b) || c",
        "!(a && b)",
        "-x.y[0]",
        "-(-1)",
        "---1",
        "-1.5.floor()",
        "f(a, .b.c, [1, ?2,], {})",
        "x.?y.z[?0].size()",
        "a in [1, 2] == (b in {})",
        ".google.protobuf.Duration{seconds: 1}",
        "r'raw\\n' + \"\"\"triple\"\"\"",
        "b'\\000\\x7f' == bytes(x)",
        "9223372036854775807 + -9223372036854775808",
        "1e300 * 1e-300 + .5",
        "18446744073709551615u % 2u",
        "null == true != false",
    ] {
        assert_reparses(input);
    }
}

#[test]
fn renders_infinite_doubles_parseably() {
    let expr = Expr::new(ExprKind::DoubleLiteral(f64::INFINITY), Span::default());
    assert_eq!(expr.to_string(), "1e999");
    let reparsed = parse_expression(&expr.to_string()).expect("parse");
    assert!(expr.same_shape(&reparsed));
}

#[test]
fn renders_long_chains_iteratively() {
    let input = vec!["1"; 200_000].join(" + ");
    let expr = parse_expression(&input).expect("parse");
    assert_eq!(expr.to_string(), input);

    let chain = format!("a{}", ".b[0]".repeat(100_000));
    let expr = parse_expression(&chain).expect("parse");
    assert_eq!(expr.to_string(), chain);
}
