pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod literal;
pub mod options;
pub mod parser;
pub mod printer;
pub mod token;

pub use ast::{
    ArithmeticOp, Expr, ExprKind, Ident, ListElement, MapEntry, RelationOp, Span, StructField,
};
pub use diagnostic::{Expectation, Expected, ParseError, Reporter};
pub use lexer::{tokenize, LexError};
pub use literal::LiteralError;
pub use options::{
    load_parser_options, validate_parser_options, OptionsError, ParserOptions,
    MAX_RECURSION_DEPTH_LIMIT,
};
pub use parser::{
    parse, parse_expression, parse_expression_recovering, parse_expression_with_options,
    parse_with_options, Parser,
};
pub use token::{Token, TokenKind, TokenSource, TokenStream};
