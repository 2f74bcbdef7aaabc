use crate::ast::{
    ArithmeticOp, Expr, ExprKind, Ident, ListElement, MapEntry, RelationOp, Span, StructField,
};
use crate::diagnostic::{Expected, ParseError, Reporter};
use crate::lexer::tokenize;
use crate::literal;
use crate::options::{ParserOptions, MAX_RECURSION_DEPTH_LIMIT};
use crate::token::{Token, TokenKind, TokenSource, TokenStream};
use log::{debug, trace, warn};

/// Recursive-descent parser with one loop per left-associative level.
///
/// Operator chains are folded iteratively; the call stack only grows with
/// the nesting of sub-expressions, which is capped by
/// [`ParserOptions::max_recursion_depth`].
pub struct Parser<S> {
    source: S,
    options: ParserOptions,
    depth: usize,
    last_end: usize,
    reporter: Reporter,
}

pub fn parse<S: TokenSource>(source: S) -> Result<Expr, ParseError> {
    Parser::new(source, ParserOptions::default()).parse()
}

pub fn parse_with_options<S: TokenSource>(
    source: S,
    options: &ParserOptions,
) -> Result<Expr, ParseError> {
    Parser::new(source, options.clone()).parse()
}

pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    parse(TokenStream::new(tokens))
}

pub fn parse_expression_with_options(
    input: &str,
    options: &ParserOptions,
) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    parse_with_options(TokenStream::new(tokens), options)
}

/// Parses with panic-mode recovery, returning every diagnostic found.
pub fn parse_expression_recovering(
    input: &str,
    options: &ParserOptions,
) -> Result<Expr, Vec<ParseError>> {
    let tokens = tokenize(input).map_err(|error| vec![ParseError::from(error)])?;
    let options = options.clone().with_error_recovery(true);
    Parser::new(TokenStream::new(tokens), options).parse_all()
}

fn relation_op(kind: TokenKind) -> Option<RelationOp> {
    let op = match kind {
        TokenKind::Equals => RelationOp::Eq,
        TokenKind::NotEquals => RelationOp::Ne,
        TokenKind::In => RelationOp::In,
        TokenKind::Less => RelationOp::Lt,
        TokenKind::LessEquals => RelationOp::Le,
        TokenKind::GreaterEquals => RelationOp::Ge,
        TokenKind::Greater => RelationOp::Gt,
        _ => return None,
    };
    Some(op)
}

fn additive_op(kind: TokenKind) -> Option<ArithmeticOp> {
    match kind {
        TokenKind::Plus => Some(ArithmeticOp::Add),
        TokenKind::Minus => Some(ArithmeticOp::Sub),
        _ => None,
    }
}

fn multiplicative_op(kind: TokenKind) -> Option<ArithmeticOp> {
    match kind {
        TokenKind::Star => Some(ArithmeticOp::Mul),
        TokenKind::Slash => Some(ArithmeticOp::Div),
        TokenKind::Percent => Some(ArithmeticOp::Mod),
        _ => None,
    }
}

fn is_numeric(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Int | TokenKind::Float)
}

impl<S: TokenSource> Parser<S> {
    /// `options.max_recursion_depth` is clamped to
    /// [`MAX_RECURSION_DEPTH_LIMIT`].
    pub fn new(source: S, mut options: ParserOptions) -> Self {
        options.max_recursion_depth = options.max_recursion_depth.min(MAX_RECURSION_DEPTH_LIMIT);
        Self {
            source,
            options,
            depth: 0,
            last_end: 0,
            reporter: Reporter::new(),
        }
    }

    /// Fail-fast parse: the first diagnostic aborts, whatever the recovery
    /// setting.
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        self.options.error_recovery = false;
        trace!("parse: first token = {:?}", self.source.peek());
        let expr = self.parse_expr()?;
        self.expect_end()?;
        debug!("parsed expression spanning {}", expr.span);
        Ok(expr)
    }

    /// Parse honoring [`ParserOptions::error_recovery`]; fails with every
    /// collected diagnostic in source order.
    pub fn parse_all(mut self) -> Result<Expr, Vec<ParseError>> {
        trace!("parse_all: first token = {:?}", self.source.peek());
        let outcome = self.parse_expr().and_then(|expr| {
            self.expect_end()?;
            Ok(expr)
        });
        match outcome {
            Ok(expr) if self.reporter.is_empty() => {
                debug!("parsed expression spanning {}", expr.span);
                Ok(expr)
            }
            Ok(_) => Err(self.reporter.into_errors()),
            Err(error) => {
                self.reporter.report(error);
                Err(self.reporter.into_errors())
            }
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= self.options.max_recursion_depth {
            let pos = self.source.position();
            warn!(
                "recursion limit {} reached at {pos}",
                self.options.max_recursion_depth
            );
            return Err(ParseError::RecursionLimitExceeded {
                pos,
                limit: self.options.max_recursion_depth,
            });
        }
        self.depth += 1;
        let result = self.parse_conditional();
        self.depth -= 1;
        result
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_or()?;
        if !self.match_kind(TokenKind::QuestionMark) {
            return Ok(cond);
        }
        let then_expr = self.parse_or()?;
        self.expect(TokenKind::Colon)?;
        let else_expr = self.parse_expr()?;
        let span = cond.span.cover(else_expr.span);
        Ok(Expr::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        ))
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        self.parse_flattened(TokenKind::LogicalOr, Self::parse_and, ExprKind::LogicalOr)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        self.parse_flattened(TokenKind::LogicalAnd, Self::parse_relation, ExprKind::LogicalAnd)
    }

    fn parse_relation(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(relation_op, Self::parse_additive, |op, left, right| {
            ExprKind::Relation { op, left, right }
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(additive_op, Self::parse_multiplicative, |op, left, right| {
            ExprKind::Arithmetic { op, left, right }
        })
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(multiplicative_op, Self::parse_unary, |op, left, right| {
            ExprKind::Arithmetic { op, left, right }
        })
    }

    fn parse_flattened<G>(
        &mut self,
        operator: TokenKind,
        mut parse_operand: G,
        build: fn(Vec<Expr>) -> ExprKind,
    ) -> Result<Expr, ParseError>
    where
        G: FnMut(&mut Self) -> Result<Expr, ParseError>,
    {
        let first = parse_operand(self)?;
        if !self.check(operator) {
            return Ok(first);
        }
        let mut span = first.span;
        let mut operands = vec![first];
        while self.match_kind(operator) {
            let operand = parse_operand(self)?;
            span = span.cover(operand.span);
            operands.push(operand);
        }
        Ok(Expr::new(build(operands), span))
    }

    fn fold_binary<Op, G>(
        &mut self,
        operator: fn(TokenKind) -> Option<Op>,
        mut parse_operand: G,
        build: fn(Op, Box<Expr>, Box<Expr>) -> ExprKind,
    ) -> Result<Expr, ParseError>
    where
        G: FnMut(&mut Self) -> Result<Expr, ParseError>,
    {
        let mut node = parse_operand(self)?;
        while let Some(op) = operator(self.peek_kind()) {
            self.advance();
            let right = parse_operand(self)?;
            let span = node.span.cover(right.span);
            node = Expr::new(build(op, Box::new(node), Box::new(right)), span);
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.source.position();
        match self.peek_kind() {
            TokenKind::Exclam => {
                let depth = self.consume_run(TokenKind::Exclam, 0);
                let operand = self.parse_member()?;
                let span = Span::new(start, operand.span.end);
                Ok(Expr::new(
                    ExprKind::LogicalNot {
                        depth,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }
            TokenKind::Minus => {
                // The last `-` before a numeric literal belongs to the literal.
                let keep = usize::from(is_numeric(self.peek_run_end(TokenKind::Minus)));
                let depth = self.consume_run(TokenKind::Minus, keep);
                if depth == 0 {
                    return self.parse_member();
                }
                let operand = self.parse_member()?;
                let span = Span::new(start, operand.span.end);
                Ok(Expr::new(
                    ExprKind::Negate {
                        depth,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }
            _ => self.parse_member(),
        }
    }

    fn peek_run_end(&self, kind: TokenKind) -> TokenKind {
        let mut offset = 0;
        while self.source.peek_nth(offset).kind == kind {
            offset += 1;
        }
        self.source.peek_nth(offset).kind
    }

    /// Consumes a run of `kind` tokens, leaving the last `keep` of them in
    /// place, and returns how many were consumed.
    fn consume_run(&mut self, kind: TokenKind, keep: usize) -> u32 {
        let mut run = 0usize;
        while self.source.peek_nth(run).kind == kind {
            run += 1;
        }
        let consumed = run.saturating_sub(keep);
        for _ in 0..consumed {
            self.advance();
        }
        u32::try_from(consumed).unwrap_or(u32::MAX)
    }

    fn parse_member(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_primary()?;
        loop {
            node = match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let optional = self.match_optional_marker(Expected::token(TokenKind::Identifier))?;
                    self.parse_field_access(node, optional)?
                }
                TokenKind::LBracket => {
                    self.advance();
                    let optional = self.match_optional_marker(Expected::expression())?;
                    self.parse_index(node, optional)?
                }
                TokenKind::QuestionMark if self.optional_access_follows() => {
                    self.advance();
                    if self.advance().kind == TokenKind::Dot {
                        self.parse_field_access(node, true)?
                    } else {
                        self.parse_index(node, true)?
                    }
                }
                _ => break,
            };
        }
        Ok(node)
    }

    /// `?.` or `?[` written without whitespace between the two tokens.
    fn optional_access_follows(&self) -> bool {
        if !self.options.enable_optional_syntax {
            return false;
        }
        let marker = self.source.peek();
        let next = self.source.peek_nth(1);
        matches!(next.kind, TokenKind::Dot | TokenKind::LBracket) && next.pos == marker.end()
    }

    fn match_optional_marker(&mut self, expected: Expected) -> Result<bool, ParseError> {
        if !self.check(TokenKind::QuestionMark) {
            return Ok(false);
        }
        if !self.options.enable_optional_syntax {
            return Err(ParseError::unexpected(self.source.peek(), expected));
        }
        self.advance();
        Ok(true)
    }

    fn parse_field_access(&mut self, operand: Expr, optional: bool) -> Result<Expr, ParseError> {
        let field = self.expect(TokenKind::Identifier)?.text;
        if !optional && self.match_kind(TokenKind::LParen) {
            let args = self.parse_args()?;
            let span = Span::new(operand.span.start, self.last_end);
            return Ok(Expr::new(
                ExprKind::MethodCall {
                    operand: Box::new(operand),
                    method: field,
                    args,
                },
                span,
            ));
        }
        let span = Span::new(operand.span.start, self.last_end);
        Ok(Expr::new(
            ExprKind::Select {
                operand: Box::new(operand),
                field,
                optional,
            },
            span,
        ))
    }

    fn parse_index(&mut self, operand: Expr, optional: bool) -> Result<Expr, ParseError> {
        let key = self.parse_expr()?;
        self.expect(TokenKind::RBracket)?;
        let span = Span::new(operand.span.start, self.last_end);
        Ok(Expr::new(
            ExprKind::Index {
                operand: Box::new(operand),
                key: Box::new(key),
                optional,
            },
            span,
        ))
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::Dot | TokenKind::Identifier => self.parse_ident_or_struct(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LBrace => self.parse_map(),
            TokenKind::Minus => self.parse_signed_number(),
            TokenKind::Int
            | TokenKind::Uint
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::Bytes
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => self.parse_literal(),
            _ => Err(ParseError::unexpected(self.source.peek(), Expected::expression())),
        }
    }

    fn parse_ident_or_struct(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_ident_or_struct: next token = {:?}", self.source.peek());
        let start = self.source.position();
        let leading_dot = self.match_kind(TokenKind::Dot);
        if self.struct_literal_follows() {
            return self.parse_struct(start, leading_dot);
        }

        let name = self.expect(TokenKind::Identifier)?.text;
        let callee = Ident { name, leading_dot };
        if self.match_kind(TokenKind::LParen) {
            let args = self.parse_args()?;
            return Ok(Expr::new(
                ExprKind::GlobalCall { callee, args },
                Span::new(start, self.last_end),
            ));
        }
        Ok(Expr::new(
            ExprKind::Identifier(callee),
            Span::new(start, self.last_end),
        ))
    }

    /// Looks past `ident ('.' ident)*` for the `{` of a struct literal.
    fn struct_literal_follows(&self) -> bool {
        if self.peek_kind() != TokenKind::Identifier {
            return false;
        }
        let mut offset = 1;
        while self.source.peek_nth(offset).kind == TokenKind::Dot
            && self.source.peek_nth(offset + 1).kind == TokenKind::Identifier
        {
            offset += 2;
        }
        self.source.peek_nth(offset).kind == TokenKind::LBrace
    }

    fn parse_struct(&mut self, start: usize, leading_dot: bool) -> Result<Expr, ParseError> {
        let mut type_name = vec![self.expect(TokenKind::Identifier)?.text];
        while self.match_kind(TokenKind::Dot) {
            type_name.push(self.expect(TokenKind::Identifier)?.text);
        }
        trace!("parse_struct: {}", type_name.join("."));
        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        self.skip_lone_comma(TokenKind::RBrace);
        while !self.check(TokenKind::RBrace) {
            match self.parse_struct_field() {
                Ok(field) => fields.push(field),
                Err(error) => self.recover(error, TokenKind::RBrace)?,
            }
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(TokenKind::RBrace)?;

        Ok(Expr::new(
            ExprKind::CreateStruct {
                type_name,
                leading_dot,
                fields,
            },
            Span::new(start, self.last_end),
        ))
    }

    fn parse_struct_field(&mut self) -> Result<StructField, ParseError> {
        let optional = self.match_optional_marker(Expected::token(TokenKind::Identifier))?;
        let name = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_expr()?;
        Ok(StructField {
            optional,
            name,
            value,
        })
    }

    fn parse_list(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_list: next token = {:?}", self.source.peek());
        let start = self.advance().pos;
        let mut elements = Vec::new();
        self.skip_lone_comma(TokenKind::RBracket);
        while !self.check(TokenKind::RBracket) {
            match self.parse_list_element() {
                Ok(element) => elements.push(element),
                Err(error) => self.recover(error, TokenKind::RBracket)?,
            }
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(TokenKind::RBracket)?;
        Ok(Expr::new(
            ExprKind::CreateList { elements },
            Span::new(start, self.last_end),
        ))
    }

    fn parse_list_element(&mut self) -> Result<ListElement, ParseError> {
        let optional = self.match_optional_marker(Expected::expression())?;
        let value = self.parse_expr()?;
        Ok(ListElement { optional, value })
    }

    fn parse_map(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_map: next token = {:?}", self.source.peek());
        let start = self.advance().pos;
        let mut entries = Vec::new();
        self.skip_lone_comma(TokenKind::RBrace);
        while !self.check(TokenKind::RBrace) {
            match self.parse_map_entry() {
                Ok(entry) => entries.push(entry),
                Err(error) => self.recover(error, TokenKind::RBrace)?,
            }
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(TokenKind::RBrace)?;
        Ok(Expr::new(
            ExprKind::CreateMap { entries },
            Span::new(start, self.last_end),
        ))
    }

    fn parse_map_entry(&mut self) -> Result<MapEntry, ParseError> {
        let optional = self.match_optional_marker(Expected::expression())?;
        let key = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_expr()?;
        Ok(MapEntry {
            optional,
            key,
            value,
        })
    }

    /// Arguments after an opening `(`, through the closing `)`.
    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                match self.parse_expr() {
                    Ok(arg) => args.push(arg),
                    Err(error) => self.recover(error, TokenKind::RParen)?,
                }
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_closing(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_signed_number(&mut self) -> Result<Expr, ParseError> {
        let start = self.source.position();
        if !is_numeric(self.source.peek_nth(1).kind) {
            self.advance();
            return Err(ParseError::unexpected(
                self.source.peek(),
                Expected::tokens([TokenKind::Int, TokenKind::Float]),
            ));
        }
        self.advance();
        let token = self.advance();
        let kind = self.numeric_literal(&token, true)?;
        Ok(Expr::new(kind, Span::new(start, token.end())))
    }

    fn parse_literal(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        let kind = match token.kind {
            TokenKind::Int | TokenKind::Float => self.numeric_literal(&token, false)?,
            TokenKind::Uint => ExprKind::UintLiteral(
                literal::parse_uint(&token.text).map_err(|error| ParseError::literal(error, &token))?,
            ),
            TokenKind::String => ExprKind::StringLiteral(
                literal::parse_string(&token.text).map_err(|error| ParseError::literal(error, &token))?,
            ),
            TokenKind::Bytes => ExprKind::BytesLiteral(
                literal::parse_bytes(&token.text).map_err(|error| ParseError::literal(error, &token))?,
            ),
            TokenKind::True => ExprKind::BoolLiteral(true),
            TokenKind::False => ExprKind::BoolLiteral(false),
            TokenKind::Null => ExprKind::NullLiteral,
            _ => return Err(ParseError::unexpected(&token, Expected::expression())),
        };
        Ok(Expr::new(kind, Span::new(token.pos, token.end())))
    }

    fn numeric_literal(&self, token: &Token, negative: bool) -> Result<ExprKind, ParseError> {
        let kind = if token.kind == TokenKind::Int {
            literal::parse_int(&token.text, negative).map(ExprKind::IntLiteral)
        } else {
            literal::parse_double(&token.text, negative).map(ExprKind::DoubleLiteral)
        };
        kind.map_err(|error| ParseError::literal(error, token))
    }

    /// Records `error` and skips to the next `,` or closing delimiter at the
    /// current nesting level; re-raises when recovery is off, the error is
    /// fatal or the error budget is spent.
    fn recover(&mut self, error: ParseError, closing: TokenKind) -> Result<(), ParseError> {
        if !self.options.error_recovery
            || error.is_fatal()
            || self.reporter.len() + 1 >= self.options.max_errors
        {
            return Err(error);
        }
        self.reporter.report(error);

        let mut nesting = 0usize;
        loop {
            let kind = self.peek_kind();
            if kind == TokenKind::Eof {
                break;
            }
            let closes = matches!(kind, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace);
            if nesting == 0 && (kind == TokenKind::Comma || closes) {
                break;
            }
            if matches!(kind, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace) {
                nesting += 1;
            } else if closes {
                nesting -= 1;
            }
            self.advance();
        }
        debug!(
            "recovered before {:?} at {} (closing {closing})",
            self.peek_kind(),
            self.source.position()
        );
        Ok(())
    }

    fn skip_lone_comma(&mut self, closing: TokenKind) {
        if self.check(TokenKind::Comma) && self.source.peek_nth(1).kind == closing {
            self.advance();
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        let token = self.source.peek();
        if token.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(ParseError::trailing(token))
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(self.source.peek(), Expected::token(kind)))
        }
    }

    fn expect_closing(&mut self, closing: TokenKind) -> Result<Token, ParseError> {
        if self.check(closing) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(
                self.source.peek(),
                Expected::tokens([TokenKind::Comma, closing]),
            ))
        }
    }

    fn peek_kind(&self) -> TokenKind {
        self.source.peek().kind
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.source.advance();
        self.last_end = token.end();
        token
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
