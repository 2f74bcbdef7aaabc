//! Canonical source rendering of an [`Expr`].
//!
//! The output parses back into a tree of the same shape: parentheses are
//! inserted exactly where precedence or literal sign folding requires them.

use crate::ast::{Expr, ExprKind, Ident};
use std::fmt::{self, Display, Formatter, Write};

const CONDITIONAL: u8 = 1;
const OR: u8 = 2;
const AND: u8 = 3;
const RELATION: u8 = 4;
const ADDITIVE: u8 = 5;
const MULTIPLICATIVE: u8 = 6;
const UNARY: u8 = 7;
const MEMBER: u8 = 8;
const PRIMARY: u8 = 9;

fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Conditional { .. } => CONDITIONAL,
        ExprKind::LogicalOr(_) => OR,
        ExprKind::LogicalAnd(_) => AND,
        ExprKind::Relation { .. } => RELATION,
        ExprKind::Arithmetic { op, .. } if op.is_multiplicative() => MULTIPLICATIVE,
        ExprKind::Arithmetic { .. } => ADDITIVE,
        ExprKind::LogicalNot { .. } | ExprKind::Negate { .. } => UNARY,
        ExprKind::Select { .. } | ExprKind::MethodCall { .. } | ExprKind::Index { .. } => MEMBER,
        _ => PRIMARY,
    }
}

/// Whether a `-` written right before this expression would be folded into
/// it as a literal sign.
fn absorbs_sign(expr: &Expr) -> bool {
    match expr.kind {
        ExprKind::IntLiteral(value) => value >= 0,
        ExprKind::DoubleLiteral(value) => value.is_sign_positive(),
        _ => false,
    }
}

struct Child<'a> {
    expr: &'a Expr,
    parenthesize: bool,
}

impl Display for Child<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.parenthesize {
            write!(f, "({})", self.expr)
        } else {
            write!(f, "{}", self.expr)
        }
    }
}

fn child(expr: &Expr, min_precedence: u8) -> Child<'_> {
    Child {
        expr,
        parenthesize: precedence(expr) < min_precedence,
    }
}

fn write_list<T>(
    f: &mut Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

fn write_args(f: &mut Formatter<'_>, args: &[Expr]) -> fmt::Result {
    f.write_char('(')?;
    write_list(f, args, |f, arg| write!(f, "{arg}"))?;
    f.write_char(')')
}

fn optional_marker(optional: bool) -> &'static str {
    if optional {
        "?"
    } else {
        ""
    }
}

fn write_ident(f: &mut Formatter<'_>, ident: &Ident) -> fmt::Result {
    if ident.leading_dot {
        f.write_char('.')?;
    }
    f.write_str(&ident.name)
}

fn write_double(f: &mut Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return write!(f, "{sign}1e999");
    }
    write!(f, "{value:?}")
}

fn write_string(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in value.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            ch if ch.is_control() => write!(f, "\\u{:04x}", ch as u32)?,
            ch => f.write_char(ch)?,
        }
    }
    f.write_char('"')
}

fn write_bytes(f: &mut Formatter<'_>, value: &[u8]) -> fmt::Result {
    f.write_str("b\"")?;
    for &byte in value {
        match byte {
            b'"' => f.write_str("\\\"")?,
            b'\\' => f.write_str("\\\\")?,
            0x20..=0x7e => f.write_char(char::from(byte))?,
            _ => write!(f, "\\x{byte:02x}")?,
        }
    }
    f.write_char('"')
}

/// Writes a left-folded run of same-level binary operators from its
/// leftmost operand outwards.
fn write_binary_chain(f: &mut Formatter<'_>, expr: &Expr) -> fmt::Result {
    let level = precedence(expr);
    let mut tail = Vec::new();
    let mut node = expr;
    while precedence(node) == level {
        let (symbol, left, right) = match &node.kind {
            ExprKind::Relation { op, left, right } => (op.symbol(), left, right),
            ExprKind::Arithmetic { op, left, right } => (op.symbol(), left, right),
            _ => break,
        };
        tail.push((symbol, right));
        node = &**left;
    }
    write!(f, "{}", child(node, level))?;
    for (symbol, right) in tail.into_iter().rev() {
        write!(f, " {symbol} {}", child(right, level + 1))?;
    }
    Ok(())
}

/// Writes a run of selects, method calls and indexes from the innermost
/// operand outwards.
fn write_member_chain(f: &mut Formatter<'_>, expr: &Expr) -> fmt::Result {
    let mut tail = Vec::new();
    let mut node = expr;
    loop {
        let operand = match &node.kind {
            ExprKind::Select { operand, .. }
            | ExprKind::MethodCall { operand, .. }
            | ExprKind::Index { operand, .. } => operand,
            _ => break,
        };
        tail.push(node);
        node = &**operand;
    }
    write!(f, "{}", child(node, MEMBER))?;
    for link in tail.into_iter().rev() {
        match &link.kind {
            ExprKind::Select {
                field, optional, ..
            } => write!(f, ".{}{field}", optional_marker(*optional))?,
            ExprKind::MethodCall { method, args, .. } => {
                write!(f, ".{method}")?;
                write_args(f, args)?;
            }
            ExprKind::Index { key, optional, .. } => {
                write!(f, "[{}{key}]", optional_marker(*optional))?;
            }
            _ => {}
        }
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::IntLiteral(value) => write!(f, "{value}"),
            ExprKind::UintLiteral(value) => write!(f, "{value}u"),
            ExprKind::DoubleLiteral(value) => write_double(f, *value),
            ExprKind::StringLiteral(value) => write_string(f, value),
            ExprKind::BytesLiteral(value) => write_bytes(f, value),
            ExprKind::BoolLiteral(value) => write!(f, "{value}"),
            ExprKind::NullLiteral => f.write_str("null"),
            ExprKind::Identifier(ident) => write_ident(f, ident),
            ExprKind::GlobalCall { callee, args } => {
                write_ident(f, callee)?;
                write_args(f, args)
            }
            ExprKind::Select { .. } | ExprKind::MethodCall { .. } | ExprKind::Index { .. } => {
                write_member_chain(f, self)
            }
            ExprKind::CreateList { elements } => {
                f.write_char('[')?;
                write_list(f, elements, |f, element| {
                    write!(f, "{}{}", optional_marker(element.optional), element.value)
                })?;
                f.write_char(']')
            }
            ExprKind::CreateMap { entries } => {
                f.write_char('{')?;
                write_list(f, entries, |f, entry| {
                    write!(
                        f,
                        "{}{}: {}",
                        optional_marker(entry.optional),
                        entry.key,
                        entry.value
                    )
                })?;
                f.write_char('}')
            }
            ExprKind::CreateStruct {
                type_name,
                leading_dot,
                fields,
            } => {
                if *leading_dot {
                    f.write_char('.')?;
                }
                write!(f, "{}{{", type_name.join("."))?;
                write_list(f, fields, |f, field| {
                    write!(
                        f,
                        "{}{}: {}",
                        optional_marker(field.optional),
                        field.name,
                        field.value
                    )
                })?;
                f.write_char('}')
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => write!(
                f,
                "{} ? {} : {}",
                child(cond, OR),
                child(then_expr, OR),
                child(else_expr, CONDITIONAL)
            ),
            ExprKind::LogicalOr(operands) => {
                for (index, operand) in operands.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" || ")?;
                    }
                    write!(f, "{}", child(operand, AND))?;
                }
                Ok(())
            }
            ExprKind::LogicalAnd(operands) => {
                for (index, operand) in operands.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" && ")?;
                    }
                    write!(f, "{}", child(operand, RELATION))?;
                }
                Ok(())
            }
            ExprKind::Relation { .. } | ExprKind::Arithmetic { .. } => write_binary_chain(f, self),
            ExprKind::LogicalNot { depth, operand } => {
                write!(f, "{}{}", "!".repeat(*depth as usize), child(operand, MEMBER))
            }
            ExprKind::Negate { depth, operand } => {
                let mut operand = child(operand, MEMBER);
                operand.parenthesize |= absorbs_sign(operand.expr);
                write!(f, "{}{}", "-".repeat(*depth as usize), operand)
            }
        }
    }
}

#[cfg(test)]
#[path = "printer_test.rs"]
mod tests;
