use serde::Serialize;
use std::fmt;

/// Byte range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A node of the syntax tree.
///
/// Dropping, printing and [`Expr::same_shape`] work on trees of any depth.
/// The derived `Clone`, `PartialEq`, `Debug` and `Serialize` recurse once per
/// level and are meant for trees nested within
/// [`MAX_RECURSION_DEPTH_LIMIT`](crate::options::MAX_RECURSION_DEPTH_LIMIT)
/// plus short chains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub name: String,
    pub leading_dot: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListElement {
    pub optional: bool,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry {
    pub optional: bool,
    pub key: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructField {
    pub optional: bool,
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    IntLiteral(i64),
    UintLiteral(u64),
    DoubleLiteral(f64),
    StringLiteral(String),
    BytesLiteral(Vec<u8>),
    BoolLiteral(bool),
    NullLiteral,
    Identifier(Ident),
    GlobalCall {
        callee: Ident,
        args: Vec<Expr>,
    },
    Select {
        operand: Box<Expr>,
        field: String,
        optional: bool,
    },
    MethodCall {
        operand: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Index {
        operand: Box<Expr>,
        key: Box<Expr>,
        optional: bool,
    },
    CreateList {
        elements: Vec<ListElement>,
    },
    CreateMap {
        entries: Vec<MapEntry>,
    },
    CreateStruct {
        type_name: Vec<String>,
        leading_dot: bool,
        fields: Vec<StructField>,
    },
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// Two or more operands of a `||` chain.
    LogicalOr(Vec<Expr>),
    /// Two or more operands of a `&&` chain.
    LogicalAnd(Vec<Expr>),
    Relation {
        op: RelationOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `depth` consecutive `!` applied to `operand`.
    LogicalNot {
        depth: u32,
        operand: Box<Expr>,
    },
    /// `depth` consecutive unary `-` applied to `operand`.
    Negate {
        depth: u32,
        operand: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationOp {
    Eq,
    Ne,
    In,
    Lt,
    Le,
    Ge,
    Gt,
}

impl RelationOp {
    pub fn symbol(self) -> &'static str {
        match self {
            RelationOp::Eq => "==",
            RelationOp::Ne => "!=",
            RelationOp::In => "in",
            RelationOp::Lt => "<",
            RelationOp::Le => "<=",
            RelationOp::Ge => ">=",
            RelationOp::Gt => ">",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
        }
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, ArithmeticOp::Mul | ArithmeticOp::Div | ArithmeticOp::Mod)
    }
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { span, kind }
    }

    /// Takes the node's kind, leaving a `NullLiteral` behind.
    pub fn into_kind(mut self) -> ExprKind {
        std::mem::replace(&mut self.kind, ExprKind::NullLiteral)
    }

    /// Compares two trees ignoring spans.
    pub fn same_shape(&self, other: &Expr) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if !left.kind.same_node(&right.kind, &mut pending) {
                return false;
            }
        }
        true
    }
}

/// Frees the tree with an explicit worklist; left-folded operator and
/// member chains are as deep as they are long.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut children = Vec::new();
        self.kind.detach_children(&mut children);
        while let Some(mut child) = children.pop() {
            child.kind.detach_children(&mut children);
        }
    }
}

type Pending<'a> = Vec<(&'a Expr, &'a Expr)>;

fn pair<'a>(pending: &mut Pending<'a>, left: &'a Expr, right: &'a Expr) -> bool {
    pending.push((left, right));
    true
}

fn pair_all<'a>(pending: &mut Pending<'a>, left: &'a [Expr], right: &'a [Expr]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    pending.extend(left.iter().zip(right));
    true
}

impl ExprKind {
    /// Moves every direct child expression into `out`.
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        use ExprKind::*;

        match std::mem::replace(self, NullLiteral) {
            GlobalCall { args, .. } => out.extend(args),
            Select { operand, .. } => out.push(*operand),
            MethodCall { operand, args, .. } => {
                out.push(*operand);
                out.extend(args);
            }
            Index { operand, key, .. } => {
                out.push(*operand);
                out.push(*key);
            }
            CreateList { elements } => out.extend(elements.into_iter().map(|element| element.value)),
            CreateMap { entries } => {
                for entry in entries {
                    out.push(entry.key);
                    out.push(entry.value);
                }
            }
            CreateStruct { fields, .. } => out.extend(fields.into_iter().map(|field| field.value)),
            Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                out.push(*cond);
                out.push(*then_expr);
                out.push(*else_expr);
            }
            LogicalOr(operands) | LogicalAnd(operands) => out.extend(operands),
            Relation { left, right, .. } | Arithmetic { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            LogicalNot { operand, .. } | Negate { operand, .. } => out.push(*operand),
            leaf => *self = leaf,
        }
    }

    /// Compares the node-local parts of two kinds and queues their children.
    fn same_node<'a>(&'a self, other: &'a ExprKind, pending: &mut Pending<'a>) -> bool {
        use ExprKind::*;

        match (self, other) {
            (DoubleLiteral(l), DoubleLiteral(r)) => l.to_bits() == r.to_bits() || l == r,
            (IntLiteral(_), _)
            | (UintLiteral(_), _)
            | (StringLiteral(_), _)
            | (BytesLiteral(_), _)
            | (BoolLiteral(_), _)
            | (NullLiteral, _)
            | (Identifier(_), _) => self == other,
            (GlobalCall { callee: lc, args: la }, GlobalCall { callee: rc, args: ra }) => {
                lc == rc && pair_all(pending, la, ra)
            }
            (
                Select { operand: lo, field: lf, optional: lopt },
                Select { operand: ro, field: rf, optional: ropt },
            ) => lf == rf && lopt == ropt && pair(pending, lo, ro),
            (
                MethodCall { operand: lo, method: lm, args: la },
                MethodCall { operand: ro, method: rm, args: ra },
            ) => lm == rm && pair(pending, lo, ro) && pair_all(pending, la, ra),
            (
                Index { operand: lo, key: lk, optional: lopt },
                Index { operand: ro, key: rk, optional: ropt },
            ) => lopt == ropt && pair(pending, lo, ro) && pair(pending, lk, rk),
            (CreateList { elements: l }, CreateList { elements: r }) => {
                l.len() == r.len()
                    && l.iter().zip(r).all(|(l, r)| {
                        l.optional == r.optional && pair(pending, &l.value, &r.value)
                    })
            }
            (CreateMap { entries: l }, CreateMap { entries: r }) => {
                l.len() == r.len()
                    && l.iter().zip(r).all(|(l, r)| {
                        l.optional == r.optional
                            && pair(pending, &l.key, &r.key)
                            && pair(pending, &l.value, &r.value)
                    })
            }
            (
                CreateStruct { type_name: lt, leading_dot: ld, fields: lf },
                CreateStruct { type_name: rt, leading_dot: rd, fields: rf },
            ) => {
                lt == rt
                    && ld == rd
                    && lf.len() == rf.len()
                    && lf.iter().zip(rf).all(|(l, r)| {
                        l.optional == r.optional
                            && l.name == r.name
                            && pair(pending, &l.value, &r.value)
                    })
            }
            (
                Conditional { cond: lc, then_expr: lt, else_expr: le },
                Conditional { cond: rc, then_expr: rt, else_expr: re },
            ) => pair(pending, lc, rc) && pair(pending, lt, rt) && pair(pending, le, re),
            (LogicalOr(l), LogicalOr(r)) | (LogicalAnd(l), LogicalAnd(r)) => pair_all(pending, l, r),
            (
                Relation { op: lop, left: ll, right: lr },
                Relation { op: rop, left: rl, right: rr },
            ) => lop == rop && pair(pending, ll, rl) && pair(pending, lr, rr),
            (
                Arithmetic { op: lop, left: ll, right: lr },
                Arithmetic { op: rop, left: rl, right: rr },
            ) => lop == rop && pair(pending, ll, rl) && pair(pending, lr, rr),
            (
                LogicalNot { depth: ld, operand: lo },
                LogicalNot { depth: rd, operand: ro },
            )
            | (Negate { depth: ld, operand: lo }, Negate { depth: rd, operand: ro }) => {
                ld == rd && pair(pending, lo, ro)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "ast_test.rs"]
mod tests;
