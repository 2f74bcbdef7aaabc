use super::{ArithmeticOp, Expr, ExprKind, Ident, Span};

fn int(value: i64, start: usize) -> Expr {
    Expr::new(ExprKind::IntLiteral(value), Span::new(start, start + 1))
}

#[test]
fn same_shape_ignores_spans() {
    let left = Expr::new(
        ExprKind::Arithmetic {
            op: ArithmeticOp::Add,
            left: Box::new(int(1, 0)),
            right: Box::new(int(2, 4)),
        },
        Span::new(0, 5),
    );
    let right = Expr::new(
        ExprKind::Arithmetic {
            op: ArithmeticOp::Add,
            left: Box::new(int(1, 1)),
            right: Box::new(int(2, 3)),
        },
        Span::new(1, 4),
    );
    assert!(left.same_shape(&right));
    assert_ne!(left, right);
}

#[test]
fn same_shape_detects_differences() {
    let sum = |op| {
        Expr::new(
            ExprKind::Arithmetic {
                op,
                left: Box::new(int(1, 0)),
                right: Box::new(int(2, 0)),
            },
            Span::default(),
        )
    };
    assert!(!sum(ArithmeticOp::Add).same_shape(&sum(ArithmeticOp::Sub)));
    assert!(!int(1, 0).same_shape(&Expr::new(ExprKind::UintLiteral(1), Span::default())));
}

#[test]
fn span_cover_takes_outer_bounds() {
    assert_eq!(Span::new(4, 6).cover(Span::new(1, 5)), Span::new(1, 6));
}

#[test]
fn serializes_to_json() {
    let expr = Expr::new(
        ExprKind::Identifier(Ident {
            name: "a".to_string(),
            leading_dot: true,
        }),
        Span::new(0, 2),
    );
    let json = serde_json::to_value(&expr).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "span": {"start": 0, "end": 2},
            "kind": {"identifier": {"name": "a", "leading_dot": true}}
        })
    );
    let null = serde_json::to_value(Expr::new(ExprKind::NullLiteral, Span::new(0, 4))).expect("serialize");
    assert_eq!(null["kind"], serde_json::json!("null_literal"));
}

fn left_chain(len: usize) -> Expr {
    let mut node = int(1, 0);
    for _ in 0..len {
        node = Expr::new(
            ExprKind::Arithmetic {
                op: ArithmeticOp::Add,
                left: Box::new(node),
                right: Box::new(int(1, 0)),
            },
            Span::default(),
        );
    }
    node
}

#[test]
fn deep_chains_compare_and_drop_without_recursion() {
    let left = left_chain(300_000);
    let right = left_chain(300_000);
    assert!(left.same_shape(&right));
    assert!(!left.same_shape(&left_chain(299_999)));
    drop(left);
    drop(right);
}

#[test]
fn into_kind_hands_over_children() {
    let ExprKind::Arithmetic { left, right, .. } = left_chain(2).into_kind() else {
        panic!("expected arithmetic");
    };
    assert!(matches!(left.kind, ExprKind::Arithmetic { .. }));
    assert!(right.same_shape(&int(1, 5)));
}
