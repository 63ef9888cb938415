use netscript_ast::{AssignOp, BinOp, CallArg, ExprKind, Stmt, UnaryOp};
use netscript_parse::{parse_expr, parse_source};

#[test]
fn function_header_with_params_and_returns() {
    let src = "def scale(x, factor) -> (y, z):\n    y = x * factor\n    z = y\n";
    let program = parse_source(src).expect("parse");
    assert_eq!(program.defs.len(), 1);
    let def = &program.defs[0];
    assert_eq!(def.name.node, "scale");
    let params: Vec<&str> = def.params.iter().map(|p| p.node.as_str()).collect();
    let returns: Vec<&str> = def.returns.iter().map(|r| r.node.as_str()).collect();
    assert_eq!(params, ["x", "factor"]);
    assert_eq!(returns, ["y", "z"]);
    assert_eq!(def.body.stmts.len(), 2);
}

#[test]
fn single_return_without_parens_and_no_return_clause() {
    let src = "def a(x) -> y:\n    y = x\n\ndef b():\n    Print(1)\n";
    let program = parse_source(src).expect("parse");
    assert_eq!(program.defs[0].returns.len(), 1);
    assert!(program.defs[1].returns.is_empty());
    assert!(program.defs[1].params.is_empty());
}

#[test]
fn multi_target_and_compound_assignment() {
    let src = "def f(x) -> (a, b):\n    a, _ = Split(x)\n    a += 2\n    b /= a\n";
    let program = parse_source(src).expect("parse");
    let stmts = &program.defs[0].body.stmts;

    let Stmt::Assign(split) = &stmts[0] else { panic!("expected assignment") };
    let targets: Vec<&str> = split.targets.iter().map(|t| t.node.as_str()).collect();
    assert_eq!(targets, ["a", "_"]);
    assert!(split.targets[1].is_discard());
    assert_eq!(split.op, AssignOp::Plain);

    let Stmt::Assign(add) = &stmts[1] else { panic!("expected assignment") };
    assert_eq!(add.op, AssignOp::Reduce(BinOp::Add));
    let Stmt::Assign(div) = &stmts[2] else { panic!("expected assignment") };
    assert_eq!(div.op, AssignOp::Reduce(BinOp::Div));
}

#[test]
fn if_else_and_while_blocks() {
    let src = r#"
def f(c, n) -> (a):
    if c:
        a = 1
    else:
        a = 2
    while a < n:
        a = a + 1
    Print(a)
"#;
    let program = parse_source(src).expect("parse");
    let stmts = &program.defs[0].body.stmts;
    assert_eq!(stmts.len(), 3);

    let Stmt::If(i) = &stmts[0] else { panic!("expected if") };
    assert_eq!(i.then_block.stmts.len(), 1);
    assert_eq!(i.else_block.as_ref().map(|b| b.stmts.len()), Some(1));

    let Stmt::While(w) = &stmts[1] else { panic!("expected while") };
    assert!(matches!(w.cond.kind, ExprKind::Binary { op: BinOp::Lt, .. }));
    assert!(matches!(stmts[2], Stmt::ExprStmt(_)));
}

#[test]
fn literal_suffixes_and_booleans() {
    let expr = parse_expr("[1, 2.5, 3LL, 1f, true, false]").expect("parse");
    let ExprKind::List(items) = expr.kind else { panic!("expected list") };
    let lits: Vec<(f64, String)> = items
        .into_iter()
        .map(|e| match e.kind {
            ExprKind::Const { value, suffix } => (value, suffix),
            other => panic!("expected literal, got {other:?}"),
        })
        .collect();
    let expected = [
        (1.0, "i"),
        (2.5, "f"),
        (3.0, "LL"),
        (1.0, "f"),
        (1.0, "b"),
        (0.0, "b"),
    ];
    for ((value, suffix), (ev, es)) in lits.iter().zip(expected) {
        assert_eq!(*value, ev);
        assert_eq!(suffix, es);
    }
}

#[test]
fn precedence_of_boolean_arithmetic_and_cast() {
    let expr = parse_expr("not a + b * c as float > d and e").expect("parse");
    let ExprKind::Binary { left, op: BinOp::And, .. } = expr.kind else {
        panic!("expected `and` at the root")
    };
    let ExprKind::Unary { op: UnaryOp::Not, expr: inner } = left.kind else {
        panic!("expected `not` under `and`")
    };
    let ExprKind::Binary { left: sum, op: BinOp::Gt, .. } = inner.kind else {
        panic!("expected comparison under `not`")
    };
    let ExprKind::Binary { right: product, op: BinOp::Add, .. } = sum.kind else {
        panic!("expected addition")
    };
    let ExprKind::Binary { right: cast, op: BinOp::Mul, .. } = product.kind else {
        panic!("expected multiplication")
    };
    assert!(matches!(cast.kind, ExprKind::Cast { ref ty, .. } if ty.node == "float"));
}

#[test]
fn ternary_is_right_associative() {
    let expr = parse_expr("a if c else b if d else e").expect("parse");
    let ExprKind::Cond { else_expr, .. } = expr.kind else { panic!("expected conditional") };
    assert!(matches!(else_expr.kind, ExprKind::Cond { .. }));
}

#[test]
fn unary_minus_is_distinct_from_subtraction() {
    let expr = parse_expr("-a - b").expect("parse");
    let ExprKind::Binary { left, op: BinOp::Sub, .. } = expr.kind else {
        panic!("expected subtraction")
    };
    assert!(matches!(left.kind, ExprKind::Unary { op: UnaryOp::Neg, .. }));
}

#[test]
fn call_with_positional_and_keyword_arguments() {
    let expr = parse_expr("FC(x, w, b, axis=1, shape=[2, 2])").expect("parse");
    let ExprKind::Call { callee, args } = expr.kind else { panic!("expected call") };
    assert_eq!(callee.node, "FC");
    assert_eq!(args.len(), 5);
    assert!(matches!(args[2], CallArg::Positional(_)));
    let CallArg::Named { name, value } = &args[4] else { panic!("expected keyword arg") };
    assert_eq!(name.node, "shape");
    assert!(matches!(&value.kind, ExprKind::List(items) if items.len() == 2));
}

#[test]
fn chained_comparisons_are_rejected() {
    let err = parse_expr("a < b < c").expect_err("expected parse error");
    assert!(
        err.message.contains("chained comparisons"),
        "unexpected error message: {}",
        err.message
    );
}

#[test]
fn top_level_statements_are_rejected() {
    let err = parse_source("x = 1\n").expect_err("expected parse error");
    assert!(err.message.contains("KwDef"), "unexpected error message: {}", err.message);
}

#[test]
fn lex_errors_surface_as_parse_errors() {
    let err = parse_source("def f():\n\tx = 1\n").expect_err("expected error");
    assert!(err.message.contains("tabs"));
}

#[test]
fn unterminated_block_is_rejected() {
    let err = parse_source("def f():\n").expect_err("expected error");
    assert!(err.message.contains("Indent"), "unexpected error message: {}", err.message);
}
