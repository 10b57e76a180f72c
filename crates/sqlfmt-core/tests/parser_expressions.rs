//! Tests for expression parsing: precedence, IS NULL, CASE, calls and
//! literals.

mod common;
use common::*;

use sqlfmt_core::ast::{BinaryOp, Expr, LitKind, UnaryOp};

fn binary(expr: &Expr) -> (BinaryOp, &Expr, &Expr) {
    match expr {
        Expr::Binary(b) => (b.op, &b.x, &b.y),
        other => panic!("Expected binary expression, got {other:?}"),
    }
}

fn ident_name(expr: &Expr) -> &str {
    match expr {
        Expr::Ident(i) => &i.name,
        other => panic!("Expected identifier, got {other:?}"),
    }
}

fn lit_value(expr: &Expr) -> (&str, LitKind) {
    match expr {
        Expr::BasicLit(l) => (&l.value, l.kind),
        other => panic!("Expected literal, got {other:?}"),
    }
}

// ===================================================================
// Precedence
// ===================================================================

#[test]
fn and_binds_comparisons() {
    let cond = where_cond(
        "select id, username from id_mst, user_mst \
         where id_mst.id = user_mst.id and user_mst.dt > '2015-12-01'",
    );
    let (op, x, y) = binary(&cond);
    assert_eq!(op, BinaryOp::And);
    assert_eq!(binary(x).0, BinaryOp::Eq);
    let (gt, dt, date) = binary(y);
    assert_eq!(gt, BinaryOp::Gt);
    assert_eq!(ident_name(dt), "dt");
    assert_eq!(lit_value(date), ("'2015-12-01'", LitKind::String));
}

#[test]
fn or_is_weaker_than_and() {
    // a = 1 or b = 2 and c = 3  ->  a = 1 or (b = 2 and c = 3)
    let cond = where_cond("select x from t where a = 1 or b = 2 and c = 3");
    let (op, _, y) = binary(&cond);
    assert_eq!(op, BinaryOp::Or);
    assert_eq!(binary(y).0, BinaryOp::And);
}

#[test]
fn arithmetic_precedence() {
    // a + b * c % d - e  ->  (a + ((b * c) % d)) - e
    let expr = first_column("select a + b * c % d - e from t");
    let (sub, lhs, e) = binary(&expr);
    assert_eq!(sub, BinaryOp::Sub);
    assert_eq!(ident_name(e), "e");
    let (add, a, rem) = binary(lhs);
    assert_eq!(add, BinaryOp::Add);
    assert_eq!(ident_name(a), "a");
    let (modulo, mul, _) = binary(rem);
    assert_eq!(modulo, BinaryOp::Mod);
    assert_eq!(binary(mul).0, BinaryOp::Mul);
}

#[test]
fn comparison_binds_weaker_than_arithmetic() {
    let cond = where_cond("select x from t where a + 1 >= b * 2");
    let (op, x, y) = binary(&cond);
    assert_eq!(op, BinaryOp::GtEq);
    assert_eq!(binary(x).0, BinaryOp::Add);
    assert_eq!(binary(y).0, BinaryOp::Mul);
}

#[test]
fn not_equal_spellings() {
    for sql in [
        "select x from t where a <> b",
        "select x from t where a != b",
    ] {
        assert_eq!(binary(&where_cond(sql)).0, BinaryOp::NotEq);
    }
    assert_eq!(
        binary(&where_cond("select x from t where a <= b")).0,
        BinaryOp::LtEq
    );
}

#[test]
fn parentheses_override_precedence() {
    let expr = first_column("select (a + b) * c from t");
    let (op, x, _) = binary(&expr);
    assert_eq!(op, BinaryOp::Mul);
    let Expr::Paren(paren) = x else {
        panic!("expected parenthesised expression");
    };
    assert_eq!(binary(&paren.x).0, BinaryOp::Add);
}

// ===================================================================
// Unary operators and literals
// ===================================================================

#[test]
fn unary_minus_on_identifier() {
    let expr = first_column("select -a * b from t");
    let (op, x, _) = binary(&expr);
    assert_eq!(op, BinaryOp::Mul);
    assert!(matches!(x, Expr::Unary(u) if u.op == UnaryOp::Neg));
}

#[test]
fn unary_plus() {
    let expr = first_column("select +a from t");
    assert!(matches!(expr, Expr::Unary(u) if u.op == UnaryOp::Plus));
}

#[test]
fn negative_literal() {
    let cond = where_cond("select x from t where a = -1");
    let (_, _, y) = binary(&cond);
    assert_eq!(lit_value(y), ("-1", LitKind::Int));
}

#[test]
fn minus_between_operands_is_subtraction() {
    let expr = first_column("select a -1 from t");
    let (op, _, y) = binary(&expr);
    assert_eq!(op, BinaryOp::Sub);
    assert_eq!(lit_value(y), ("1", LitKind::Int));
}

#[test]
fn multiply_by_negative_literal() {
    let expr = first_column("select a * -1.5 from t");
    let (op, _, y) = binary(&expr);
    assert_eq!(op, BinaryOp::Mul);
    assert_eq!(lit_value(y), ("-1.5", LitKind::Real));
}

#[test]
fn literal_kinds() {
    let s = parse_select("select 42, 3.14, 1e10, 'text', * from t");
    let kinds: Vec<_> = s
        .select
        .cols
        .iter()
        .map(|c| lit_value(&c.expr).1)
        .collect();
    assert_eq!(
        kinds,
        [
            LitKind::Int,
            LitKind::Real,
            LitKind::Real,
            LitKind::String,
            LitKind::Wildcard
        ]
    );
}

// ===================================================================
// IS NULL
// ===================================================================

#[test]
fn is_null_on_qualified_ident() {
    let cond = where_cond("select c from t where t.v is null");
    let Expr::IsNull(is_null) = cond else {
        panic!("expected IS NULL");
    };
    let Expr::Ident(ident) = is_null.x.as_ref() else {
        panic!("expected identifier");
    };
    assert_eq!(ident.table.as_deref(), Some("t"));
    assert_eq!(ident.name, "v");
}

#[test]
fn is_null_joined_by_and() {
    let cond = where_cond("select c from t where a is null and b is null");
    let (op, x, y) = binary(&cond);
    assert_eq!(op, BinaryOp::And);
    assert!(matches!(x, Expr::IsNull(_)));
    assert!(matches!(y, Expr::IsNull(_)));
}

#[test]
fn is_null_attaches_to_operand() {
    // The predicate applies to the operand it follows, not the whole sum.
    let cond = where_cond("select c from t where a + b is null");
    let (op, _, y) = binary(&cond);
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(y, Expr::IsNull(_)));
}

#[test]
fn is_null_on_parenthesised_expression() {
    let cond = where_cond("select c from t where (a + b) is null");
    let Expr::IsNull(is_null) = cond else {
        panic!("expected IS NULL");
    };
    assert!(matches!(is_null.x.as_ref(), Expr::Paren(_)));
}

// ===================================================================
// Function calls
// ===================================================================

#[test]
fn count_star() {
    let expr = first_column("select count(*) from tbl;");
    let Expr::Call(call) = expr else {
        panic!("expected call");
    };
    assert_eq!(call.func_name, "count");
    assert_eq!(call.args.len(), 1);
    assert_eq!(lit_value(&call.args[0]), ("*", LitKind::Wildcard));
}

#[test]
fn call_without_arguments() {
    let Expr::Call(call) = first_column("select now() from t") else {
        panic!("expected call");
    };
    assert!(call.args.is_empty());
}

#[test]
fn call_with_expression_arguments() {
    let Expr::Call(call) = first_column("select coalesce(a.x, b + 1, 'none') from t") else {
        panic!("expected call");
    };
    assert_eq!(call.args.len(), 3);
    assert!(matches!(&call.args[0], Expr::Ident(i) if i.table.as_deref() == Some("a")));
    assert_eq!(binary(&call.args[1]).0, BinaryOp::Add);
}

#[test]
fn nested_calls() {
    let Expr::Call(outer) = first_column("select upper(trim(name)) from t") else {
        panic!("expected call");
    };
    assert!(matches!(&outer.args[0], Expr::Call(inner) if inner.func_name == "trim"));
}

// ===================================================================
// CASE
// ===================================================================

#[test]
fn searched_case() {
    let expr =
        first_column("select case when code > 1 then '1' when code < 2 then '2' end from tbl");
    let Expr::Case(case) = expr else {
        panic!("expected CASE");
    };
    assert!(!case.has_switch_key());
    assert_eq!(case.whens.len(), 2);
    assert!(case.else_clause.is_none());

    let (op, x, y) = binary(&case.whens[0].cond);
    assert_eq!(op, BinaryOp::Gt);
    assert_eq!(ident_name(x), "code");
    assert_eq!(lit_value(y), ("1", LitKind::Int));
    assert_eq!(lit_value(&case.whens[1].result), ("'2'", LitKind::String));
}

#[test]
fn simple_case_with_else() {
    let Expr::Case(case) = first_column("select case kind when 1 then 'a' else 'b' end from t")
    else {
        panic!("expected CASE");
    };
    assert!(case.has_switch_key());
    assert_eq!(ident_name(case.switch_key.as_deref().unwrap()), "kind");
    assert_eq!(
        lit_value(&case.else_clause.as_ref().unwrap().result),
        ("'b'", LitKind::String)
    );
}

#[test]
fn nested_case() {
    let sql = "select case when a = 1 then case when b = 2 then 'x' end else 'y' end from t";
    let Expr::Case(outer) = first_column(sql) else {
        panic!("expected CASE");
    };
    assert!(matches!(&outer.whens[0].result, Expr::Case(inner) if inner.whens.len() == 1));
    assert!(outer.else_clause.is_some());
}

#[test]
fn case_in_where_and_arithmetic() {
    let cond = where_cond("select a from t where case when a > 0 then a else 0 end + 1 > 2");
    let (op, x, _) = binary(&cond);
    assert_eq!(op, BinaryOp::Gt);
    let (add, case, _) = binary(x);
    assert_eq!(add, BinaryOp::Add);
    assert!(matches!(case, Expr::Case(_)));
}
