//! Portable function names rendered in each vendor's spelling.

mod common;
use common::*;

use oxide_dialect_core::ast::{Expr, SelectStatement};
use oxide_dialect_core::builder::{Select, SqlValue};
use oxide_dialect_core::{DialectError, DialectFamily};
use pretty_assertions::assert_eq;

fn text(value: &str) -> SqlValue {
    SqlValue::Text(String::from(value))
}

/// `SELECT a FROM t WHERE <call> > 0 AND b = ?` so the trailing filter
/// checks that values bound after the call stay in place.
fn calling(call: Expr) -> SelectStatement {
    Select::new()
        .columns(&["a"])
        .from("t")
        .where_clause(
            call.gt(Expr::integer(0))
                .and(Expr::column("b").eq(Expr::param("tail"))),
        )
        .build()
}

fn locate() -> Expr {
    Expr::function("locate", vec![Expr::param("x"), Expr::column("title")])
}

fn substring_from(column: &str) -> Expr {
    Expr::function("substring", vec![Expr::column(column), Expr::param(3_i64)])
}

#[test]
fn sqlserver_spellings() {
    let sqlserver = dialect(DialectFamily::SqlServer, "16");

    let translation = translate_ok(calling(locate()), &sqlserver);
    assert_eq!(
        translation.sql,
        "SELECT a FROM t WHERE charindex(?, title) > 0 AND b = ?"
    );
    assert_eq!(translation.params, vec![text("x"), text("tail")]);

    let length = Expr::function("length", vec![Expr::column("title")]);
    let translation = translate_ok(calling(length), &sqlserver);
    assert_eq!(translation.sql, "SELECT a FROM t WHERE len(title) > 0 AND b = ?");
}

#[test]
fn repeated_slot_binds_its_value_again() {
    let sqlserver = dialect(DialectFamily::SqlServer, "16");
    let call = Expr::function("substring", vec![Expr::param("abc"), Expr::param(2_i64)]);
    let translation = translate_ok(calling(call), &sqlserver);
    assert_eq!(
        translation.sql,
        "SELECT a FROM t WHERE substring(?,?,len(?)-?+1) > 0 AND b = ?"
    );
    assert_eq!(marker_count(&translation.sql), translation.params.len());
    assert_eq!(
        translation.params,
        vec![
            text("abc"),
            SqlValue::Int(2),
            text("abc"),
            SqlValue::Int(2),
            text("tail"),
        ]
    );
}

#[test]
fn oracle_reorders_arguments() {
    let oracle = dialect(DialectFamily::Oracle, "19");

    let translation = translate_ok(calling(locate()), &oracle);
    assert_eq!(
        translation.sql,
        "SELECT a FROM t WHERE instr(title,?) > 0 AND b = ?"
    );
    assert_eq!(translation.params, vec![text("x"), text("tail")]);

    let translation = translate_ok(calling(substring_from("title")), &oracle);
    assert_eq!(translation.sql, "SELECT a FROM t WHERE substr(title, ?) > 0 AND b = ?");
    assert_eq!(translation.params, vec![SqlValue::Int(3), text("tail")]);
}

#[test]
fn postgresql_uses_standard_forms() {
    let postgres = dialect(DialectFamily::PostgreSql, "16");

    let translation = translate_ok(calling(locate()), &postgres);
    assert_eq!(
        translation.sql,
        "SELECT a FROM t WHERE position(? in title) > 0 AND b = ?"
    );

    let translation = translate_ok(calling(substring_from("title")), &postgres);
    assert_eq!(
        translation.sql,
        "SELECT a FROM t WHERE substring(title from ?) > 0 AND b = ?"
    );
    assert_eq!(translation.params, vec![SqlValue::Int(3), text("tail")]);
}

#[test]
fn unknown_functions_are_written_as_called() {
    for (family, version) in [
        (DialectFamily::SqlServer, "16"),
        (DialectFamily::Oracle, "19"),
        (DialectFamily::MySql, "8.0.30"),
    ] {
        let dialect = dialect(family, version);
        let call = Expr::function("my_score", vec![Expr::column("title"), Expr::param("x")]);
        let translation = translate_ok(calling(call), &dialect);
        assert_eq!(
            translation.sql,
            "SELECT a FROM t WHERE my_score(title, ?) > 0 AND b = ?",
            "{dialect}"
        );
    }
}

#[test]
fn unregistered_arity_is_written_as_called() {
    let oracle = dialect(DialectFamily::Oracle, "19");
    let call = Expr::function("locate", vec![Expr::param("x")]);
    let translation = translate_ok(calling(call), &oracle);
    assert_eq!(translation.sql, "SELECT a FROM t WHERE locate(?) > 0 AND b = ?");
    assert_eq!(translation.params, vec![text("x"), text("tail")]);
}

#[test]
fn distinct_call_through_pattern_is_rejected() {
    use oxide_dialect_core::ast::FunctionCall;

    let oracle = dialect(DialectFamily::Oracle, "19");
    let call = Expr::Function(FunctionCall {
        name: String::from("locate"),
        args: vec![Expr::param("x"), Expr::column("title")],
        distinct: true,
    });
    let error = translate_err(calling(call), &oracle);
    assert!(
        matches!(error, DialectError::CapabilityMismatch { .. }),
        "{error:?}"
    );
}
