//! Golden translations of one paged query across the dialect fleet.
//!
//! Every case renders `SELECT a FROM t WHERE b0 = ? ORDER BY a` with an
//! offset of 40 and a limit of 20.

mod common;
use common::*;

use oxide_dialect_core::builder::{Insert, SqlValue};
use oxide_dialect_core::DialectFamily;
use pretty_assertions::assert_eq;

fn x() -> SqlValue {
    SqlValue::Text(String::from("x"))
}

const fn int(value: i64) -> SqlValue {
    SqlValue::Int(value)
}

fn check(family: DialectFamily, version: &str, sql: &str, params: &[SqlValue]) {
    let dialect = dialect(family, version);
    let translation = translate_ok(page(40, 20), &dialect);
    assert_eq!(translation.sql, sql, "{dialect}");
    assert_eq!(translation.params, params, "{dialect}");
}

#[test]
fn postgresql_offset_fetch() {
    check(
        DialectFamily::PostgreSql,
        "16",
        "SELECT a FROM t WHERE b0 = ? ORDER BY a OFFSET ? ROWS FETCH NEXT ? ROWS ONLY",
        &[x(), int(40), int(20)],
    );
}

#[test]
fn postgresql_limit_offset() {
    check(
        DialectFamily::PostgreSql,
        "8.3",
        "SELECT a FROM t WHERE b0 = ? ORDER BY a LIMIT ? OFFSET ?",
        &[x(), int(20), int(40)],
    );
}

#[test]
fn mysql_limit() {
    check(
        DialectFamily::MySql,
        "5.7",
        "SELECT a FROM t WHERE b0 = ? ORDER BY a LIMIT ?, ?",
        &[x(), int(40), int(20)],
    );
}

#[test]
fn oracle_rownum() {
    check(
        DialectFamily::Oracle,
        "11.2",
        "SELECT * FROM (SELECT row_.*, ROWNUM rownum_ FROM (SELECT a FROM t WHERE b0 = ? ORDER BY a) row_ WHERE ROWNUM <= ?) WHERE rownum_ > ?",
        &[x(), int(60), int(40)],
    );
}

#[test]
fn oracle_offset_fetch() {
    check(
        DialectFamily::Oracle,
        "19",
        "SELECT a FROM t WHERE b0 = ? ORDER BY a OFFSET ? ROWS FETCH NEXT ? ROWS ONLY",
        &[x(), int(40), int(20)],
    );
}

#[test]
fn sqlserver_row_number_window() {
    check(
        DialectFamily::SqlServer,
        "10",
        "SELECT * FROM (SELECT a, ROW_NUMBER() OVER (ORDER BY a) AS rownumber_ FROM t WHERE b0 = ?) row_ WHERE rownumber_ > ? AND rownumber_ <= ? ORDER BY rownumber_",
        &[x(), int(40), int(60)],
    );
}

#[test]
fn sqlserver_offset_fetch() {
    check(
        DialectFamily::SqlServer,
        "16",
        "SELECT a FROM t WHERE b0 = ? ORDER BY a OFFSET ? ROWS FETCH NEXT ? ROWS ONLY",
        &[x(), int(40), int(20)],
    );
}

#[test]
fn db2_row_number_window() {
    check(
        DialectFamily::Db2,
        "10.5",
        "SELECT * FROM (SELECT a, ROW_NUMBER() OVER (ORDER BY a) AS rownumber_ FROM t WHERE b0 = ?) row_ WHERE rownumber_ > ? AND rownumber_ <= ? ORDER BY rownumber_",
        &[x(), int(40), int(60)],
    );
}

#[test]
fn derby_inlines_limits_before_10_6() {
    check(
        DialectFamily::Derby,
        "10.5",
        "SELECT a FROM t WHERE b0 = ? ORDER BY a OFFSET 40 ROWS FETCH NEXT 20 ROWS ONLY",
        &[x()],
    );
}

#[test]
fn firebird_first_skip() {
    check(
        DialectFamily::Firebird,
        "2.5",
        "SELECT FIRST ? SKIP ? a FROM t WHERE b0 = ? ORDER BY a",
        &[int(20), int(40), x()],
    );
}

#[test]
fn interbase_rows_to() {
    check(
        DialectFamily::InterBase,
        "7",
        "SELECT a FROM t WHERE b0 = ? ORDER BY a ROWS ? TO ?",
        &[x(), int(41), int(60)],
    );
}

#[test]
fn informix_skip_first() {
    check(
        DialectFamily::Informix,
        "12",
        "SELECT SKIP ? FIRST ? a FROM t WHERE b0 = ? ORDER BY a",
        &[int(40), int(20), x()],
    );
}

#[test]
fn sqlanywhere_top_start_at() {
    check(
        DialectFamily::SqlAnywhere,
        "17",
        "SELECT TOP ? START AT ? a FROM t WHERE b0 = ? ORDER BY a",
        &[int(20), int(41), x()],
    );
}

#[test]
fn hsqldb_legacy_limit() {
    check(
        DialectFamily::HsqlDb,
        "1.8",
        "SELECT LIMIT ? ? a FROM t WHERE b0 = ? ORDER BY a",
        &[int(40), int(20), x()],
    );
}

#[test]
fn iris_emulates_offset_with_row_number() {
    check(
        DialectFamily::Iris,
        "2023.1",
        "SELECT * FROM (SELECT a, ROW_NUMBER() OVER (ORDER BY a) AS rownumber_ FROM t WHERE b0 = ?) row_ WHERE rownumber_ > ? AND rownumber_ <= ? ORDER BY rownumber_",
        &[x(), int(40), int(60)],
    );
}

#[test]
fn sqlite_limit_offset() {
    check(
        DialectFamily::Sqlite,
        "3.45",
        "SELECT a FROM t WHERE b0 = ? ORDER BY a LIMIT ? OFFSET ?",
        &[x(), int(20), int(40)],
    );
}

#[test]
fn rows_only_limit_without_offset() {
    let sqlserver = dialect(DialectFamily::SqlServer, "8");
    let translation = translate_ok(filtered(&["x"], None, Some(5)), &sqlserver);
    assert_eq!(translation.sql, "SELECT TOP 5 a FROM t WHERE b0 = ? ORDER BY a");
    assert_eq!(translation.params, vec![x()]);

    let informix = dialect(DialectFamily::Informix, "10");
    let translation = translate_ok(filtered(&["x"], None, Some(5)), &informix);
    assert_eq!(translation.sql, "SELECT FIRST 5 a FROM t WHERE b0 = ? ORDER BY a");
}

#[test]
fn json_parameters_are_cast_before_mysql_8() {
    let insert = Insert::new()
        .into_table("docs")
        .columns(&["body"])
        .values(vec![serde_json::json!([1, 2, 3]).into()])
        .build();

    let mysql57 = dialect(DialectFamily::MySql, "5.7");
    assert_eq!(
        translate_ok(insert.clone(), &mysql57).sql,
        "INSERT INTO docs (body) VALUES (CAST(? AS JSON))"
    );
    let mysql8 = dialect(DialectFamily::MySql, "8.0.30");
    assert_eq!(
        translate_ok(insert, &mysql8).sql,
        "INSERT INTO docs (body) VALUES (?)"
    );
}

#[test]
fn translation_is_repeatable() {
    for family in DialectFamily::ALL {
        let dialect = dialect(*family, "unknown");
        let statement = page(40, 20).into();
        let first = oxide_dialect_core::translate(&statement, &dialect);
        let second = oxide_dialect_core::translate(&statement, &dialect);
        match (first, second) {
            (Ok(a), Ok(b)) => assert_eq!(a, b, "{dialect}"),
            (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string(), "{dialect}"),
            (a, b) => panic!("{dialect}: {a:?} then {b:?}"),
        }
    }
}
