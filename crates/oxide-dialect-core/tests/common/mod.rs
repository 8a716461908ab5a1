#![allow(dead_code)]

use oxide_dialect_core::ast::{Expr, OrderBy, SelectStatement};
use oxide_dialect_core::builder::Select;
use oxide_dialect_core::{
    translate, DatabaseVersion, Dialect, DialectError, DialectFamily, Statement, Translation,
};

pub fn dialect(family: DialectFamily, version: &str) -> Dialect {
    let version: DatabaseVersion = version
        .parse()
        .unwrap_or_else(|e| panic!("Bad version {version}: {e:?}"));
    Dialect::new(family, version)
}

pub fn translate_ok(statement: impl Into<Statement>, dialect: &Dialect) -> Translation {
    let statement = statement.into();
    translate(&statement, dialect)
        .unwrap_or_else(|e| panic!("Failed to translate for {dialect}: {statement:?}\nError: {e:?}"))
}

pub fn translate_err(statement: impl Into<Statement>, dialect: &Dialect) -> DialectError {
    let statement = statement.into();
    match translate(&statement, dialect) {
        Ok(translation) => panic!(
            "Expected translation error for {dialect}, got: {}",
            translation.sql
        ),
        Err(e) => e,
    }
}

pub fn marker_count(sql: &str) -> usize {
    sql.matches('?').count()
}

/// `SELECT a FROM t [WHERE b0 = ? AND ...] ORDER BY a`, one filter per
/// value, with optional offset and limit parameters.
pub fn filtered(values: &[&str], offset: Option<i64>, limit: Option<i64>) -> SelectStatement {
    let mut select = Select::new()
        .columns(&["a"])
        .from("t")
        .order_by(OrderBy::asc(Expr::column("a")));
    let filter = values
        .iter()
        .enumerate()
        .map(|(i, value)| Expr::column(format!("b{i}")).eq(Expr::param(*value)))
        .reduce(Expr::and);
    if let Some(filter) = filter {
        select = select.where_clause(filter);
    }
    if let Some(offset) = offset {
        select = select.offset(offset);
    }
    if let Some(limit) = limit {
        select = select.limit(limit);
    }
    select.build()
}

pub fn page(offset: i64, limit: i64) -> SelectStatement {
    filtered(&["x"], Some(offset), Some(limit))
}
