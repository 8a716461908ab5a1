//! String-level limit handlers, one per pagination style.

use super::scan::{
    from_position, lock_clause_position, order_by_span, select_insert_point, suffix_insert_point,
};
use super::{Limit, LimitHandler};
use crate::builder::SqlValue;
use crate::error::{DialectError, Result};
use crate::translate::Clause;

/// Renders the limit values as markers or inlined literals, in marker order.
/// Inlined values are clamped the same way bound ones are.
fn markers<H: LimitHandler + ?Sized>(handler: &H, limit: &Limit) -> Vec<String> {
    let variable = handler.supports_variable_limit();
    handler
        .ordered_values(limit)
        .into_iter()
        .map(|value| {
            if variable {
                String::from("?")
            } else {
                SqlValue::Int(i64::try_from(value).unwrap_or(i64::MAX)).to_sql_inline()
            }
        })
        .collect()
}

fn insert_at(sql: &str, pos: usize, text: &str) -> String {
    let mut out = String::with_capacity(sql.len() + text.len());
    out.push_str(&sql[..pos]);
    out.push_str(text);
    out.push_str(&sql[pos..]);
    out
}

/// Inserts `text` right after the main `SELECT` (or `SELECT DISTINCT`).
fn insert_after_select(name: &str, sql: &str, after_distinct: bool, text: &str) -> Result<String> {
    let pos = select_insert_point(sql, after_distinct).ok_or_else(|| {
        DialectError::mismatch(Clause::Fetch, name, "no SELECT found to limit")
    })?;
    Ok(insert_at(sql, pos, text))
}

/// Appends `text` before any lock clause.
fn insert_suffix(sql: &str, text: &str) -> String {
    insert_at(sql, suffix_insert_point(sql), text)
}

fn reject_offset(name: &str, limit: &Limit) -> Result<()> {
    if limit.has_offset() {
        return Err(DialectError::mismatch(
            Clause::Offset,
            name,
            "the limit clause cannot skip rows",
        ));
    }
    Ok(())
}

/// Splits off a trailing lock clause so wrapping handlers can re-append it.
fn split_lock_clause(sql: &str) -> (&str, &str) {
    let trimmed = sql.trim_end_matches(|c: char| c.is_whitespace() || c == ';');
    match lock_clause_position(trimmed) {
        Some(pos) => (trimmed[..pos].trim_end(), &trimmed[pos..]),
        None => (trimmed, ""),
    }
}

fn rejoin_lock_clause(mut sql: String, lock: &str) -> String {
    if !lock.is_empty() {
        sql.push(' ');
        sql.push_str(lock);
    }
    sql
}

/// Leaves the query untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLimitHandler;

impl LimitHandler for NoopLimitHandler {
    fn name(&self) -> &'static str {
        "none"
    }

    fn supports_limit(&self) -> bool {
        false
    }

    fn supports_offset(&self) -> bool {
        false
    }

    fn process_sql(&self, sql: &str, _limit: &Limit) -> Result<String> {
        Ok(sql.to_string())
    }
}

/// `offset ? rows fetch next ? rows only`.
#[derive(Debug, Clone, Copy)]
pub struct OffsetFetchLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
    /// ORDER BY item injected when the query has none.
    pub order_fallback: Option<&'static str>,
}

impl LimitHandler for OffsetFetchLimitHandler {
    fn name(&self) -> &'static str {
        "offset_fetch"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let clause = if limit.has_offset() {
            format!(" OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", m[0], m[1])
        } else {
            format!(" FETCH FIRST {} ROWS ONLY", m[0])
        };
        let mut sql = sql.to_string();
        if let Some(fallback) = self.order_fallback {
            if order_by_span(&sql).is_none() {
                sql = insert_suffix(&sql, &format!(" ORDER BY {fallback}"));
            }
        }
        Ok(insert_suffix(&sql, &clause))
    }
}

/// `limit ? offset ?`.
#[derive(Debug, Clone, Copy)]
pub struct LimitOffsetLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
}

impl LimitHandler for LimitOffsetLimitHandler {
    fn name(&self) -> &'static str {
        "limit_offset"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn bind_limit_parameters_in_reverse_order(&self) -> bool {
        true
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let clause = if limit.has_offset() {
            format!(" LIMIT {} OFFSET {}", m[0], m[1])
        } else {
            format!(" LIMIT {}", m[0])
        };
        Ok(insert_suffix(sql, &clause))
    }
}

/// `limit ?, ?` with the offset first.
#[derive(Debug, Clone, Copy)]
pub struct MySqlLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
}

impl LimitHandler for MySqlLimitHandler {
    fn name(&self) -> &'static str {
        "mysql_limit"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let clause = if limit.has_offset() {
            format!(" LIMIT {}, {}", m[0], m[1])
        } else {
            format!(" LIMIT {}", m[0])
        };
        Ok(insert_suffix(sql, &clause))
    }
}

/// `select top ?`.
#[derive(Debug, Clone, Copy)]
pub struct TopLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
    /// Write `top (?)`.
    pub parenthesized: bool,
}

impl LimitHandler for TopLimitHandler {
    fn name(&self) -> &'static str {
        "top"
    }

    fn supports_offset(&self) -> bool {
        false
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn bind_limit_parameters_first(&self) -> bool {
        true
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        reject_offset(self.name(), limit)?;
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let clause = if self.parenthesized {
            format!(" TOP ({})", m[0])
        } else {
            format!(" TOP {}", m[0])
        };
        insert_after_select(self.name(), sql, true, &clause)
    }
}

/// `select top ? start at ?` with a one-based start row.
#[derive(Debug, Clone, Copy)]
pub struct TopStartAtLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
}

impl LimitHandler for TopStartAtLimitHandler {
    fn name(&self) -> &'static str {
        "top_start_at"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn bind_limit_parameters_first(&self) -> bool {
        true
    }

    fn bind_limit_parameters_in_reverse_order(&self) -> bool {
        true
    }

    fn convert_to_first_row_value(&self, zero_based_offset: u64) -> u64 {
        zero_based_offset.saturating_add(1)
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let clause = if limit.has_offset() {
            format!(" TOP {} START AT {}", m[0], m[1])
        } else {
            format!(" TOP {}", m[0])
        };
        insert_after_select(self.name(), sql, true, &clause)
    }
}

/// `select skip ? first ?`.
#[derive(Debug, Clone, Copy)]
pub struct SkipFirstLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
}

impl LimitHandler for SkipFirstLimitHandler {
    fn name(&self) -> &'static str {
        "skip_first"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn bind_limit_parameters_first(&self) -> bool {
        true
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let clause = if limit.has_offset() {
            format!(" SKIP {} FIRST {}", m[0], m[1])
        } else {
            format!(" FIRST {}", m[0])
        };
        insert_after_select(self.name(), sql, false, &clause)
    }
}

/// `select first ?`.
#[derive(Debug, Clone, Copy)]
pub struct FirstLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
}

impl LimitHandler for FirstLimitHandler {
    fn name(&self) -> &'static str {
        "first"
    }

    fn supports_offset(&self) -> bool {
        false
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn bind_limit_parameters_first(&self) -> bool {
        true
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        reject_offset(self.name(), limit)?;
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        insert_after_select(self.name(), sql, false, &format!(" FIRST {}", m[0]))
    }
}

/// `select first ? skip ?`.
#[derive(Debug, Clone, Copy)]
pub struct FirstSkipLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
}

impl LimitHandler for FirstSkipLimitHandler {
    fn name(&self) -> &'static str {
        "first_skip"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn bind_limit_parameters_first(&self) -> bool {
        true
    }

    fn bind_limit_parameters_in_reverse_order(&self) -> bool {
        true
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let clause = if limit.has_offset() {
            format!(" FIRST {} SKIP {}", m[0], m[1])
        } else {
            format!(" FIRST {}", m[0])
        };
        insert_after_select(self.name(), sql, false, &clause)
    }
}

/// `rows ? to ?`: one-based first row, inclusive last row.
///
/// A limit of 20 rows at offset 40 renders `ROWS 41 TO 60`.
#[derive(Debug, Clone, Copy)]
pub struct RowsLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
}

impl LimitHandler for RowsLimitHandler {
    fn name(&self) -> &'static str {
        "rows_to"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn use_max_for_limit(&self) -> bool {
        true
    }

    fn convert_to_first_row_value(&self, zero_based_offset: u64) -> u64 {
        zero_based_offset.saturating_add(1)
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let clause = if limit.has_offset() {
            format!(" ROWS {} TO {}", m[0], m[1])
        } else {
            format!(" ROWS {}", m[0])
        };
        Ok(insert_suffix(sql, &clause))
    }
}

/// Nested subqueries filtering on `rownum`.
#[derive(Debug, Clone, Copy)]
pub struct RownumLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
}

impl LimitHandler for RownumLimitHandler {
    fn name(&self) -> &'static str {
        "rownum"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn use_max_for_limit(&self) -> bool {
        true
    }

    fn bind_limit_parameters_in_reverse_order(&self) -> bool {
        true
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let (body, lock) = split_lock_clause(sql);
        let wrapped = if limit.has_offset() {
            format!(
                "SELECT * FROM (SELECT row_.*, ROWNUM rownum_ FROM ({body}) row_ WHERE ROWNUM <= {}) WHERE rownum_ > {}",
                m[0], m[1]
            )
        } else {
            format!("SELECT * FROM ({body}) WHERE ROWNUM <= {}", m[0])
        };
        Ok(rejoin_lock_clause(wrapped, lock))
    }
}

/// Wrapping subquery filtering on `row_number() over (...)`.
///
/// The query's ORDER BY moves into the window so the numbering follows it.
#[derive(Debug, Clone, Copy)]
pub struct RowNumberLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
    /// Window ordering used when the query has no ORDER BY.
    pub order_fallback: Option<&'static str>,
}

impl LimitHandler for RowNumberLimitHandler {
    fn name(&self) -> &'static str {
        "row_number"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn use_max_for_limit(&self) -> bool {
        true
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let (body, lock) = split_lock_clause(sql);
        let (inner, order) = match order_by_span(body) {
            Some((start, end)) => (body[..start].trim_end(), Some(body[end..].trim())),
            None => (body, None),
        };
        let over = match (order, self.order_fallback) {
            (Some(order), _) => format!("ORDER BY {order}"),
            (None, Some(fallback)) => format!("ORDER BY {fallback}"),
            (None, None) => String::new(),
        };
        let numbered_column = format!(", ROW_NUMBER() OVER ({over}) AS rownumber_");
        let inner = match from_position(inner) {
            Some(pos) => format!("{}{numbered_column} {}", inner[..pos].trim_end(), &inner[pos..]),
            None => format!("{inner}{numbered_column}"),
        };
        let filter = if limit.has_offset() {
            format!("rownumber_ > {} AND rownumber_ <= {}", m[0], m[1])
        } else {
            format!("rownumber_ <= {}", m[0])
        };
        let wrapped =
            format!("SELECT * FROM ({inner}) row_ WHERE {filter} ORDER BY rownumber_");
        Ok(rejoin_lock_clause(wrapped, lock))
    }
}

/// `select limit ? ?` with the offset first.
#[derive(Debug, Clone, Copy)]
pub struct LegacyHsqlLimitHandler {
    /// Bind markers instead of literals.
    pub variable: bool,
}

impl LimitHandler for LegacyHsqlLimitHandler {
    fn name(&self) -> &'static str {
        "legacy_hsql"
    }

    fn supports_variable_limit(&self) -> bool {
        self.variable
    }

    fn bind_limit_parameters_first(&self) -> bool {
        true
    }

    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String> {
        if !limit.is_applied() {
            return Ok(sql.to_string());
        }
        let m = markers(self, limit);
        let clause = if limit.has_offset() {
            format!(" LIMIT {} {}", m[0], m[1])
        } else {
            format!(" TOP {}", m[0])
        };
        insert_after_select(self.name(), sql, false, &clause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::UNBOUNDED;

    const SQL: &str = "SELECT a FROM t WHERE b = ? ORDER BY a";

    #[test]
    fn test_offset_fetch() {
        let handler = OffsetFetchLimitHandler {
            variable: true,
            order_fallback: None,
        };
        let limit = Limit::new(Some(10), Some(5));
        assert_eq!(
            handler.process_sql(SQL, &limit).unwrap(),
            "SELECT a FROM t WHERE b = ? ORDER BY a OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
        );
        assert_eq!(handler.limit_values(&limit), vec![10, 5]);
    }

    #[test]
    fn test_offset_fetch_injects_order_and_keeps_lock_last() {
        let handler = OffsetFetchLimitHandler {
            variable: true,
            order_fallback: Some("@@VERSION"),
        };
        assert_eq!(
            handler
                .process_sql("SELECT a FROM t FOR UPDATE", &Limit::rows(3))
                .unwrap(),
            "SELECT a FROM t ORDER BY @@VERSION FETCH FIRST ? ROWS ONLY FOR UPDATE"
        );
    }

    #[test]
    fn test_literal_values_when_not_variable() {
        let handler = OffsetFetchLimitHandler {
            variable: false,
            order_fallback: None,
        };
        let limit = Limit::new(Some(10), Some(5));
        assert_eq!(
            handler.process_sql("SELECT a FROM t", &limit).unwrap(),
            "SELECT a FROM t OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
        );
        assert!(handler.limit_values(&limit).is_empty());
    }

    #[test]
    fn test_inlined_last_row_is_clamped_like_bound_values() {
        let limit = Limit::new(Some(40), None);
        let literal = RownumLimitHandler { variable: false };
        assert_eq!(
            literal.process_sql("SELECT a FROM t", &limit).unwrap(),
            format!(
                "SELECT * FROM (SELECT row_.*, ROWNUM rownum_ FROM (SELECT a FROM t) row_ WHERE ROWNUM <= {}) WHERE rownum_ > 40",
                i64::MAX
            )
        );
        let bound = RownumLimitHandler { variable: true }
            .apply("SELECT a FROM t", &limit, Vec::new())
            .unwrap();
        assert_eq!(bound.params, vec![SqlValue::Int(i64::MAX), SqlValue::Int(40)]);
        assert_eq!(literal.ordered_values(&limit), vec![UNBOUNDED + 40, 40]);
    }

    #[test]
    fn test_rows_to_is_one_based_inclusive() {
        let handler = RowsLimitHandler { variable: false };
        assert_eq!(
            handler
                .process_sql("SELECT a FROM t", &Limit::new(Some(40), Some(20)))
                .unwrap(),
            "SELECT a FROM t ROWS 41 TO 60"
        );
    }

    #[test]
    fn test_first_skip_binds_first_in_reverse() {
        let handler = FirstSkipLimitHandler { variable: true };
        let query = handler
            .apply(
                "SELECT a FROM t WHERE b = ?",
                &Limit::new(Some(40), Some(20)),
                vec![SqlValue::Text(String::from("x"))],
            )
            .unwrap();
        assert_eq!(query.sql, "SELECT FIRST ? SKIP ? a FROM t WHERE b = ?");
        assert_eq!(
            query.params,
            vec![
                SqlValue::Int(20),
                SqlValue::Int(40),
                SqlValue::Text(String::from("x"))
            ]
        );
    }

    #[test]
    fn test_top_after_distinct_and_rejects_offset() {
        let handler = TopLimitHandler {
            variable: true,
            parenthesized: true,
        };
        assert_eq!(
            handler
                .process_sql("SELECT DISTINCT a FROM t", &Limit::rows(5))
                .unwrap(),
            "SELECT DISTINCT TOP (?) a FROM t"
        );
        let err = handler
            .process_sql("SELECT a FROM t", &Limit::new(Some(1), Some(5)))
            .unwrap_err();
        assert!(err.is_capability_mismatch());
    }

    #[test]
    fn test_rownum_wraps() {
        let handler = RownumLimitHandler { variable: true };
        let limit = Limit::new(Some(10), Some(5));
        assert_eq!(
            handler.process_sql(SQL, &limit).unwrap(),
            "SELECT * FROM (SELECT row_.*, ROWNUM rownum_ FROM (SELECT a FROM t WHERE b = ? ORDER BY a) row_ WHERE ROWNUM <= ?) WHERE rownum_ > ?"
        );
        assert_eq!(handler.limit_values(&limit), vec![15, 10]);
    }

    #[test]
    fn test_row_number_moves_order_into_window() {
        let handler = RowNumberLimitHandler {
            variable: true,
            order_fallback: None,
        };
        let limit = Limit::new(Some(10), Some(5));
        assert_eq!(
            handler.process_sql(SQL, &limit).unwrap(),
            "SELECT * FROM (SELECT a, ROW_NUMBER() OVER (ORDER BY a) AS rownumber_ FROM t WHERE b = ?) row_ WHERE rownumber_ > ? AND rownumber_ <= ? ORDER BY rownumber_"
        );
        assert_eq!(handler.limit_values(&limit), vec![10, 15]);
    }

    #[test]
    fn test_noop_ignores_limit() {
        let query = NoopLimitHandler
            .apply("SELECT a FROM t", &Limit::rows(5), Vec::new())
            .unwrap();
        assert_eq!(query.sql, "SELECT a FROM t");
        assert!(query.params.is_empty());
    }
}
