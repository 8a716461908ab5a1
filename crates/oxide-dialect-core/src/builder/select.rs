//! SELECT tree builder using the typestate pattern.
//!
//! `build()` is only available once both the select list and FROM are set,
//! so the builder cannot produce a query part without a source.

use std::marker::PhantomData;

use crate::ast::{
    Expr, FetchClause, LockClause, LockTarget, OrderBy, SelectColumn, SelectStatement,
    SetOperator, TableRef, WithClause,
};
use crate::strategy::{FetchClauseType, LockMode, LockTimeout};

use super::value::ToSqlValue;

// Typestate markers (zero-sized types)

/// Marker: No columns specified yet.
pub struct NoColumns;
/// Marker: Columns have been specified.
pub struct HasColumns;
/// Marker: No FROM clause specified yet.
pub struct NoFrom;
/// Marker: FROM clause has been specified.
pub struct HasFrom;

/// Builds a [`SelectStatement`].
///
/// ```rust
/// use oxide_dialect_core::builder::Select;
/// use oxide_dialect_core::ast::{Expr, OrderBy};
///
/// let query = Select::new()
///     .columns(&["id", "name"])
///     .from("users")
///     .where_clause(Expr::column("active").eq(Expr::param(true)))
///     .order_by(OrderBy::asc(Expr::column("name")))
///     .offset(10)
///     .limit(5)
///     .build();
///
/// assert_eq!(query.columns.len(), 2);
/// assert!(query.fetch.is_some());
/// ```
pub struct Select<Cols, From> {
    inner: SelectStatement,
    _state: PhantomData<(Cols, From)>,
}

impl Select<NoColumns, NoFrom> {
    /// Creates a new SELECT builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: SelectStatement::default(),
            _state: PhantomData,
        }
    }
}

impl Default for Select<NoColumns, NoFrom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cols, From> Select<Cols, From> {
    const fn transition<C, F>(inner: SelectStatement) -> Select<C, F> {
        Select {
            inner,
            _state: PhantomData,
        }
    }

    /// Attaches a WITH clause.
    #[must_use]
    pub fn with(mut self, with: WithClause) -> Self {
        self.inner.with = Some(with);
        self
    }
}

// Transition: NoColumns -> HasColumns
impl<From> Select<NoColumns, From> {
    /// Specifies the columns to select by name.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Select<HasColumns, From> {
        self.inner.columns = cols
            .iter()
            .map(|name| SelectColumn::new(Expr::column(*name)))
            .collect();
        Self::transition(self.inner)
    }

    /// Specifies the select list as expressions.
    #[must_use]
    pub fn items(mut self, items: Vec<SelectColumn>) -> Select<HasColumns, From> {
        self.inner.columns = items;
        Self::transition(self.inner)
    }

    /// Selects all columns (*).
    #[must_use]
    pub fn all(mut self) -> Select<HasColumns, From> {
        self.inner.columns = vec![SelectColumn::new(Expr::Wildcard { table: None })];
        Self::transition(self.inner)
    }
}

// Transition: NoFrom -> HasFrom
impl<Cols> Select<Cols, NoFrom> {
    /// Specifies the table to select from.
    #[must_use]
    pub fn from(self, table: &str) -> Select<Cols, HasFrom> {
        self.from_ref(TableRef::table(table))
    }

    /// Specifies an arbitrary table reference.
    #[must_use]
    pub fn from_ref(mut self, table: TableRef) -> Select<Cols, HasFrom> {
        self.inner.from = Some(table);
        Self::transition(self.inner)
    }
}

// Methods available with columns
impl<From> Select<HasColumns, From> {
    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.inner.distinct = true;
        self
    }
}

// Methods available after FROM
impl<Cols> Select<Cols, HasFrom> {
    /// Adds a WHERE clause. Repeated calls are combined with AND.
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.inner.where_clause = Some(match self.inner.where_clause.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Adds GROUP BY expressions.
    #[must_use]
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.inner.group_by.extend(exprs);
        self
    }

    /// Adds a HAVING clause.
    #[must_use]
    pub fn having(mut self, expr: Expr) -> Self {
        self.inner.having = Some(expr);
        self
    }

    /// Adds an ORDER BY item.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.inner.order_by.push(order);
        self
    }

    /// Skips rows. The value is bound as a parameter.
    #[must_use]
    pub fn offset<T: ToSqlValue>(mut self, offset: T) -> Self {
        self.fetch_mut().offset = Some(Expr::param(offset));
        self
    }

    /// Limits rows. The value is bound as a parameter.
    #[must_use]
    pub fn limit<T: ToSqlValue>(mut self, limit: T) -> Self {
        self.fetch_mut().limit = Some(Expr::param(limit));
        self
    }

    /// Sets the fetch clause type (percent, with ties).
    #[must_use]
    pub fn fetch_type(mut self, fetch_type: FetchClauseType) -> Self {
        self.fetch_mut().fetch_type = fetch_type;
        self
    }

    /// Requests a row lock on every table.
    #[must_use]
    pub fn lock(self, mode: LockMode, timeout: LockTimeout) -> Self {
        self.lock_of(mode, timeout, Vec::new())
    }

    /// Requests a row lock on specific tables.
    #[must_use]
    pub fn lock_of(mut self, mode: LockMode, timeout: LockTimeout, targets: Vec<LockTarget>) -> Self {
        self.inner.lock = Some(LockClause {
            mode,
            timeout,
            targets,
        });
        self
    }

    /// Combines another query part.
    #[must_use]
    pub fn set_operation(mut self, op: SetOperator, other: SelectStatement) -> Self {
        self.inner.set_operations.push((op, other));
        self
    }

    fn fetch_mut(&mut self) -> &mut FetchClause {
        self.inner.fetch.get_or_insert(FetchClause {
            offset: None,
            limit: None,
            fetch_type: FetchClauseType::RowsOnly,
        })
    }
}

// Build is only available when both columns and FROM are specified
impl Select<HasColumns, HasFrom> {
    /// Returns the statement tree.
    #[must_use]
    pub fn build(self) -> SelectStatement {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SqlValue;

    #[test]
    fn test_where_clauses_are_anded() {
        let query = Select::new()
            .columns(&["id"])
            .from("users")
            .where_clause(Expr::column("a").eq(Expr::param(1)))
            .where_clause(Expr::column("b").eq(Expr::param(2)))
            .build();
        assert!(matches!(
            query.where_clause,
            Some(Expr::Binary {
                op: crate::ast::BinaryOp::And,
                ..
            })
        ));
    }

    #[test]
    fn test_fetch_is_created_once() {
        let query = Select::new()
            .all()
            .from("users")
            .limit(5)
            .offset(10)
            .build();
        let fetch = query.fetch.unwrap();
        assert_eq!(fetch.offset, Some(Expr::Param(SqlValue::Int(10))));
        assert_eq!(fetch.limit, Some(Expr::Param(SqlValue::Int(5))));
        assert_eq!(fetch.fetch_type, FetchClauseType::RowsOnly);
    }
}
