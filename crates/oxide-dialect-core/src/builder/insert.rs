//! INSERT tree builder.

use std::marker::PhantomData;

use crate::ast::{Expr, InsertSource, InsertStatement, SelectColumn, SelectStatement};

use super::value::ToSqlValue;

/// Marker: No table specified yet.
pub struct NoTable;
/// Marker: Table has been specified.
pub struct HasTable;
/// Marker: No values specified yet.
pub struct NoValues;
/// Marker: Values have been specified.
pub struct HasValues;

/// Builds an [`InsertStatement`].
///
/// ```rust
/// use oxide_dialect_core::builder::Insert;
///
/// let insert = Insert::new()
///     .into_table("users")
///     .columns(&["name", "age"])
///     .values(vec!["Alice".into(), 30_i64.into()])
///     .values(vec!["Bob".into(), 25_i64.into()])
///     .build();
///
/// assert_eq!(insert.columns, vec!["name", "age"]);
/// ```
pub struct Insert<Table, Values> {
    table: Option<String>,
    columns: Vec<String>,
    source: InsertSource,
    returning: Vec<SelectColumn>,
    _state: PhantomData<(Table, Values)>,
}

impl Insert<NoTable, NoValues> {
    /// Creates a new INSERT builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: None,
            columns: vec![],
            source: InsertSource::DefaultValues,
            returning: vec![],
            _state: PhantomData,
        }
    }
}

impl Default for Insert<NoTable, NoValues> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Table, Values> Insert<Table, Values> {
    fn transition<T, V>(self) -> Insert<T, V> {
        Insert {
            table: self.table,
            columns: self.columns,
            source: self.source,
            returning: self.returning,
            _state: PhantomData,
        }
    }
}

impl<Values> Insert<NoTable, Values> {
    /// Specifies the target table.
    #[must_use]
    pub fn into_table(mut self, table: &str) -> Insert<HasTable, Values> {
        self.table = Some(String::from(table));
        self.transition()
    }
}

impl<Values> Insert<HasTable, Values> {
    /// Specifies the column list.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Adds one row of bound values.
    #[must_use]
    pub fn values(mut self, row: Vec<InsertValue>) -> Insert<HasTable, HasValues> {
        let row = row.into_iter().map(|value| value.0).collect();
        match &mut self.source {
            InsertSource::Values(rows) => rows.push(row),
            source => *source = InsertSource::Values(vec![row]),
        }
        self.transition()
    }

    /// Inserts the rows of a query.
    #[must_use]
    pub fn select(mut self, query: SelectStatement) -> Insert<HasTable, HasValues> {
        self.source = InsertSource::Query(Box::new(query));
        self.transition()
    }

    /// Adds RETURNING columns.
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning = cols
            .iter()
            .map(|name| SelectColumn::new(Expr::column(*name)))
            .collect();
        self
    }
}

impl Insert<HasTable, HasValues> {
    /// Returns the statement tree.
    #[must_use]
    pub fn build(self) -> InsertStatement {
        InsertStatement {
            table: self.table.unwrap_or_default(),
            columns: self.columns,
            values: self.source,
            returning: self.returning,
        }
    }
}

/// One value of an inserted row: a bound parameter or an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertValue(Expr);

impl InsertValue {
    /// Inserts an expression instead of a bound value.
    #[must_use]
    pub const fn expr(expr: Expr) -> Self {
        Self(expr)
    }
}

impl<T: ToSqlValue> From<T> for InsertValue {
    fn from(value: T) -> Self {
        Self(Expr::param(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SqlValue;

    #[test]
    fn test_multi_row_values() {
        let insert = Insert::new()
            .into_table("t")
            .columns(&["a"])
            .values(vec![1_i64.into()])
            .values(vec![InsertValue::expr(Expr::NextValue(String::from("t_seq")))])
            .build();
        let InsertSource::Values(rows) = insert.values else {
            panic!("expected VALUES");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Expr::Param(SqlValue::Int(1)));
    }
}
