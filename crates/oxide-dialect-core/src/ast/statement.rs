//! Statement tree types.

use super::expression::Expr;
use crate::strategy::{FetchClauseType, LockMode, LockTimeout};

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Keyword after the sort key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Requested null placement for one ORDER BY item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPrecedence {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullPrecedence {
    /// `NULLS FIRST` / `NULLS LAST` suffix.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
    /// Null precedence (optional).
    pub nulls: Option<NullPrecedence>,
}

impl OrderBy {
    /// Ascending order on an expression.
    #[must_use]
    pub const fn asc(expr: Expr) -> Self {
        Self {
            expr,
            direction: OrderDirection::Asc,
            nulls: None,
        }
    }

    /// Descending order on an expression.
    #[must_use]
    pub const fn desc(expr: Expr) -> Self {
        Self {
            expr,
            direction: OrderDirection::Desc,
            nulls: None,
        }
    }

    /// Sets the null precedence.
    #[must_use]
    pub const fn nulls(mut self, precedence: NullPrecedence) -> Self {
        self.nulls = Some(precedence);
        self
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    Left,
    /// RIGHT OUTER JOIN.
    Right,
    /// FULL OUTER JOIN.
    Full,
    /// CROSS JOIN.
    Cross,
}

impl JoinType {
    /// Join keyword, including the trailing `JOIN`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }

    /// Returns true for outer joins.
    #[must_use]
    pub const fn is_outer(&self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Full)
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// The type of join.
    pub join_type: JoinType,
    /// The table to join.
    pub table: TableRef,
    /// The join condition (for non-CROSS joins).
    pub on: Option<Expr>,
}

/// A table reference in FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A simple table name.
    Table {
        /// Schema name (optional).
        schema: Option<String>,
        /// Table name.
        name: String,
        /// Alias.
        alias: Option<String>,
    },
    /// A derived table.
    Subquery {
        /// The subquery.
        query: Box<SelectStatement>,
        /// Alias (required for subqueries).
        alias: String,
    },
    /// A joined table.
    Join {
        /// Left side of the join.
        left: Box<TableRef>,
        /// The join clause.
        join: Box<JoinClause>,
    },
}

impl TableRef {
    /// Creates a simple table reference.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table {
            schema: None,
            name: name.into(),
            alias: None,
        }
    }

    /// Creates a derived table.
    #[must_use]
    pub fn subquery(query: SelectStatement, alias: impl Into<String>) -> Self {
        Self::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        }
    }

    /// Adds an alias to this table reference.
    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        match self {
            Self::Table { schema, name, .. } => Self::Table {
                schema,
                name,
                alias: Some(alias.into()),
            },
            Self::Subquery { query, .. } => Self::Subquery {
                query,
                alias: alias.into(),
            },
            Self::Join { left, join } => Self::Join {
                left: Box::new((*left).alias(alias)),
                join,
            },
        }
    }

    /// Joins another table.
    #[must_use]
    pub fn join(self, join_type: JoinType, table: Self, on: Option<Expr>) -> Self {
        Self::Join {
            left: Box::new(self),
            join: Box::new(JoinClause {
                join_type,
                table,
                on,
            }),
        }
    }

    /// Returns true when any join in this reference is an outer join.
    #[must_use]
    pub fn has_outer_join(&self) -> bool {
        match self {
            Self::Table { .. } | Self::Subquery { .. } => false,
            Self::Join { left, join } => join.join_type.is_outer() || left.has_outer_join(),
        }
    }
}

/// A column in SELECT clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    /// The expression.
    pub expr: Expr,
    /// Column alias.
    pub alias: Option<String>,
}

impl SelectColumn {
    /// Creates a new select column.
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    /// Creates a select column with an alias.
    #[must_use]
    pub fn with_alias(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }
}

/// Offset and row limit of a query part.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchClause {
    /// Rows to skip.
    pub offset: Option<Expr>,
    /// Rows (or percent) to return.
    pub limit: Option<Expr>,
    /// Rows-only, percent, with ties.
    pub fetch_type: FetchClauseType,
}

/// A table locked by a row lock, for dialects that name lock targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockTarget {
    /// Table alias as written in FROM.
    pub alias: String,
    /// Key column, for dialects that lock by column.
    pub column: Option<String>,
}

/// Pessimistic lock request on a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockClause {
    /// Lock mode.
    pub mode: LockMode,
    /// Behavior when rows are already locked.
    pub timeout: LockTimeout,
    /// Tables to lock. Empty locks every table in the query.
    pub targets: Vec<LockTarget>,
}

/// Set operators combining query parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    /// UNION.
    Union,
    /// UNION ALL.
    UnionAll,
    /// INTERSECT.
    Intersect,
    /// EXCEPT.
    Except,
}

impl SetOperator {
    /// Operator keyword without `ALL`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// Traversal order of a recursive CTE search clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Breadth first.
    BreadthFirst,
    /// Depth first.
    DepthFirst,
}

impl SearchKind {
    /// `DEPTH FIRST` or `BREADTH FIRST`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BreadthFirst => "BREADTH FIRST",
            Self::DepthFirst => "DEPTH FIRST",
        }
    }
}

/// `search depth first by a, b set ordering_column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchClause {
    /// Traversal order.
    pub kind: SearchKind,
    /// CTE columns defining the order.
    pub by: Vec<String>,
    /// Column receiving the sequence number.
    pub set_column: String,
}

/// `cycle a, b set is_cycle to 'Y' default 'N' using path`.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleClause {
    /// CTE columns identifying a row.
    pub columns: Vec<String>,
    /// Column receiving the cycle mark.
    pub set_column: String,
    /// Value marking a cycle.
    pub mark: Expr,
    /// Value marking a non-cycle.
    pub default: Expr,
    /// Path column.
    pub using_column: String,
}

/// One common table expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    /// CTE name.
    pub name: String,
    /// Column names.
    pub columns: Vec<String>,
    /// The defining query. A recursive CTE is an anchor query with one
    /// UNION ALL member referencing the CTE.
    pub query: Box<SelectStatement>,
    /// Search clause.
    pub search: Option<SearchClause>,
    /// Cycle clause.
    pub cycle: Option<CycleClause>,
}

impl Cte {
    /// Creates a CTE without column list, search or cycle clause.
    #[must_use]
    pub fn new(name: impl Into<String>, query: SelectStatement) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            query: Box::new(query),
            search: None,
            cycle: None,
        }
    }

    /// Sets the column list.
    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|&c| c.to_string()).collect();
        self
    }

    /// Sets the search clause.
    #[must_use]
    pub fn search(mut self, search: SearchClause) -> Self {
        self.search = Some(search);
        self
    }

    /// Sets the cycle clause.
    #[must_use]
    pub fn cycle(mut self, cycle: CycleClause) -> Self {
        self.cycle = Some(cycle);
        self
    }
}

/// A WITH clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    /// Whether any CTE references itself.
    pub recursive: bool,
    /// The CTEs, in declaration order.
    pub ctes: Vec<Cte>,
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectStatement {
    /// WITH clause.
    pub with: Option<WithClause>,
    /// Whether to select DISTINCT values.
    pub distinct: bool,
    /// The columns to select.
    pub columns: Vec<SelectColumn>,
    /// The FROM clause.
    pub from: Option<TableRef>,
    /// The WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// Query parts combined with this one.
    pub set_operations: Vec<(SetOperator, SelectStatement)>,
    /// ORDER BY clauses.
    pub order_by: Vec<OrderBy>,
    /// Offset and limit.
    pub fetch: Option<FetchClause>,
    /// Row lock.
    pub lock: Option<LockClause>,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Table name.
    pub table: String,
    /// Column names (optional).
    pub columns: Vec<String>,
    /// Values to insert.
    pub values: InsertSource,
    /// RETURNING columns.
    pub returning: Vec<SelectColumn>,
}

/// Source of data for INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// VALUES (...), (...), ...
    Values(Vec<Vec<Expr>>),
    /// SELECT ...
    Query(Box<SelectStatement>),
    /// DEFAULT VALUES
    DefaultValues,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Table name.
    pub table: String,
    /// Alias.
    pub alias: Option<String>,
    /// SET assignments.
    pub assignments: Vec<UpdateAssignment>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// RETURNING columns.
    pub returning: Vec<SelectColumn>,
}

/// An assignment in UPDATE SET.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAssignment {
    /// Column name.
    pub column: String,
    /// Value expression.
    pub value: Expr,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Table name.
    pub table: String,
    /// Alias.
    pub alias: Option<String>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// RETURNING columns.
    pub returning: Vec<SelectColumn>,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// SELECT statement.
    Select(SelectStatement),
    /// INSERT statement.
    Insert(InsertStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
}

impl From<SelectStatement> for Statement {
    fn from(select: SelectStatement) -> Self {
        Self::Select(select)
    }
}

impl From<InsertStatement> for Statement {
    fn from(insert: InsertStatement) -> Self {
        Self::Insert(insert)
    }
}

impl From<UpdateStatement> for Statement {
    fn from(update: UpdateStatement) -> Self {
        Self::Update(update)
    }
}

impl From<DeleteStatement> for Statement {
    fn from(delete: DeleteStatement) -> Self {
        Self::Delete(delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_keywords() {
        assert_eq!(OrderDirection::Desc.as_str(), "DESC");
        assert_eq!(NullPrecedence::Last.as_str(), "NULLS LAST");
    }

    #[test]
    fn test_join_alias_targets_left_side() {
        let joined = TableRef::table("orders")
            .join(JoinType::Inner, TableRef::table("items"), None)
            .alias("o");
        let TableRef::Join { left, .. } = joined else {
            panic!("expected a join");
        };
        assert!(matches!(*left, TableRef::Table { alias: Some(ref a), .. } if a == "o"));
    }

    #[test]
    fn test_nested_outer_join() {
        let inner = TableRef::table("a").join(JoinType::Inner, TableRef::table("b"), None);
        assert!(!inner.has_outer_join());
        let outer = inner.join(JoinType::Left, TableRef::table("c"), None);
        assert!(outer.has_outer_join());
    }
}
