//! Statement translation.
//!
//! [`translate`] walks a statement tree once and asks the [`Dialect`] at
//! every syntax junction how to render it: which pagination clause, which
//! lock syntax, whether `NULLS FIRST` exists, how booleans look. Features
//! the target lacks are emulated where a documented equivalent exists and
//! rejected with [`DialectError::CapabilityMismatch`] otherwise.
//!
//! ```rust
//! use oxide_dialect_core::ast::Expr;
//! use oxide_dialect_core::builder::Select;
//! use oxide_dialect_core::{translate, DatabaseVersion, Dialect, DialectFamily};
//!
//! let query = Select::new()
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .where_clause(Expr::column("active").eq(Expr::param(true)))
//!     .offset(10)
//!     .limit(5)
//!     .build();
//!
//! let oracle = Dialect::new(DialectFamily::Oracle, DatabaseVersion::major(19));
//! let translation = translate(&query.into(), &oracle).unwrap();
//! assert_eq!(
//!     translation.sql,
//!     "SELECT id, name FROM users WHERE active = ? OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
//! );
//! assert_eq!(translation.params.len(), 3);
//! ```

mod cte;
mod dml;
mod expr;
mod fetch;
mod query;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::ast::{SelectColumn, Statement};
use crate::builder::SqlValue;
use crate::dialect::Dialect;
use crate::error::{DialectError, Result};

/// Maximum nesting of query parts (subqueries, CTE bodies, set members).
const MAX_QUERY_DEPTH: usize = 64;
/// Maximum nesting of expressions.
const MAX_EXPR_DEPTH: usize = 256;

/// The clause being rendered, reported in capability mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    /// `WITH`
    With,
    /// The select list.
    Select,
    /// `FROM` and joins.
    From,
    /// `WHERE`
    Where,
    /// `GROUP BY`
    GroupBy,
    /// `HAVING`
    Having,
    /// `ORDER BY`
    OrderBy,
    /// The offset half of pagination.
    Offset,
    /// The row limit half of pagination.
    Fetch,
    /// Row locking.
    ForUpdate,
    /// `RETURNING`
    Returning,
    /// Inserted rows.
    Values,
    /// `SET` of an update.
    Set,
    /// CTE `SEARCH`
    Search,
    /// CTE `CYCLE`
    Cycle,
}

impl Clause {
    /// Returns the SQL name of the clause.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::With => "WITH",
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::GroupBy => "GROUP BY",
            Self::Having => "HAVING",
            Self::OrderBy => "ORDER BY",
            Self::Offset => "OFFSET",
            Self::Fetch => "FETCH",
            Self::ForUpdate => "FOR UPDATE",
            Self::Returning => "RETURNING",
            Self::Values => "VALUES",
            Self::Set => "SET",
            Self::Search => "SEARCH",
            Self::Cycle => "CYCLE",
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered SQL and its parameters in marker order.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// The SQL text with `?` markers.
    pub sql: String,
    /// One value per marker, in the order the markers appear.
    pub params: Vec<SqlValue>,
}

/// Translates a statement for a dialect.
///
/// The statement is only read. Translating the same pair twice yields the
/// same SQL and parameter order.
///
/// # Errors
///
/// Fails when the statement needs a feature the dialect can neither
/// express nor emulate, or nests deeper than the translator walks.
pub fn translate(statement: &Statement, dialect: &Dialect) -> Result<Translation> {
    let mut translator = Translator::new(dialect);
    let sql = match statement {
        Statement::Select(select) => translator.root_select(select)?,
        Statement::Insert(insert) => translator.insert(insert)?,
        Statement::Update(update) => translator.update(update)?,
        Statement::Delete(delete) => translator.delete(delete)?,
    };
    debug!(
        dialect = %dialect,
        params = translator.params.len(),
        "translated statement"
    );
    Ok(Translation {
        sql,
        params: translator.params,
    })
}

/// Per-call translation state.
pub(crate) struct Translator<'d> {
    dialect: &'d Dialect,
    params: Vec<SqlValue>,
    query_depth: Rc<Cell<usize>>,
    expr_depth: Rc<Cell<usize>>,
    /// Select lists of the enclosing query parts, innermost last.
    scopes: Vec<Vec<SelectColumn>>,
    clause: Clause,
    /// Render select item references as their expressions.
    inline_item_refs: bool,
}

impl<'d> Translator<'d> {
    fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            params: Vec::new(),
            query_depth: Rc::new(Cell::new(0)),
            expr_depth: Rc::new(Cell::new(0)),
            scopes: Vec::new(),
            clause: Clause::Select,
            inline_item_refs: false,
        }
    }

    /// Returns true while rendering the outermost query part.
    fn is_root(&self) -> bool {
        self.query_depth.get() <= 1
    }

    /// Runs `f` with `clause` as the current clause.
    fn in_clause<T>(&mut self, clause: Clause, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let outer = std::mem::replace(&mut self.clause, clause);
        let result = f(self);
        self.clause = outer;
        result
    }

    fn mismatch(&self, message: impl Into<String>) -> DialectError {
        self.mismatch_at(self.clause, message)
    }

    fn mismatch_at(&self, clause: Clause, message: impl Into<String>) -> DialectError {
        DialectError::mismatch(clause, self.dialect.name(), message)
    }

    fn bind(&mut self, value: SqlValue) -> &'static str {
        let marker = match value {
            SqlValue::Json(_) => self.dialect.json_bind_marker(),
            _ => "?",
        };
        self.params.push(value);
        marker
    }
}

/// Counts nesting and refuses to go past a limit.
struct DepthGuard {
    level: Rc<Cell<usize>>,
}

impl DepthGuard {
    fn enter(level: &Rc<Cell<usize>>, limit: usize) -> Result<Self> {
        let current = level.get();
        if current >= limit {
            return Err(DialectError::NestingTooDeep { limit });
        }
        level.set(current + 1);
        Ok(Self {
            level: Rc::clone(level),
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        self.level.set(self.level.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::builder::Select;
    use crate::dialect::DialectFamily;
    use crate::version::DatabaseVersion;

    fn dialect(family: DialectFamily, version: DatabaseVersion) -> Dialect {
        Dialect::new(family, version)
    }

    #[test]
    fn test_clause_display() {
        assert_eq!(Clause::ForUpdate.to_string(), "FOR UPDATE");
        assert_eq!(Clause::GroupBy.as_str(), "GROUP BY");
    }

    #[test]
    fn test_depth_guard_unwinds() {
        let level = Rc::new(Cell::new(0));
        {
            let _a = DepthGuard::enter(&level, 2).unwrap();
            let _b = DepthGuard::enter(&level, 2).unwrap();
            assert!(matches!(
                DepthGuard::enter(&level, 2),
                Err(DialectError::NestingTooDeep { limit: 2 })
            ));
            assert_eq!(level.get(), 2);
        }
        assert_eq!(level.get(), 0);
    }

    #[test]
    fn test_deep_expression_is_rejected() {
        let mut expr = Expr::column("a");
        for _ in 0..(MAX_EXPR_DEPTH + 10) {
            expr = Expr::Paren(Box::new(expr));
        }
        let query = Select::new().all().from("t").where_clause(expr).build();
        let pg = dialect(DialectFamily::PostgreSql, DatabaseVersion::major(16));
        assert!(matches!(
            translate(&query.into(), &pg),
            Err(DialectError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn test_json_parameter_marker() {
        let query = Select::new()
            .all()
            .from("docs")
            .where_clause(Expr::column("body").eq(Expr::Param(SqlValue::Json(String::from("[1]")))))
            .build();
        let statement = Statement::from(query);
        let old = dialect(DialectFamily::MySql, DatabaseVersion::new(5, 7, 30));
        assert_eq!(
            translate(&statement, &old).unwrap().sql,
            "SELECT * FROM docs WHERE body = CAST(? AS JSON)"
        );
        let new = dialect(DialectFamily::MySql, DatabaseVersion::new(8, 0, 30));
        assert_eq!(
            translate(&statement, &new).unwrap().sql,
            "SELECT * FROM docs WHERE body = ?"
        );
    }
}
