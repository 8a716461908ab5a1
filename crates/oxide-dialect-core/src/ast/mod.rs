//! Database-agnostic statement trees.
//!
//! The translator consumes these read-only. Build them directly or through
//! the builders in [`crate::builder`].

mod expression;
mod statement;

pub use expression::{BinaryOp, Expr, FunctionCall, Literal, UnaryOp};
pub use statement::{
    Cte, CycleClause, DeleteStatement, FetchClause, InsertSource, InsertStatement, JoinClause,
    JoinType, LockClause, LockTarget, NullPrecedence, OrderBy, OrderDirection, SearchClause,
    SearchKind, SelectColumn, SelectStatement, SetOperator, Statement, TableRef,
    UpdateAssignment, UpdateStatement, WithClause,
};
