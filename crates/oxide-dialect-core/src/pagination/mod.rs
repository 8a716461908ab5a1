//! Limit and offset strategies.
//!
//! Every dialect picks one [`PaginationStyle`]. The statement translator
//! renders the style structurally; callers that only hold a finished SQL
//! string use the matching [`LimitHandler`] instead, which rewrites the
//! string and reports where the limit parameters bind.
//!
//! The binding contract is the point of this module: the values returned by
//! [`LimitHandler::limit_values`] appear in exactly the order their markers
//! appear in the rewritten SQL, and [`LimitHandler::bind_limit_parameters_first`]
//! says whether those markers precede the query's own markers.
//!
//! ```rust
//! use oxide_dialect_core::pagination::{Limit, PaginationStyle};
//!
//! let handler = PaginationStyle::FirstSkip.handler(true, None);
//! let query = handler
//!     .apply("SELECT a FROM t WHERE b = ?", &Limit::new(Some(40), Some(20)), Vec::new())
//!     .unwrap();
//! assert_eq!(query.sql, "SELECT FIRST ? SKIP ? a FROM t WHERE b = ?");
//! ```

mod handlers;
pub mod scan;

pub use handlers::{
    FirstLimitHandler, FirstSkipLimitHandler, LegacyHsqlLimitHandler, LimitOffsetLimitHandler,
    MySqlLimitHandler, NoopLimitHandler, OffsetFetchLimitHandler, RowNumberLimitHandler,
    RownumLimitHandler, RowsLimitHandler, SkipFirstLimitHandler, TopLimitHandler,
    TopStartAtLimitHandler,
};

use crate::builder::SqlValue;
use crate::error::Result;

/// Row count standing in for "no limit" when a clause needs one.
pub const UNBOUNDED: u64 = 9_223_372_036_854_775_807;

/// Limit/offset syntax of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// No way to limit rows.
    None,
    /// `offset ? rows fetch next ? rows only`
    OffsetFetch,
    /// `limit ? offset ?`
    LimitOffset,
    /// `limit ?, ?`
    MySqlLimit,
    /// `select top ?`, parenthesized as `top (?)` when required.
    Top {
        /// Whether the count is wrapped in parentheses.
        parenthesized: bool,
    },
    /// `select top ? start at ?`, with a one-based start row.
    TopStartAt,
    /// `select skip ? first ?`
    SkipFirst,
    /// `select first ?`
    First,
    /// `select first ? skip ?`
    FirstSkip,
    /// `rows ? to ?`, one-based and inclusive.
    RowsTo,
    /// Wrapping subqueries filtering on the `rownum` pseudo column.
    Rownum,
    /// Wrapping subquery filtering on `row_number() over (...)`.
    RowNumberWindow,
    /// `select limit ? ?`
    LegacyHsql,
}

impl PaginationStyle {
    /// Returns true for styles that wrap the query instead of adding a
    /// clause to it.
    #[must_use]
    pub const fn is_emulated(&self) -> bool {
        matches!(self, Self::Rownum | Self::RowNumberWindow)
    }

    /// Returns true for styles with a native offset.
    #[must_use]
    pub const fn supports_offset(&self) -> bool {
        !matches!(self, Self::None | Self::Top { .. } | Self::First)
    }

    /// Builds the string-level handler for this style.
    ///
    /// `variable_limit` selects bind markers over inlined literal values.
    /// `order_fallback` is the ORDER BY item injected (offset/fetch) or used
    /// inside `over (...)` (row-number emulation) when the query has none.
    #[must_use]
    pub fn handler(
        &self,
        variable_limit: bool,
        order_fallback: Option<&'static str>,
    ) -> Box<dyn LimitHandler> {
        match *self {
            Self::None => Box::new(NoopLimitHandler),
            Self::OffsetFetch => Box::new(OffsetFetchLimitHandler {
                variable: variable_limit,
                order_fallback,
            }),
            Self::LimitOffset => Box::new(LimitOffsetLimitHandler {
                variable: variable_limit,
            }),
            Self::MySqlLimit => Box::new(MySqlLimitHandler {
                variable: variable_limit,
            }),
            Self::Top { parenthesized } => Box::new(TopLimitHandler {
                variable: variable_limit,
                parenthesized,
            }),
            Self::TopStartAt => Box::new(TopStartAtLimitHandler {
                variable: variable_limit,
            }),
            Self::SkipFirst => Box::new(SkipFirstLimitHandler {
                variable: variable_limit,
            }),
            Self::First => Box::new(FirstLimitHandler {
                variable: variable_limit,
            }),
            Self::FirstSkip => Box::new(FirstSkipLimitHandler {
                variable: variable_limit,
            }),
            Self::RowsTo => Box::new(RowsLimitHandler {
                variable: variable_limit,
            }),
            Self::Rownum => Box::new(RownumLimitHandler {
                variable: variable_limit,
            }),
            Self::RowNumberWindow => Box::new(RowNumberLimitHandler {
                variable: variable_limit,
                order_fallback,
            }),
            Self::LegacyHsql => Box::new(LegacyHsqlLimitHandler {
                variable: variable_limit,
            }),
        }
    }
}

/// Requested row window. The offset is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    /// Rows to skip.
    pub offset: Option<u64>,
    /// Rows to return.
    pub max_rows: Option<u64>,
}

impl Limit {
    /// No limit at all.
    pub const NONE: Self = Self {
        offset: None,
        max_rows: None,
    };

    /// Creates a limit.
    #[must_use]
    pub const fn new(offset: Option<u64>, max_rows: Option<u64>) -> Self {
        Self { offset, max_rows }
    }

    /// Limits to the first `max_rows` rows.
    #[must_use]
    pub const fn rows(max_rows: u64) -> Self {
        Self {
            offset: None,
            max_rows: Some(max_rows),
        }
    }

    /// Returns true when a non-zero offset is requested.
    #[must_use]
    pub const fn has_offset(&self) -> bool {
        matches!(self.offset, Some(offset) if offset > 0)
    }

    /// Returns true when a row cap is requested.
    #[must_use]
    pub const fn has_max_rows(&self) -> bool {
        self.max_rows.is_some()
    }

    /// Returns true when the limit changes the query at all.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.has_offset() || self.has_max_rows()
    }

    /// The zero-based offset, zero when absent.
    #[must_use]
    pub const fn offset_or_zero(&self) -> u64 {
        match self.offset {
            Some(offset) => offset,
            None => 0,
        }
    }

    /// The row cap, [`UNBOUNDED`] when absent.
    #[must_use]
    pub const fn max_rows_or_unbounded(&self) -> u64 {
        match self.max_rows {
            Some(rows) => rows,
            None => UNBOUNDED,
        }
    }
}

/// A rewritten query with its merged parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitedQuery {
    /// SQL with the limit clause applied.
    pub sql: String,
    /// Query parameters and limit parameters, in marker order.
    pub params: Vec<SqlValue>,
}

/// String-level limit strategy of a dialect.
///
/// The flag methods describe the binding contract; [`Self::ordered_values`]
/// derives the limit values from them, so a handler only has to render
/// markers in the order the flags promise.
pub trait LimitHandler: Send + Sync {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Whether limiting is possible at all.
    fn supports_limit(&self) -> bool {
        true
    }

    /// Whether an offset can be expressed.
    fn supports_offset(&self) -> bool {
        true
    }

    /// Whether limit values are bind markers rather than inlined literals.
    fn supports_variable_limit(&self) -> bool {
        true
    }

    /// Whether the limit value is the last row number (offset + rows)
    /// rather than a row count.
    fn use_max_for_limit(&self) -> bool {
        false
    }

    /// Whether limit markers precede the query's own markers.
    fn bind_limit_parameters_first(&self) -> bool {
        false
    }

    /// Whether the row count marker precedes the offset marker.
    fn bind_limit_parameters_in_reverse_order(&self) -> bool {
        false
    }

    /// Converts the zero-based offset into the value the clause expects.
    fn convert_to_first_row_value(&self, zero_based_offset: u64) -> u64 {
        zero_based_offset
    }

    /// Rewrites `sql` to apply `limit`.
    ///
    /// # Errors
    ///
    /// Fails with a capability mismatch when the limit needs an offset the
    /// handler cannot express.
    fn process_sql(&self, sql: &str, limit: &Limit) -> Result<String>;

    /// Limit values in marker order, regardless of whether they are bound
    /// or inlined.
    fn ordered_values(&self, limit: &Limit) -> Vec<u64> {
        if !self.supports_limit() || !limit.is_applied() {
            return Vec::new();
        }
        let offset = limit.offset_or_zero();
        let rows = limit.max_rows_or_unbounded();
        let last = if self.use_max_for_limit() {
            offset.saturating_add(rows)
        } else {
            rows
        };
        let mut values = Vec::with_capacity(2);
        if self.supports_offset() && limit.has_offset() {
            values.push(self.convert_to_first_row_value(offset));
        }
        values.push(last);
        if self.bind_limit_parameters_in_reverse_order() {
            values.reverse();
        }
        values
    }

    /// Values to bind for the limit markers, in marker order. Empty when
    /// values are inlined.
    fn limit_values(&self, limit: &Limit) -> Vec<u64> {
        if self.supports_variable_limit() {
            self.ordered_values(limit)
        } else {
            Vec::new()
        }
    }

    /// Rewrites `sql` and merges the limit values into `params`.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::process_sql`] failures.
    fn apply(&self, sql: &str, limit: &Limit, params: Vec<SqlValue>) -> Result<LimitedQuery> {
        let sql = self.process_sql(sql, limit)?;
        let limit_params: Vec<SqlValue> = self
            .limit_values(limit)
            .into_iter()
            .map(|value| SqlValue::Int(i64::try_from(value).unwrap_or(i64::MAX)))
            .collect();
        let params = if self.bind_limit_parameters_first() {
            limit_params.into_iter().chain(params).collect()
        } else {
            params.into_iter().chain(limit_params).collect()
        };
        Ok(LimitedQuery { sql, params })
    }
}
