//! Pagination decisions.
//!
//! Rows-only limits go through the dialect's [`LimitHandler`], the same
//! object string-level callers use, so both paths agree on marker order.
//! Percent and with-ties fetches can only be rendered natively.

use tracing::trace;

use super::{Clause, Translator};
use crate::ast::{Expr, FetchClause, SelectStatement};
use crate::builder::SqlValue;
use crate::capability::Capability;
use crate::error::{DialectError, Result};
use crate::pagination::{Limit, LimitHandler, PaginationStyle};
use crate::strategy::FetchClauseType;

/// How a query part is paginated.
pub(super) enum Pagination<'s> {
    /// Rewritten by a limit handler.
    Handler {
        handler: Box<dyn LimitHandler>,
        style: PaginationStyle,
        limit: Limit,
    },
    /// `OFFSET ... ROWS FETCH FIRST ... [PERCENT] ROWS {ONLY | WITH TIES}`.
    Native(&'s FetchClause),
}

impl Pagination<'_> {
    /// Returns true when the ORDER BY moves into a `row_number()` window.
    pub(super) const fn is_window(&self) -> bool {
        matches!(
            self,
            Self::Handler {
                style: PaginationStyle::RowNumberWindow,
                ..
            }
        )
    }

    /// Returns true when the handler only affects the first `SELECT` of a
    /// compound or distinct query part, which then has to be wrapped.
    pub(super) fn needs_single_select(&self, select: &SelectStatement) -> bool {
        let Self::Handler { style, .. } = self else {
            return false;
        };
        let compound = !select.set_operations.is_empty();
        match style {
            PaginationStyle::RowNumberWindow => compound || select.distinct,
            PaginationStyle::Top { .. }
            | PaginationStyle::TopStartAt
            | PaginationStyle::SkipFirst
            | PaginationStyle::First
            | PaginationStyle::FirstSkip
            | PaginationStyle::LegacyHsql => compound,
            PaginationStyle::None
            | PaginationStyle::OffsetFetch
            | PaginationStyle::LimitOffset
            | PaginationStyle::MySqlLimit
            | PaginationStyle::RowsTo
            | PaginationStyle::Rownum => false,
        }
    }
}

impl Translator<'_> {
    pub(super) fn pagination_plan<'s>(
        &self,
        select: &'s SelectStatement,
        root: bool,
    ) -> Result<Option<Pagination<'s>>> {
        let Some(fetch) = &select.fetch else {
            return Ok(None);
        };
        if fetch.offset.is_none() && fetch.limit.is_none() {
            return Ok(None);
        }
        if fetch.fetch_type != FetchClauseType::RowsOnly && fetch.limit.is_some() {
            return self.native_fetch(select, fetch, root).map(Some);
        }

        let limit = Limit::new(
            self.fetch_value(fetch.offset.as_ref(), Clause::Offset)?,
            self.fetch_value(fetch.limit.as_ref(), Clause::Fetch)?,
        );
        if !limit.is_applied() {
            return Ok(None);
        }
        let (style, fallback) = self.pagination_style(&limit, root)?;
        let handler = style.handler(self.dialect.supports(Capability::VariableLimit), fallback);
        Ok(Some(Pagination::Handler {
            handler,
            style,
            limit,
        }))
    }

    fn fetch_value(&self, expr: Option<&Expr>, clause: Clause) -> Result<Option<u64>> {
        let Some(expr) = expr else {
            return Ok(None);
        };
        let value = expr.as_integer().ok_or_else(|| {
            self.mismatch_at(clause, "row counts must be integer literals or parameters")
        })?;
        u64::try_from(value)
            .map(Some)
            .map_err(|_| self.mismatch_at(clause, format!("row count {value} is negative")))
    }

    /// Picks the pagination style for a limit, falling back to window
    /// emulation where the dialect's own style cannot skip rows here.
    fn pagination_style(
        &self,
        limit: &Limit,
        root: bool,
    ) -> Result<(PaginationStyle, Option<&'static str>)> {
        let config = self.dialect.config();
        let style = config.pagination;
        if limit.has_offset() {
            if !root && !self.dialect.supports(Capability::OffsetInSubquery) {
                return self.window_emulation().ok_or_else(|| DialectError::OffsetInSubquery {
                    dialect: self.dialect.name(),
                });
            }
            if !style.supports_offset() {
                return self.window_emulation().ok_or_else(|| {
                    self.mismatch_at(Clause::Offset, "the dialect's limit clause cannot skip rows")
                });
            }
        }
        let fallback = match style {
            PaginationStyle::None => {
                return Err(self.mismatch_at(Clause::Fetch, "the dialect cannot limit rows"));
            }
            PaginationStyle::RowNumberWindow => config.window_order_fallback,
            _ => config.pagination_order_fallback,
        };
        Ok((style, fallback))
    }

    fn window_emulation(&self) -> Option<(PaginationStyle, Option<&'static str>)> {
        if self.dialect.supports(Capability::WindowFunctions) {
            trace!(dialect = %self.dialect, "emulating offset with row_number()");
            Some((
                PaginationStyle::RowNumberWindow,
                self.dialect.config().window_order_fallback,
            ))
        } else {
            None
        }
    }

    fn native_fetch<'s>(
        &self,
        select: &SelectStatement,
        fetch: &'s FetchClause,
        root: bool,
    ) -> Result<Pagination<'s>> {
        let fetch_type = fetch.fetch_type;
        let supported = self.dialect.config().pagination == PaginationStyle::OffsetFetch
            && (!fetch_type.is_percent() || self.dialect.supports(Capability::FetchPercent))
            && (!fetch_type.is_with_ties() || self.dialect.supports(Capability::FetchWithTies));
        if !supported {
            return Err(DialectError::UnsupportedFetchClause {
                fetch_type: fetch_type.to_string(),
                dialect: self.dialect.name(),
            });
        }
        if fetch.offset.is_some() && !root && !self.dialect.supports(Capability::OffsetInSubquery) {
            return Err(DialectError::OffsetInSubquery {
                dialect: self.dialect.name(),
            });
        }
        if fetch_type.is_with_ties() && select.order_by.is_empty() {
            return Err(self.mismatch_at(Clause::Fetch, "WITH TIES needs an ORDER BY"));
        }
        Ok(Pagination::Native(fetch))
    }

    /// Applies a pagination plan to a rendered body. Returns the SQL and
    /// whether the body was wrapped in a subquery.
    pub(super) fn apply_pagination(
        &mut self,
        body: String,
        plan: Pagination<'_>,
        mark: usize,
        order_params: usize,
    ) -> Result<(String, bool)> {
        match plan {
            Pagination::Handler {
                handler,
                style,
                limit,
            } => {
                if style == PaginationStyle::RowNumberWindow && order_params > 0 {
                    return Err(self.mismatch_at(
                        Clause::OrderBy,
                        "bind parameters in ORDER BY cannot move into a row_number() window",
                    ));
                }
                let sql = handler.process_sql(&body, &limit)?;
                let values: Vec<SqlValue> = handler
                    .limit_values(&limit)
                    .into_iter()
                    .map(|value| SqlValue::Int(i64::try_from(value).unwrap_or(i64::MAX)))
                    .collect();
                trace!(
                    handler = handler.name(),
                    bound = values.len(),
                    first = handler.bind_limit_parameters_first(),
                    "applied pagination"
                );
                if handler.bind_limit_parameters_first() {
                    self.params.splice(mark..mark, values);
                } else {
                    self.params.extend(values);
                }
                Ok((sql, style.is_emulated()))
            }
            Pagination::Native(fetch) => {
                let mut sql = body;
                if let Some(offset) = &fetch.offset {
                    let offset = self.in_clause(Clause::Offset, |t| t.expr(offset))?;
                    sql.push_str(&format!(" OFFSET {offset} ROWS"));
                }
                if let Some(limit) = &fetch.limit {
                    let limit = self.in_clause(Clause::Fetch, |t| t.expr(limit))?;
                    sql.push_str(&format!(" FETCH FIRST {limit}"));
                    if fetch.fetch_type.is_percent() {
                        sql.push_str(" PERCENT");
                    }
                    sql.push_str(if fetch.fetch_type.is_with_ties() {
                        " ROWS WITH TIES"
                    } else {
                        " ROWS ONLY"
                    });
                }
                Ok((sql, false))
            }
        }
    }
}
