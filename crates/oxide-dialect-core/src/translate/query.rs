//! Query parts: select list, FROM, filters, set operations, ordering and
//! row locks.

use tracing::trace;

use super::fetch::Pagination;
use super::{Clause, DepthGuard, Translator, MAX_QUERY_DEPTH};
use crate::ast::{
    Expr, LockClause, LockTarget, NullPrecedence, OrderBy, OrderDirection, SelectColumn,
    SelectStatement, TableRef,
};
use crate::capability::Capability;
use crate::error::Result;
use crate::strategy::{LockMode, RowLockStrategy};

/// Table hint placed after locked tables on table-hint dialects.
struct TableHint<'a> {
    hint: String,
    targets: &'a [LockTarget],
}

impl TableHint<'_> {
    fn applies_to(&self, name: &str, alias: Option<&str>) -> bool {
        let reference = alias.unwrap_or(name);
        self.targets.is_empty() || self.targets.iter().any(|target| target.alias == reference)
    }
}

impl Translator<'_> {
    pub(super) fn root_select(&mut self, select: &SelectStatement) -> Result<String> {
        self.select(select)
    }

    /// Renders one query part, including its WITH clause, pagination and
    /// lock.
    pub(super) fn select(&mut self, select: &SelectStatement) -> Result<String> {
        let _guard = DepthGuard::enter(&self.query_depth, MAX_QUERY_DEPTH)?;
        let mut sql = String::new();
        if let Some(with) = &select.with {
            sql.push_str(&self.in_clause(Clause::With, |t| t.with_clause(with))?);
            sql.push(' ');
        }
        self.scopes.push(select.columns.clone());
        let body = self.paged_body(select);
        self.scopes.pop();
        sql.push_str(&body?);
        Ok(sql)
    }

    fn paged_body(&mut self, select: &SelectStatement) -> Result<String> {
        let root = self.is_root();
        let mark = self.params.len();
        let lock = select
            .lock
            .as_ref()
            .filter(|lock| lock.mode != LockMode::None);
        if let Some(lock) = lock {
            self.in_clause(Clause::ForUpdate, |t| t.check_lock(select, lock, root))?;
        }
        let hint = lock.and_then(|lock| {
            self.dialect
                .lock_hint(lock.mode, lock.timeout)
                .map(|hint| TableHint {
                    hint,
                    targets: &lock.targets,
                })
        });

        let plan = self.in_clause(Clause::Fetch, |t| t.pagination_plan(select, root))?;
        let single_select = plan
            .as_ref()
            .is_some_and(|plan| plan.needs_single_select(select));
        // Positions mean nothing inside OVER (...).
        let inline = plan.as_ref().is_some_and(Pagination::is_window);
        let outer_inline = std::mem::replace(&mut self.inline_item_refs, inline);
        let body = self.body(select, hint.as_ref(), single_select);
        self.inline_item_refs = outer_inline;
        let (body, order_params) = body?;
        let (mut sql, wrapped) = match plan {
            Some(plan) => self.apply_pagination(body, plan, mark, order_params)?,
            None => (body, false),
        };

        if let Some(lock) = lock {
            if wrapped || single_select {
                return Err(self.mismatch_at(
                    Clause::ForUpdate,
                    "row locks cannot be combined with wrapping pagination",
                ));
            }
            let targets = self.in_clause(Clause::ForUpdate, |t| t.lock_targets(lock))?;
            sql.push_str(&self.dialect.lock_string_of(lock.mode, lock.timeout, &targets));
        }
        Ok(sql)
    }

    /// Renders the query part without pagination or lock clause. Also
    /// returns how many parameters the ORDER BY bound.
    fn body(
        &mut self,
        select: &SelectStatement,
        hint: Option<&TableHint<'_>>,
        single_select: bool,
    ) -> Result<(String, usize)> {
        let mut sql = String::from("SELECT ");
        if select.distinct {
            sql.push_str("DISTINCT ");
        }
        let columns = self.in_clause(Clause::Select, |t| t.select_list(&select.columns))?;
        sql.push_str(&columns);

        match &select.from {
            Some(from) => {
                sql.push_str(" FROM ");
                let from = self.in_clause(Clause::From, |t| t.table_ref(from, hint))?;
                sql.push_str(&from);
            }
            None => {
                if let Some(dual) = self.dialect.config().dual {
                    sql.push_str(" FROM ");
                    sql.push_str(dual);
                }
            }
        }

        if let Some(where_expr) = &select.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&self.in_clause(Clause::Where, |t| t.expr(where_expr))?);
        }

        if !select.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.in_clause(Clause::GroupBy, |t| t.expr_list(&select.group_by))?);
        }

        if let Some(having) = &select.having {
            sql.push_str(" HAVING ");
            sql.push_str(&self.in_clause(Clause::Having, |t| t.expr(having))?);
        }

        for (op, member) in &select.set_operations {
            sql.push(' ');
            sql.push_str(op.as_str());
            sql.push(' ');
            let nested = member.fetch.is_some() || !member.order_by.is_empty();
            let member = self.select(member)?;
            if nested {
                sql.push('(');
                sql.push_str(&member);
                sql.push(')');
            } else {
                sql.push_str(&member);
            }
        }

        if single_select {
            trace!("wrapping query part so pagination applies to all of it");
            sql = format!("SELECT * FROM ({sql}) query_");
        }

        let before_order = self.params.len();
        if !select.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.in_clause(Clause::OrderBy, |t| t.order_items(&select.order_by))?);
        }
        Ok((sql, self.params.len() - before_order))
    }

    pub(super) fn select_list(&mut self, columns: &[SelectColumn]) -> Result<String> {
        if columns.is_empty() {
            return Ok(String::from("*"));
        }
        let mut items = Vec::with_capacity(columns.len());
        for column in columns {
            let mut item = self.expr(&column.expr)?;
            if let Some(alias) = &column.alias {
                item.push_str(" AS ");
                item.push_str(alias);
            }
            items.push(item);
        }
        Ok(items.join(", "))
    }

    pub(super) fn expr_list(&mut self, exprs: &[Expr]) -> Result<String> {
        let mut items = Vec::with_capacity(exprs.len());
        for expr in exprs {
            items.push(self.expr(expr)?);
        }
        Ok(items.join(", "))
    }

    fn table_ref(&mut self, table: &TableRef, hint: Option<&TableHint<'_>>) -> Result<String> {
        match table {
            TableRef::Table {
                schema,
                name,
                alias,
            } => {
                let mut sql = match schema {
                    Some(schema) => format!("{schema}.{name}"),
                    None => name.clone(),
                };
                if let Some(alias) = alias {
                    sql.push(' ');
                    sql.push_str(alias);
                }
                if let Some(hint) = hint {
                    if hint.applies_to(name, alias.as_deref()) {
                        sql.push_str(&hint.hint);
                    }
                }
                Ok(sql)
            }
            TableRef::Subquery { query, alias } => {
                let query = self.select(query)?;
                Ok(format!("({query}) {alias}"))
            }
            TableRef::Join { left, join } => {
                let mut sql = self.table_ref(left, hint)?;
                sql.push(' ');
                sql.push_str(join.join_type.as_str());
                sql.push(' ');
                sql.push_str(&self.table_ref(&join.table, hint)?);
                if let Some(on) = &join.on {
                    sql.push_str(" ON ");
                    sql.push_str(&self.expr(on)?);
                }
                Ok(sql)
            }
        }
    }

    pub(super) fn order_items(&mut self, items: &[OrderBy]) -> Result<String> {
        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            if let Some(key) = self.null_precedence_key(item)? {
                rendered.push(key);
            }
            let mut sql = self.expr(&item.expr)?;
            if item.direction == OrderDirection::Desc {
                sql.push_str(" DESC");
            }
            if let Some(nulls) = item.nulls {
                if self.dialect.supports(Capability::NullsOrderingSyntax) {
                    sql.push(' ');
                    sql.push_str(nulls.as_str());
                }
            }
            rendered.push(sql);
        }
        Ok(rendered.join(", "))
    }

    /// Returns the leading sort key emulating `NULLS FIRST`/`NULLS LAST`
    /// when the dialect has no syntax for it and sorts nulls the other way.
    fn null_precedence_key(&mut self, item: &OrderBy) -> Result<Option<String>> {
        let Some(nulls) = item.nulls else {
            return Ok(None);
        };
        if self.dialect.supports(Capability::NullsOrderingSyntax) {
            return Ok(None);
        }
        let descending = item.direction == OrderDirection::Desc;
        let natural_first = self.dialect.config().null_ordering.nulls_first(descending);
        let wanted_first = nulls == NullPrecedence::First;
        if natural_first == wanted_first {
            return Ok(None);
        }
        trace!(precedence = nulls.as_str(), "emulating null precedence");
        let key = self.resolve_select_item(&item.expr)?;
        let operand = self.expr(&key)?;
        let (null_rank, other_rank) = if wanted_first { (0, 1) } else { (1, 0) };
        Ok(Some(format!(
            "CASE WHEN {operand} IS NULL THEN {null_rank} ELSE {other_rank} END"
        )))
    }

    fn check_lock(&self, select: &SelectStatement, lock: &LockClause, root: bool) -> Result<()> {
        if !root {
            return Err(self.mismatch("row locks are only valid on the outermost query"));
        }
        let outer_join = select
            .from
            .as_ref()
            .is_some_and(TableRef::has_outer_join);
        let clause_style = self.dialect.lock_hint(lock.mode, lock.timeout).is_none();
        if outer_join && clause_style && !self.dialect.supports(Capability::OuterJoinForUpdate) {
            let named = !lock.targets.is_empty()
                && self.dialect.supports(Capability::AliasLocks)
                && self.dialect.row_lock_strategy(lock.mode) != RowLockStrategy::None;
            if !named {
                return Err(self.mismatch(
                    "locking an outer join needs lock targets naming the tables to lock",
                ));
            }
        }
        Ok(())
    }

    fn lock_targets(&self, lock: &LockClause) -> Result<Vec<String>> {
        let strategy = self.dialect.row_lock_strategy(lock.mode);
        lock.targets
            .iter()
            .map(|target| match (strategy, &target.column) {
                (RowLockStrategy::Column, Some(column)) => Ok(format!("{}.{column}", target.alias)),
                (RowLockStrategy::Column, None) => Err(self.mismatch(format!(
                    "lock target '{}' must name a column",
                    target.alias
                ))),
                _ => Ok(target.alias.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::ast::{Expr, JoinType, LockTarget, NullPrecedence, OrderBy, SetOperator, TableRef};
    use crate::builder::{Select, SqlValue};
    use crate::dialect::{Dialect, DialectFamily};
    use crate::error::DialectError;
    use crate::strategy::{LockMode, LockTimeout};
    use crate::translate::{translate, Clause};
    use crate::version::DatabaseVersion;

    fn sql(query: crate::ast::SelectStatement, dialect: &Dialect) -> String {
        translate(&query.into(), dialect).unwrap().sql
    }

    #[test]
    fn test_plain_select() {
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(16));
        let query = Select::new()
            .columns(&["id", "name"])
            .from("users")
            .where_clause(Expr::column("age").gt(Expr::param(18)))
            .group_by(vec![Expr::column("name")])
            .build();
        let translation = translate(&query.into(), &pg).unwrap();
        assert_eq!(
            translation.sql,
            "SELECT id, name FROM users WHERE age > ? GROUP BY name"
        );
        assert_eq!(translation.params, vec![SqlValue::Int(18)]);
    }

    #[test]
    fn test_select_without_from_uses_dual() {
        let query = crate::ast::SelectStatement {
            columns: vec![crate::ast::SelectColumn::new(Expr::integer(1))],
            ..Default::default()
        };
        let oracle = Dialect::new(DialectFamily::Oracle, DatabaseVersion::major(19));
        assert_eq!(sql(query.clone(), &oracle), "SELECT 1 FROM dual");
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(16));
        assert_eq!(sql(query, &pg), "SELECT 1");
    }

    #[test]
    fn test_nulls_first_native_and_emulated() {
        let query = Select::new()
            .columns(&["a"])
            .from("t")
            .order_by(OrderBy::asc(Expr::column("a")).nulls(NullPrecedence::First))
            .build();
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(16));
        assert_eq!(sql(query.clone(), &pg), "SELECT a FROM t ORDER BY a NULLS FIRST");

        // MySQL sorts nulls as the smallest value: first when ascending.
        let mysql = Dialect::new(DialectFamily::MySql, DatabaseVersion::new(8, 0, 30));
        assert_eq!(sql(query, &mysql), "SELECT a FROM t ORDER BY a");

        let query = Select::new()
            .columns(&["a"])
            .from("t")
            .order_by(OrderBy::asc(Expr::column("a")).nulls(NullPrecedence::Last))
            .build();
        assert_eq!(
            sql(query, &mysql),
            "SELECT a FROM t ORDER BY CASE WHEN a IS NULL THEN 1 ELSE 0 END, a"
        );
    }

    #[test]
    fn test_select_item_reference_strategies() {
        let query = Select::new()
            .columns(&["name"])
            .from("users")
            .group_by(vec![Expr::SelectItem(1)])
            .order_by(OrderBy::desc(Expr::SelectItem(1)))
            .build();
        let mysql = Dialect::new(DialectFamily::MySql, DatabaseVersion::new(8, 0, 30));
        assert_eq!(
            sql(query.clone(), &mysql),
            "SELECT name FROM users GROUP BY 1 ORDER BY 1 DESC"
        );
        let oracle = Dialect::new(DialectFamily::Oracle, DatabaseVersion::major(19));
        assert_eq!(
            sql(query, &oracle),
            "SELECT name FROM users GROUP BY name ORDER BY name DESC"
        );
    }

    #[test]
    fn test_set_operation_members() {
        let other = Select::new().columns(&["b"]).from("u").build();
        let query = Select::new()
            .columns(&["a"])
            .from("t")
            .set_operation(SetOperator::UnionAll, other)
            .build();
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(16));
        assert_eq!(sql(query, &pg), "SELECT a FROM t UNION ALL SELECT b FROM u");
    }

    #[test]
    fn test_lock_clause_targets() {
        let query = Select::new()
            .columns(&["o.id"])
            .from_ref(TableRef::table("orders").alias("o"))
            .lock_of(
                LockMode::Write,
                LockTimeout::SkipLocked,
                vec![LockTarget {
                    alias: String::from("o"),
                    column: Some(String::from("id")),
                }],
            )
            .build();
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(16));
        assert_eq!(
            sql(query.clone(), &pg),
            "SELECT o.id FROM orders o FOR UPDATE OF o SKIP LOCKED"
        );
        let oracle = Dialect::new(DialectFamily::Oracle, DatabaseVersion::major(19));
        assert_eq!(
            sql(query, &oracle),
            "SELECT o.id FROM orders o FOR UPDATE OF o.id SKIP LOCKED"
        );
    }

    #[test]
    fn test_lock_degrades_without_skip_locked() {
        let query = Select::new()
            .all()
            .from("jobs")
            .lock(LockMode::Write, LockTimeout::SkipLocked)
            .build();
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::simple(9, 4));
        assert_eq!(sql(query, &pg), "SELECT * FROM jobs FOR UPDATE");
    }

    #[test]
    fn test_table_hints() {
        let from = TableRef::table("orders")
            .alias("o")
            .join(JoinType::Inner, TableRef::table("lines").alias("l"), Some(
                Expr::qualified_column("l", "order_id").eq(Expr::qualified_column("o", "id")),
            ));
        let query = Select::new()
            .all()
            .from_ref(from)
            .lock_of(
                LockMode::Write,
                LockTimeout::NoWait,
                vec![LockTarget {
                    alias: String::from("o"),
                    column: None,
                }],
            )
            .build();
        let sqlserver = Dialect::new(DialectFamily::SqlServer, DatabaseVersion::major(11));
        assert_eq!(
            sql(query, &sqlserver),
            "SELECT * FROM orders o WITH (UPDLOCK, HOLDLOCK, ROWLOCK, NOWAIT) INNER JOIN lines l ON l.order_id = o.id"
        );
    }

    #[test]
    fn test_outer_join_lock_needs_targets() {
        let from = TableRef::table("a").join(
            JoinType::Left,
            TableRef::table("b"),
            Some(Expr::qualified_column("a", "id").eq(Expr::qualified_column("b", "a_id"))),
        );
        let query = Select::new()
            .all()
            .from_ref(from)
            .lock(LockMode::Write, LockTimeout::WaitForever)
            .build();
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(16));
        let err = translate(&query.into(), &pg).unwrap_err();
        assert!(matches!(
            err,
            DialectError::CapabilityMismatch {
                clause: Clause::ForUpdate,
                ..
            }
        ));
    }

    #[test]
    fn test_lock_in_subquery_is_rejected() {
        let inner = Select::new()
            .columns(&["id"])
            .from("t")
            .lock(LockMode::Write, LockTimeout::WaitForever)
            .build();
        let query = Select::new()
            .all()
            .from_ref(TableRef::subquery(inner, "s"))
            .build();
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(16));
        assert!(translate(&query.into(), &pg)
            .unwrap_err()
            .is_capability_mismatch());
    }
}
