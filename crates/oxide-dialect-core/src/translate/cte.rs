//! `WITH` clauses, including `SEARCH` and `CYCLE`.
//!
//! Without native support a search clause is dropped and its column filled
//! with a constant. A cycle clause is emulated with a path column holding
//! the visited keys and a mark column set once a key repeats.

use tracing::{debug, trace};

use super::{Clause, Translator};
use crate::ast::{Cte, CycleClause, Expr, SelectColumn, SelectStatement, TableRef, WithClause};
use crate::capability::Capability;
use crate::dialect::{ConcatStyle, TypeCode};
use crate::error::Result;

impl Translator<'_> {
    pub(super) fn with_clause(&mut self, with: &WithClause) -> Result<String> {
        if with.recursive && !self.dialect.supports(Capability::RecursiveCte) {
            return Err(self.mismatch("the dialect has no recursive common table expressions"));
        }
        let mut sql = String::from("WITH ");
        if with.recursive && self.dialect.config().recursive_keyword {
            sql.push_str("RECURSIVE ");
        }
        let mut items = Vec::with_capacity(with.ctes.len());
        for cte in &with.ctes {
            items.push(self.cte(cte, with.recursive)?);
        }
        sql.push_str(&items.join(", "));
        Ok(sql)
    }

    fn cte(&mut self, cte: &Cte, recursive: bool) -> Result<String> {
        let emulate_search =
            cte.search.is_some() && !self.dialect.supports(Capability::CteSearchClause);
        let emulate_cycle =
            cte.cycle.is_some() && !self.dialect.supports(Capability::CteCycleClause);
        let rewritten;
        let cte = if emulate_search || emulate_cycle {
            let mut copy = cte.clone();
            if emulate_search {
                self.drop_search(&mut copy);
            }
            if emulate_cycle {
                self.in_clause(Clause::Cycle, |t| t.emulate_cycle(&mut copy, recursive))?;
            }
            rewritten = copy;
            &rewritten
        } else {
            cte
        };

        let mut sql = cte.name.clone();
        if !cte.columns.is_empty() {
            sql.push_str(" (");
            sql.push_str(&cte.columns.join(", "));
            sql.push(')');
        }
        sql.push_str(" AS (");
        sql.push_str(&self.select(&cte.query)?);
        sql.push(')');

        if let Some(search) = &cte.search {
            sql.push_str(&format!(
                " SEARCH {} BY {} SET {}",
                search.kind.as_str(),
                search.by.join(", "),
                search.set_column
            ));
        }
        if let Some(cycle) = &cte.cycle {
            let mark = self.in_clause(Clause::Cycle, |t| t.expr(&cycle.mark))?;
            let default = self.in_clause(Clause::Cycle, |t| t.expr(&cycle.default))?;
            sql.push_str(&format!(
                " CYCLE {} SET {} TO {mark} DEFAULT {default}",
                cycle.columns.join(", "),
                cycle.set_column
            ));
            if self.dialect.config().cycle_using {
                sql.push_str(" USING ");
                sql.push_str(&cycle.using_column);
            }
        }
        Ok(sql)
    }

    fn drop_search(&self, cte: &mut Cte) {
        let Some(search) = cte.search.take() else {
            return;
        };
        debug!(
            cte = %cte.name,
            dialect = %self.dialect,
            "dropping CTE search clause"
        );
        let placeholder = SelectColumn::with_alias(Expr::integer(0), search.set_column.clone());
        cte.query.columns.push(placeholder.clone());
        for (_, member) in &mut cte.query.set_operations {
            member.columns.push(placeholder.clone());
        }
        if !cte.columns.is_empty() {
            cte.columns.push(search.set_column);
        }
    }

    fn emulate_cycle(&self, cte: &mut Cte, recursive: bool) -> Result<()> {
        let Some(cycle) = cte.cycle.take() else {
            return Ok(());
        };
        if !recursive {
            return Err(self.mismatch("a cycle clause needs a recursive common table expression"));
        }
        trace!(cte = %cte.name, "emulating cycle detection with a path column");
        let positions = cycle
            .columns
            .iter()
            .map(|column| {
                column_position(cte, column).ok_or_else(|| {
                    self.mismatch(format!(
                        "cycle column '{column}' is not a column of '{}'",
                        cte.name
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let name = cte.name.clone();
        let mut self_referencing = false;
        for_each_member(&mut cte.query, |member| {
            let key = self.cycle_key(member, &positions)?;
            match member.from.as_ref().and_then(|from| self_reference(from, &name)) {
                None => {
                    let mut path = vec![Expr::string("/")];
                    path.extend(key);
                    path.push(Expr::string("/"));
                    member.columns.push(SelectColumn::with_alias(
                        cycle.default.clone(),
                        cycle.set_column.clone(),
                    ));
                    member.columns.push(SelectColumn::with_alias(
                        Expr::Concat(path),
                        cycle.using_column.clone(),
                    ));
                }
                Some(previous) => {
                    self_referencing = true;
                    recursive_member(member, &cycle, &previous, key);
                }
            }
            Ok(())
        })?;
        if !self_referencing {
            return Err(self.mismatch(format!("'{name}' has no member referencing itself")));
        }
        if !cte.columns.is_empty() {
            cte.columns.push(cycle.set_column);
            cte.columns.push(cycle.using_column);
        }
        Ok(())
    }

    /// Returns the concatenation parts identifying a row of a member.
    fn cycle_key(&self, member: &SelectStatement, positions: &[usize]) -> Result<Vec<Expr>> {
        // `+` does not turn numbers into text.
        let cast = self.dialect.config().concat == ConcatStyle::Plus;
        let mut key = Vec::with_capacity(positions.len() * 2);
        for (i, &position) in positions.iter().enumerate() {
            let item = member
                .columns
                .get(position)
                .ok_or_else(|| self.mismatch("members must list the cycle columns explicitly"))?;
            if i > 0 {
                key.push(Expr::string(","));
            }
            key.push(if cast {
                Expr::Cast {
                    expr: Box::new(item.expr.clone()),
                    code: TypeCode::Varchar,
                    length: None,
                }
            } else {
                item.expr.clone()
            });
        }
        Ok(key)
    }
}

/// Extends the recursive member with the grown path, the cycle mark and a
/// filter that stops at rows already marked.
fn recursive_member(
    member: &mut SelectStatement,
    cycle: &CycleClause,
    previous: &str,
    key: Vec<Expr>,
) {
    let previous_path = Expr::qualified_column(previous, cycle.using_column.clone());
    let mut pattern = vec![Expr::string("%/")];
    pattern.extend(key.iter().cloned());
    pattern.push(Expr::string("/%"));
    let seen = previous_path
        .clone()
        .like(Expr::Paren(Box::new(Expr::Concat(pattern))));
    let mark = Expr::Case {
        operand: None,
        when_clauses: vec![(seen, cycle.mark.clone())],
        else_clause: Some(Box::new(cycle.default.clone())),
    };
    let mut path = vec![previous_path];
    path.extend(key);
    path.push(Expr::string("/"));

    member
        .columns
        .push(SelectColumn::with_alias(mark, cycle.set_column.clone()));
    member
        .columns
        .push(SelectColumn::with_alias(Expr::Concat(path), cycle.using_column.clone()));

    let unmarked = Expr::qualified_column(previous, cycle.set_column.clone()).eq(cycle.default.clone());
    member.where_clause = Some(match member.where_clause.take() {
        Some(existing) => existing.and(unmarked),
        None => unmarked,
    });
}

/// Runs `f` on the first query part and every set operation member.
fn for_each_member(
    query: &mut SelectStatement,
    mut f: impl FnMut(&mut SelectStatement) -> Result<()>,
) -> Result<()> {
    let mut rest = std::mem::take(&mut query.set_operations);
    let result = f(query).and_then(|()| rest.iter_mut().try_for_each(|(_, member)| f(member)));
    query.set_operations = rest;
    result
}

/// Zero-based position of a CTE column in the select lists of its members.
fn column_position(cte: &Cte, column: &str) -> Option<usize> {
    if !cte.columns.is_empty() {
        return cte.columns.iter().position(|c| c == column);
    }
    cte.query.columns.iter().position(|item| match (&item.alias, &item.expr) {
        (Some(alias), _) => alias == column,
        (None, Expr::Column { name, .. }) => name == column,
        _ => false,
    })
}

/// Returns how a member refers to the CTE, if its FROM names it.
fn self_reference(table: &TableRef, cte: &str) -> Option<String> {
    match table {
        TableRef::Table {
            schema: None,
            name,
            alias,
        } if name == cte => Some(alias.clone().unwrap_or_else(|| name.clone())),
        TableRef::Table { .. } | TableRef::Subquery { .. } => None,
        TableRef::Join { left, join } => {
            self_reference(left, cte).or_else(|| self_reference(&join.table, cte))
        }
    }
}
