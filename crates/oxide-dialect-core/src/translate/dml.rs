//! INSERT, UPDATE and DELETE.

use tracing::trace;

use super::{Clause, Translator};
use crate::ast::{
    DeleteStatement, Expr, InsertSource, InsertStatement, SelectColumn, UpdateStatement,
};
use crate::capability::Capability;
use crate::error::Result;

impl Translator<'_> {
    pub(super) fn insert(&mut self, insert: &InsertStatement) -> Result<String> {
        let mut sql = format!("INSERT INTO {}", insert.table);
        if !insert.columns.is_empty() && !matches!(insert.values, InsertSource::DefaultValues) {
            sql.push_str(" (");
            sql.push_str(&insert.columns.join(", "));
            sql.push(')');
        }
        match &insert.values {
            InsertSource::Values(rows) => {
                let rows = self.in_clause(Clause::Values, |t| t.rows(rows, insert.columns.len()))?;
                sql.push(' ');
                sql.push_str(&rows);
            }
            InsertSource::Query(query) => {
                sql.push(' ');
                sql.push_str(&self.select(query)?);
            }
            InsertSource::DefaultValues => sql.push_str(" DEFAULT VALUES"),
        }
        sql.push_str(&self.returning(&insert.returning)?);
        Ok(sql)
    }

    fn rows(&mut self, rows: &[Vec<Expr>], width: usize) -> Result<String> {
        if rows.is_empty() {
            return Err(self.mismatch("an insert needs at least one row"));
        }
        if width > 0 {
            if let Some(row) = rows.iter().find(|row| row.len() != width) {
                return Err(self.mismatch(format!(
                    "a row has {} values for {width} columns",
                    row.len()
                )));
            }
        }
        let multi_row = self.dialect.supports(Capability::MultiRowValues);
        if rows.len() == 1 || multi_row {
            let mut rendered = Vec::with_capacity(rows.len());
            for row in rows {
                rendered.push(format!("({})", self.expr_list(row)?));
            }
            return Ok(format!("VALUES {}", rendered.join(", ")));
        }

        trace!(rows = rows.len(), "emulating multi-row VALUES with UNION ALL");
        let from = self
            .dialect
            .config()
            .dual
            .map(|dual| format!(" FROM {dual}"))
            .unwrap_or_default();
        let mut members = Vec::with_capacity(rows.len());
        for row in rows {
            members.push(format!("SELECT {}{from}", self.expr_list(row)?));
        }
        Ok(members.join(" UNION ALL "))
    }

    pub(super) fn update(&mut self, update: &UpdateStatement) -> Result<String> {
        let mut sql = format!("UPDATE {}", update.table);
        if let Some(alias) = &update.alias {
            sql.push(' ');
            sql.push_str(alias);
        }
        if update.assignments.is_empty() {
            return Err(self.mismatch_at(Clause::Set, "an update needs at least one assignment"));
        }
        let assignments = self.in_clause(Clause::Set, |t| {
            let mut items = Vec::with_capacity(update.assignments.len());
            for assignment in &update.assignments {
                items.push(format!("{} = {}", assignment.column, t.expr(&assignment.value)?));
            }
            Ok(items.join(", "))
        })?;
        sql.push_str(" SET ");
        sql.push_str(&assignments);
        if let Some(where_expr) = &update.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&self.in_clause(Clause::Where, |t| t.expr(where_expr))?);
        }
        sql.push_str(&self.returning(&update.returning)?);
        Ok(sql)
    }

    pub(super) fn delete(&mut self, delete: &DeleteStatement) -> Result<String> {
        let mut sql = format!("DELETE FROM {}", delete.table);
        if let Some(alias) = &delete.alias {
            sql.push(' ');
            sql.push_str(alias);
        }
        if let Some(where_expr) = &delete.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&self.in_clause(Clause::Where, |t| t.expr(where_expr))?);
        }
        sql.push_str(&self.returning(&delete.returning)?);
        Ok(sql)
    }

    fn returning(&mut self, columns: &[SelectColumn]) -> Result<String> {
        if columns.is_empty() {
            return Ok(String::new());
        }
        self.in_clause(Clause::Returning, |t| {
            if !t.dialect.supports(Capability::Returning) {
                return Err(t.mismatch("the dialect has no RETURNING clause"));
            }
            Ok(format!(" RETURNING {}", t.select_list(columns)?))
        })
    }
}
