//! Expression rendering.

use super::{Clause, DepthGuard, Translator, MAX_EXPR_DEPTH};
use crate::ast::{BinaryOp, Expr, FunctionCall, Literal, UnaryOp};
use crate::boolean::BooleanDecoder;
use crate::capability::Capability;
use crate::dialect::{ConcatStyle, FunctionTemplate, PatternPiece};
use crate::error::Result;
use crate::strategy::SelectItemReferenceStrategy;

impl Translator<'_> {
    pub(super) fn expr(&mut self, expr: &Expr) -> Result<String> {
        let _guard = DepthGuard::enter(&self.expr_depth, MAX_EXPR_DEPTH)?;
        match expr {
            Expr::Literal(literal) => Ok(self.literal(literal)),
            Expr::Column { table, name } => Ok(match table {
                Some(table) => format!("{table}.{name}"),
                None => name.clone(),
            }),
            Expr::Param(value) => Ok(self.bind(value.clone()).to_string()),
            Expr::Binary { left, op, right } => {
                let left = self.operand(left, *op, false)?;
                let right = self.operand(right, *op, true)?;
                Ok(format!("{left} {} {right}", op.as_str()))
            }
            Expr::Unary { op, operand } => {
                let inner = self.expr(operand)?;
                let inner = if matches!(**operand, Expr::Binary { .. }) {
                    format!("({inner})")
                } else {
                    inner
                };
                Ok(match op {
                    UnaryOp::Neg => format!("-{inner}"),
                    UnaryOp::Not => format!("NOT {inner}"),
                })
            }
            Expr::Function(call) => self.function(call),
            Expr::Subquery(query) => Ok(format!("({})", self.select(query)?)),
            Expr::IsNull { expr, negated } => {
                let inner = self.expr(expr)?;
                let not = if *negated { "NOT " } else { "" };
                Ok(format!("{inner} IS {not}NULL"))
            }
            Expr::In {
                expr,
                list,
                negated,
            } => {
                if list.is_empty() {
                    // Nothing is in an empty list.
                    return Ok(String::from(if *negated { "1 = 1" } else { "1 = 0" }));
                }
                let inner = self.expr(expr)?;
                let items = self.expr_list(list)?;
                let not = if *negated { "NOT " } else { "" };
                Ok(format!("{inner} {not}IN ({items})"))
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let inner = self.expr(expr)?;
                let low = self.expr(low)?;
                let high = self.expr(high)?;
                let not = if *negated { "NOT " } else { "" };
                Ok(format!("{inner} {not}BETWEEN {low} AND {high}"))
            }
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                let mut sql = String::from("CASE");
                if let Some(operand) = operand {
                    sql.push(' ');
                    sql.push_str(&self.expr(operand)?);
                }
                for (condition, result) in when_clauses {
                    let condition = self.expr(condition)?;
                    let result = self.expr(result)?;
                    sql.push_str(&format!(" WHEN {condition} THEN {result}"));
                }
                if let Some(otherwise) = else_clause {
                    sql.push_str(" ELSE ");
                    sql.push_str(&self.expr(otherwise)?);
                }
                sql.push_str(" END");
                Ok(sql)
            }
            Expr::Cast { expr, code, length } => {
                let inner = self.expr(expr)?;
                let native = self
                    .dialect
                    .column_type(*code, *length, None, None)
                    .ok_or_else(|| self.mismatch(format!("no {} type to cast to", code.as_str())))?;
                Ok(format!("CAST({inner} AS {native})"))
            }
            Expr::Concat(parts) => self.concat(parts),
            Expr::Boolean { expr, stored_as } => {
                let inner = self.expr(expr)?;
                Ok(BooleanDecoder::convert(*stored_as, self.dialect.config().boolean).render(&inner))
            }
            Expr::NextValue(sequence) => self
                .dialect
                .next_value_sql(sequence)
                .ok_or_else(|| self.mismatch("the dialect has no sequences")),
            Expr::RowNumber { order_by } => {
                if !self.dialect.supports(Capability::WindowFunctions) {
                    return Err(self.mismatch("the dialect has no window functions"));
                }
                if order_by.is_empty() {
                    return Ok(self.dialect.config().window_order_fallback.map_or_else(
                        || String::from("ROW_NUMBER() OVER ()"),
                        |fallback| format!("ROW_NUMBER() OVER (ORDER BY {fallback})"),
                    ));
                }
                let outer_inline = std::mem::replace(&mut self.inline_item_refs, true);
                let order = self.in_clause(Clause::OrderBy, |t| t.order_items(order_by));
                self.inline_item_refs = outer_inline;
                let order = order?;
                Ok(format!("ROW_NUMBER() OVER (ORDER BY {order})"))
            }
            Expr::SelectItem(position) => self.select_item(*position),
            Expr::Paren(inner) => Ok(format!("({})", self.expr(inner)?)),
            Expr::Wildcard { table } => Ok(match table {
                Some(table) => format!("{table}.*"),
                None => String::from("*"),
            }),
        }
    }

    /// Writes a call through the dialect's function templates.
    fn function(&mut self, call: &FunctionCall) -> Result<String> {
        let distinct = if call.distinct { "DISTINCT " } else { "" };
        let template = self
            .dialect
            .config()
            .functions
            .find(&call.name, call.args.len());
        let name = match template {
            None => call.name.as_str(),
            Some(FunctionTemplate::Named(vendor)) => vendor,
            Some(template @ FunctionTemplate::Pattern(_)) => {
                if call.distinct {
                    return Err(self.mismatch(format!(
                        "{}(DISTINCT ...) has no form on this dialect",
                        call.name
                    )));
                }
                return self.function_pattern(call, template);
            }
        };
        let args = self.expr_list(&call.args)?;
        Ok(format!("{name}({distinct}{args})"))
    }

    /// Fills pattern slots. Each argument is rendered once and its
    /// parameters are bound again wherever its slot appears, so markers
    /// and values stay aligned when a pattern reorders or repeats slots.
    fn function_pattern(&mut self, call: &FunctionCall, template: FunctionTemplate) -> Result<String> {
        let mut rendered = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            let mark = self.params.len();
            let sql = self.expr(arg)?;
            let params = self.params.split_off(mark);
            rendered.push((sql, params));
        }
        let mut out = String::new();
        for piece in template.pieces() {
            match piece {
                PatternPiece::Text(text) => out.push_str(text),
                PatternPiece::Arg(index) => {
                    let (sql, params) = rendered.get(index).ok_or_else(|| {
                        self.mismatch(format!(
                            "{} needs argument {} but was called with {}",
                            call.name,
                            index + 1,
                            call.args.len()
                        ))
                    })?;
                    out.push_str(sql);
                    self.params.extend(params.iter().cloned());
                }
            }
        }
        Ok(out)
    }

    fn literal(&self, literal: &Literal) -> String {
        match literal {
            Literal::Integer(n) => n.to_string(),
            Literal::Float(f) => f.to_string(),
            Literal::String(s) => format!("'{}'", s.replace('\'', "''")),
            Literal::Boolean(b) => self.dialect.boolean_literal(*b).to_string(),
            Literal::Null => String::from("NULL"),
        }
    }

    /// Renders a binary operand, parenthesized when it binds looser than
    /// its parent.
    fn operand(&mut self, child: &Expr, parent: BinaryOp, right: bool) -> Result<String> {
        let sql = self.expr(child)?;
        let Expr::Binary { op, .. } = child else {
            return Ok(sql);
        };
        let associative = *op == parent
            && matches!(
                parent,
                BinaryOp::And | BinaryOp::Or | BinaryOp::Add | BinaryOp::Mul
            );
        let needs_parens = op.precedence() < parent.precedence()
            || (right && op.precedence() == parent.precedence() && !associative);
        Ok(if needs_parens { format!("({sql})") } else { sql })
    }

    fn concat(&mut self, parts: &[Expr]) -> Result<String> {
        let mut rendered = Vec::with_capacity(parts.len());
        for part in parts {
            rendered.push(self.expr(part)?);
        }
        Ok(match rendered.len() {
            0 => String::from("''"),
            1 => rendered.remove(0),
            _ => match self.dialect.config().concat {
                ConcatStyle::Operator => rendered.join(" || "),
                ConcatStyle::Plus => rendered.join(" + "),
                ConcatStyle::Function => format!("concat({})", rendered.join(", ")),
            },
        })
    }

    /// Renders a one-based reference to an item of the enclosing select
    /// list, by position, alias or expression per the dialect.
    fn select_item(&mut self, position: usize) -> Result<String> {
        let item = position
            .checked_sub(1)
            .and_then(|index| self.scopes.last().and_then(|items| items.get(index)))
            .cloned()
            .ok_or_else(|| self.mismatch(format!("select item {position} does not exist")))?;
        let by_reference = matches!(self.clause, Clause::GroupBy | Clause::OrderBy)
            && !self.inline_item_refs;
        match (by_reference, self.dialect.config().select_item_reference) {
            (true, SelectItemReferenceStrategy::Position) => Ok(position.to_string()),
            (true, SelectItemReferenceStrategy::Alias) if item.alias.is_some() => {
                Ok(item.alias.unwrap_or_default())
            }
            _ => self.expr(&item.expr),
        }
    }

    /// Returns the expression a select item reference stands for, or the
    /// expression itself.
    pub(super) fn resolve_select_item(&self, expr: &Expr) -> Result<Expr> {
        let Expr::SelectItem(position) = expr else {
            return Ok(expr.clone());
        };
        position
            .checked_sub(1)
            .and_then(|index| self.scopes.last().and_then(|items| items.get(index)))
            .map(|item| item.expr.clone())
            .ok_or_else(|| self.mismatch(format!("select item {position} does not exist")))
    }
}
