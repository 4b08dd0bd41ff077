//! SELECT SQL generation.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::ParamContext;
use crate::transpiler::conditions::render_tree;
use crate::transpiler::expr::{render_expression, render_joins, render_tables};
use crate::transpiler::traits::SqlGenerator;

/// Render a SELECT, pushing parameters in placeholder order.
///
/// Also used for nested subqueries, which share the caller's [`ParamContext`].
pub fn build_select(
    stmt: &SqlStatement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    if stmt.tables.is_empty() {
        return Err(QailError::invalid("SELECT requires at least one table"));
    }

    let mut sql = String::from("SELECT ");
    if stmt.distinct {
        sql.push_str("DISTINCT ");
    }
    sql.push_str(&generator.select_prefix(stmt.limit, stmt.offset));

    if stmt.columns.is_empty() {
        sql.push('*');
    } else {
        let mut cols = Vec::with_capacity(stmt.columns.len());
        for column in &stmt.columns {
            let expr = render_expression(&column.expr, generator, params)?;
            match &column.alias {
                Some(alias) => {
                    cols.push(format!("{} AS {}", expr, generator.quote_identifier(alias)))
                }
                None => cols.push(expr),
            }
        }
        sql.push_str(&cols.join(", "));
    }

    if let Some(into) = &stmt.into {
        sql.push(' ');
        sql.push_str(&generator.select_into(into)?);
    }

    sql.push_str(" FROM ");
    sql.push_str(&render_tables(&stmt.tables, generator));
    sql.push_str(&render_joins(&stmt.joins, generator));

    if !stmt.wheres.is_empty() {
        let clause = render_tree(&stmt.wheres, generator, params)?;
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
    }

    if !stmt.group_by.is_empty() {
        let cols: Vec<String> = stmt
            .group_by
            .iter()
            .map(|c| generator.quote_identifier(c))
            .collect();
        sql.push_str(" GROUP BY ");
        sql.push_str(&cols.join(", "));
    }

    if !stmt.having.is_empty() {
        let clause = render_tree(&stmt.having, generator, params)?;
        if !clause.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&clause);
        }
    }

    let ordered = !stmt.order_by.is_empty();
    if ordered {
        let items: Vec<String> = stmt
            .order_by
            .iter()
            .map(|o| {
                generator.order_item(&generator.quote_identifier(&o.column), o.direction, o.nulls)
            })
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&items.join(", "));
    }

    sql.push_str(&generator.limit_offset(stmt.limit, stmt.offset, ordered));
    Ok(sql)
}
