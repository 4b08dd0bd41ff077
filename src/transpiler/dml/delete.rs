//! DELETE SQL generation.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::ParamContext;
use crate::transpiler::conditions::render_tree;
use crate::transpiler::expr::{render_joins, render_tables};
use crate::transpiler::traits::SqlGenerator;

/// `DELETE FROM t WHERE ...`, or `DELETE targets FROM t JOIN ... WHERE ...`
/// when rows come out of a join or more than one table is involved.
pub fn build_delete(
    stmt: &DeleteStatement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    let query = &stmt.statement;
    let Some(first) = query.tables.first() else {
        return Err(QailError::invalid("DELETE requires a FROM table"));
    };

    let multi = !stmt.targets.is_empty() || !query.joins.is_empty() || query.tables.len() > 1;
    let mut sql = if multi {
        let targets = if stmt.targets.is_empty() {
            vec![first.alias.clone().unwrap_or_else(|| first.name.clone())]
        } else {
            stmt.targets.clone()
        };
        format!(
            "DELETE {} FROM {}",
            generator.delete_targets(&targets)?,
            render_tables(&query.tables, generator)
        )
    } else {
        format!("DELETE FROM {}", render_tables(&query.tables, generator))
    };
    sql.push_str(&render_joins(&query.joins, generator));

    if !query.wheres.is_empty() {
        let clause = render_tree(&query.wheres, generator, params)?;
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
    }
    Ok(sql)
}
