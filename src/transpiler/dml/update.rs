//! UPDATE SQL generation.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::ParamContext;
use crate::transpiler::conditions::render_tree;
use crate::transpiler::dml::insert::render_column_value;
use crate::transpiler::expr::render_tables;
use crate::transpiler::traits::SqlGenerator;

pub fn validate_update(stmt: &UpdateStatement) -> QailResult<()> {
    if stmt.statement.tables.is_empty() {
        return Err(QailError::invalid("UPDATE requires a target table"));
    }
    if stmt.assignments.is_empty() {
        return Err(QailError::invalid("UPDATE requires at least one assignment"));
    }
    Ok(())
}

/// `UPDATE t SET a = ?, b = b + ? WHERE ...`
pub fn build_update(
    stmt: &UpdateStatement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    validate_update(stmt)?;

    let mut sets = Vec::with_capacity(stmt.assignments.len());
    for (column, value) in &stmt.assignments {
        sets.push(format!(
            "{} = {}",
            generator.quote_identifier(column),
            render_column_value(value, generator, params)?
        ));
    }

    let mut sql = format!(
        "UPDATE {} SET {}",
        render_tables(&stmt.statement.tables, generator),
        sets.join(", ")
    );

    if !stmt.statement.wheres.is_empty() {
        let clause = render_tree(&stmt.statement.wheres, generator, params)?;
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
    }
    Ok(sql)
}
