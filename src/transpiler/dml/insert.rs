//! INSERT SQL generation.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::ParamContext;
use crate::transpiler::expr::render_expression;
use crate::transpiler::traits::SqlGenerator;

/// Validate an INSERT before rendering.
pub fn validate_insert(stmt: &InsertStatement) -> QailResult<()> {
    if stmt.table.is_empty() {
        return Err(QailError::invalid("INSERT requires a target table"));
    }
    if stmt.columns.is_empty() {
        return Err(QailError::invalid("INSERT requires at least one column"));
    }
    if stmt.rows.is_empty() {
        return Err(QailError::invalid("INSERT requires at least one row"));
    }
    if let Some((i, row)) = stmt
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != stmt.columns.len())
    {
        return Err(QailError::invalid(format!(
            "INSERT row {} has {} values, expected {}",
            i,
            row.len(),
            stmt.columns.len()
        )));
    }
    Ok(())
}

/// `INSERT INTO t (a, b) VALUES (?, ?), (?, ?)`
pub fn build_insert(
    stmt: &InsertStatement,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    validate_insert(stmt)?;

    let columns: Vec<String> = stmt
        .columns
        .iter()
        .map(|c| generator.quote_identifier(c))
        .collect();

    let mut rows = Vec::with_capacity(stmt.rows.len());
    for row in &stmt.rows {
        let mut values = Vec::with_capacity(row.len());
        for value in row {
            values.push(render_column_value(value, generator, params)?);
        }
        rows.push(format!("({})", values.join(", ")));
    }

    Ok(format!(
        "INSERT INTO {} ({}) VALUES {}",
        generator.quote_identifier(&stmt.table),
        columns.join(", "),
        rows.join(", ")
    ))
}

/// A bound value becomes a placeholder; an expression is rendered inline.
pub fn render_column_value(
    value: &ColumnValue,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    match value {
        ColumnValue::Value(v) => Ok(params.add_param(v.clone(), generator)),
        ColumnValue::Expression(expr) => render_expression(expr, generator, params),
    }
}
