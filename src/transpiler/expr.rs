//! Rendering of expressions, table references and joins.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::ParamContext;
use crate::transpiler::dml::select::build_select;
use crate::transpiler::traits::SqlGenerator;

/// Render an expression left to right, nodes separated by single spaces.
pub fn render_expression(
    expr: &Expression,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    let mut parts = Vec::with_capacity(expr.nodes.len());
    for node in &expr.nodes {
        let part = match node {
            ExprNode::Column(name) => generator.quote_identifier(name),
            ExprNode::Literal(value) => params.add_param(value.clone(), generator),
            ExprNode::Op(token) => token.clone(),
            ExprNode::Function(call) => render_function(call, generator, params)?,
            ExprNode::Group(inner) => format!("({})", render_expression(inner, generator, params)?),
            ExprNode::Subquery(statement) => {
                format!("({})", build_select(statement, generator, params)?)
            }
        };
        parts.push(part);
    }
    Ok(parts.join(" "))
}

fn render_function(
    call: &FunctionCall,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    let columns: Vec<String> = call
        .columns
        .iter()
        .map(|c| generator.quote_identifier(c))
        .collect();

    match &call.func {
        Func::Aggregate(func) => generator.aggregate(*func, call.distinct, &columns),
        Func::Scalar(ScalarFunc::Now) => {
            Ok(generator.scalar_function(&ScalarFunc::Now, "", params))
        }
        Func::Scalar(func) => {
            let column = columns.first().ok_or_else(|| {
                QailError::invalid(format!("{:?} requires a column argument", func))
            })?;
            Ok(generator.scalar_function(func, column, params))
        }
    }
}

/// `name [AS alias]`
pub fn render_table(table: &TableRef, generator: &dyn SqlGenerator) -> String {
    match &table.alias {
        Some(alias) => format!(
            "{} AS {}",
            generator.quote_identifier(&table.name),
            generator.quote_identifier(alias)
        ),
        None => generator.quote_identifier(&table.name),
    }
}

/// Comma-separated FROM list.
pub fn render_tables(tables: &[TableRef], generator: &dyn SqlGenerator) -> String {
    tables
        .iter()
        .map(|t| render_table(t, generator))
        .collect::<Vec<_>>()
        .join(", ")
}

/// JOIN clauses, each with its leading space.
pub fn render_joins(joins: &[Join], generator: &dyn SqlGenerator) -> String {
    let mut sql = String::new();
    for join in joins {
        sql.push(' ');
        sql.push_str(&join.kind.to_string());
        sql.push(' ');
        sql.push_str(&render_table(&join.table, generator));
        if join.kind != JoinKind::Cross && !join.on.is_empty() {
            sql.push_str(" ON ");
            sql.push_str(&render_join_spec(&join.on, generator));
        }
    }
    sql
}

fn render_join_spec(spec: &JoinSpec, generator: &dyn SqlGenerator) -> String {
    let mut sql = String::new();
    for (i, (combinator, node)) in spec.items.iter().enumerate() {
        if i > 0 {
            sql.push_str(&format!(" {} ", combinator));
        }
        match node {
            JoinNode::Column {
                left,
                operator,
                right,
            } => sql.push_str(&format!(
                "{} {} {}",
                generator.quote_identifier(left),
                operator,
                generator.quote_identifier(right)
            )),
            JoinNode::Nested(inner) => {
                sql.push_str(&format!("({})", render_join_spec(inner, generator)))
            }
        }
    }
    sql
}
