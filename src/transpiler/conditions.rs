//! WHERE / HAVING rendering.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::ParamContext;
use crate::transpiler::dml::select::build_select;
use crate::transpiler::expr::render_expression;
use crate::transpiler::traits::SqlGenerator;

/// Render a condition tree. Empty nested groups are skipped.
pub fn render_tree(
    tree: &ConditionTree,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    let mut sql = String::new();
    for (combinator, node) in &tree.items {
        let part = match node {
            ConditionNode::Condition(condition) => render_condition(condition, generator, params)?,
            ConditionNode::Exists { negated, query } => {
                let keyword = if *negated { "NOT EXISTS" } else { "EXISTS" };
                format!("{} ({})", keyword, build_select(query, generator, params)?)
            }
            ConditionNode::Group(inner) => {
                if inner.is_empty() {
                    continue;
                }
                format!("({})", render_tree(inner, generator, params)?)
            }
        };
        if !sql.is_empty() {
            sql.push_str(&format!(" {} ", combinator));
        }
        sql.push_str(&part);
    }
    Ok(sql)
}

fn render_condition(
    condition: &Condition,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    let op = condition.operator;

    // An empty list matches nothing (IN) or everything (NOT IN). Checked before
    // the operand is rendered so its literals never reach `params`.
    if let ConditionValue::List(values) = &condition.value {
        if values.is_empty() {
            match op {
                Operator::In => return Ok("1 = 0".to_string()),
                Operator::NotIn => return Ok("1 = 1".to_string()),
                _ => {}
            }
        }
    }

    let operand = match &condition.operand {
        Operand::Column(name) => generator.quote_identifier(name),
        Operand::Expression(expr) => render_expression(expr, generator, params)?,
    };

    match (op, &condition.value) {
        (Operator::IsNull | Operator::IsNotNull, _) => Ok(format!("{} {}", operand, op)),

        (Operator::Between | Operator::NotBetween, ConditionValue::Range(low, high)) => {
            let low = params.add_param(low.clone(), generator);
            let high = params.add_param(high.clone(), generator);
            Ok(format!("{} {} {} AND {}", operand, op, low, high))
        }

        (Operator::In | Operator::NotIn, ConditionValue::List(values)) => {
            let placeholders: Vec<String> = values
                .iter()
                .map(|v| params.add_param(v.clone(), generator))
                .collect();
            Ok(format!("{} {} ({})", operand, op, placeholders.join(", ")))
        }

        (_, ConditionValue::Subquery(query))
            if !matches!(op, Operator::Between | Operator::NotBetween) =>
        {
            Ok(format!(
                "{} {} ({})",
                operand,
                op,
                build_select(query, generator, params)?
            ))
        }

        (Operator::Between | Operator::NotBetween | Operator::In | Operator::NotIn, value) => {
            Err(QailError::invalid(format!(
                "{} cannot take {:?} as its right-hand side",
                op, value
            )))
        }

        (_, ConditionValue::Value(value)) => Ok(format!(
            "{} {} {}",
            operand,
            op,
            params.add_param(value.clone(), generator)
        )),
        (_, ConditionValue::Column(column)) => Ok(format!(
            "{} {} {}",
            operand,
            op,
            generator.quote_identifier(column)
        )),
        (_, value) => Err(QailError::invalid(format!(
            "{} cannot take {:?} as its right-hand side",
            op, value
        ))),
    }
}
