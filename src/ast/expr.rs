//! Expression model.
//!
//! An [`Expression`] is a flat, ordered list of nodes rendered left to right.
//! Precedence is never inferred: nesting happens only through [`Expression::group`]
//! and [`Expression::subquery`].

use serde::{Deserialize, Serialize};

use crate::ast::{AggregateFunc, SqlStatement, Value};
use crate::builder::SubQuery;

/// Scalar functions with a per-dialect spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarFunc {
    /// Upper-case a string (UCASE / UPPER)
    Upper,
    /// Lower-case a string (LCASE / LOWER)
    Lower,
    /// Substring starting at 1-based `start`
    Mid { start: i64, length: Option<i64> },
    /// String length (LENGTH / LEN)
    Length,
    /// Round to `decimals` places
    Round { decimals: u32 },
    /// Format using a dialect-specific pattern (bound as a parameter)
    Format { pattern: String },
    /// Current date and time
    Now,
}

/// Function kind: aggregate or scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Func {
    Aggregate(AggregateFunc),
    Scalar(ScalarFunc),
}

/// A function call over zero or more columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub func: Func,
    pub columns: Vec<String>,
    #[serde(default)]
    pub distinct: bool,
}

/// One node of an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprNode {
    /// Column reference (`*` and `table.*` allowed)
    Column(String),
    /// Bound literal
    Literal(Value),
    /// Raw operator token (`+`, `-`, `*`, `||`, ...)
    Op(String),
    Function(FunctionCall),
    /// Parenthesized nested expression
    Group(Expression),
    /// Parenthesized SELECT
    Subquery(Box<SqlStatement>),
}

/// A flat, ordered expression.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expression {
    pub nodes: Vec<ExprNode>,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an expression through a closure.
    pub fn build(f: impl FnOnce(&mut Expression)) -> Self {
        let mut expr = Expression::new();
        f(&mut expr);
        expr
    }

    /// Expression holding a single column reference.
    pub fn from_column(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![ExprNode::Column(name.into())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn column(&mut self, name: impl Into<String>) -> &mut Self {
        self.nodes.push(ExprNode::Column(name.into()));
        self
    }

    pub fn value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.nodes.push(ExprNode::Literal(value.into()));
        self
    }

    pub fn op(&mut self, token: impl Into<String>) -> &mut Self {
        self.nodes.push(ExprNode::Op(token.into()));
        self
    }

    /// Open a nested, parenthesized expression.
    pub fn group(&mut self, f: impl FnOnce(&mut Expression)) -> &mut Self {
        self.nodes.push(ExprNode::Group(Expression::build(f)));
        self
    }

    /// Embed a parenthesized SELECT.
    pub fn subquery(&mut self, f: impl FnOnce(&mut SubQuery)) -> &mut Self {
        let statement = SubQuery::build(f);
        self.nodes.push(ExprNode::Subquery(Box::new(statement)));
        self
    }

    /// COUNT over one or more columns.
    ///
    /// Two or more columns always count DISTINCT tuples, whatever `distinct` says.
    pub fn count<I, S>(&mut self, columns: I, distinct: bool) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let distinct = distinct || columns.len() > 1;
        self.push_function(Func::Aggregate(AggregateFunc::Count), columns, distinct)
    }

    pub fn sum(&mut self, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.push_function(Func::Aggregate(AggregateFunc::Sum), vec![column.into()], distinct)
    }

    pub fn avg(&mut self, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.push_function(Func::Aggregate(AggregateFunc::Avg), vec![column.into()], distinct)
    }

    pub fn min(&mut self, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.push_function(Func::Aggregate(AggregateFunc::Min), vec![column.into()], distinct)
    }

    pub fn max(&mut self, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.push_function(Func::Aggregate(AggregateFunc::Max), vec![column.into()], distinct)
    }

    pub fn ucase(&mut self, column: impl Into<String>) -> &mut Self {
        self.push_function(Func::Scalar(ScalarFunc::Upper), vec![column.into()], false)
    }

    pub fn lcase(&mut self, column: impl Into<String>) -> &mut Self {
        self.push_function(Func::Scalar(ScalarFunc::Lower), vec![column.into()], false)
    }

    pub fn mid(&mut self, column: impl Into<String>, start: i64, length: Option<i64>) -> &mut Self {
        self.push_function(
            Func::Scalar(ScalarFunc::Mid { start, length }),
            vec![column.into()],
            false,
        )
    }

    pub fn len(&mut self, column: impl Into<String>) -> &mut Self {
        self.push_function(Func::Scalar(ScalarFunc::Length), vec![column.into()], false)
    }

    pub fn round(&mut self, column: impl Into<String>, decimals: u32) -> &mut Self {
        self.push_function(
            Func::Scalar(ScalarFunc::Round { decimals }),
            vec![column.into()],
            false,
        )
    }

    pub fn format(&mut self, column: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
        self.push_function(
            Func::Scalar(ScalarFunc::Format {
                pattern: pattern.into(),
            }),
            vec![column.into()],
            false,
        )
    }

    pub fn now(&mut self) -> &mut Self {
        self.push_function(Func::Scalar(ScalarFunc::Now), Vec::new(), false)
    }

    fn push_function(&mut self, func: Func, columns: Vec<String>, distinct: bool) -> &mut Self {
        self.nodes.push(ExprNode::Function(FunctionCall {
            func,
            columns,
            distinct,
        }));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_append_in_order() {
        let expr = Expression::build(|e| {
            e.column("price").op("*").group(|g| {
                g.value(1).op("-").column("discount");
            });
        });
        assert_eq!(expr.nodes.len(), 3);
        assert!(matches!(expr.nodes[2], ExprNode::Group(ref g) if g.nodes.len() == 3));
    }

    #[test]
    fn test_multi_column_count_forces_distinct() {
        let expr = Expression::build(|e| {
            e.count(["a", "b"], false);
        });
        match &expr.nodes[0] {
            ExprNode::Function(call) => assert!(call.distinct),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_single_column_count_keeps_flag() {
        let expr = Expression::build(|e| {
            e.count(["a"], false);
        });
        match &expr.nodes[0] {
            ExprNode::Function(call) => assert!(!call.distinct),
            other => panic!("unexpected node {:?}", other),
        }
    }
}
