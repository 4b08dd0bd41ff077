use serde::{Deserialize, Serialize};

use crate::ast::{Combinator, Expression, Operator, SqlStatement, Value};

/// Left-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Column(String),
    Expression(Expression),
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionValue {
    /// No right-hand side (IS NULL / IS NOT NULL)
    None,
    /// Single bound value
    Value(Value),
    /// Column reference, rendered as an identifier
    Column(String),
    /// Value list (IN / NOT IN)
    List(Vec<Value>),
    /// Inclusive bounds (BETWEEN / NOT BETWEEN)
    Range(Value, Value),
    /// SELECT producing the right-hand side (IN / NOT IN)
    Subquery(Box<SqlStatement>),
}

/// A single comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub operand: Operand,
    pub operator: Operator,
    pub value: ConditionValue,
}

/// One entry of a condition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionNode {
    Condition(Condition),
    /// EXISTS / NOT EXISTS over a subquery
    Exists {
        negated: bool,
        query: Box<SqlStatement>,
    },
    /// Parenthesized nested tree
    Group(ConditionTree),
}

/// Ordered list of conditions, each tagged with the combinator that links it
/// to the previous entry. The first entry's combinator is not rendered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionTree {
    pub items: Vec<(Combinator, ConditionNode)>,
}

impl ConditionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push_condition(&mut self, combinator: Combinator, condition: Condition) {
        self.items
            .push((combinator, ConditionNode::Condition(condition)));
    }

    pub fn push_group(&mut self, combinator: Combinator, tree: ConditionTree) {
        self.items.push((combinator, ConditionNode::Group(tree)));
    }

    pub fn push_exists(&mut self, combinator: Combinator, negated: bool, query: SqlStatement) {
        self.items.push((
            combinator,
            ConditionNode::Exists {
                negated,
                query: Box::new(query),
            },
        ));
    }
}
