use serde::{Deserialize, Serialize};

use crate::ast::{Combinator, JoinKind, Operator, TableRef};

/// One entry of an ON clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinNode {
    /// `left <op> right`, both sides column references
    Column {
        left: String,
        operator: Operator,
        right: String,
    },
    /// Parenthesized nested ON clause
    Nested(JoinSpec),
}

/// Ordered ON clause; the first entry's combinator is not rendered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JoinSpec {
    pub items: Vec<(Combinator, JoinNode)>,
}

impl JoinSpec {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A JOIN against another table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    #[serde(default)]
    pub on: JoinSpec,
}

/// Context handed to join closures.
#[derive(Debug, Default)]
pub struct JoinClause {
    spec: JoinSpec,
}

impl JoinClause {
    /// Build an ON clause through a closure.
    pub fn build(f: impl FnOnce(&mut JoinClause)) -> JoinSpec {
        let mut clause = JoinClause::default();
        f(&mut clause);
        clause.spec
    }

    /// `left = right`
    pub fn on(&mut self, left: impl Into<String>, right: impl Into<String>) -> &mut Self {
        self.push(Combinator::And, left.into(), Operator::Eq, right.into())
    }

    pub fn and_on(&mut self, left: impl Into<String>, right: impl Into<String>) -> &mut Self {
        self.on(left, right)
    }

    pub fn or_on(&mut self, left: impl Into<String>, right: impl Into<String>) -> &mut Self {
        self.push(Combinator::Or, left.into(), Operator::Eq, right.into())
    }

    /// `left <operator> right`
    pub fn on_op(
        &mut self,
        left: impl Into<String>,
        operator: Operator,
        right: impl Into<String>,
    ) -> &mut Self {
        self.push(Combinator::And, left.into(), operator, right.into())
    }

    pub fn or_on_op(
        &mut self,
        left: impl Into<String>,
        operator: Operator,
        right: impl Into<String>,
    ) -> &mut Self {
        self.push(Combinator::Or, left.into(), operator, right.into())
    }

    /// AND a parenthesized group.
    pub fn on_group(&mut self, f: impl FnOnce(&mut JoinClause)) -> &mut Self {
        self.spec
            .items
            .push((Combinator::And, JoinNode::Nested(JoinClause::build(f))));
        self
    }

    /// OR a parenthesized group.
    pub fn or_on_group(&mut self, f: impl FnOnce(&mut JoinClause)) -> &mut Self {
        self.spec
            .items
            .push((Combinator::Or, JoinNode::Nested(JoinClause::build(f))));
        self
    }

    fn push(
        &mut self,
        combinator: Combinator,
        left: String,
        operator: Operator,
        right: String,
    ) -> &mut Self {
        self.spec.items.push((
            combinator,
            JoinNode::Column {
                left,
                operator,
                right,
            },
        ));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_on_clause() {
        let spec = JoinClause::build(|j| {
            j.on("a.id", "b.a_id").on_group(|g| {
                g.on("a.x", "b.x").or_on("a.y", "b.y");
            });
        });
        assert_eq!(spec.items.len(), 2);
        match &spec.items[1] {
            (Combinator::And, JoinNode::Nested(inner)) => {
                assert_eq!(inner.items[1].0, Combinator::Or);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }
}
