//! Nested condition groups.

use crate::ast::*;
use crate::builder::SubQuery;
use crate::builder::clauses::{Clause, ConditionSink, HavingExpr, Predicate};

/// Context handed to `filter_group` / `having_group` closures.
///
/// Everything added here lands in one tree, rendered in parentheses.
#[derive(Debug, Default)]
pub struct ConditionGroup {
    tree: ConditionTree,
}

impl ConditionGroup {
    /// Run `f` against a fresh group and return what it collected.
    pub fn build(f: impl FnOnce(&mut ConditionGroup)) -> ConditionTree {
        let mut group = ConditionGroup::default();
        f(&mut group);
        group.tree
    }

    pub fn filter(&mut self, column: impl Into<String>) -> Predicate<&mut Self> {
        self.predicate(Operand::Column(column.into()), Combinator::And)
    }

    pub fn and_filter(&mut self, column: impl Into<String>) -> Predicate<&mut Self> {
        self.filter(column)
    }

    pub fn or_filter(&mut self, column: impl Into<String>) -> Predicate<&mut Self> {
        self.predicate(Operand::Column(column.into()), Combinator::Or)
    }

    pub fn filter_expr(&mut self, f: impl FnOnce(&mut Expression)) -> Predicate<&mut Self> {
        self.predicate(Operand::Expression(Expression::build(f)), Combinator::And)
    }

    pub fn or_filter_expr(&mut self, f: impl FnOnce(&mut Expression)) -> Predicate<&mut Self> {
        self.predicate(Operand::Expression(Expression::build(f)), Combinator::Or)
    }

    pub fn filter_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.tree.push_group(Combinator::And, ConditionGroup::build(f));
        self
    }

    pub fn or_filter_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.tree.push_group(Combinator::Or, ConditionGroup::build(f));
        self
    }

    pub fn filter_exists(&mut self, f: impl FnOnce(&mut SubQuery)) -> &mut Self {
        self.tree
            .push_exists(Combinator::And, false, SubQuery::build(f));
        self
    }

    pub fn or_filter_exists(&mut self, f: impl FnOnce(&mut SubQuery)) -> &mut Self {
        self.tree
            .push_exists(Combinator::Or, false, SubQuery::build(f));
        self
    }

    pub fn filter_not_exists(&mut self, f: impl FnOnce(&mut SubQuery)) -> &mut Self {
        self.tree
            .push_exists(Combinator::And, true, SubQuery::build(f));
        self
    }

    pub fn or_filter_not_exists(&mut self, f: impl FnOnce(&mut SubQuery)) -> &mut Self {
        self.tree
            .push_exists(Combinator::Or, true, SubQuery::build(f));
        self
    }

    /// Aggregate condition, for groups opened by `having_group`.
    pub fn having(&mut self, column: impl Into<String>) -> HavingExpr<&mut Self> {
        HavingExpr::new(self, column.into(), Combinator::And)
    }

    pub fn or_having(&mut self, column: impl Into<String>) -> HavingExpr<&mut Self> {
        HavingExpr::new(self, column.into(), Combinator::Or)
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    fn predicate(&mut self, operand: Operand, combinator: Combinator) -> Predicate<&mut Self> {
        Predicate::new(self, Clause::Where, operand, combinator)
    }
}

impl ConditionSink for &mut ConditionGroup {
    fn condition_tree(&mut self, _clause: Clause) -> &mut ConditionTree {
        &mut self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_collects_in_order() {
        let tree = ConditionGroup::build(|g| {
            g.filter("col2").is(2).or_filter("col3").is(3);
        });
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.items[0].0, Combinator::And);
        assert_eq!(tree.items[1].0, Combinator::Or);
    }

    #[test]
    fn test_having_inside_group_uses_aggregate_operand() {
        let tree = ConditionGroup::build(|g| {
            g.having("amount").sum().gt(100);
        });
        match &tree.items[0].1 {
            ConditionNode::Condition(condition) => {
                assert!(matches!(condition.operand, Operand::Expression(_)));
                assert_eq!(condition.operator, Operator::Gt);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_nested_group() {
        let tree = ConditionGroup::build(|g| {
            g.filter("a").is(1).or_filter_group(|inner| {
                inner.filter("b").is_null();
            });
        });
        assert!(matches!(tree.items[1], (Combinator::Or, ConditionNode::Group(_))));
    }
}
