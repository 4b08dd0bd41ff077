//! Subqueries for IN / EXISTS conditions and expression nodes.

use crate::ast::*;
use crate::builder::ConditionGroup;
use crate::builder::clauses::{Clause, ConditionSink, HavingExpr, Predicate, statement_tree};

/// Context handed to subquery closures. Builds a plain [`SqlStatement`].
#[derive(Debug, Default)]
pub struct SubQuery {
    statement: SqlStatement,
}

impl SubQuery {
    pub fn build(f: impl FnOnce(&mut SubQuery)) -> SqlStatement {
        let mut query = SubQuery::default();
        f(&mut query);
        query.statement
    }

    pub fn from(&mut self, table: impl Into<TableRef>) -> &mut Self {
        self.statement.tables.push(table.into());
        self
    }

    pub fn from_alias(&mut self, table: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.statement.tables.push(TableRef::aliased(table, alias));
        self
    }

    pub fn columns<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SelectColumn>,
    {
        self.statement
            .columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn column_expr(&mut self, f: impl FnOnce(&mut Expression)) -> &mut Self {
        self.statement.columns.push(SelectColumn::expr(f));
        self
    }

    pub fn filter(&mut self, column: impl Into<String>) -> Predicate<&mut Self> {
        Predicate::new(
            self,
            Clause::Where,
            Operand::Column(column.into()),
            Combinator::And,
        )
    }

    pub fn and_filter(&mut self, column: impl Into<String>) -> Predicate<&mut Self> {
        self.filter(column)
    }

    pub fn or_filter(&mut self, column: impl Into<String>) -> Predicate<&mut Self> {
        Predicate::new(
            self,
            Clause::Where,
            Operand::Column(column.into()),
            Combinator::Or,
        )
    }

    pub fn filter_expr(&mut self, f: impl FnOnce(&mut Expression)) -> Predicate<&mut Self> {
        Predicate::new(
            self,
            Clause::Where,
            Operand::Expression(Expression::build(f)),
            Combinator::And,
        )
    }

    pub fn filter_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.statement
            .wheres
            .push_group(Combinator::And, ConditionGroup::build(f));
        self
    }

    pub fn or_filter_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.statement
            .wheres
            .push_group(Combinator::Or, ConditionGroup::build(f));
        self
    }

    pub fn filter_exists(&mut self, f: impl FnOnce(&mut SubQuery)) -> &mut Self {
        self.statement
            .wheres
            .push_exists(Combinator::And, false, SubQuery::build(f));
        self
    }

    pub fn filter_not_exists(&mut self, f: impl FnOnce(&mut SubQuery)) -> &mut Self {
        self.statement
            .wheres
            .push_exists(Combinator::And, true, SubQuery::build(f));
        self
    }

    pub fn join(
        &mut self,
        table: impl Into<TableRef>,
        f: impl FnOnce(&mut JoinClause),
    ) -> &mut Self {
        self.push_join(JoinKind::Inner, table.into(), JoinClause::build(f))
    }

    pub fn left_join(
        &mut self,
        table: impl Into<TableRef>,
        f: impl FnOnce(&mut JoinClause),
    ) -> &mut Self {
        self.push_join(JoinKind::Left, table.into(), JoinClause::build(f))
    }

    pub fn right_join(
        &mut self,
        table: impl Into<TableRef>,
        f: impl FnOnce(&mut JoinClause),
    ) -> &mut Self {
        self.push_join(JoinKind::Right, table.into(), JoinClause::build(f))
    }

    pub fn cross_join(&mut self, table: impl Into<TableRef>) -> &mut Self {
        self.push_join(JoinKind::Cross, table.into(), JoinSpec::default())
    }

    pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement
            .group_by
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn having(&mut self, column: impl Into<String>) -> HavingExpr<&mut Self> {
        HavingExpr::new(self, column.into(), Combinator::And)
    }

    pub fn or_having(&mut self, column: impl Into<String>) -> HavingExpr<&mut Self> {
        HavingExpr::new(self, column.into(), Combinator::Or)
    }

    pub fn having_expr(&mut self, f: impl FnOnce(&mut Expression)) -> Predicate<&mut Self> {
        Predicate::new(
            self,
            Clause::Having,
            Operand::Expression(Expression::build(f)),
            Combinator::And,
        )
    }

    pub fn or_having_expr(&mut self, f: impl FnOnce(&mut Expression)) -> Predicate<&mut Self> {
        Predicate::new(
            self,
            Clause::Having,
            Operand::Expression(Expression::build(f)),
            Combinator::Or,
        )
    }

    pub fn having_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.statement
            .having
            .push_group(Combinator::And, ConditionGroup::build(f));
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.push_order(column.into(), SortOrder::Asc)
    }

    pub fn order_by_desc(&mut self, column: impl Into<String>) -> &mut Self {
        self.push_order(column.into(), SortOrder::Desc)
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.statement.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.statement.offset = Some(offset);
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.statement.distinct = true;
        self
    }

    fn push_join(&mut self, kind: JoinKind, table: TableRef, on: JoinSpec) -> &mut Self {
        self.statement.joins.push(Join { kind, table, on });
        self
    }

    fn push_order(&mut self, column: String, direction: SortOrder) -> &mut Self {
        self.statement.order_by.push(OrderBy {
            column,
            direction,
            nulls: None,
        });
        self
    }
}

impl ConditionSink for &mut SubQuery {
    fn condition_tree(&mut self, clause: Clause) -> &mut ConditionTree {
        statement_tree(&mut self.statement, clause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subquery_statement() {
        let statement = SubQuery::build(|q| {
            q.from("orders")
                .columns(["user_id"])
                .filter("total")
                .gt(100)
                .group_by(["user_id"])
                .having("id")
                .count()
                .at_least(2);
        });
        assert_eq!(statement.tables, vec![TableRef::new("orders")]);
        assert_eq!(statement.wheres.len(), 1);
        assert_eq!(statement.having.len(), 1);
        assert_eq!(statement.group_by, vec!["user_id".to_string()]);
    }
}
