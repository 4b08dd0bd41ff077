//! Clause traits shared by the query builders.
//!
//! Conditions are appended through a [`Predicate`] continuation: `filter`
//! fixes the operand and combinator, the terminal fixes operator and value,
//! pushes one condition and hands the owner back.

use crate::ast::*;
use crate::builder::{ConditionGroup, SubQuery};

/// Which condition tree a predicate writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Where,
    Having,
}

/// Anything owning WHERE / HAVING trees.
pub trait ConditionSink {
    fn condition_tree(&mut self, clause: Clause) -> &mut ConditionTree;
}

/// Pending condition: operand and combinator are fixed, operator and value follow.
#[must_use = "a predicate does nothing until a comparison is applied"]
pub struct Predicate<S> {
    owner: S,
    clause: Clause,
    operand: Operand,
    combinator: Combinator,
}

impl<S: ConditionSink> Predicate<S> {
    pub(crate) fn new(owner: S, clause: Clause, operand: Operand, combinator: Combinator) -> Self {
        Self {
            owner,
            clause,
            operand,
            combinator,
        }
    }

    fn push(mut self, operator: Operator, value: ConditionValue) -> S {
        let condition = Condition {
            operand: self.operand,
            operator,
            value,
        };
        self.owner
            .condition_tree(self.clause)
            .push_condition(self.combinator, condition);
        self.owner
    }

    pub fn is(self, value: impl Into<Value>) -> S {
        self.push(Operator::Eq, ConditionValue::Value(value.into()))
    }

    pub fn eq(self, value: impl Into<Value>) -> S {
        self.is(value)
    }

    pub fn is_not(self, value: impl Into<Value>) -> S {
        self.push(Operator::Ne, ConditionValue::Value(value.into()))
    }

    pub fn ne(self, value: impl Into<Value>) -> S {
        self.is_not(value)
    }

    pub fn less_than(self, value: impl Into<Value>) -> S {
        self.push(Operator::Lt, ConditionValue::Value(value.into()))
    }

    pub fn lt(self, value: impl Into<Value>) -> S {
        self.less_than(value)
    }

    pub fn greater_than(self, value: impl Into<Value>) -> S {
        self.push(Operator::Gt, ConditionValue::Value(value.into()))
    }

    pub fn gt(self, value: impl Into<Value>) -> S {
        self.greater_than(value)
    }

    pub fn at_most(self, value: impl Into<Value>) -> S {
        self.push(Operator::Lte, ConditionValue::Value(value.into()))
    }

    pub fn lte(self, value: impl Into<Value>) -> S {
        self.at_most(value)
    }

    pub fn at_least(self, value: impl Into<Value>) -> S {
        self.push(Operator::Gte, ConditionValue::Value(value.into()))
    }

    pub fn gte(self, value: impl Into<Value>) -> S {
        self.at_least(value)
    }

    /// Compare against another column (rendered as an identifier).
    pub fn is_column(self, column: impl Into<String>) -> S {
        self.push(Operator::Eq, ConditionValue::Column(column.into()))
    }

    pub fn is_not_column(self, column: impl Into<String>) -> S {
        self.push(Operator::Ne, ConditionValue::Column(column.into()))
    }

    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> S {
        self.push(
            Operator::Between,
            ConditionValue::Range(low.into(), high.into()),
        )
    }

    pub fn not_between(self, low: impl Into<Value>, high: impl Into<Value>) -> S {
        self.push(
            Operator::NotBetween,
            ConditionValue::Range(low.into(), high.into()),
        )
    }

    pub fn like(self, pattern: impl Into<String>) -> S {
        self.push(Operator::Like, ConditionValue::Value(Value::String(pattern.into())))
    }

    pub fn not_like(self, pattern: impl Into<String>) -> S {
        self.push(
            Operator::NotLike,
            ConditionValue::Value(Value::String(pattern.into())),
        )
    }

    /// `IN (...)`. An empty list never matches.
    pub fn is_in<I, V>(self, values: I) -> S
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push(Operator::In, ConditionValue::List(values))
    }

    /// `NOT IN (...)`. An empty list always matches.
    pub fn not_in<I, V>(self, values: I) -> S
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push(Operator::NotIn, ConditionValue::List(values))
    }

    pub fn in_subquery(self, f: impl FnOnce(&mut SubQuery)) -> S {
        let query = SubQuery::build(f);
        self.push(Operator::In, ConditionValue::Subquery(Box::new(query)))
    }

    pub fn not_in_subquery(self, f: impl FnOnce(&mut SubQuery)) -> S {
        let query = SubQuery::build(f);
        self.push(Operator::NotIn, ConditionValue::Subquery(Box::new(query)))
    }

    pub fn is_null(self) -> S {
        self.push(Operator::IsNull, ConditionValue::None)
    }

    pub fn not_null(self) -> S {
        self.push(Operator::IsNotNull, ConditionValue::None)
    }
}

/// `having(column)` continuation: picks the aggregate applied to the column.
#[must_use = "pick an aggregate and a comparison to add the HAVING condition"]
pub struct HavingExpr<S> {
    owner: S,
    column: String,
    combinator: Combinator,
    distinct: bool,
}

impl<S: ConditionSink> HavingExpr<S> {
    pub(crate) fn new(owner: S, column: String, combinator: Combinator) -> Self {
        Self {
            owner,
            column,
            combinator,
            distinct: false,
        }
    }

    /// Aggregate over DISTINCT values.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn count(self) -> Predicate<S> {
        self.aggregate(AggregateFunc::Count)
    }

    pub fn sum(self) -> Predicate<S> {
        self.aggregate(AggregateFunc::Sum)
    }

    pub fn avg(self) -> Predicate<S> {
        self.aggregate(AggregateFunc::Avg)
    }

    pub fn min(self) -> Predicate<S> {
        self.aggregate(AggregateFunc::Min)
    }

    pub fn max(self) -> Predicate<S> {
        self.aggregate(AggregateFunc::Max)
    }

    fn aggregate(self, func: AggregateFunc) -> Predicate<S> {
        let expr = Expression {
            nodes: vec![ExprNode::Function(FunctionCall {
                func: Func::Aggregate(func),
                columns: vec![self.column],
                distinct: self.distinct,
            })],
        };
        Predicate::new(
            self.owner,
            Clause::Having,
            Operand::Expression(expr),
            self.combinator,
        )
    }
}

/// WHERE building for owned builders; every call consumes and returns the builder.
pub trait Filterable: ConditionSink + Sized {
    /// AND a condition on `column`.
    fn filter(self, column: impl Into<String>) -> Predicate<Self> {
        Predicate::new(
            self,
            Clause::Where,
            Operand::Column(column.into()),
            Combinator::And,
        )
    }

    fn and_filter(self, column: impl Into<String>) -> Predicate<Self> {
        self.filter(column)
    }

    fn or_filter(self, column: impl Into<String>) -> Predicate<Self> {
        Predicate::new(
            self,
            Clause::Where,
            Operand::Column(column.into()),
            Combinator::Or,
        )
    }

    /// AND a condition whose operand is an expression.
    fn filter_expr(self, f: impl FnOnce(&mut Expression)) -> Predicate<Self> {
        Predicate::new(
            self,
            Clause::Where,
            Operand::Expression(Expression::build(f)),
            Combinator::And,
        )
    }

    fn or_filter_expr(self, f: impl FnOnce(&mut Expression)) -> Predicate<Self> {
        Predicate::new(
            self,
            Clause::Where,
            Operand::Expression(Expression::build(f)),
            Combinator::Or,
        )
    }

    /// AND a parenthesized group.
    fn filter_group(mut self, f: impl FnOnce(&mut ConditionGroup)) -> Self {
        let tree = ConditionGroup::build(f);
        self.condition_tree(Clause::Where)
            .push_group(Combinator::And, tree);
        self
    }

    fn or_filter_group(mut self, f: impl FnOnce(&mut ConditionGroup)) -> Self {
        let tree = ConditionGroup::build(f);
        self.condition_tree(Clause::Where)
            .push_group(Combinator::Or, tree);
        self
    }

    fn filter_exists(self, f: impl FnOnce(&mut SubQuery)) -> Self {
        self.push_exists(Combinator::And, false, f)
    }

    fn or_filter_exists(self, f: impl FnOnce(&mut SubQuery)) -> Self {
        self.push_exists(Combinator::Or, false, f)
    }

    fn filter_not_exists(self, f: impl FnOnce(&mut SubQuery)) -> Self {
        self.push_exists(Combinator::And, true, f)
    }

    fn or_filter_not_exists(self, f: impl FnOnce(&mut SubQuery)) -> Self {
        self.push_exists(Combinator::Or, true, f)
    }

    #[doc(hidden)]
    fn push_exists(
        mut self,
        combinator: Combinator,
        negated: bool,
        f: impl FnOnce(&mut SubQuery),
    ) -> Self {
        let query = SubQuery::build(f);
        self.condition_tree(Clause::Where)
            .push_exists(combinator, negated, query);
        self
    }
}

/// Builders that wrap a [`SqlStatement`].
pub trait HasStatement {
    fn statement_mut(&mut self) -> &mut SqlStatement;
}

/// JOIN building.
pub trait Joinable: HasStatement + Sized {
    fn join(self, table: impl Into<TableRef>, f: impl FnOnce(&mut JoinClause)) -> Self {
        self.push_join(JoinKind::Inner, table.into(), JoinClause::build(f))
    }

    fn left_join(self, table: impl Into<TableRef>, f: impl FnOnce(&mut JoinClause)) -> Self {
        self.push_join(JoinKind::Left, table.into(), JoinClause::build(f))
    }

    fn right_join(self, table: impl Into<TableRef>, f: impl FnOnce(&mut JoinClause)) -> Self {
        self.push_join(JoinKind::Right, table.into(), JoinClause::build(f))
    }

    fn full_join(self, table: impl Into<TableRef>, f: impl FnOnce(&mut JoinClause)) -> Self {
        self.push_join(JoinKind::Full, table.into(), JoinClause::build(f))
    }

    /// CROSS JOIN has no ON clause.
    fn cross_join(self, table: impl Into<TableRef>) -> Self {
        self.push_join(JoinKind::Cross, table.into(), JoinSpec::default())
    }

    #[doc(hidden)]
    fn push_join(mut self, kind: JoinKind, table: TableRef, on: JoinSpec) -> Self {
        self.statement_mut().joins.push(Join { kind, table, on });
        self
    }
}

/// GROUP BY, HAVING, ORDER BY, pagination and SELECT INTO.
pub trait Shaping: HasStatement + ConditionSink + Sized {
    fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement_mut()
            .group_by
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// AND a HAVING condition over an aggregate of `column`.
    fn having(self, column: impl Into<String>) -> HavingExpr<Self> {
        HavingExpr::new(self, column.into(), Combinator::And)
    }

    fn or_having(self, column: impl Into<String>) -> HavingExpr<Self> {
        HavingExpr::new(self, column.into(), Combinator::Or)
    }

    /// AND a HAVING condition on a computed expression.
    fn having_expr(self, f: impl FnOnce(&mut Expression)) -> Predicate<Self> {
        Predicate::new(
            self,
            Clause::Having,
            Operand::Expression(Expression::build(f)),
            Combinator::And,
        )
    }

    fn or_having_expr(self, f: impl FnOnce(&mut Expression)) -> Predicate<Self> {
        Predicate::new(
            self,
            Clause::Having,
            Operand::Expression(Expression::build(f)),
            Combinator::Or,
        )
    }

    fn having_group(mut self, f: impl FnOnce(&mut ConditionGroup)) -> Self {
        let tree = ConditionGroup::build(f);
        self.condition_tree(Clause::Having)
            .push_group(Combinator::And, tree);
        self
    }

    fn or_having_group(mut self, f: impl FnOnce(&mut ConditionGroup)) -> Self {
        let tree = ConditionGroup::build(f);
        self.condition_tree(Clause::Having)
            .push_group(Combinator::Or, tree);
        self
    }

    fn order_by<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by_with(columns, SortOrder::Asc, None)
    }

    fn order_by_desc<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by_with(columns, SortOrder::Desc, None)
    }

    fn order_by_with<I, S>(mut self, columns: I, direction: SortOrder, nulls: Option<Nulls>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement_mut()
            .order_by
            .extend(columns.into_iter().map(|column| OrderBy {
                column: column.into(),
                direction,
                nulls,
            }));
        self
    }

    fn limit(mut self, limit: u64) -> Self {
        self.statement_mut().limit = Some(limit);
        self
    }

    fn offset(mut self, offset: u64) -> Self {
        self.statement_mut().offset = Some(offset);
        self
    }

    fn distinct(mut self) -> Self {
        self.statement_mut().distinct = true;
        self
    }

    /// `SELECT ... INTO [database..]table`
    fn select_into(mut self, table: impl Into<String>, database: Option<&str>) -> Self {
        self.statement_mut().into = Some(IntoTarget {
            table: table.into(),
            database: database.map(str::to_string),
        });
        self
    }
}

/// Condition trees of a plain statement.
pub(crate) fn statement_tree(statement: &mut SqlStatement, clause: Clause) -> &mut ConditionTree {
    match clause {
        Clause::Where => &mut statement.wheres,
        Clause::Having => &mut statement.having,
    }
}
