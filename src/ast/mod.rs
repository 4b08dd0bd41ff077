//! Query IR: expressions, condition trees, joins and statements.

pub mod conditions;
pub mod expr;
pub mod joins;
pub mod operators;
pub mod statement;
pub mod values;

pub use self::conditions::{Condition, ConditionNode, ConditionTree, ConditionValue, Operand};
pub use self::expr::{ExprNode, Expression, Func, FunctionCall, ScalarFunc};
pub use self::joins::{Join, JoinClause, JoinNode, JoinSpec};
pub use self::operators::{AggregateFunc, Combinator, JoinKind, Nulls, Operator, SortOrder};
pub use self::statement::{
    ColumnValue, DeleteStatement, InsertStatement, IntoTarget, OrderBy, SelectColumn,
    SqlStatement, TableRef, UpdateStatement,
};
pub use self::values::{Value, quote_string};
