use serde::{Deserialize, Serialize};

use crate::ast::{ConditionTree, Expression, Join, Nulls, SortOrder, Value};

/// A table in FROM / JOIN / INTO position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::new(name)
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::new(name)
    }
}

/// A projected column: expression plus optional alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectColumn {
    pub expr: Expression,
    #[serde(default)]
    pub alias: Option<String>,
}

impl SelectColumn {
    pub fn new(expr: Expression) -> Self {
        Self { expr, alias: None }
    }

    /// Column built through an expression closure.
    pub fn expr(f: impl FnOnce(&mut Expression)) -> Self {
        Self::new(Expression::build(f))
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl From<&str> for SelectColumn {
    fn from(name: &str) -> Self {
        SelectColumn {
            expr: Expression::from_column(name),
            alias: None,
        }
    }
}

impl From<String> for SelectColumn {
    fn from(name: String) -> Self {
        SelectColumn {
            expr: Expression::from_column(name),
            alias: None,
        }
    }
}

/// ORDER BY item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    #[serde(default)]
    pub direction: SortOrder,
    #[serde(default)]
    pub nulls: Option<Nulls>,
}

/// SELECT ... INTO target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntoTarget {
    pub table: String,
    #[serde(default)]
    pub database: Option<String>,
}

/// The full clause set of one query.
///
/// Every list is append-only while building; clones are deep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SqlStatement {
    #[serde(default)]
    pub tables: Vec<TableRef>,
    #[serde(default)]
    pub columns: Vec<SelectColumn>,
    #[serde(default)]
    pub joins: Vec<Join>,
    #[serde(default)]
    pub wheres: ConditionTree,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub having: ConditionTree,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub into: Option<IntoTarget>,
}

impl SqlStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statement reading from `tables`.
    pub fn from_tables<I, T>(tables: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TableRef>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Value written by INSERT or UPDATE: bound value or expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValue {
    Value(Value),
    Expression(Expression),
}

impl ColumnValue {
    /// Expression value built through a closure.
    pub fn expr(f: impl FnOnce(&mut Expression)) -> Self {
        ColumnValue::Expression(Expression::build(f))
    }
}

impl From<Value> for ColumnValue {
    fn from(value: Value) -> Self {
        ColumnValue::Value(value)
    }
}

impl From<Expression> for ColumnValue {
    fn from(expr: Expression) -> Self {
        ColumnValue::Expression(expr)
    }
}

macro_rules! column_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ColumnValue {
                fn from(value: $ty) -> Self {
                    ColumnValue::Value(value.into())
                }
            }
        )*
    };
}

column_value_from!(bool, i32, i64, u32, f64, &str, String, Vec<u8>, chrono::NaiveDateTime);

impl<T: Into<Value>> From<Option<T>> for ColumnValue {
    fn from(value: Option<T>) -> Self {
        ColumnValue::Value(value.into())
    }
}

/// INSERT statement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ColumnValue>>,
}

/// UPDATE statement: tables and WHERE from `statement`, plus assignments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub statement: SqlStatement,
    pub assignments: Vec<(String, ColumnValue)>,
}

/// DELETE statement: FROM, joins and WHERE from `statement`.
///
/// `targets` names the tables rows are removed from when it differs from FROM.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub statement: SqlStatement,
    #[serde(default)]
    pub targets: Vec<String>,
}
