//! SELECT builder and its terminals.

use tracing::debug;

use crate::ast::*;
use crate::builder::clauses::{
    Clause, ConditionSink, Filterable, HasStatement, Joinable, Shaping, statement_tree,
};
use crate::engine::{Executor, Row};
use crate::error::{QailError, QailResult};
use crate::transpiler::{CompiledQuery, compile_select};

/// Alias given to the single column of aggregate terminals.
const AGGREGATE_ALIAS: &str = "aggregate";

/// A SELECT bound to an executor.
///
/// Shaping calls consume and return the builder; terminals compile the
/// statement and run it.
#[derive(Debug)]
pub struct Select<'a, E> {
    executor: &'a E,
    statement: SqlStatement,
}

impl<'a, E> Clone for Select<'a, E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor,
            statement: self.statement.clone(),
        }
    }
}

impl<'a, E: Executor> Select<'a, E> {
    pub fn new(executor: &'a E, statement: SqlStatement) -> Self {
        Self {
            executor,
            statement,
        }
    }

    pub fn statement(&self) -> &SqlStatement {
        &self.statement
    }

    /// Add projected columns without running the query.
    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SelectColumn>,
    {
        self.statement
            .columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Compile for the executor's dialect.
    pub fn to_sql(&self) -> QailResult<CompiledQuery> {
        compile_select(&self.statement, self.executor.dialect())
    }

    /// Run with `columns` appended to the projection.
    pub async fn select<I, C>(self, columns: I) -> QailResult<Vec<Row>>
    where
        I: IntoIterator<Item = C>,
        C: Into<SelectColumn>,
    {
        self.columns(columns).fetch().await
    }

    /// Run with the current projection (`*` when none was given).
    pub async fn all(self) -> QailResult<Vec<Row>> {
        self.fetch().await
    }

    /// First column of the first row.
    pub async fn column(
        mut self,
        name: impl Into<String>,
    ) -> QailResult<Option<serde_json::Value>> {
        self.statement.columns = vec![SelectColumn::from(name.into())];
        Ok(scalar(self.fetch().await?))
    }

    /// `COUNT(columns)`; two or more columns count distinct tuples.
    pub async fn count<I, S>(self, columns: I, distinct: bool) -> QailResult<i64>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let value = self
            .aggregate(Expression::build(|e| {
                e.count(columns, distinct);
            }))
            .await?;
        match value {
            None | Some(serde_json::Value::Null) => Ok(0),
            Some(serde_json::Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| QailError::invalid(format!("count {} is not an integer", n))),
            Some(serde_json::Value::String(s)) => s
                .parse()
                .map_err(|_| QailError::invalid(format!("count '{}' is not an integer", s))),
            Some(other) => Err(QailError::invalid(format!(
                "count returned {}, expected an integer",
                other
            ))),
        }
    }

    pub async fn avg(
        self,
        column: impl Into<String>,
        distinct: bool,
    ) -> QailResult<Option<serde_json::Value>> {
        self.aggregate(Expression::build(|e| {
            e.avg(column, distinct);
        }))
        .await
    }

    pub async fn sum(
        self,
        column: impl Into<String>,
        distinct: bool,
    ) -> QailResult<Option<serde_json::Value>> {
        self.aggregate(Expression::build(|e| {
            e.sum(column, distinct);
        }))
        .await
    }

    pub async fn min(
        self,
        column: impl Into<String>,
        distinct: bool,
    ) -> QailResult<Option<serde_json::Value>> {
        self.aggregate(Expression::build(|e| {
            e.min(column, distinct);
        }))
        .await
    }

    pub async fn max(
        self,
        column: impl Into<String>,
        distinct: bool,
    ) -> QailResult<Option<serde_json::Value>> {
        self.aggregate(Expression::build(|e| {
            e.max(column, distinct);
        }))
        .await
    }

    async fn aggregate(mut self, expr: Expression) -> QailResult<Option<serde_json::Value>> {
        self.statement.columns = vec![SelectColumn::new(expr).alias(AGGREGATE_ALIAS)];
        Ok(scalar(self.fetch().await?))
    }

    async fn fetch(self) -> QailResult<Vec<Row>> {
        let query = self.to_sql()?;
        let rows = self.executor.fetch_all(&query).await?;
        debug!(rows = rows.len(), "select finished");
        Ok(rows)
    }
}

/// First cell of the first row; SQL NULL maps to `None`.
fn scalar(rows: Vec<Row>) -> Option<serde_json::Value> {
    rows.into_iter()
        .next()
        .and_then(Row::into_first)
        .filter(|value| !value.is_null())
}

impl<'a, E> ConditionSink for Select<'a, E> {
    fn condition_tree(&mut self, clause: Clause) -> &mut ConditionTree {
        statement_tree(&mut self.statement, clause)
    }
}

impl<'a, E> HasStatement for Select<'a, E> {
    fn statement_mut(&mut self) -> &mut SqlStatement {
        &mut self.statement
    }
}

impl<'a, E> Filterable for Select<'a, E> {}
impl<'a, E> Joinable for Select<'a, E> {}
impl<'a, E> Shaping for Select<'a, E> {}
