use tracing::debug;

use crate::ast::*;
use crate::builder::clauses::{Clause, ConditionSink, Filterable, statement_tree};
use crate::engine::Executor;
use crate::error::QailResult;
use crate::transpiler::{CompiledQuery, compile_update};

/// An UPDATE bound to an executor.
///
/// `set`, `increment` and `decrement` are terminals; `assign` only records.
#[derive(Debug)]
pub struct Update<'a, E> {
    executor: &'a E,
    statement: UpdateStatement,
}

impl<'a, E: Executor> Update<'a, E> {
    pub fn new(executor: &'a E, table: TableRef) -> Self {
        Self {
            executor,
            statement: UpdateStatement {
                statement: SqlStatement::from_tables([table]),
                assignments: Vec::new(),
            },
        }
    }

    /// Record one assignment without running.
    pub fn assign(mut self, column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.statement
            .assignments
            .push((column.into(), value.into()));
        self
    }

    pub fn statement(&self) -> &UpdateStatement {
        &self.statement
    }

    pub fn to_sql(&self) -> QailResult<CompiledQuery> {
        compile_update(&self.statement, self.executor.dialect())
    }

    /// Apply `assignments` and return the number of affected rows.
    pub async fn set<I, K, V>(mut self, assignments: I) -> QailResult<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ColumnValue>,
    {
        self.statement
            .assignments
            .extend(assignments.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.run().await
    }

    /// `column = column + by`
    pub async fn increment(
        self,
        column: impl Into<String>,
        by: impl Into<Value>,
    ) -> QailResult<u64> {
        self.step(column.into(), "+", by.into()).await
    }

    /// `column = column - by`
    pub async fn decrement(
        self,
        column: impl Into<String>,
        by: impl Into<Value>,
    ) -> QailResult<u64> {
        self.step(column.into(), "-", by.into()).await
    }

    async fn step(self, column: String, op: &str, by: Value) -> QailResult<u64> {
        let expr = ColumnValue::expr(|e| {
            e.column(column.clone()).op(op).value(by);
        });
        self.assign(column, expr).run().await
    }

    async fn run(self) -> QailResult<u64> {
        let query = self.to_sql()?;
        let outcome = self.executor.execute(&query).await?;
        debug!(rows = outcome.rows_affected, "update finished");
        Ok(outcome.rows_affected)
    }
}

impl<'a, E> ConditionSink for Update<'a, E> {
    fn condition_tree(&mut self, clause: Clause) -> &mut ConditionTree {
        statement_tree(&mut self.statement.statement, clause)
    }
}

impl<'a, E> Filterable for Update<'a, E> {}
