//! Entry builder returned by [`Executor::from`].
//!
//! A `Query` collects tables, joins, conditions and shaping without deciding
//! what it will become. `fork_select` / `fork_delete` deep-clone it, so one
//! base query can feed several statements. The consuming terminals move it
//! into a [`Select`] or [`Delete`] and run that.

use crate::ast::*;
use crate::builder::clauses::{
    Clause, ConditionSink, Filterable, HasStatement, Joinable, Shaping, statement_tree,
};
use crate::builder::{Delete, Select};
use crate::engine::{Executor, Row};
use crate::error::QailResult;

#[derive(Debug)]
pub struct Query<'a, E> {
    executor: &'a E,
    statement: SqlStatement,
}

impl<'a, E: Executor> Query<'a, E> {
    pub fn new(executor: &'a E, table: TableRef) -> Self {
        Self {
            executor,
            statement: SqlStatement::from_tables([table]),
        }
    }

    /// Read from one more table (comma join).
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.statement.tables.push(table.into());
        self
    }

    pub fn statement(&self) -> &SqlStatement {
        &self.statement
    }

    /// SELECT over a deep copy; later changes to either side stay separate.
    pub fn fork_select(&self) -> Select<'a, E> {
        Select::new(self.executor, self.statement.clone())
    }

    /// DELETE over a deep copy.
    pub fn fork_delete(&self) -> Delete<'a, E> {
        Delete::new(self.executor, self.statement.clone())
    }

    pub fn into_select(self) -> Select<'a, E> {
        Select::new(self.executor, self.statement)
    }

    pub fn into_delete(self) -> Delete<'a, E> {
        Delete::new(self.executor, self.statement)
    }

    pub async fn select<I, C>(self, columns: I) -> QailResult<Vec<Row>>
    where
        I: IntoIterator<Item = C>,
        C: Into<SelectColumn>,
    {
        self.into_select().select(columns).await
    }

    pub async fn all(self) -> QailResult<Vec<Row>> {
        self.into_select().all().await
    }

    pub async fn column(self, name: impl Into<String>) -> QailResult<Option<serde_json::Value>> {
        self.into_select().column(name).await
    }

    pub async fn count<I, S>(self, columns: I, distinct: bool) -> QailResult<i64>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.into_select().count(columns, distinct).await
    }

    pub async fn avg(
        self,
        column: impl Into<String>,
        distinct: bool,
    ) -> QailResult<Option<serde_json::Value>> {
        self.into_select().avg(column, distinct).await
    }

    pub async fn sum(
        self,
        column: impl Into<String>,
        distinct: bool,
    ) -> QailResult<Option<serde_json::Value>> {
        self.into_select().sum(column, distinct).await
    }

    pub async fn min(
        self,
        column: impl Into<String>,
        distinct: bool,
    ) -> QailResult<Option<serde_json::Value>> {
        self.into_select().min(column, distinct).await
    }

    pub async fn max(
        self,
        column: impl Into<String>,
        distinct: bool,
    ) -> QailResult<Option<serde_json::Value>> {
        self.into_select().max(column, distinct).await
    }

    pub async fn delete(self, targets: &[&str]) -> QailResult<u64> {
        self.into_delete().delete(targets).await
    }
}

impl<'a, E> ConditionSink for Query<'a, E> {
    fn condition_tree(&mut self, clause: Clause) -> &mut ConditionTree {
        statement_tree(&mut self.statement, clause)
    }
}

impl<'a, E> HasStatement for Query<'a, E> {
    fn statement_mut(&mut self) -> &mut SqlStatement {
        &mut self.statement
    }
}

impl<'a, E> Filterable for Query<'a, E> {}
impl<'a, E> Joinable for Query<'a, E> {}
impl<'a, E> Shaping for Query<'a, E> {}
