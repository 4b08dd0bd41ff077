//! Schema changes and introspection through an [`Executor`].
//!
//! DDL compiles to a list of statements that run one after another. The
//! first failure is returned as is; statements that already ran stay applied.

use serde::Serialize;
use tracing::{info, warn};

use crate::engine::{Executor, Row};
use crate::error::QailResult;
use crate::schema::{AlterTable, CreateTable};
use crate::transpiler::{
    ColumnTypes, CompiledQuery, Dialect, compile_alter, compile_create, compile_drop,
    compile_rename_table, compile_truncate,
};

/// A column as reported by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Native type as spelled by the engine
    pub data_type: String,
}

#[derive(Debug)]
pub struct Schema<'a, E> {
    executor: &'a E,
}

impl<'a, E: Executor> Schema<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// CREATE TABLE built through a closure.
    pub async fn create(
        &self,
        table: impl Into<String>,
        f: impl FnOnce(&mut CreateTable),
    ) -> QailResult<()> {
        self.create_table(&CreateTable::build(table, f)).await
    }

    pub async fn create_table(&self, table: &CreateTable) -> QailResult<()> {
        let statements = compile_create(table, self.executor.dialect())?;
        self.run_batch(&table.name, "create", &statements).await
    }

    /// ALTER TABLE built through a closure.
    ///
    /// On MySQL a column rename re-states the column type, so the current
    /// types are read first.
    pub async fn alter(
        &self,
        table: impl Into<String>,
        f: impl FnOnce(&mut AlterTable),
    ) -> QailResult<()> {
        let alter = AlterTable::build(table, f);
        let dialect = self.executor.dialect();

        let existing = if dialect == Dialect::MySQL && alter.renamed_columns().next().is_some() {
            self.column_types(&alter.name).await?
        } else {
            ColumnTypes::new()
        };

        let statements = compile_alter(&alter, dialect, &existing)?;
        self.run_batch(&alter.name, "alter", &statements).await
    }

    pub async fn drop(&self, table: &str) -> QailResult<()> {
        let statement = compile_drop(table, self.executor.dialect());
        self.run_batch(table, "drop", &[statement]).await
    }

    pub async fn truncate(&self, table: &str) -> QailResult<()> {
        let statement = compile_truncate(table, self.executor.dialect());
        self.run_batch(table, "truncate", &[statement]).await
    }

    pub async fn rename_table(&self, from: &str, to: &str) -> QailResult<()> {
        let statement = compile_rename_table(from, to, self.executor.dialect());
        self.run_batch(from, "rename", &[statement]).await
    }

    /// Name of the connected database, if the session has one.
    pub async fn current_database(&self) -> QailResult<Option<String>> {
        let query = self.executor.dialect().generator().current_database();
        let rows = self.executor.fetch_all(&query).await?;
        Ok(rows.first().and_then(|row| text(row, "name")))
    }

    pub async fn tables(&self) -> QailResult<Vec<String>> {
        let database = self.current_database().await?.unwrap_or_default();
        let query = self.executor.dialect().generator().list_tables(&database);
        let rows = self.executor.fetch_all(&query).await?;
        Ok(rows.iter().filter_map(|row| text(row, "name")).collect())
    }

    pub async fn columns(&self, table: &str) -> QailResult<Vec<ColumnInfo>> {
        let database = self.current_database().await?.unwrap_or_default();
        let query = self
            .executor
            .dialect()
            .generator()
            .list_columns(&database, table);
        let rows = self.executor.fetch_all(&query).await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                Some(ColumnInfo {
                    name: text(row, "name")?,
                    data_type: text(row, "type").unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn column_types(&self, table: &str) -> QailResult<ColumnTypes> {
        Ok(self
            .columns(table)
            .await?
            .into_iter()
            .map(|column| (column.name, column.data_type))
            .collect())
    }

    async fn run_batch(
        &self,
        table: &str,
        action: &str,
        statements: &[CompiledQuery],
    ) -> QailResult<()> {
        info!(table, action, statements = statements.len(), "running DDL");
        for (index, statement) in statements.iter().enumerate() {
            if let Err(e) = self.executor.execute(statement).await {
                if index > 0 {
                    warn!(
                        table,
                        action,
                        applied = index,
                        total = statements.len(),
                        "DDL failed part-way; earlier statements remain applied"
                    );
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

fn text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
