//! INSERT builder.
//!
//! Rows are given as `(column, value)` pairs. The first row fixes the column
//! order; later rows must name the same columns and are reordered to match.

use tracing::debug;

use crate::ast::*;
use crate::engine::{ExecOutcome, Executor};
use crate::error::{QailError, QailResult};
use crate::transpiler::{CompiledQuery, compile_insert};

type PendingRow = Vec<(String, ColumnValue)>;

#[derive(Debug)]
pub struct Insert<'a, E> {
    executor: &'a E,
    rows: Vec<PendingRow>,
}

impl<'a, E: Executor> Insert<'a, E> {
    pub fn new<I, K, V>(executor: &'a E, row: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ColumnValue>,
    {
        Self {
            executor,
            rows: vec![collect_row(row)],
        }
    }

    /// Add one more value to the most recent row.
    pub fn value(mut self, column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        if let Some(row) = self.rows.last_mut() {
            row.push((column.into(), value.into()));
        }
        self
    }

    /// Add a row to a multi-row INSERT.
    pub fn row<I, K, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ColumnValue>,
    {
        self.rows.push(collect_row(row));
        self
    }

    /// Resolve the pending rows into an [`InsertStatement`] for `table`.
    pub fn to_statement(&self, table: impl Into<String>) -> QailResult<InsertStatement> {
        let Some(first) = self.rows.first() else {
            return Err(QailError::invalid("INSERT requires at least one row"));
        };
        if first.is_empty() {
            return Err(QailError::invalid("INSERT requires at least one column"));
        }

        let columns: Vec<String> = first.iter().map(|(c, _)| c.clone()).collect();
        if let Some(dup) = columns
            .iter()
            .enumerate()
            .find(|(i, c)| columns[..*i].contains(c))
            .map(|(_, c)| c)
        {
            return Err(QailError::invalid(format!(
                "column {} is given twice in the INSERT row",
                dup
            )));
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(QailError::invalid(format!(
                    "INSERT row {} has {} values, expected {}",
                    index,
                    row.len(),
                    columns.len()
                )));
            }
            let mut ordered = Vec::with_capacity(columns.len());
            for column in &columns {
                let value = row
                    .iter()
                    .find(|(c, _)| c == column)
                    .map(|(_, v)| v.clone())
                    .ok_or_else(|| {
                        QailError::invalid(format!(
                            "INSERT row {} has no value for column {}",
                            index, column
                        ))
                    })?;
                ordered.push(value);
            }
            rows.push(ordered);
        }

        Ok(InsertStatement {
            table: table.into(),
            columns,
            rows,
        })
    }

    pub fn to_sql(&self, table: impl Into<String>) -> QailResult<CompiledQuery> {
        compile_insert(&self.to_statement(table)?, self.executor.dialect())
    }

    /// Run the INSERT against `table`.
    pub async fn into_table(self, table: impl Into<String>) -> QailResult<ExecOutcome> {
        let query = self.to_sql(table)?;
        let outcome = self.executor.execute(&query).await?;
        debug!(
            rows = outcome.rows_affected,
            last_insert_id = ?outcome.last_insert_id,
            "insert finished"
        );
        Ok(outcome)
    }
}

fn collect_row<I, K, V>(row: I) -> PendingRow
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ColumnValue>,
{
    row.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
