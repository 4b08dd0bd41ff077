use tracing::debug;

use crate::ast::*;
use crate::builder::clauses::{
    Clause, ConditionSink, Filterable, HasStatement, Joinable, statement_tree,
};
use crate::engine::Executor;
use crate::error::QailResult;
use crate::transpiler::{CompiledQuery, compile_delete};

/// A DELETE bound to an executor.
#[derive(Debug)]
pub struct Delete<'a, E> {
    executor: &'a E,
    statement: SqlStatement,
}

impl<'a, E: Executor> Delete<'a, E> {
    pub fn new(executor: &'a E, statement: SqlStatement) -> Self {
        Self {
            executor,
            statement,
        }
    }

    pub fn statement(&self) -> &SqlStatement {
        &self.statement
    }

    /// Compile, removing rows from `targets` (empty: the FROM table).
    pub fn to_sql(&self, targets: &[&str]) -> QailResult<CompiledQuery> {
        let stmt = DeleteStatement {
            statement: self.statement.clone(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
        };
        compile_delete(&stmt, self.executor.dialect())
    }

    /// Run the DELETE and return the number of affected rows.
    pub async fn delete(self, targets: &[&str]) -> QailResult<u64> {
        let query = self.to_sql(targets)?;
        let outcome = self.executor.execute(&query).await?;
        debug!(rows = outcome.rows_affected, "delete finished");
        Ok(outcome.rows_affected)
    }
}

impl<'a, E> ConditionSink for Delete<'a, E> {
    fn condition_tree(&mut self, clause: Clause) -> &mut ConditionTree {
        statement_tree(&mut self.statement, clause)
    }
}

impl<'a, E> HasStatement for Delete<'a, E> {
    fn statement_mut(&mut self) -> &mut SqlStatement {
        &mut self.statement
    }
}

impl<'a, E> Filterable for Delete<'a, E> {}
impl<'a, E> Joinable for Delete<'a, E> {}
