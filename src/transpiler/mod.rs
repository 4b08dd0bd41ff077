//! SQL Transpiler for the query and schema IR.
//!
//! Renders statements into SQL text plus an ordered parameter list for one
//! [`Dialect`]. Compilation is pure: the same IR and dialect always produce
//! the same [`CompiledQuery`].

pub mod conditions;
pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod expr;
pub mod params;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ast::*;
use crate::error::QailResult;
use crate::schema::{AlterTable, CreateTable};

pub use dialect::Dialect;
pub use params::ParamContext;
pub use traits::SqlGenerator;

/// Rendered SQL and the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl CompiledQuery {
    /// A statement without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }
}

/// Current native type of each column of a table, keyed by column name.
pub type ColumnTypes = HashMap<String, String>;

pub fn compile_select(stmt: &SqlStatement, dialect: Dialect) -> QailResult<CompiledQuery> {
    let generator = dialect.generator();
    let mut params = ParamContext::new();
    let sql = dml::select::build_select(stmt, generator, &mut params)?;
    Ok(params.finish(sql))
}

pub fn compile_insert(stmt: &InsertStatement, dialect: Dialect) -> QailResult<CompiledQuery> {
    let generator = dialect.generator();
    let mut params = ParamContext::new();
    let sql = dml::insert::build_insert(stmt, generator, &mut params)?;
    Ok(params.finish(sql))
}

pub fn compile_update(stmt: &UpdateStatement, dialect: Dialect) -> QailResult<CompiledQuery> {
    let generator = dialect.generator();
    let mut params = ParamContext::new();
    let sql = dml::update::build_update(stmt, generator, &mut params)?;
    Ok(params.finish(sql))
}

pub fn compile_delete(stmt: &DeleteStatement, dialect: Dialect) -> QailResult<CompiledQuery> {
    let generator = dialect.generator();
    let mut params = ParamContext::new();
    let sql = dml::delete::build_delete(stmt, generator, &mut params)?;
    Ok(params.finish(sql))
}

/// CREATE TABLE plus the statements it fans out to, in execution order.
pub fn compile_create(table: &CreateTable, dialect: Dialect) -> QailResult<Vec<CompiledQuery>> {
    let statements = ddl::build_create_table(table, dialect.generator())?;
    Ok(statements.into_iter().map(CompiledQuery::new).collect())
}

/// One statement per ALTER TABLE operation.
///
/// `existing` supplies current column types; MySQL needs them to rename a column.
pub fn compile_alter(
    alter: &AlterTable,
    dialect: Dialect,
    existing: &ColumnTypes,
) -> QailResult<Vec<CompiledQuery>> {
    let statements = ddl::build_alter_table(alter, dialect.generator(), existing)?;
    Ok(statements.into_iter().map(CompiledQuery::new).collect())
}

pub fn compile_drop(table: &str, dialect: Dialect) -> CompiledQuery {
    CompiledQuery::new(dialect.generator().drop_table(table))
}

pub fn compile_truncate(table: &str, dialect: Dialect) -> CompiledQuery {
    CompiledQuery::new(dialect.generator().truncate(table))
}

pub fn compile_rename_table(from: &str, to: &str, dialect: Dialect) -> CompiledQuery {
    CompiledQuery::new(dialect.generator().rename_table(from, to))
}

/// Any compilable IR, as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Select(SqlStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTable),
    AlterTable {
        table: AlterTable,
        #[serde(default)]
        column_types: ColumnTypes,
    },
    DropTable {
        table: String,
    },
    TruncateTable {
        table: String,
    },
    RenameTable {
        from: String,
        to: String,
    },
}

impl Statement {
    pub fn compile(&self, dialect: Dialect) -> QailResult<Vec<CompiledQuery>> {
        match self {
            Statement::Select(stmt) => Ok(vec![compile_select(stmt, dialect)?]),
            Statement::Insert(stmt) => Ok(vec![compile_insert(stmt, dialect)?]),
            Statement::Update(stmt) => Ok(vec![compile_update(stmt, dialect)?]),
            Statement::Delete(stmt) => Ok(vec![compile_delete(stmt, dialect)?]),
            Statement::CreateTable(table) => compile_create(table, dialect),
            Statement::AlterTable {
                table,
                column_types,
            } => compile_alter(table, dialect, column_types),
            Statement::DropTable { table } => Ok(vec![compile_drop(table, dialect)]),
            Statement::TruncateTable { table } => Ok(vec![compile_truncate(table, dialect)]),
            Statement::RenameTable { from, to } => {
                Ok(vec![compile_rename_table(from, to, dialect)])
            }
        }
    }
}
