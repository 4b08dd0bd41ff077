mod core;
mod ddl;
mod dialects;

use crate::ast::SqlStatement;
use crate::builder::SubQuery;
use crate::transpiler::{CompiledQuery, Dialect, compile_select};

/// Statement built with the closure builder.
fn statement(f: impl FnOnce(&mut SubQuery)) -> SqlStatement {
    SubQuery::build(f)
}

fn select(stmt: &SqlStatement, dialect: Dialect) -> CompiledQuery {
    compile_select(stmt, dialect).unwrap()
}
