//! Fluent builders over the query and schema IR.
//!
//! Builders only append to the IR. Terminals (`select`, `count`, `delete`,
//! `into_table`, `set`, ...) compile it for the executor's dialect and run it.

pub mod clauses;
pub mod delete;
pub mod group;
pub mod insert;
pub mod query;
pub mod schema;
pub mod select;
pub mod subquery;
pub mod update;

pub use self::clauses::{
    Clause, ConditionSink, Filterable, HasStatement, HavingExpr, Joinable, Predicate, Shaping,
};
pub use self::delete::Delete;
pub use self::group::ConditionGroup;
pub use self::insert::Insert;
pub use self::query::Query;
pub use self::schema::{ColumnInfo, Schema};
pub use self::select::Select;
pub use self::subquery::SubQuery;
pub use self::update::Update;
