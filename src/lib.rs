//! # qail-sql
//!
//! One query and schema description, four SQL dialects.
//!
//! Builders record what a statement should do in a database-agnostic IR.
//! The transpiler renders that IR for MySQL, PostgreSQL, SQLite or SQL Server
//! with native placeholders and an ordered parameter list, and an
//! [`Executor`](engine::Executor) runs the result.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use qail_sql::prelude::*;
//!
//! let db = Database::connect("mysql://root@localhost/app").await?;
//!
//! let rows = db
//!     .from("users")
//!     .filter("age").at_least(18)
//!     .filter("active").is(true)
//!     .order_by(["name"])
//!     .limit(10)
//!     .select(["id", "name"])
//!     .await?;
//! // SELECT id, name FROM users WHERE age >= ? AND active = ? ORDER BY name ASC LIMIT 10
//! ```
//!
//! ## Dialects
//!
//! | Dialect    | Quoting  | Placeholder |
//! |------------|----------|-------------|
//! | MySQL      | `` `x` `` | `?`        |
//! | PostgreSQL | `"x"`    | `$1`        |
//! | SQLite     | `"x"`    | `?`         |
//! | SQL Server | `[x]`    | `@p1`       |

pub mod ast;
pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod schema;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::builder::{
        ColumnInfo, ConditionGroup, Delete, Filterable, Insert, Joinable, Query, Schema, Select,
        Shaping, SubQuery, Update,
    };
    pub use crate::config::Config;
    pub use crate::engine::{Database, ExecOutcome, Executor, Row, Transaction};
    pub use crate::error::*;
    pub use crate::schema::*;
    pub use crate::transpiler::{CompiledQuery, Dialect, Statement};
}

pub use crate::error::{QailError, QailResult};
pub use crate::transpiler::{CompiledQuery, Dialect};
