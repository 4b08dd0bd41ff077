//! Schema model: CREATE TABLE and ALTER TABLE descriptions.

pub mod alter;
pub mod column;
pub mod table;

pub use self::alter::{AlterOp, AlterTable};
pub use self::column::{
    ColumnDef, ColumnProps, ColumnType, ForeignKey, KeyDef, KeyKind, ReferentialAction, Size,
};
pub use self::table::{ColumnHandle, CreateTable, ForeignKeyBuilder, ForeignKeyDef, TableBuilder};
