//! ALTER TABLE model: an ordered list of operations, one statement each.

use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::schema::column::{ColumnDef, ColumnType, ForeignKey, KeyDef, KeyKind, key_name};
use crate::schema::table::{ColumnHandle, ForeignKeyDef, TableBuilder};

/// One ALTER TABLE operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlterOp {
    AddColumn(ColumnDef),
    /// Add a new auto-incrementing column together with its primary key
    AddAutoincrement { column: ColumnDef, key: String },
    ModifyColumn(ColumnDef),
    RenameColumn { from: String, to: String },
    DropColumn(String),
    /// Add a primary, unique or index key
    AddKey { kind: KeyKind, key: KeyDef },
    AddForeign(ForeignKeyDef),
    DropKey { kind: KeyKind, name: String },
    SetDefault { column: String, value: Value },
    DropDefault(String),
    /// Turn an existing integer column into the auto-incrementing primary key
    Autoincrement { column: ColumnDef, key: String },
}

/// ALTER TABLE description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlterTable {
    pub name: String,
    #[serde(default)]
    pub operations: Vec<AlterOp>,
}

impl AlterTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    /// Build an alteration through a closure.
    pub fn build(name: impl Into<String>, f: impl FnOnce(&mut AlterTable)) -> Self {
        let mut table = AlterTable::new(name);
        f(&mut table);
        table
    }

    /// Redefine an existing column.
    pub fn modify(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> ColumnHandle<'_, Self> {
        self.operations
            .push(AlterOp::ModifyColumn(ColumnDef::new(name, column_type)));
        let slot = self.operations.len() - 1;
        ColumnHandle::new(self, slot)
    }

    pub fn rename_column(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.operations.push(AlterOp::RenameColumn {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn drop_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.operations.push(AlterOp::DropColumn(name.into()));
        self
    }

    pub fn drop_primary(&mut self, name: impl Into<String>) -> &mut Self {
        self.drop_key(KeyKind::Primary, name)
    }

    pub fn drop_unique(&mut self, name: impl Into<String>) -> &mut Self {
        self.drop_key(KeyKind::Unique, name)
    }

    pub fn drop_index(&mut self, name: impl Into<String>) -> &mut Self {
        self.drop_key(KeyKind::Index, name)
    }

    pub fn drop_foreign(&mut self, name: impl Into<String>) -> &mut Self {
        self.drop_key(KeyKind::Foreign, name)
    }

    fn drop_key(&mut self, kind: KeyKind, name: impl Into<String>) -> &mut Self {
        self.operations.push(AlterOp::DropKey {
            kind,
            name: name.into(),
        });
        self
    }

    pub fn set_default(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.operations.push(AlterOp::SetDefault {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn drop_default(&mut self, column: impl Into<String>) -> &mut Self {
        self.operations.push(AlterOp::DropDefault(column.into()));
        self
    }

    /// Make `column` the auto-incrementing primary key.
    ///
    /// The returned handle refines the column definition (e.g. its size).
    pub fn autoincrement(&mut self, column: impl Into<String>) -> ColumnHandle<'_, Self> {
        let mut def = ColumnDef::new(column, ColumnType::Integer);
        def.props.autoincrement = true;
        def.props.nullable = false;
        let key = key_name(&self.name, KeyKind::Primary, std::slice::from_ref(&def.name));
        self.operations.push(AlterOp::Autoincrement { column: def, key });
        let slot = self.operations.len() - 1;
        ColumnHandle::new(self, slot)
    }

    /// Columns whose current type a rename needs.
    pub fn renamed_columns(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().filter_map(|op| match op {
            AlterOp::RenameColumn { from, .. } => Some(from.as_str()),
            _ => None,
        })
    }
}

impl TableBuilder for AlterTable {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn push_column(&mut self, column: ColumnDef) -> usize {
        self.operations.push(AlterOp::AddColumn(column));
        self.operations.len() - 1
    }

    fn column_at(&mut self, slot: usize) -> Option<&mut ColumnDef> {
        match self.operations.get_mut(slot)? {
            AlterOp::AddColumn(column)
            | AlterOp::ModifyColumn(column)
            | AlterOp::AddAutoincrement { column, .. }
            | AlterOp::Autoincrement { column, .. } => Some(column),
            _ => None,
        }
    }

    /// An added column becomes one `AddAutoincrement` op and a modified column
    /// an `Autoincrement` op, so the key is declared in the same statement.
    fn autoincrement_at(&mut self, slot: usize) {
        let Some(op) = self.operations.get_mut(slot) else {
            return;
        };
        let (mut column, added) = match op {
            AlterOp::AddColumn(column) => (column.clone(), true),
            AlterOp::ModifyColumn(column) => (column.clone(), false),
            _ => return,
        };
        column.props.autoincrement = true;
        column.props.nullable = false;
        let key = key_name(&self.name, KeyKind::Primary, std::slice::from_ref(&column.name));
        *op = if added {
            AlterOp::AddAutoincrement { column, key }
        } else {
            AlterOp::Autoincrement { column, key }
        };
    }

    fn push_key(&mut self, kind: KeyKind, name: Option<String>, columns: Vec<String>) {
        let name = name.unwrap_or_else(|| key_name(&self.name, kind, &columns));
        if kind == KeyKind::Foreign {
            self.push_foreign(Some(name), columns);
            return;
        }
        self.operations.push(AlterOp::AddKey {
            kind,
            key: KeyDef { name, columns },
        });
    }

    fn push_foreign(&mut self, name: Option<String>, columns: Vec<String>) -> usize {
        let name = name.unwrap_or_else(|| key_name(&self.name, KeyKind::Foreign, &columns));
        self.operations.push(AlterOp::AddForeign(ForeignKeyDef {
            name,
            key: ForeignKey {
                columns,
                ..ForeignKey::default()
            },
        }));
        self.operations.len() - 1
    }

    fn foreign_at(&mut self, slot: usize) -> Option<&mut ForeignKey> {
        match self.operations.get_mut(slot)? {
            AlterOp::AddForeign(fk) => Some(&mut fk.key),
            _ => None,
        }
    }
}
