//! CREATE TABLE model and the column/foreign-key builders shared with ALTER TABLE.

use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::schema::column::{
    ColumnDef, ColumnType, ForeignKey, KeyDef, KeyKind, ReferentialAction, Size, key_name,
};

/// A foreign key together with its constraint name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyDef {
    pub name: String,
    #[serde(flatten)]
    pub key: ForeignKey,
}

/// Anything columns and keys can be declared on.
///
/// Implemented by [`CreateTable`] and [`AlterTable`](crate::schema::AlterTable).
/// The typed column constructors are provided methods.
pub trait TableBuilder {
    fn table_name(&self) -> &str;

    /// Append a column and return its slot.
    fn push_column(&mut self, column: ColumnDef) -> usize;

    fn column_at(&mut self, slot: usize) -> Option<&mut ColumnDef>;

    /// Make the column at `slot` auto-incrementing, not null and the primary key.
    fn autoincrement_at(&mut self, slot: usize);

    /// Register a primary, unique or index key. `None` means auto-named.
    fn push_key(&mut self, kind: KeyKind, name: Option<String>, columns: Vec<String>);

    /// Register a foreign key and return its slot.
    fn push_foreign(&mut self, name: Option<String>, columns: Vec<String>) -> usize;

    fn foreign_at(&mut self, slot: usize) -> Option<&mut ForeignKey>;

    fn integer(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::Integer))
    }

    fn float(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::Float))
    }

    fn double(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::Double))
    }

    fn decimal(
        &mut self,
        name: impl Into<String>,
        length: u32,
        precision: u32,
    ) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        let mut column = ColumnDef::new(name, ColumnType::Decimal);
        column.props.length = Some(length);
        column.props.precision = Some(precision);
        self.add_column(column)
    }

    fn boolean(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::Boolean))
    }

    fn binary(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::Binary))
    }

    fn text(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::Text))
    }

    fn string(&mut self, name: impl Into<String>, length: u32) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        let mut column = ColumnDef::new(name, ColumnType::String);
        column.props.length = Some(length);
        self.add_column(column)
    }

    fn fixed(&mut self, name: impl Into<String>, length: u32) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        let mut column = ColumnDef::new(name, ColumnType::Fixed);
        column.props.length = Some(length);
        self.add_column(column)
    }

    fn time(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::Time))
    }

    fn timestamp(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::Timestamp))
    }

    fn date(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::Date))
    }

    fn date_time(&mut self, name: impl Into<String>) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        self.add_column(ColumnDef::new(name, ColumnType::DateTime))
    }

    fn add_column(&mut self, column: ColumnDef) -> ColumnHandle<'_, Self>
    where
        Self: Sized,
    {
        let slot = self.push_column(column);
        ColumnHandle::new(self, slot)
    }

    /// Primary key over `columns`, auto-named.
    fn primary<I, S>(&mut self, columns: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_key(KeyKind::Primary, None, collect(columns));
        self
    }

    fn primary_named<I, S>(&mut self, name: impl Into<String>, columns: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_key(KeyKind::Primary, Some(name.into()), collect(columns));
        self
    }

    fn unique<I, S>(&mut self, columns: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_key(KeyKind::Unique, None, collect(columns));
        self
    }

    fn unique_named<I, S>(&mut self, name: impl Into<String>, columns: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_key(KeyKind::Unique, Some(name.into()), collect(columns));
        self
    }

    fn index<I, S>(&mut self, columns: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_key(KeyKind::Index, None, collect(columns));
        self
    }

    fn index_named<I, S>(&mut self, name: impl Into<String>, columns: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_key(KeyKind::Index, Some(name.into()), collect(columns));
        self
    }

    /// Foreign key over `columns`; finish with [`ForeignKeyBuilder::references`].
    fn foreign<I, S>(&mut self, columns: I) -> ForeignKeyBuilder<'_, Self>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slot = self.push_foreign(None, collect(columns));
        ForeignKeyBuilder { table: self, slot }
    }

    fn foreign_named<I, S>(
        &mut self,
        name: impl Into<String>,
        columns: I,
    ) -> ForeignKeyBuilder<'_, Self>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slot = self.push_foreign(Some(name.into()), collect(columns));
        ForeignKeyBuilder { table: self, slot }
    }
}

fn collect<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).collect()
}

/// Modifiers for a freshly declared column.
pub struct ColumnHandle<'t, T: TableBuilder> {
    table: &'t mut T,
    slot: usize,
}

impl<'t, T: TableBuilder> ColumnHandle<'t, T> {
    pub(crate) fn new(table: &'t mut T, slot: usize) -> Self {
        Self { table, slot }
    }

    fn update(self, f: impl FnOnce(&mut ColumnDef)) -> Self {
        if let Some(column) = self.table.column_at(self.slot) {
            f(column);
        }
        self
    }

    fn name(&mut self) -> String {
        self.table
            .column_at(self.slot)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    pub fn not_null(self) -> Self {
        self.update(|c| c.props.nullable = false)
    }

    pub fn nullable(self) -> Self {
        self.update(|c| c.props.nullable = true)
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.update(|c| c.props.default = Some(value))
    }

    pub fn unsigned(self) -> Self {
        self.update(|c| c.props.unsigned = true)
    }

    pub fn size(self, size: Size) -> Self {
        self.update(|c| c.props.size = Some(size))
    }

    pub fn length(self, length: u32) -> Self {
        self.update(|c| c.props.length = Some(length))
    }

    pub fn precision(self, precision: u32) -> Self {
        self.update(|c| c.props.precision = Some(precision))
    }

    pub fn description(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.update(|c| c.props.description = Some(text))
    }

    /// Mark the column auto-incrementing and make it the primary key.
    pub fn autoincrement(mut self) -> Self {
        self.table.autoincrement_at(self.slot);
        self
    }

    pub fn primary(mut self) -> Self {
        let name = self.name();
        self.table.push_key(KeyKind::Primary, None, vec![name]);
        self
    }

    pub fn unique(mut self) -> Self {
        let name = self.name();
        self.table.push_key(KeyKind::Unique, None, vec![name]);
        self
    }

    pub fn index(mut self) -> Self {
        let name = self.name();
        self.table.push_key(KeyKind::Index, None, vec![name]);
        self
    }

    /// Reference `ref_table(ref_column)` from this column.
    pub fn foreign(
        mut self,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> ForeignKeyBuilder<'t, T> {
        let name = self.name();
        let slot = self.table.push_foreign(None, vec![name]);
        ForeignKeyBuilder {
            table: self.table,
            slot,
        }
        .references(ref_table, [ref_column.into()])
    }
}

/// Completes a foreign key declaration.
pub struct ForeignKeyBuilder<'t, T: TableBuilder> {
    table: &'t mut T,
    slot: usize,
}

impl<'t, T: TableBuilder> ForeignKeyBuilder<'t, T> {
    fn update(self, f: impl FnOnce(&mut ForeignKey)) -> Self {
        if let Some(key) = self.table.foreign_at(self.slot) {
            f(key);
        }
        self
    }

    pub fn references<I, S>(self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = table.into();
        let columns = collect(columns);
        self.update(|k| {
            k.ref_table = table;
            k.ref_columns = columns;
        })
    }

    pub fn on_delete(self, action: ReferentialAction) -> Self {
        self.update(|k| k.on_delete = Some(action))
    }

    pub fn on_update(self, action: ReferentialAction) -> Self {
        self.update(|k| k.on_update = Some(action))
    }
}

/// CREATE TABLE description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub primary_key: Option<KeyDef>,
    #[serde(default)]
    pub unique_keys: Vec<KeyDef>,
    #[serde(default)]
    pub indexes: Vec<KeyDef>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDef>,
    /// Storage engine (MySQL only)
    #[serde(default)]
    pub engine: Option<String>,
}

impl CreateTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a table description through a closure.
    pub fn build(name: impl Into<String>, f: impl FnOnce(&mut CreateTable)) -> Self {
        let mut table = CreateTable::new(name);
        f(&mut table);
        table
    }

    pub fn engine(&mut self, engine: impl Into<String>) -> &mut Self {
        self.engine = Some(engine.into());
        self
    }
}

impl TableBuilder for CreateTable {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn push_column(&mut self, column: ColumnDef) -> usize {
        self.columns.push(column);
        self.columns.len() - 1
    }

    fn column_at(&mut self, slot: usize) -> Option<&mut ColumnDef> {
        self.columns.get_mut(slot)
    }

    fn autoincrement_at(&mut self, slot: usize) {
        let Some(column) = self.columns.get_mut(slot) else {
            return;
        };
        column.props.autoincrement = true;
        column.props.nullable = false;
        let name = column.name.clone();
        self.push_key(KeyKind::Primary, None, vec![name]);
    }

    fn push_key(&mut self, kind: KeyKind, name: Option<String>, columns: Vec<String>) {
        let name = name.unwrap_or_else(|| key_name(&self.name, kind, &columns));
        let key = KeyDef { name, columns };
        match kind {
            // A later primary key replaces the earlier one.
            KeyKind::Primary => self.primary_key = Some(key),
            KeyKind::Unique => self.unique_keys.push(key),
            KeyKind::Index => self.indexes.push(key),
            KeyKind::Foreign => {
                self.push_foreign(Some(key.name), key.columns);
            }
        }
    }

    fn push_foreign(&mut self, name: Option<String>, columns: Vec<String>) -> usize {
        let name = name.unwrap_or_else(|| key_name(&self.name, KeyKind::Foreign, &columns));
        self.foreign_keys.push(ForeignKeyDef {
            name,
            key: ForeignKey {
                columns,
                ..ForeignKey::default()
            },
        });
        self.foreign_keys.len() - 1
    }

    fn foreign_at(&mut self, slot: usize) -> Option<&mut ForeignKey> {
        self.foreign_keys.get_mut(slot).map(|fk| &mut fk.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_keep_declaration_order() {
        let table = CreateTable::build("users", |t| {
            t.integer("id").autoincrement();
            t.string("email", 120).not_null().unique();
            t.boolean("active").default_value(true);
        });
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "active"]);
        assert_eq!(
            table.primary_key.as_ref().map(|k| k.name.as_str()),
            Some("users_pk_id")
        );
        assert_eq!(table.unique_keys[0].name, "users_uk_email");
        assert!(table.columns[0].props.autoincrement);
        assert!(!table.columns[0].props.nullable);
        assert_eq!(table.columns[1].props.length, Some(120));
    }

    #[test]
    fn test_foreign_key_builder() {
        let table = CreateTable::build("posts", |t| {
            t.integer("user_id").not_null();
            t.foreign(["user_id"])
                .references("users", ["id"])
                .on_delete(ReferentialAction::Cascade);
            t.integer("category_id")
                .foreign("categories", "id")
                .on_update(ReferentialAction::SetNull);
        });
        assert_eq!(table.foreign_keys.len(), 2);
        let first = &table.foreign_keys[0];
        assert_eq!(first.name, "posts_fk_user_id");
        assert_eq!(first.key.ref_table, "users");
        assert_eq!(first.key.on_delete, Some(ReferentialAction::Cascade));
        let second = &table.foreign_keys[1];
        assert_eq!(second.key.ref_columns, vec!["id".to_string()]);
        assert_eq!(second.key.on_update, Some(ReferentialAction::SetNull));
    }

    #[test]
    fn test_named_keys() {
        let table = CreateTable::build("events", |t| {
            t.date("day");
            t.string("kind", 20);
            t.index_named("by_day_kind", ["day", "kind"]).primary(["day"]);
        });
        assert_eq!(table.indexes[0].name, "by_day_kind");
        assert_eq!(table.indexes[0].columns, vec!["day", "kind"]);
        assert_eq!(table.primary_key.unwrap().name, "events_pk_day");
    }
}
