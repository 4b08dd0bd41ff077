use crate::ast::{AggregateFunc, IntoTarget, Nulls, ScalarFunc, SortOrder, Value};
use crate::error::{QailError, QailResult};
use crate::schema::{ColumnDef, ColumnType, CreateTable, ForeignKeyDef, KeyDef, KeyKind, Size};
use crate::transpiler::ddl::{
    create_index, decimal_type, length_or_default, require_normal_size, size_of, unsupported_size,
};
use crate::transpiler::traits::{SqlGenerator, aggregate_call, quote_with};
use crate::transpiler::{CompiledQuery, Dialect, ParamContext};

/// SQLite Generator.
///
/// SQLite's ALTER TABLE only adds, renames and drops columns; key changes
/// are limited to standalone indexes.
pub struct SqliteGenerator;

fn unsupported(feature: &str) -> QailError {
    QailError::unsupported(Dialect::SQLite, feature)
}

impl SqlGenerator for SqliteGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"', '"', false)
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn select_prefix(&self, _limit: Option<u64>, _offset: Option<u64>) -> String {
        String::new()
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>, _ordered: bool) -> String {
        let mut sql = String::new();
        match (limit, offset) {
            (Some(n), _) => sql.push_str(&format!(" LIMIT {}", n)),
            (None, Some(_)) => sql.push_str(" LIMIT -1"),
            (None, None) => {}
        }
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        sql
    }

    fn order_item(&self, column: &str, direction: SortOrder, nulls: Option<Nulls>) -> String {
        match nulls {
            Some(Nulls::First) => format!("{} {} NULLS FIRST", column, direction),
            Some(Nulls::Last) => format!("{} {} NULLS LAST", column, direction),
            None => format!("{} {}", column, direction),
        }
    }

    fn scalar_function(
        &self,
        func: &ScalarFunc,
        column: &str,
        params: &mut ParamContext,
    ) -> String {
        match func {
            ScalarFunc::Upper => format!("UPPER({})", column),
            ScalarFunc::Lower => format!("LOWER({})", column),
            ScalarFunc::Mid { start, length } => match length {
                Some(length) => format!("SUBSTR({}, {}, {})", column, start, length),
                None => format!("SUBSTR({}, {})", column, start),
            },
            ScalarFunc::Length => format!("LENGTH({})", column),
            ScalarFunc::Round { decimals } => format!("ROUND({}, {})", column, decimals),
            ScalarFunc::Format { pattern } => {
                let ph = params.add_param(Value::String(pattern.clone()), self);
                format!("printf({}, {})", ph, column)
            }
            ScalarFunc::Now => "datetime('now')".to_string(),
        }
    }

    fn aggregate(
        &self,
        func: AggregateFunc,
        distinct: bool,
        columns: &[String],
    ) -> QailResult<String> {
        if distinct && columns.len() > 1 {
            return Err(unsupported("DISTINCT aggregate over several columns"));
        }
        Ok(aggregate_call(func, distinct, &columns.join(", ")))
    }

    fn select_into(&self, _target: &IntoTarget) -> QailResult<String> {
        Err(unsupported("SELECT INTO"))
    }

    fn delete_targets(&self, _targets: &[String]) -> QailResult<String> {
        Err(unsupported("DELETE with joins or multiple tables"))
    }

    fn column_type(&self, column: &ColumnDef) -> QailResult<String> {
        let size = size_of(column);
        let ty = match column.column_type {
            ColumnType::Integer if column.props.autoincrement => {
                "INTEGER PRIMARY KEY AUTOINCREMENT".to_string()
            }
            ColumnType::Integer => match size {
                Size::Tiny => "TINYINT",
                Size::Small => "SMALLINT",
                Size::Medium => "MEDIUMINT",
                Size::Normal => "INTEGER",
                Size::Big => "BIGINT",
            }
            .to_string(),
            ColumnType::Float => match size {
                Size::Small | Size::Normal | Size::Big => "REAL".to_string(),
                _ => return Err(unsupported_size(Dialect::SQLite, column)),
            },
            ColumnType::Double => {
                require_normal_size(Dialect::SQLite, column)?;
                "DOUBLE".to_string()
            }
            ColumnType::Decimal => {
                require_normal_size(Dialect::SQLite, column)?;
                decimal_type(column)
            }
            ColumnType::Boolean => {
                require_normal_size(Dialect::SQLite, column)?;
                "BOOLEAN".to_string()
            }
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Binary => "BLOB".to_string(),
            ColumnType::String => {
                require_normal_size(Dialect::SQLite, column)?;
                format!("VARCHAR({})", length_or_default(column))
            }
            ColumnType::Fixed => {
                require_normal_size(Dialect::SQLite, column)?;
                format!("CHAR({})", length_or_default(column))
            }
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Timestamp | ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Date => "DATE".to_string(),
        };
        Ok(ty)
    }

    fn autoincrement_modifier(&self) -> &'static str {
        ""
    }

    fn autoincrement_is_primary_key(&self) -> bool {
        true
    }

    fn inline_comment(&self, _description: &str) -> Option<String> {
        None
    }

    fn comment_statement(&self, _table: &str, _column: &str, _description: &str) -> Option<String> {
        None
    }

    fn inline_indexes(&self) -> bool {
        false
    }

    fn table_options(&self, _table: &CreateTable) -> String {
        String::new()
    }

    fn add_column(&self, table: &str, definition: &str) -> QailResult<String> {
        Ok(format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_identifier(table),
            definition
        ))
    }

    fn add_autoincrement_column(
        &self,
        _table: &str,
        _definition: &str,
        _column: &str,
        _key: &str,
    ) -> QailResult<String> {
        Err(unsupported("adding an autoincrement column to an existing table"))
    }

    fn modify_column(&self, _table: &str, _column: &ColumnDef) -> QailResult<Vec<String>> {
        Err(unsupported("MODIFY COLUMN"))
    }

    fn rename_column(
        &self,
        table: &str,
        from: &str,
        to: &str,
        _existing_type: Option<&str>,
    ) -> QailResult<String> {
        Ok(format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            self.quote_identifier(table),
            self.quote_identifier(from),
            self.quote_identifier(to)
        ))
    }

    fn drop_column(&self, table: &str, column: &str) -> QailResult<String> {
        Ok(format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_identifier(table),
            self.quote_identifier(column)
        ))
    }

    fn add_key(&self, table: &str, kind: KeyKind, key: &KeyDef) -> QailResult<String> {
        match kind {
            KeyKind::Unique => Ok(create_index(table, key, true, self)),
            KeyKind::Index => Ok(create_index(table, key, false, self)),
            KeyKind::Primary => Err(unsupported("adding a primary key to an existing table")),
            KeyKind::Foreign => Err(unsupported("adding a foreign key to an existing table")),
        }
    }

    fn add_foreign(&self, _table: &str, _foreign: &ForeignKeyDef) -> QailResult<String> {
        Err(unsupported("adding a foreign key to an existing table"))
    }

    fn drop_key(&self, _table: &str, kind: KeyKind, name: &str) -> QailResult<String> {
        match kind {
            KeyKind::Unique | KeyKind::Index => {
                Ok(format!("DROP INDEX {}", self.quote_identifier(name)))
            }
            KeyKind::Primary => Err(unsupported("dropping a primary key")),
            KeyKind::Foreign => Err(unsupported("dropping a foreign key")),
        }
    }

    fn set_default(&self, _table: &str, _column: &str, _literal: &str) -> QailResult<String> {
        Err(unsupported("changing a column default"))
    }

    fn drop_default(&self, _table: &str, _column: &str) -> QailResult<String> {
        Err(unsupported("changing a column default"))
    }

    fn add_autoincrement(
        &self,
        _table: &str,
        _column: &ColumnDef,
        _key: &str,
    ) -> QailResult<String> {
        Err(unsupported("adding autoincrement to an existing column"))
    }

    fn rename_table(&self, from: &str, to: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote_identifier(from),
            self.quote_identifier(to)
        )
    }

    // No TRUNCATE statement; an unqualified DELETE uses the truncate optimization.
    fn truncate(&self, table: &str) -> String {
        format!("DELETE FROM {}", self.quote_identifier(table))
    }

    fn drop_table(&self, table: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(table))
    }

    fn current_database(&self) -> CompiledQuery {
        CompiledQuery::new("SELECT name FROM pragma_database_list WHERE seq = 0")
    }

    fn list_tables(&self, _database: &str) -> CompiledQuery {
        CompiledQuery::new(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
    }

    fn list_columns(&self, _database: &str, table: &str) -> CompiledQuery {
        let mut params = ParamContext::new();
        let name = params.add_param(Value::from(table), self);
        params.finish(format!(
            "SELECT name, type FROM pragma_table_info({}) ORDER BY cid",
            name
        ))
    }
}
