use crate::ast::{AggregateFunc, IntoTarget, Nulls, ScalarFunc, SortOrder, Value, quote_string};
use crate::error::{QailError, QailResult};
use crate::schema::{ColumnDef, ColumnType, CreateTable, ForeignKeyDef, KeyDef, KeyKind, Size};
use crate::transpiler::ddl::{
    column_definition, column_list, create_index, decimal_type, foreign_key_clause,
    length_or_default, require_normal_size, size_of, unsupported_size,
};
use crate::transpiler::traits::{SqlGenerator, aggregate_call, quote_with};
use crate::transpiler::{CompiledQuery, Dialect, ParamContext};

/// MySQL Generator.
pub struct MysqlGenerator;

/// LIMIT used when only OFFSET is requested (max unsigned 64-bit).
const NO_LIMIT: &str = "18446744073709551615";

impl MysqlGenerator {
    fn alter(&self, table: &str) -> String {
        format!("ALTER TABLE {}", self.quote_identifier(table))
    }
}

impl SqlGenerator for MysqlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::MySQL
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '`', '`', false)
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
            (None, Some(_)) => sql.push_str(&format!(" LIMIT {}", NO_LIMIT)),
            (None, None) => {}
        }
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        sql
    }

    fn order_item(&self, column: &str, direction: SortOrder, nulls: Option<Nulls>) -> String {
        // `col IS NULL` is 1 for NULLs, so DESC puts them first.
        match nulls {
            Some(Nulls::First) => format!("{} IS NULL DESC, {} {}", column, column, direction),
            Some(Nulls::Last) => format!("{} IS NULL ASC, {} {}", column, column, direction),
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
            ScalarFunc::Upper => format!("UCASE({})", column),
            ScalarFunc::Lower => format!("LCASE({})", column),
            ScalarFunc::Mid { start, length } => match length {
                Some(length) => format!("MID({}, {}, {})", column, start, length),
                None => format!("MID({}, {})", column, start),
            },
            ScalarFunc::Length => format!("LENGTH({})", column),
            ScalarFunc::Round { decimals } => format!("ROUND({}, {})", column, decimals),
            ScalarFunc::Format { pattern } => {
                let ph = params.add_param(Value::String(pattern.clone()), self);
                format!("FORMAT({}, {})", column, ph)
            }
            ScalarFunc::Now => "NOW()".to_string(),
        }
    }

    fn aggregate(
        &self,
        func: AggregateFunc,
        distinct: bool,
        columns: &[String],
    ) -> QailResult<String> {
        Ok(aggregate_call(func, distinct, &columns.join(", ")))
    }

    fn select_into(&self, _target: &IntoTarget) -> QailResult<String> {
        Err(QailError::unsupported(Dialect::MySQL, "SELECT INTO"))
    }

    fn delete_targets(&self, targets: &[String]) -> QailResult<String> {
        Ok(column_list(targets, self))
    }

    fn column_type(&self, column: &ColumnDef) -> QailResult<String> {
        let size = size_of(column);
        let base = match column.column_type {
            ColumnType::Integer => match size {
                Size::Tiny => "TINYINT",
                Size::Small => "SMALLINT",
                Size::Medium => "MEDIUMINT",
                Size::Normal => "INT",
                Size::Big => "BIGINT",
            }
            .to_string(),
            ColumnType::Float => match size {
                Size::Small => "FLOAT",
                Size::Normal | Size::Big => "DOUBLE",
                _ => return Err(unsupported_size(Dialect::MySQL, column)),
            }
            .to_string(),
            ColumnType::Double => {
                require_normal_size(Dialect::MySQL, column)?;
                "DOUBLE".to_string()
            }
            ColumnType::Decimal => {
                require_normal_size(Dialect::MySQL, column)?;
                decimal_type(column)
            }
            ColumnType::Boolean => {
                require_normal_size(Dialect::MySQL, column)?;
                "TINYINT(1)".to_string()
            }
            ColumnType::Text => match size {
                Size::Tiny | Size::Small => "TINYTEXT",
                Size::Normal => "TEXT",
                Size::Medium => "MEDIUMTEXT",
                Size::Big => "LONGTEXT",
            }
            .to_string(),
            ColumnType::Binary => match size {
                Size::Tiny | Size::Small => "TINYBLOB",
                Size::Normal => "BLOB",
                Size::Medium => "MEDIUMBLOB",
                Size::Big => "LONGBLOB",
            }
            .to_string(),
            ColumnType::String => {
                require_normal_size(Dialect::MySQL, column)?;
                format!("VARCHAR({})", length_or_default(column))
            }
            ColumnType::Fixed => {
                require_normal_size(Dialect::MySQL, column)?;
                format!("CHAR({})", length_or_default(column))
            }
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
        };

        let numeric = matches!(
            column.column_type,
            ColumnType::Integer | ColumnType::Float | ColumnType::Double | ColumnType::Decimal
        );
        if column.props.unsigned && numeric {
            Ok(format!("{} UNSIGNED", base))
        } else {
            Ok(base)
        }
    }

    fn autoincrement_modifier(&self) -> &'static str {
        "AUTO_INCREMENT"
    }

    fn autoincrement_is_primary_key(&self) -> bool {
        false
    }

    fn inline_comment(&self, description: &str) -> Option<String> {
        Some(format!(" COMMENT {}", quote_string(description)))
    }

    fn comment_statement(&self, _table: &str, _column: &str, _description: &str) -> Option<String> {
        None
    }

    fn inline_indexes(&self) -> bool {
        true
    }

    fn table_options(&self, table: &CreateTable) -> String {
        match &table.engine {
            Some(engine) => format!(" ENGINE = {}", engine),
            None => String::new(),
        }
    }

    fn add_column(&self, table: &str, definition: &str) -> QailResult<String> {
        Ok(format!("{} ADD COLUMN {}", self.alter(table), definition))
    }

    fn add_autoincrement_column(
        &self,
        table: &str,
        definition: &str,
        column: &str,
        key: &str,
    ) -> QailResult<String> {
        Ok(format!(
            "{} ADD COLUMN {}, ADD CONSTRAINT {} PRIMARY KEY ({})",
            self.alter(table),
            definition,
            self.quote_identifier(key),
            self.quote_identifier(column)
        ))
    }

    fn modify_column(&self, table: &str, column: &ColumnDef) -> QailResult<Vec<String>> {
        Ok(vec![format!(
            "{} MODIFY COLUMN {}",
            self.alter(table),
            column_definition(column, self)?
        )])
    }

    fn rename_column(
        &self,
        table: &str,
        from: &str,
        to: &str,
        existing_type: Option<&str>,
    ) -> QailResult<String> {
        let column_type = existing_type.ok_or_else(|| QailError::MissingColumnType {
            table: table.to_string(),
            column: from.to_string(),
        })?;
        Ok(format!(
            "{} CHANGE {} {} {}",
            self.alter(table),
            self.quote_identifier(from),
            self.quote_identifier(to),
            column_type
        ))
    }

    fn drop_column(&self, table: &str, column: &str) -> QailResult<String> {
        Ok(format!("{} DROP COLUMN {}", self.alter(table), self.quote_identifier(column)))
    }

    fn add_key(&self, table: &str, kind: KeyKind, key: &KeyDef) -> QailResult<String> {
        match kind {
            KeyKind::Primary => Ok(format!(
                "{} ADD CONSTRAINT {} PRIMARY KEY ({})",
                self.alter(table),
                self.quote_identifier(&key.name),
                column_list(&key.columns, self)
            )),
            KeyKind::Unique => Ok(format!(
                "{} ADD CONSTRAINT {} UNIQUE ({})",
                self.alter(table),
                self.quote_identifier(&key.name),
                column_list(&key.columns, self)
            )),
            KeyKind::Index => Ok(create_index(table, key, false, self)),
            KeyKind::Foreign => Err(QailError::invalid("foreign keys are added with add_foreign")),
        }
    }

    fn add_foreign(&self, table: &str, foreign: &ForeignKeyDef) -> QailResult<String> {
        Ok(format!("{} ADD {}", self.alter(table), foreign_key_clause(foreign, self)?))
    }

    fn drop_key(&self, table: &str, kind: KeyKind, name: &str) -> QailResult<String> {
        let name = self.quote_identifier(name);
        Ok(match kind {
            KeyKind::Primary => format!("{} DROP PRIMARY KEY", self.alter(table)),
            KeyKind::Unique | KeyKind::Index => {
                format!("{} DROP INDEX {}", self.alter(table), name)
            }
            KeyKind::Foreign => format!("{} DROP FOREIGN KEY {}", self.alter(table), name),
        })
    }

    fn set_default(&self, table: &str, column: &str, literal: &str) -> QailResult<String> {
        Ok(format!(
            "{} ALTER {} SET DEFAULT {}",
            self.alter(table),
            self.quote_identifier(column),
            literal
        ))
    }

    fn drop_default(&self, table: &str, column: &str) -> QailResult<String> {
        Ok(format!(
            "{} ALTER {} DROP DEFAULT",
            self.alter(table),
            self.quote_identifier(column)
        ))
    }

    fn add_autoincrement(
        &self,
        table: &str,
        column: &ColumnDef,
        key: &str,
    ) -> QailResult<String> {
        Ok(format!(
            "{} MODIFY {}, ADD CONSTRAINT {} PRIMARY KEY ({})",
            self.alter(table),
            column_definition(column, self)?,
            self.quote_identifier(key),
            self.quote_identifier(&column.name)
        ))
    }

    fn rename_table(&self, from: &str, to: &str) -> String {
        format!(
            "RENAME TABLE {} TO {}",
            self.quote_identifier(from),
            self.quote_identifier(to)
        )
    }

    fn truncate(&self, table: &str) -> String {
        format!("TRUNCATE TABLE {}", self.quote_identifier(table))
    }

    fn drop_table(&self, table: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(table))
    }

    fn current_database(&self) -> CompiledQuery {
        CompiledQuery::new("SELECT DATABASE() AS name")
    }

    fn list_tables(&self, database: &str) -> CompiledQuery {
        let mut params = ParamContext::new();
        let schema = params.add_param(Value::from(database), self);
        params.finish(format!(
            "SELECT table_name AS name FROM information_schema.tables \
             WHERE table_schema = {} AND table_type = 'BASE TABLE' ORDER BY table_name",
            schema
        ))
    }

    fn list_columns(&self, database: &str, table: &str) -> CompiledQuery {
        let mut params = ParamContext::new();
        let schema = params.add_param(Value::from(database), self);
        let name = params.add_param(Value::from(table), self);
        params.finish(format!(
            "SELECT column_name AS name, column_type AS type FROM information_schema.columns \
             WHERE table_schema = {} AND table_name = {} ORDER BY ordinal_position",
            schema, name
        ))
    }
}
