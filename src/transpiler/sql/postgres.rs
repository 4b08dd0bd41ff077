use crate::ast::{AggregateFunc, IntoTarget, Nulls, ScalarFunc, SortOrder, Value, quote_string};
use crate::error::{QailError, QailResult};
use crate::schema::{ColumnDef, ColumnType, CreateTable, ForeignKeyDef, KeyDef, KeyKind, Size};
use crate::transpiler::ddl::{
    column_list, create_index, decimal_type, default_literal, foreign_key_clause,
    length_or_default, require_normal_size, size_of, unsupported_size,
};
use crate::transpiler::traits::{SqlGenerator, aggregate_call, quote_with};
use crate::transpiler::{CompiledQuery, Dialect, ParamContext};

/// PostgreSQL Generator.
pub struct PostgresGenerator;

impl PostgresGenerator {
    fn alter(&self, table: &str) -> String {
        format!("ALTER TABLE {}", self.quote_identifier(table))
    }
}

impl SqlGenerator for PostgresGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"', '"', true)
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "TRUE".to_string() } else { "FALSE".to_string() }
    }

    fn select_prefix(&self, _limit: Option<u64>, _offset: Option<u64>) -> String {
        String::new()
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>, _ordered: bool) -> String {
        let mut sql = String::new();
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
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
                Some(length) => format!("SUBSTRING({} FROM {} FOR {})", column, start, length),
                None => format!("SUBSTRING({} FROM {})", column, start),
            },
            ScalarFunc::Length => format!("LENGTH({})", column),
            ScalarFunc::Round { decimals } => {
                format!("ROUND(CAST({} AS NUMERIC), {})", column, decimals)
            }
            ScalarFunc::Format { pattern } => {
                let ph = params.add_param(Value::String(pattern.clone()), self);
                format!("to_char({}, {})", column, ph)
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
        if distinct && columns.len() > 1 {
            // Row constructor: COUNT(DISTINCT (a, b))
            return Ok(aggregate_call(func, true, &format!("({})", columns.join(", "))));
        }
        Ok(aggregate_call(func, distinct, &columns.join(", ")))
    }

    fn select_into(&self, target: &IntoTarget) -> QailResult<String> {
        if target.database.is_some() {
            return Err(QailError::unsupported(
                Dialect::Postgres,
                "SELECT INTO another database",
            ));
        }
        Ok(format!("INTO {}", self.quote_identifier(&target.table)))
    }

    fn delete_targets(&self, _targets: &[String]) -> QailResult<String> {
        Err(QailError::unsupported(
            Dialect::Postgres,
            "DELETE with joins or multiple tables",
        ))
    }

    fn column_type(&self, column: &ColumnDef) -> QailResult<String> {
        let size = size_of(column);
        let ty = match column.column_type {
            ColumnType::Integer if column.props.autoincrement => match size {
                Size::Tiny | Size::Small => "SMALLSERIAL",
                Size::Medium | Size::Normal => "SERIAL",
                Size::Big => "BIGSERIAL",
            }
            .to_string(),
            ColumnType::Integer => match size {
                Size::Tiny | Size::Small => "SMALLINT",
                Size::Medium | Size::Normal => "INTEGER",
                Size::Big => "BIGINT",
            }
            .to_string(),
            ColumnType::Float => match size {
                Size::Small => "REAL",
                Size::Normal | Size::Big => "DOUBLE PRECISION",
                _ => return Err(unsupported_size(Dialect::Postgres, column)),
            }
            .to_string(),
            ColumnType::Double => {
                require_normal_size(Dialect::Postgres, column)?;
                "DOUBLE PRECISION".to_string()
            }
            ColumnType::Decimal => {
                require_normal_size(Dialect::Postgres, column)?;
                decimal_type(column)
            }
            ColumnType::Boolean => {
                require_normal_size(Dialect::Postgres, column)?;
                "BOOLEAN".to_string()
            }
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Binary => "BYTEA".to_string(),
            ColumnType::String => {
                require_normal_size(Dialect::Postgres, column)?;
                format!("VARCHAR({})", length_or_default(column))
            }
            ColumnType::Fixed => {
                require_normal_size(Dialect::Postgres, column)?;
                format!("CHAR({})", length_or_default(column))
            }
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Timestamp | ColumnType::DateTime => "TIMESTAMP".to_string(),
            ColumnType::Date => "DATE".to_string(),
        };
        Ok(ty)
    }

    fn autoincrement_modifier(&self) -> &'static str {
        ""
    }

    fn autoincrement_is_primary_key(&self) -> bool {
        false
    }

    fn inline_comment(&self, _description: &str) -> Option<String> {
        None
    }

    fn comment_statement(&self, table: &str, column: &str, description: &str) -> Option<String> {
        Some(format!(
            "COMMENT ON COLUMN {}.{} IS {}",
            self.quote_identifier(table),
            self.quote_identifier(column),
            quote_string(description)
        ))
    }

    fn inline_indexes(&self) -> bool {
        false
    }

    fn table_options(&self, _table: &CreateTable) -> String {
        String::new()
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
        if column.props.autoincrement {
            return Err(QailError::unsupported(
                Dialect::Postgres,
                "autoincrement through MODIFY COLUMN",
            ));
        }
        let name = self.quote_identifier(&column.name);
        let mut actions = vec![
            format!("ALTER COLUMN {} TYPE {}", name, self.column_type(column)?),
            format!(
                "ALTER COLUMN {} {} NOT NULL",
                name,
                if column.props.nullable { "DROP" } else { "SET" }
            ),
        ];
        if let Some(value) = &column.props.default {
            actions.push(format!(
                "ALTER COLUMN {} SET DEFAULT {}",
                name,
                default_literal(value, self)
            ));
        }
        Ok(vec![format!("{} {}", self.alter(table), actions.join(", "))])
    }

    fn rename_column(
        &self,
        table: &str,
        from: &str,
        to: &str,
        _existing_type: Option<&str>,
    ) -> QailResult<String> {
        Ok(format!(
            "{} RENAME COLUMN {} TO {}",
            self.alter(table),
            self.quote_identifier(from),
            self.quote_identifier(to)
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
            KeyKind::Index => format!("DROP INDEX {}", name),
            KeyKind::Primary | KeyKind::Unique | KeyKind::Foreign => {
                format!("{} DROP CONSTRAINT {}", self.alter(table), name)
            }
        })
    }

    fn set_default(&self, table: &str, column: &str, literal: &str) -> QailResult<String> {
        Ok(format!(
            "{} ALTER COLUMN {} SET DEFAULT {}",
            self.alter(table),
            self.quote_identifier(column),
            literal
        ))
    }

    fn drop_default(&self, table: &str, column: &str) -> QailResult<String> {
        Ok(format!(
            "{} ALTER COLUMN {} DROP DEFAULT",
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
        let name = self.quote_identifier(&column.name);
        Ok(format!(
            "{} ALTER COLUMN {} SET NOT NULL, \
             ALTER COLUMN {} ADD GENERATED BY DEFAULT AS IDENTITY, \
             ADD CONSTRAINT {} PRIMARY KEY ({})",
            self.alter(table),
            name,
            name,
            self.quote_identifier(key),
            name
        ))
    }

    fn rename_table(&self, from: &str, to: &str) -> String {
        format!("{} RENAME TO {}", self.alter(from), self.quote_identifier(to))
    }

    fn truncate(&self, table: &str) -> String {
        format!("TRUNCATE TABLE {}", self.quote_identifier(table))
    }

    fn drop_table(&self, table: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(table))
    }

    fn current_database(&self) -> CompiledQuery {
        CompiledQuery::new("SELECT current_database()::text AS name")
    }

    /// Tables visible through the session `search_path`. The connection
    /// already selects the database, so `database` is not consulted.
    fn list_tables(&self, _database: &str) -> CompiledQuery {
        CompiledQuery::new(
            "SELECT c.relname::text AS name FROM pg_catalog.pg_class c \
             JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
             WHERE c.relkind IN ('r', 'p') AND n.nspname = ANY(current_schemas(false)) \
             ORDER BY c.relname",
        )
    }

    fn list_columns(&self, _database: &str, table: &str) -> CompiledQuery {
        let mut params = ParamContext::new();
        let name = params.add_param(Value::from(table), self);
        params.finish(format!(
            "SELECT a.attname::text AS name, format_type(a.atttypid, a.atttypmod) AS type \
             FROM pg_catalog.pg_attribute a \
             WHERE a.attrelid = to_regclass({}) AND a.attnum > 0 AND NOT a.attisdropped \
             ORDER BY a.attnum",
            name
        ))
    }
}
