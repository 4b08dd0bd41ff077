use crate::ast::{AggregateFunc, IntoTarget, Nulls, ScalarFunc, SortOrder, Value, quote_string};
use crate::error::{QailError, QailResult};
use crate::schema::{ColumnDef, ColumnType, CreateTable, ForeignKeyDef, KeyDef, KeyKind, Size};
use crate::transpiler::ddl::{
    column_list, create_index, decimal_type, default_literal, foreign_key_clause,
    length_or_default, require_normal_size, size_of, unsupported_size,
};
use crate::transpiler::traits::{SqlGenerator, aggregate_call, quote_with};
use crate::transpiler::{CompiledQuery, Dialect, ParamContext};

/// SQL Server (T-SQL) Generator.
pub struct SqlServerGenerator;

impl SqlServerGenerator {
    fn alter(&self, table: &str) -> String {
        format!("ALTER TABLE {}", self.quote_identifier(table))
    }

    /// Defaults are named constraints: `DF_{table}_{column}`.
    fn default_constraint(&self, table: &str, column: &str) -> String {
        self.quote_identifier(&format!("DF_{}_{}", table, column))
    }

    fn unicode_literal(&self, s: &str) -> String {
        format!("N{}", quote_string(s))
    }
}

impl SqlGenerator for SqlServerGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '[', ']', false)
    }

    fn placeholder(&self, index: usize) -> String {
        format!("@p{}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn select_prefix(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (Some(n), None) => format!("TOP ({}) ", n),
            _ => String::new(),
        }
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>, ordered: bool) -> String {
        // Without an offset the limit is already spelled as TOP.
        let Some(off) = offset else {
            return String::new();
        };
        let mut sql = String::new();
        if !ordered {
            sql.push_str(" ORDER BY (SELECT 0)");
        }
        sql.push_str(&format!(" OFFSET {} ROWS", off));
        if let Some(lim) = limit {
            sql.push_str(&format!(" FETCH NEXT {} ROWS ONLY", lim));
        }
        sql
    }

    fn order_item(&self, column: &str, direction: SortOrder, nulls: Option<Nulls>) -> String {
        match nulls {
            Some(Nulls::First) => format!(
                "CASE WHEN {} IS NULL THEN 0 ELSE 1 END, {} {}",
                column, column, direction
            ),
            Some(Nulls::Last) => format!(
                "CASE WHEN {} IS NULL THEN 1 ELSE 0 END, {} {}",
                column, column, direction
            ),
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
                Some(length) => format!("SUBSTRING({}, {}, {})", column, start, length),
                None => format!("SUBSTRING({}, {}, LEN({}))", column, start, column),
            },
            ScalarFunc::Length => format!("LEN({})", column),
            ScalarFunc::Round { decimals } => format!("ROUND({}, {})", column, decimals),
            ScalarFunc::Format { pattern } => {
                let ph = params.add_param(Value::String(pattern.clone()), self);
                format!("FORMAT({}, {})", column, ph)
            }
            ScalarFunc::Now => "GETDATE()".to_string(),
        }
    }

    fn aggregate(
        &self,
        func: AggregateFunc,
        distinct: bool,
        columns: &[String],
    ) -> QailResult<String> {
        if distinct && columns.len() > 1 {
            return Err(QailError::unsupported(
                Dialect::SqlServer,
                "DISTINCT aggregate over several columns",
            ));
        }
        Ok(aggregate_call(func, distinct, &columns.join(", ")))
    }

    fn select_into(&self, target: &IntoTarget) -> QailResult<String> {
        match &target.database {
            // db..table resolves the table in the database's default schema
            Some(db) => Ok(format!(
                "INTO {}..{}",
                self.quote_identifier(db),
                self.quote_identifier(&target.table)
            )),
            None => Ok(format!("INTO {}", self.quote_identifier(&target.table))),
        }
    }

    fn delete_targets(&self, targets: &[String]) -> QailResult<String> {
        match targets {
            [target] => Ok(self.quote_identifier(target)),
            _ => Err(QailError::unsupported(
                Dialect::SqlServer,
                "DELETE from more than one table",
            )),
        }
    }

    fn column_type(&self, column: &ColumnDef) -> QailResult<String> {
        let size = size_of(column);
        let ty = match column.column_type {
            ColumnType::Integer => match size {
                Size::Tiny => "TINYINT",
                Size::Small => "SMALLINT",
                Size::Medium | Size::Normal => "INTEGER",
                Size::Big => "BIGINT",
            }
            .to_string(),
            ColumnType::Float => match size {
                Size::Small => "REAL",
                Size::Normal | Size::Big => "FLOAT",
                _ => return Err(unsupported_size(Dialect::SqlServer, column)),
            }
            .to_string(),
            ColumnType::Double => {
                require_normal_size(Dialect::SqlServer, column)?;
                "FLOAT".to_string()
            }
            ColumnType::Decimal => {
                require_normal_size(Dialect::SqlServer, column)?;
                decimal_type(column)
            }
            ColumnType::Boolean => {
                require_normal_size(Dialect::SqlServer, column)?;
                "BIT".to_string()
            }
            ColumnType::Text => match size {
                Size::Tiny | Size::Small => "NVARCHAR(255)",
                Size::Normal | Size::Medium | Size::Big => "NVARCHAR(MAX)",
            }
            .to_string(),
            ColumnType::Binary => match size {
                Size::Tiny | Size::Small => "VARBINARY(255)",
                Size::Normal | Size::Medium | Size::Big => "VARBINARY(MAX)",
            }
            .to_string(),
            ColumnType::String => {
                require_normal_size(Dialect::SqlServer, column)?;
                format!("NVARCHAR({})", length_or_default(column))
            }
            ColumnType::Fixed => {
                require_normal_size(Dialect::SqlServer, column)?;
                format!("NCHAR({})", length_or_default(column))
            }
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Timestamp | ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Date => "DATE".to_string(),
        };
        Ok(ty)
    }

    fn autoincrement_modifier(&self) -> &'static str {
        "IDENTITY"
    }

    fn autoincrement_is_primary_key(&self) -> bool {
        false
    }

    fn inline_comment(&self, _description: &str) -> Option<String> {
        None
    }

    fn comment_statement(&self, table: &str, column: &str, description: &str) -> Option<String> {
        Some(format!(
            "EXEC sp_addextendedproperty @name = N'MS_Description', @value = {}, \
             @level0type = N'SCHEMA', @level0name = N'dbo', \
             @level1type = N'TABLE', @level1name = {}, \
             @level2type = N'COLUMN', @level2name = {}",
            self.unicode_literal(description),
            self.unicode_literal(table),
            self.unicode_literal(column)
        ))
    }

    fn inline_indexes(&self) -> bool {
        false
    }

    fn table_options(&self, _table: &CreateTable) -> String {
        String::new()
    }

    fn add_column(&self, table: &str, definition: &str) -> QailResult<String> {
        Ok(format!("{} ADD {}", self.alter(table), definition))
    }

    fn add_autoincrement_column(
        &self,
        table: &str,
        definition: &str,
        column: &str,
        key: &str,
    ) -> QailResult<String> {
        Ok(format!(
            "{} ADD {}, CONSTRAINT {} PRIMARY KEY ({})",
            self.alter(table),
            definition,
            self.quote_identifier(key),
            self.quote_identifier(column)
        ))
    }

    fn modify_column(&self, table: &str, column: &ColumnDef) -> QailResult<Vec<String>> {
        if column.props.autoincrement {
            return Err(QailError::unsupported(
                Dialect::SqlServer,
                "adding IDENTITY to an existing column",
            ));
        }
        let mut statements = vec![format!(
            "{} ALTER COLUMN {} {} {}",
            self.alter(table),
            self.quote_identifier(&column.name),
            self.column_type(column)?,
            if column.props.nullable { "NULL" } else { "NOT NULL" }
        )];
        if let Some(value) = &column.props.default {
            statements.push(self.set_default(table, &column.name, &default_literal(value, self))?);
        }
        Ok(statements)
    }

    fn rename_column(
        &self,
        table: &str,
        from: &str,
        to: &str,
        _existing_type: Option<&str>,
    ) -> QailResult<String> {
        Ok(format!(
            "EXEC sp_rename {}, {}, 'COLUMN'",
            quote_string(&format!("{}.{}", table, from)),
            quote_string(to)
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
            KeyKind::Index => format!("DROP INDEX {} ON {}", name, self.quote_identifier(table)),
            KeyKind::Primary | KeyKind::Unique | KeyKind::Foreign => {
                format!("{} DROP CONSTRAINT {}", self.alter(table), name)
            }
        })
    }

    fn set_default(&self, table: &str, column: &str, literal: &str) -> QailResult<String> {
        Ok(format!(
            "{} ADD CONSTRAINT {} DEFAULT {} FOR {}",
            self.alter(table),
            self.default_constraint(table, column),
            literal,
            self.quote_identifier(column)
        ))
    }

    fn drop_default(&self, table: &str, column: &str) -> QailResult<String> {
        Ok(format!(
            "{} DROP CONSTRAINT {}",
            self.alter(table),
            self.default_constraint(table, column)
        ))
    }

    fn add_autoincrement(
        &self,
        _table: &str,
        _column: &ColumnDef,
        _key: &str,
    ) -> QailResult<String> {
        Err(QailError::unsupported(
            Dialect::SqlServer,
            "adding IDENTITY to an existing column",
        ))
    }

    fn rename_table(&self, from: &str, to: &str) -> String {
        format!("EXEC sp_rename {}, {}", quote_string(from), quote_string(to))
    }

    fn truncate(&self, table: &str) -> String {
        format!("TRUNCATE TABLE {}", self.quote_identifier(table))
    }

    fn drop_table(&self, table: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(table))
    }

    fn current_database(&self) -> CompiledQuery {
        CompiledQuery::new("SELECT DB_NAME() AS name")
    }

    fn list_tables(&self, database: &str) -> CompiledQuery {
        let mut params = ParamContext::new();
        let catalog = params.add_param(Value::from(database), self);
        params.finish(format!(
            "SELECT table_name AS name FROM information_schema.tables \
             WHERE table_catalog = {} AND table_type = 'BASE TABLE' ORDER BY table_name",
            catalog
        ))
    }

    fn list_columns(&self, database: &str, table: &str) -> CompiledQuery {
        let mut params = ParamContext::new();
        let catalog = params.add_param(Value::from(database), self);
        let name = params.add_param(Value::from(table), self);
        params.finish(format!(
            "SELECT column_name AS name, data_type AS type FROM information_schema.columns \
             WHERE table_catalog = {} AND table_name = {} ORDER BY ordinal_position",
            catalog, name
        ))
    }
}
