//! DDL generation: CREATE TABLE fan-out and ALTER TABLE operations.

use crate::ast::Value;
use crate::error::{QailError, QailResult};
use crate::schema::*;
use crate::transpiler::ColumnTypes;
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::SqlGenerator;

/// Generate CREATE TABLE SQL followed by the statements it fans out to
/// (separate indexes, column comments).
pub fn build_create_table(
    table: &CreateTable,
    generator: &dyn SqlGenerator,
) -> QailResult<Vec<String>> {
    if table.columns.is_empty() {
        return Err(QailError::invalid(format!(
            "table '{}' must declare at least one column",
            table.name
        )));
    }

    let mut defs = Vec::new();
    for column in &table.columns {
        defs.push(format!("    {}", column_definition(column, generator)?));
    }

    let inline_primary = generator.autoincrement_is_primary_key();
    if inline_primary {
        // The autoincrement spelling declares the key, so it must be the only key column.
        for column in table.columns.iter().filter(|c| c.props.autoincrement) {
            let sole_key = table
                .primary_key
                .as_ref()
                .is_some_and(|pk| pk.columns.len() == 1 && pk.columns[0] == column.name);
            if !sole_key {
                return Err(QailError::unsupported(
                    generator.dialect(),
                    format!(
                        "autoincrement column '{}' that is not the sole primary key column",
                        column.name
                    ),
                ));
            }
        }
    }

    if let Some(pk) = &table.primary_key {
        let declared_inline = inline_primary
            && pk.columns.len() == 1
            && table
                .columns
                .iter()
                .any(|c| c.props.autoincrement && c.name == pk.columns[0]);
        if !declared_inline {
            defs.push(format!(
                "    CONSTRAINT {} PRIMARY KEY ({})",
                generator.quote_identifier(&pk.name),
                column_list(&pk.columns, generator)
            ));
        }
    }

    for key in &table.unique_keys {
        defs.push(format!(
            "    CONSTRAINT {} UNIQUE ({})",
            generator.quote_identifier(&key.name),
            column_list(&key.columns, generator)
        ));
    }

    if generator.inline_indexes() {
        for key in &table.indexes {
            defs.push(format!(
                "    INDEX {} ({})",
                generator.quote_identifier(&key.name),
                column_list(&key.columns, generator)
            ));
        }
    }

    for fk in &table.foreign_keys {
        defs.push(format!("    {}", foreign_key_clause(fk, generator)?));
    }

    let mut sql = String::new();
    sql.push_str("CREATE TABLE ");
    sql.push_str(&generator.quote_identifier(&table.name));
    sql.push_str(" (\n");
    sql.push_str(&defs.join(",\n"));
    sql.push_str("\n)");
    sql.push_str(&generator.table_options(table));

    let mut statements = vec![sql];

    if !generator.inline_indexes() {
        for key in &table.indexes {
            statements.push(create_index(&table.name, key, false, generator));
        }
    }

    for column in &table.columns {
        if let Some(text) = &column.props.description {
            if let Some(comment) = generator.comment_statement(&table.name, &column.name, text) {
                statements.push(comment);
            }
        }
    }

    Ok(statements)
}

/// Generate one statement per ALTER TABLE operation, in declaration order.
///
/// `existing` maps column names to their current native type.
pub fn build_alter_table(
    alter: &AlterTable,
    generator: &dyn SqlGenerator,
    existing: &ColumnTypes,
) -> QailResult<Vec<String>> {
    let table = alter.name.as_str();
    let mut statements = Vec::new();

    for op in &alter.operations {
        match op {
            AlterOp::AddColumn(column) => {
                let definition = column_definition(column, generator)?;
                statements.push(generator.add_column(table, &definition)?);
                push_comment(&mut statements, table, column, generator);
            }
            AlterOp::AddAutoincrement { column, key } => {
                let definition = column_definition(column, generator)?;
                statements.push(generator.add_autoincrement_column(
                    table,
                    &definition,
                    &column.name,
                    key,
                )?);
                push_comment(&mut statements, table, column, generator);
            }
            AlterOp::ModifyColumn(column) => {
                statements.extend(generator.modify_column(table, column)?);
                push_comment(&mut statements, table, column, generator);
            }
            AlterOp::RenameColumn { from, to } => {
                let current = existing.get(from).map(String::as_str);
                statements.push(generator.rename_column(table, from, to, current)?);
            }
            AlterOp::DropColumn(column) => {
                statements.push(generator.drop_column(table, column)?);
            }
            AlterOp::AddKey { kind, key } => {
                statements.push(generator.add_key(table, *kind, key)?);
            }
            AlterOp::AddForeign(fk) => {
                statements.push(generator.add_foreign(table, fk)?);
            }
            AlterOp::DropKey { kind, name } => {
                statements.push(generator.drop_key(table, *kind, name)?);
            }
            AlterOp::SetDefault { column, value } => {
                let literal = default_literal(value, generator);
                statements.push(generator.set_default(table, column, &literal)?);
            }
            AlterOp::DropDefault(column) => {
                statements.push(generator.drop_default(table, column)?);
            }
            AlterOp::Autoincrement { column, key } => {
                if column.column_type != ColumnType::Integer {
                    return Err(QailError::invalid(format!(
                        "autoincrement requires an integer column, '{}' is {}",
                        column.name,
                        column.column_type.name()
                    )));
                }
                statements.push(generator.add_autoincrement(table, column, key)?);
            }
        }
    }

    Ok(statements)
}

fn push_comment(
    statements: &mut Vec<String>,
    table: &str,
    column: &ColumnDef,
    generator: &dyn SqlGenerator,
) {
    if let Some(text) = &column.props.description {
        if let Some(comment) = generator.comment_statement(table, &column.name, text) {
            statements.push(comment);
        }
    }
}

/// `name TYPE [modifier] [NOT NULL] [DEFAULT literal] [COMMENT ...]`
pub fn column_definition(column: &ColumnDef, generator: &dyn SqlGenerator) -> QailResult<String> {
    if column.props.autoincrement && column.column_type != ColumnType::Integer {
        return Err(QailError::invalid(format!(
            "autoincrement requires an integer column, '{}' is {}",
            column.name,
            column.column_type.name()
        )));
    }

    let mut line = format!(
        "{} {}",
        generator.quote_identifier(&column.name),
        generator.column_type(column)?
    );

    if column.props.autoincrement {
        let modifier = generator.autoincrement_modifier();
        if !modifier.is_empty() {
            line.push(' ');
            line.push_str(modifier);
        }
    }

    if !column.props.nullable {
        line.push_str(" NOT NULL");
    }

    if let Some(value) = &column.props.default {
        line.push_str(" DEFAULT ");
        line.push_str(&default_literal(value, generator));
    }

    if let Some(text) = &column.props.description {
        if let Some(comment) = generator.inline_comment(text) {
            line.push_str(&comment);
        }
    }

    Ok(line)
}

/// Inline literal for a DDL default.
pub fn default_literal(value: &Value, generator: &dyn SqlGenerator) -> String {
    value.to_literal(|b| generator.bool_literal(b))
}

/// Quoted, comma-separated column list.
pub fn column_list(columns: &[String], generator: &dyn SqlGenerator) -> String {
    columns
        .iter()
        .map(|c| generator.quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `CONSTRAINT name FOREIGN KEY (cols) REFERENCES t (cols) [ON DELETE ..] [ON UPDATE ..]`
pub fn foreign_key_clause(fk: &ForeignKeyDef, generator: &dyn SqlGenerator) -> QailResult<String> {
    let key = &fk.key;
    if key.ref_table.is_empty() || key.ref_columns.is_empty() {
        return Err(QailError::invalid(format!(
            "foreign key '{}' does not reference a table",
            fk.name
        )));
    }
    if key.ref_columns.len() != key.columns.len() {
        return Err(QailError::invalid(format!(
            "foreign key '{}' maps {} columns onto {}",
            fk.name,
            key.columns.len(),
            key.ref_columns.len()
        )));
    }

    let mut sql = format!(
        "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        generator.quote_identifier(&fk.name),
        column_list(&key.columns, generator),
        generator.quote_identifier(&key.ref_table),
        column_list(&key.ref_columns, generator)
    );
    if let Some(action) = key.on_delete {
        sql.push_str(" ON DELETE ");
        sql.push_str(action.as_sql());
    }
    if let Some(action) = key.on_update {
        sql.push_str(" ON UPDATE ");
        sql.push_str(action.as_sql());
    }
    Ok(sql)
}

/// `CREATE [UNIQUE] INDEX name ON table (cols)`
pub fn create_index(
    table: &str,
    key: &KeyDef,
    unique: bool,
    generator: &dyn SqlGenerator,
) -> String {
    format!(
        "CREATE {}INDEX {} ON {} ({})",
        if unique { "UNIQUE " } else { "" },
        generator.quote_identifier(&key.name),
        generator.quote_identifier(table),
        column_list(&key.columns, generator)
    )
}

/// Size class, `Normal` when unset.
pub fn size_of(column: &ColumnDef) -> Size {
    column.props.size.unwrap_or_default()
}

/// Reject any size class other than `Normal`.
pub fn require_normal_size(dialect: Dialect, column: &ColumnDef) -> QailResult<()> {
    match size_of(column) {
        Size::Normal => Ok(()),
        _ => Err(unsupported_size(dialect, column)),
    }
}

pub fn unsupported_size(dialect: Dialect, column: &ColumnDef) -> QailError {
    QailError::unsupported(
        dialect,
        format!(
            "size '{}' on {} column '{}'",
            size_of(column),
            column.column_type.name(),
            column.name
        ),
    )
}

/// Declared length, 255 when unset.
pub fn length_or_default(column: &ColumnDef) -> u32 {
    column.props.length.unwrap_or(255)
}

/// `DECIMAL`, `DECIMAL(l)` or `DECIMAL(l,p)`.
pub fn decimal_type(column: &ColumnDef) -> String {
    match (column.props.length, column.props.precision) {
        (Some(length), Some(precision)) => format!("DECIMAL({},{})", length, precision),
        (Some(length), None) => format!("DECIMAL({})", length),
        _ => "DECIMAL".to_string(),
    }
}
