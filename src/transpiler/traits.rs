//! Transpiler traits and utilities.

use crate::ast::{AggregateFunc, IntoTarget, Nulls, ScalarFunc, SortOrder};
use crate::error::QailResult;
use crate::schema::{ColumnDef, CreateTable, ForeignKeyDef, KeyDef, KeyKind};
use crate::transpiler::{CompiledQuery, Dialect, ParamContext};

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "left",
    "right",
    "inner",
    "outer",
    "full",
    "cross",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "create",
    "alter",
    "drop",
    "insert",
    "update",
    "delete",
    "into",
    "values",
    "set",
    "index",
    "key",
    "primary",
    "foreign",
    "references",
    "default",
    "constraint",
    "check",
    "desc",
    "asc",
    "by",
];

/// Whether a single identifier part must be quoted.
///
/// `fold_upper` marks engines that fold unquoted identifiers to lower case.
pub fn needs_quoting(name: &str, fold_upper: bool) -> bool {
    let lower = name.to_lowercase();
    name.is_empty()
        || RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_ascii_alphanumeric() && c != '_')
        || name.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false)
        || (fold_upper && name.chars().any(|c| c.is_ascii_uppercase()))
}

/// Quote an identifier with the given delimiters when it needs quoting.
/// Dotted names are handled per part; `*` is never quoted.
pub fn quote_with(name: &str, open: char, close: char, fold_upper: bool) -> String {
    name.split('.')
        .map(|part| {
            if part == "*" || !needs_quoting(part, fold_upper) {
                part.to_string()
            } else {
                let doubled = format!("{}{}", close, close);
                format!("{}{}{}", open, part.replace(close, &doubled), close)
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// `FUNC([DISTINCT ]args)` with `*` for an empty argument list.
pub fn aggregate_call(func: AggregateFunc, distinct: bool, args: &str) -> String {
    let args = if args.is_empty() { "*" } else { args };
    if distinct {
        format!("{}(DISTINCT {})", func, args)
    } else {
        format!("{}({})", func, args)
    }
}

/// Trait for dialect-specific SQL generation.
///
/// There are no provided methods: every dialect states every spelling.
pub trait SqlGenerator {
    fn dialect(&self) -> Dialect;

    /// Quote an identifier (table or column name) if needed.
    fn quote_identifier(&self, name: &str) -> String;
    /// Generate the parameter placeholder (e.g., $1, ?, @p1) for a given index.
    fn placeholder(&self, index: usize) -> String;
    /// Get the boolean literal (TRUE/FALSE vs 1/0).
    fn bool_literal(&self, val: bool) -> String;

    /// Text placed right after `SELECT [DISTINCT] ` (T-SQL `TOP`).
    fn select_prefix(&self, limit: Option<u64>, offset: Option<u64>) -> String;
    /// Trailing pagination clause with its leading space.
    /// `ordered` tells whether an ORDER BY clause was emitted.
    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>, ordered: bool) -> String;
    /// One ORDER BY item for an already quoted column.
    fn order_item(&self, column: &str, direction: SortOrder, nulls: Option<Nulls>) -> String;

    /// Scalar function over an already quoted column.
    fn scalar_function(&self, func: &ScalarFunc, column: &str, params: &mut ParamContext)
    -> String;
    /// Aggregate call over already quoted columns.
    fn aggregate(&self, func: AggregateFunc, distinct: bool, columns: &[String])
    -> QailResult<String>;
    /// `INTO ...` fragment of SELECT INTO.
    fn select_into(&self, target: &IntoTarget) -> QailResult<String>;
    /// Target list between DELETE and FROM for multi-table or joined deletes.
    fn delete_targets(&self, targets: &[String]) -> QailResult<String>;

    /// Native column type, including the size class and unsigned flag.
    fn column_type(&self, column: &ColumnDef) -> QailResult<String>;
    /// Keyword appended after the type of an auto-incrementing column.
    fn autoincrement_modifier(&self) -> &'static str;
    /// Whether the auto-increment spelling already declares the primary key.
    fn autoincrement_is_primary_key(&self) -> bool;
    /// Column comment inside the column definition.
    fn inline_comment(&self, description: &str) -> Option<String>;
    /// Column comment as a statement of its own.
    fn comment_statement(&self, table: &str, column: &str, description: &str) -> Option<String>;
    /// Whether plain indexes are declared inside CREATE TABLE.
    fn inline_indexes(&self) -> bool;
    /// Trailing CREATE TABLE options.
    fn table_options(&self, table: &CreateTable) -> String;

    fn add_column(&self, table: &str, definition: &str) -> QailResult<String>;
    /// New auto-incrementing column and its primary key in one statement.
    fn add_autoincrement_column(
        &self,
        table: &str,
        definition: &str,
        column: &str,
        key: &str,
    ) -> QailResult<String>;
    fn modify_column(&self, table: &str, column: &ColumnDef) -> QailResult<Vec<String>>;
    /// `existing_type` is the column's current native type when known.
    fn rename_column(
        &self,
        table: &str,
        from: &str,
        to: &str,
        existing_type: Option<&str>,
    ) -> QailResult<String>;
    fn drop_column(&self, table: &str, column: &str) -> QailResult<String>;
    fn add_key(&self, table: &str, kind: KeyKind, key: &KeyDef) -> QailResult<String>;
    fn add_foreign(&self, table: &str, foreign: &ForeignKeyDef) -> QailResult<String>;
    fn drop_key(&self, table: &str, kind: KeyKind, name: &str) -> QailResult<String>;
    /// `literal` is an inline SQL literal.
    fn set_default(&self, table: &str, column: &str, literal: &str) -> QailResult<String>;
    fn drop_default(&self, table: &str, column: &str) -> QailResult<String>;
    fn add_autoincrement(&self, table: &str, column: &ColumnDef, key: &str) -> QailResult<String>;

    fn rename_table(&self, from: &str, to: &str) -> String;
    fn truncate(&self, table: &str) -> String;
    fn drop_table(&self, table: &str) -> String;

    /// Query returning the current database as `name`.
    fn current_database(&self) -> CompiledQuery;
    /// Query returning table names as `name`.
    fn list_tables(&self, database: &str) -> CompiledQuery;
    /// Query returning `name` and `type` of every column of `table`.
    fn list_columns(&self, database: &str, table: &str) -> CompiledQuery;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_only_when_needed() {
        assert_eq!(quote_with("users", '"', '"', false), "users");
        assert_eq!(quote_with("order", '"', '"', false), "\"order\"");
        assert_eq!(quote_with("first name", '[', ']', false), "[first name]");
        assert_eq!(quote_with("1st", '`', '`', false), "`1st`");
    }

    #[test]
    fn test_quote_dotted_and_star() {
        assert_eq!(quote_with("u.*", '`', '`', false), "u.*");
        assert_eq!(quote_with("user.id", '`', '`', false), "`user`.id");
    }

    #[test]
    fn test_fold_upper() {
        assert_eq!(quote_with("userId", '"', '"', true), "\"userId\"");
        assert_eq!(quote_with("userId", '`', '`', false), "userId");
    }

    #[test]
    fn test_embedded_delimiter_is_doubled() {
        assert_eq!(quote_with("we\"ird", '"', '"', false), "\"we\"\"ird\"");
        assert_eq!(quote_with("a]b", '[', ']', false), "[a]]b]");
    }
}
