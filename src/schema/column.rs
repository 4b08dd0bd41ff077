//! Column definitions and key metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::error::QailError;

/// Logical column type. Each dialect maps it (with the size class) to a native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Double,
    /// Fixed-point number, uses `length` and `precision`
    Decimal,
    Boolean,
    Binary,
    Text,
    /// Variable-length string, uses `length`
    String,
    /// Fixed-length string, uses `length`
    Fixed,
    Time,
    Timestamp,
    Date,
    DateTime,
}

impl ColumnType {
    /// Get a human-readable name for error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Binary => "binary",
            Self::Text => "text",
            Self::String => "string",
            Self::Fixed => "fixed",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::DateTime => "datetime",
        }
    }
}

/// Storage size class for integer, float, text and binary columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Tiny,
    Small,
    #[default]
    Normal,
    Medium,
    Big,
}

impl FromStr for Size {
    type Err = QailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tiny" => Ok(Size::Tiny),
            "small" => Ok(Size::Small),
            "normal" => Ok(Size::Normal),
            "medium" => Ok(Size::Medium),
            "big" => Ok(Size::Big),
            other => Err(QailError::invalid(format!(
                "unknown size '{}', expected tiny, small, normal, medium or big",
                other
            ))),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Size::Tiny => "tiny",
            Size::Small => "small",
            Size::Normal => "normal",
            Size::Medium => "medium",
            Size::Big => "big",
        };
        f.write_str(s)
    }
}

/// Optional column properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProps {
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub unsigned: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub autoincrement: bool,
}

fn default_nullable() -> bool {
    true
}

impl Default for ColumnProps {
    fn default() -> Self {
        Self {
            size: None,
            length: None,
            precision: None,
            unsigned: false,
            nullable: true,
            default: None,
            description: None,
            autoincrement: false,
        }
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    #[serde(default)]
    pub props: ColumnProps,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            props: ColumnProps::default(),
        }
    }
}

/// ON DELETE / ON UPDATE action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    Restrict,
    Cascade,
    NoAction,
    SetNull,
}

impl ReferentialAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::SetNull => "SET NULL",
        }
    }
}

impl FromStr for ReferentialAction {
    type Err = QailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('_', " ");
        match normalized.as_str() {
            "RESTRICT" => Ok(ReferentialAction::Restrict),
            "CASCADE" => Ok(ReferentialAction::Cascade),
            "NO ACTION" => Ok(ReferentialAction::NoAction),
            "SET NULL" => Ok(ReferentialAction::SetNull),
            _ => Err(QailError::invalid(format!(
                "unknown referential action '{}', \
                 expected RESTRICT, CASCADE, NO ACTION or SET NULL",
                s
            ))),
        }
    }
}

/// Foreign key definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
    #[serde(default)]
    pub on_delete: Option<ReferentialAction>,
    #[serde(default)]
    pub on_update: Option<ReferentialAction>,
}

/// Kind of key a table can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyKind {
    Primary,
    Unique,
    Index,
    Foreign,
}

impl KeyKind {
    /// Suffix used in generated key names.
    pub const fn suffix(&self) -> &'static str {
        match self {
            KeyKind::Primary => "pk",
            KeyKind::Unique => "uk",
            KeyKind::Index => "ik",
            KeyKind::Foreign => "fk",
        }
    }
}

/// Named key over an ordered column list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDef {
    pub name: String,
    pub columns: Vec<String>,
}

/// `{table}_{pk|uk|ik|fk}_{columns joined by _}`
pub fn key_name(table: &str, kind: KeyKind, columns: &[String]) -> String {
    format!("{}_{}_{}", table, kind.suffix(), columns.join("_"))
}
