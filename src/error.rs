//! Error types for qail-sql.

use thiserror::Error;

use crate::transpiler::Dialect;

/// The main error type for building, compiling and executing statements.
#[derive(Debug, Error)]
pub enum QailError {
    /// A builder received arguments that cannot form a valid statement.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The target dialect has no spelling for the requested feature.
    #[error("{feature} is not supported by {dialect}")]
    Unsupported {
        dialect: Dialect,
        feature: String,
    },

    /// A rename needs the column's current type and none was found.
    #[error("Cannot resolve the type of column '{column}' in table '{table}'")]
    MissingColumnType { table: String, column: String },

    /// Error raised by the database driver, passed through untouched.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl QailError {
    /// Create an invalid argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a capability-gap error for `dialect`.
    pub fn unsupported(dialect: Dialect, feature: impl Into<String>) -> Self {
        Self::Unsupported {
            dialect,
            feature: feature.into(),
        }
    }
}

/// Result type alias for qail-sql operations.
pub type QailResult<T> = Result<T, QailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QailError::invalid("insert requires at least one column");
        assert_eq!(
            err.to_string(),
            "Invalid argument: insert requires at least one column"
        );
    }

    #[test]
    fn test_unsupported_display() {
        let err = QailError::unsupported(Dialect::SQLite, "SELECT INTO");
        assert_eq!(err.to_string(), "SELECT INTO is not supported by SQLite");
    }
}
