use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QailError;
use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    MySQL,
    SQLite,
    SqlServer,
}

impl Dialect {
    /// Every dialect, in a stable order.
    pub const ALL: [Dialect; 4] = [
        Dialect::MySQL,
        Dialect::Postgres,
        Dialect::SQLite,
        Dialect::SqlServer,
    ];

    pub fn generator(&self) -> &'static dyn SqlGenerator {
        match self {
            Dialect::Postgres => &PostgresGenerator,
            Dialect::MySQL => &MysqlGenerator,
            Dialect::SQLite => &SqliteGenerator,
            Dialect::SqlServer => &SqlServerGenerator,
        }
    }

    /// Derive the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Self, QailError> {
        let scheme = url.split(':').next().unwrap_or_default();
        scheme.parse().map_err(|_| {
            QailError::Config(format!(
                "cannot infer a dialect from database url scheme '{}'",
                scheme
            ))
        })
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::Postgres => "PostgreSQL",
            Dialect::MySQL => "MySQL",
            Dialect::SQLite => "SQLite",
            Dialect::SqlServer => "SQL Server",
        };
        f.write_str(name)
    }
}

impl FromStr for Dialect {
    type Err = QailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySQL),
            "sqlite" => Ok(Dialect::SQLite),
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            other => Err(QailError::invalid(format!(
                "unknown dialect '{}', expected mysql, postgres, sqlite or sqlserver",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        assert_eq!(Dialect::from_url("postgres://localhost/app").unwrap(), Dialect::Postgres);
        assert_eq!(Dialect::from_url("mysql://root@localhost/app").unwrap(), Dialect::MySQL);
        assert_eq!(Dialect::from_url("sqlite::memory:").unwrap(), Dialect::SQLite);
        assert!(matches!(
            Dialect::from_url("redis://localhost"),
            Err(QailError::Config(_))
        ));
    }

    #[test]
    fn test_generator_matches_dialect() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.generator().dialect(), dialect);
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Dialect::SqlServer).unwrap();
        assert_eq!(json, "\"sqlserver\"");
        let parsed: Dialect = serde_json::from_str("\"mysql\"").unwrap();
        assert_eq!(parsed, Dialect::MySQL);
    }
}
