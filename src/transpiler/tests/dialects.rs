//! Per-dialect spelling: quoting, placeholders, pagination, functions.

use pretty_assertions::assert_eq;

use super::{select, statement};
use crate::ast::*;
use crate::error::QailError;
use crate::transpiler::*;

fn users_page() -> SqlStatement {
    statement(|q| {
        q.from("users")
            .columns(["id", "name"])
            .filter("age")
            .at_least(18)
            .filter("active")
            .is(true)
            .order_by("name")
            .limit(10);
    })
}

#[test]
fn test_postgres_numbered_placeholders() {
    let compiled = select(&users_page(), Dialect::Postgres);
    assert_eq!(
        compiled.sql,
        "SELECT id, name FROM users WHERE age >= $1 AND active = $2 ORDER BY name ASC LIMIT 10"
    );
}

#[test]
fn test_sqlserver_top() {
    let compiled = select(&users_page(), Dialect::SqlServer);
    assert_eq!(
        compiled.sql,
        "SELECT TOP (10) id, name FROM users WHERE age >= @p1 AND active = @p2 ORDER BY name ASC"
    );
    assert_eq!(compiled.params, vec![Value::Int(18), Value::Bool(true)]);
}

#[test]
fn test_sqlserver_offset_fetch() {
    let stmt = statement(|q| {
        q.from("users").limit(10).offset(20);
    });
    assert_eq!(
        select(&stmt, Dialect::SqlServer).sql,
        "SELECT * FROM users ORDER BY (SELECT 0) OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
    );

    let stmt = statement(|q| {
        q.from("users").order_by_desc("id").offset(20);
    });
    assert_eq!(
        select(&stmt, Dialect::SqlServer).sql,
        "SELECT * FROM users ORDER BY id DESC OFFSET 20 ROWS"
    );
}

#[test]
fn test_offset_without_limit() {
    let stmt = statement(|q| {
        q.from("users").offset(5);
    });
    assert_eq!(
        select(&stmt, Dialect::MySQL).sql,
        "SELECT * FROM users LIMIT 18446744073709551615 OFFSET 5"
    );
    assert_eq!(
        select(&stmt, Dialect::SQLite).sql,
        "SELECT * FROM users LIMIT -1 OFFSET 5"
    );
    assert_eq!(
        select(&stmt, Dialect::Postgres).sql,
        "SELECT * FROM users OFFSET 5"
    );
}

#[test]
fn test_identifier_quoting() {
    let stmt = statement(|q| {
        q.from("order").columns(["user", "createdAt", "weird col"]);
    });
    assert_eq!(
        select(&stmt, Dialect::MySQL).sql,
        "SELECT `user`, createdAt, `weird col` FROM `order`"
    );
    assert_eq!(
        select(&stmt, Dialect::Postgres).sql,
        "SELECT \"user\", \"createdAt\", \"weird col\" FROM \"order\""
    );
    assert_eq!(
        select(&stmt, Dialect::SQLite).sql,
        "SELECT \"user\", createdAt, \"weird col\" FROM \"order\""
    );
    assert_eq!(
        select(&stmt, Dialect::SqlServer).sql,
        "SELECT [user], createdAt, [weird col] FROM [order]"
    );
}

#[test]
fn test_nulls_ordering() {
    let mut stmt = statement(|q| {
        q.from("players");
    });
    stmt.order_by.push(OrderBy {
        column: "score".to_string(),
        direction: SortOrder::Desc,
        nulls: Some(Nulls::Last),
    });

    assert_eq!(
        select(&stmt, Dialect::Postgres).sql,
        "SELECT * FROM players ORDER BY score DESC NULLS LAST"
    );
    assert_eq!(
        select(&stmt, Dialect::SQLite).sql,
        "SELECT * FROM players ORDER BY score DESC NULLS LAST"
    );
    assert_eq!(
        select(&stmt, Dialect::MySQL).sql,
        "SELECT * FROM players ORDER BY score IS NULL ASC, score DESC"
    );
    assert_eq!(
        select(&stmt, Dialect::SqlServer).sql,
        "SELECT * FROM players ORDER BY CASE WHEN score IS NULL THEN 1 ELSE 0 END, score DESC"
    );
}

#[test]
fn test_scalar_functions() {
    let stmt = statement(|q| {
        q.from("people")
            .column_expr(|e| {
                e.ucase("name");
            })
            .column_expr(|e| {
                e.mid("name", 2, Some(3));
            })
            .column_expr(|e| {
                e.len("name");
            })
            .column_expr(|e| {
                e.now();
            });
    });

    assert_eq!(
        select(&stmt, Dialect::MySQL).sql,
        "SELECT UCASE(name), MID(name, 2, 3), LENGTH(name), NOW() FROM people"
    );
    assert_eq!(
        select(&stmt, Dialect::Postgres).sql,
        "SELECT UPPER(name), SUBSTRING(name FROM 2 FOR 3), LENGTH(name), NOW() FROM people"
    );
    assert_eq!(
        select(&stmt, Dialect::SQLite).sql,
        "SELECT UPPER(name), SUBSTR(name, 2, 3), LENGTH(name), datetime('now') FROM people"
    );
    assert_eq!(
        select(&stmt, Dialect::SqlServer).sql,
        "SELECT UPPER(name), SUBSTRING(name, 2, 3), LEN(name), GETDATE() FROM people"
    );
}

#[test]
fn test_round_and_format() {
    let stmt = statement(|q| {
        q.from("prices")
            .column_expr(|e| {
                e.round("amount", 2);
            })
            .column_expr(|e| {
                e.format("amount", "FM999.00");
            });
    });

    let pg = select(&stmt, Dialect::Postgres);
    assert_eq!(
        pg.sql,
        "SELECT ROUND(CAST(amount AS NUMERIC), 2), to_char(amount, $1) FROM prices"
    );
    assert_eq!(pg.params, vec![Value::String("FM999.00".to_string())]);

    assert_eq!(
        select(&stmt, Dialect::SQLite).sql,
        "SELECT ROUND(amount, 2), printf(?, amount) FROM prices"
    );
    assert_eq!(
        select(&stmt, Dialect::SqlServer).sql,
        "SELECT ROUND(amount, 2), FORMAT(amount, @p1) FROM prices"
    );
}

#[test]
fn test_sqlserver_mid_without_length() {
    let stmt = statement(|q| {
        q.from("people").column_expr(|e| {
            e.mid("name", 3, None);
        });
    });
    assert_eq!(
        select(&stmt, Dialect::SqlServer).sql,
        "SELECT SUBSTRING(name, 3, LEN(name)) FROM people"
    );
}

#[test]
fn test_select_into() {
    let mut stmt = statement(|q| {
        q.from("users");
    });
    stmt.into = Some(IntoTarget {
        table: "users_copy".to_string(),
        database: Some("archive".to_string()),
    });

    assert_eq!(
        select(&stmt, Dialect::SqlServer).sql,
        "SELECT * INTO archive..users_copy FROM users"
    );
    assert!(matches!(
        compile_select(&stmt, Dialect::Postgres),
        Err(QailError::Unsupported { .. })
    ));
    assert!(matches!(
        compile_select(&stmt, Dialect::MySQL),
        Err(QailError::Unsupported { .. })
    ));

    stmt.into = Some(IntoTarget {
        table: "users_copy".to_string(),
        database: None,
    });
    assert_eq!(
        select(&stmt, Dialect::Postgres).sql,
        "SELECT * INTO users_copy FROM users"
    );
    assert!(matches!(
        compile_select(&stmt, Dialect::SQLite),
        Err(QailError::Unsupported { .. })
    ));
}

#[test]
fn test_joined_delete() {
    let stmt = DeleteStatement {
        statement: statement(|q| {
            q.from("users")
                .join("bans", |j| {
                    j.on("users.id", "bans.user_id");
                })
                .filter("bans.permanent")
                .is(true);
        }),
        targets: Vec::new(),
    };

    assert_eq!(
        compile_delete(&stmt, Dialect::MySQL).unwrap().sql,
        "DELETE users FROM users INNER JOIN bans ON users.id = bans.user_id WHERE bans.permanent = ?"
    );
    assert_eq!(
        compile_delete(&stmt, Dialect::SqlServer).unwrap().sql,
        "DELETE users FROM users INNER JOIN bans ON users.id = bans.user_id WHERE bans.permanent = @p1"
    );
    for dialect in [Dialect::Postgres, Dialect::SQLite] {
        assert!(matches!(
            compile_delete(&stmt, dialect),
            Err(QailError::Unsupported { .. })
        ));
    }
}

#[test]
fn test_delete_several_targets() {
    let stmt = DeleteStatement {
        statement: statement(|q| {
            q.from("users").join("bans", |j| {
                j.on("users.id", "bans.user_id");
            });
        }),
        targets: vec!["users".to_string(), "bans".to_string()],
    };
    assert_eq!(
        compile_delete(&stmt, Dialect::MySQL).unwrap().sql,
        "DELETE users, bans FROM users INNER JOIN bans ON users.id = bans.user_id"
    );
    assert!(matches!(
        compile_delete(&stmt, Dialect::SqlServer),
        Err(QailError::Unsupported { .. })
    ));
}

#[test]
fn test_introspection_aliases() {
    for dialect in [Dialect::MySQL, Dialect::Postgres, Dialect::SqlServer] {
        let generator = dialect.generator();
        assert!(generator.current_database().sql.ends_with("AS name"));
        assert!(generator.list_tables("app").sql.contains(" AS name FROM"));
        let columns = generator.list_columns("app", "users");
        assert!(columns.sql.contains(" AS type FROM"), "{}: {}", dialect, columns.sql);
    }

    // pragma columns are already called name and type
    let sqlite = Dialect::SQLite.generator();
    assert_eq!(
        sqlite.list_columns("main", "users").sql,
        "SELECT name, type FROM pragma_table_info(?) ORDER BY cid"
    );
}

#[test]
fn test_introspection_binds_names() {
    let mysql = Dialect::MySQL.generator().list_columns("app", "users");
    assert_eq!(
        mysql.params,
        vec![Value::String("app".to_string()), Value::String("users".to_string())]
    );

    let pg = Dialect::Postgres.generator().list_columns("app", "users");
    assert_eq!(pg.params, vec![Value::String("users".to_string())]);
    assert!(pg.sql.contains("to_regclass($1)"));
}

#[test]
fn test_table_statements() {
    assert_eq!(compile_truncate("logs", Dialect::SQLite).sql, "DELETE FROM logs");
    assert_eq!(compile_truncate("logs", Dialect::MySQL).sql, "TRUNCATE TABLE logs");
    assert_eq!(
        compile_rename_table("logs", "old_logs", Dialect::MySQL).sql,
        "RENAME TABLE logs TO old_logs"
    );
    assert_eq!(
        compile_rename_table("logs", "old_logs", Dialect::Postgres).sql,
        "ALTER TABLE logs RENAME TO old_logs"
    );
    assert_eq!(
        compile_rename_table("logs", "old_logs", Dialect::SqlServer).sql,
        "EXEC sp_rename 'logs', 'old_logs'"
    );
    assert_eq!(compile_drop("user", Dialect::SqlServer).sql, "DROP TABLE [user]");
}
