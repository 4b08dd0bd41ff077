//! Core DML tests: conditions, parameter order, grouping, aggregates.

use pretty_assertions::assert_eq;

use super::{select, statement};
use crate::ast::*;
use crate::error::QailError;
use crate::transpiler::*;

#[test]
fn test_end_to_end_select() {
    let stmt = statement(|q| {
        q.from("users")
            .columns(["id", "name"])
            .filter("age")
            .at_least(18)
            .filter("active")
            .is(true)
            .order_by("name")
            .limit(10);
    });

    let compiled = select(&stmt, Dialect::MySQL);
    assert_eq!(
        compiled.sql,
        "SELECT id, name FROM users WHERE age >= ? AND active = ? ORDER BY name ASC LIMIT 10"
    );
    assert_eq!(compiled.params, vec![Value::Int(18), Value::Bool(true)]);

    let compiled = select(&stmt, Dialect::SQLite);
    assert_eq!(
        compiled.sql,
        "SELECT id, name FROM users WHERE age >= ? AND active = ? ORDER BY name ASC LIMIT 10"
    );
    assert_eq!(compiled.params, vec![Value::Int(18), Value::Bool(true)]);
}

#[test]
fn test_compilation_is_deterministic() {
    let stmt = statement(|q| {
        q.from("users").filter("id").is_in([1, 2, 3]);
    });
    assert_eq!(select(&stmt, Dialect::Postgres), select(&stmt, Dialect::Postgres));
}

#[test]
fn test_filter_group() {
    let stmt = statement(|q| {
        q.from("t").filter("col1").is(1).filter_group(|g| {
            g.filter("col2").is(2).or_filter("col3").is(3);
        });
    });
    let compiled = select(&stmt, Dialect::MySQL);
    assert_eq!(
        compiled.sql,
        "SELECT * FROM t WHERE col1 = ? AND (col2 = ? OR col3 = ?)"
    );
    assert_eq!(
        compiled.params,
        vec![Value::Int(1), Value::Int(2), Value::Int(3)]
    );
}

#[test]
fn test_empty_group_is_skipped() {
    let stmt = statement(|q| {
        q.from("t").filter("a").is(1).or_filter_group(|_| {});
    });
    assert_eq!(select(&stmt, Dialect::MySQL).sql, "SELECT * FROM t WHERE a = ?");
}

#[test]
fn test_operators() {
    let stmt = statement(|q| {
        q.from("products")
            .filter("price")
            .between(10, 20)
            .filter("name")
            .like("A%")
            .filter("deleted_at")
            .is_null()
            .or_filter("stock")
            .not_in([0])
            .filter("sku")
            .is_not_column("legacy_sku");
    });
    let compiled = select(&stmt, Dialect::Postgres);
    assert_eq!(
        compiled.sql,
        "SELECT * FROM products WHERE price BETWEEN $1 AND $2 AND name LIKE $3 \
         AND deleted_at IS NULL OR stock NOT IN ($4) AND sku != legacy_sku"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::Int(10),
            Value::Int(20),
            Value::String("A%".to_string()),
            Value::Int(0)
        ]
    );
}

#[test]
fn test_empty_in_list() {
    let stmt = statement(|q| {
        q.from("users").filter("id").is_in(Vec::<i64>::new());
    });
    let compiled = select(&stmt, Dialect::MySQL);
    assert_eq!(compiled.sql, "SELECT * FROM users WHERE 1 = 0");
    assert!(compiled.params.is_empty());

    let stmt = statement(|q| {
        q.from("users").filter("id").not_in(Vec::<i64>::new());
    });
    assert_eq!(select(&stmt, Dialect::MySQL).sql, "SELECT * FROM users WHERE 1 = 1");
}

#[test]
fn test_empty_in_list_binds_no_operand_params() {
    let stmt = statement(|q| {
        q.from("t")
            .filter_expr(|e| {
                e.column("a").op("+").value(5);
            })
            .is_in(Vec::<i64>::new())
            .filter("b")
            .is(7);
    });

    let compiled = select(&stmt, Dialect::MySQL);
    assert_eq!(compiled.sql, "SELECT * FROM t WHERE 1 = 0 AND b = ?");
    assert_eq!(compiled.params, vec![Value::Int(7)]);

    let compiled = select(&stmt, Dialect::Postgres);
    assert_eq!(compiled.sql, "SELECT * FROM t WHERE 1 = 0 AND b = $1");
    assert_eq!(compiled.params, vec![Value::Int(7)]);

    let stmt = statement(|q| {
        q.from("t")
            .filter_expr(|e| {
                e.column("a").op("+").value(5);
            })
            .not_in(Vec::<i64>::new())
            .filter("b")
            .is(7);
    });
    let compiled = select(&stmt, Dialect::SqlServer);
    assert_eq!(compiled.sql, "SELECT * FROM t WHERE 1 = 1 AND b = @p1");
    assert_eq!(compiled.params, vec![Value::Int(7)]);
}

#[test]
fn test_subquery_params_follow_placeholder_order() {
    let stmt = statement(|q| {
        q.from("users")
            .filter("id")
            .in_subquery(|s| {
                s.from("orders").columns(["user_id"]).filter("total").gt(100);
            })
            .filter("active")
            .is(true);
    });
    let compiled = select(&stmt, Dialect::Postgres);
    assert_eq!(
        compiled.sql,
        "SELECT * FROM users WHERE id IN (SELECT user_id FROM orders WHERE total > $1) AND active = $2"
    );
    assert_eq!(compiled.params, vec![Value::Int(100), Value::Bool(true)]);
}

#[test]
fn test_exists() {
    let stmt = statement(|q| {
        q.from("users").filter_not_exists(|s| {
            s.from("bans").filter("bans.user_id").is_column("users.id");
        });
    });
    assert_eq!(
        select(&stmt, Dialect::MySQL).sql,
        "SELECT * FROM users WHERE NOT EXISTS (SELECT * FROM bans WHERE bans.user_id = users.id)"
    );
}

#[test]
fn test_expression_operand_and_column() {
    let stmt = statement(|q| {
        q.from("items")
            .column_expr(|e| {
                e.column("price").op("*").group(|g| {
                    g.value(1).op("-").column("discount");
                });
            })
            .filter_expr(|e| {
                e.column("price").op("*").column("qty");
            })
            .gt(50);
    });
    let compiled = select(&stmt, Dialect::SQLite);
    assert_eq!(
        compiled.sql,
        "SELECT price * (? - discount) FROM items WHERE price * qty > ?"
    );
    assert_eq!(compiled.params, vec![Value::Int(1), Value::Int(50)]);
}

#[test]
fn test_having_aggregate() {
    let stmt = statement(|q| {
        q.from("orders")
            .columns(["status"])
            .group_by(["status"])
            .having("id")
            .count()
            .gt(5)
            .or_having("customer_id")
            .distinct()
            .count()
            .at_least(2);
    });
    let compiled = select(&stmt, Dialect::MySQL);
    assert_eq!(
        compiled.sql,
        "SELECT status FROM orders GROUP BY status \
         HAVING COUNT(id) > ? OR COUNT(DISTINCT customer_id) >= ?"
    );
    assert_eq!(compiled.params, vec![Value::Int(5), Value::Int(2)]);
}

#[test]
fn test_having_params_after_where_params() {
    let stmt = statement(|q| {
        q.from("orders")
            .filter("region")
            .is("eu")
            .group_by(["customer_id"])
            .having("amount")
            .sum()
            .gt(1000);
    });
    let compiled = select(&stmt, Dialect::Postgres);
    assert_eq!(
        compiled.sql,
        "SELECT * FROM orders WHERE region = $1 GROUP BY customer_id HAVING SUM(amount) > $2"
    );
    assert_eq!(
        compiled.params,
        vec![Value::String("eu".to_string()), Value::Int(1000)]
    );
}

#[test]
fn test_having_on_expressions() {
    let stmt = statement(|q| {
        q.from("orders")
            .columns(["status"])
            .filter("region")
            .is("eu")
            .group_by(["status"])
            .having_expr(|e| {
                e.ucase("status");
            })
            .is("OPEN")
            .or_having_expr(|e| {
                e.column("price").op("*").column("qty");
            })
            .gt(100);
    });

    let compiled = select(&stmt, Dialect::MySQL);
    assert_eq!(
        compiled.sql,
        "SELECT status FROM orders WHERE region = ? GROUP BY status \
         HAVING UCASE(status) = ? OR price * qty > ?"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::String("eu".to_string()),
            Value::String("OPEN".to_string()),
            Value::Int(100),
        ]
    );

    let compiled = select(&stmt, Dialect::Postgres);
    assert_eq!(
        compiled.sql,
        "SELECT status FROM orders WHERE region = $1 GROUP BY status \
         HAVING UPPER(status) = $2 OR price * qty > $3"
    );
}

#[test]
fn test_count_distinct_columns() {
    let stmt = statement(|q| {
        q.from("visits").column_expr(|e| {
            e.count(["user_id", "page"], false);
        });
    });
    assert_eq!(
        select(&stmt, Dialect::MySQL).sql,
        "SELECT COUNT(DISTINCT user_id, page) FROM visits"
    );
    assert_eq!(
        select(&stmt, Dialect::Postgres).sql,
        "SELECT COUNT(DISTINCT (user_id, page)) FROM visits"
    );
    for dialect in [Dialect::SQLite, Dialect::SqlServer] {
        assert!(matches!(
            compile_select(&stmt, dialect),
            Err(QailError::Unsupported { .. })
        ));
    }
}

#[test]
fn test_count_star_with_alias() {
    let mut stmt = statement(|q| {
        q.from("users");
    });
    stmt.columns.push(
        SelectColumn::expr(|e| {
            e.count(Vec::<String>::new(), false);
        })
        .alias("total"),
    );
    assert_eq!(
        select(&stmt, Dialect::MySQL).sql,
        "SELECT COUNT(*) AS total FROM users"
    );
}

#[test]
fn test_joins() {
    let stmt = statement(|q| {
        q.from("users")
            .columns(["users.name", "orders.total"])
            .left_join("orders", |j| {
                j.on("users.id", "orders.user_id").on_group(|g| {
                    g.on("orders.shop", "users.shop").or_on("orders.shop", "users.home_shop");
                });
            })
            .cross_join("regions");
    });
    assert_eq!(
        select(&stmt, Dialect::MySQL).sql,
        "SELECT users.name, orders.total FROM users \
         LEFT JOIN orders ON users.id = orders.user_id \
         AND (orders.shop = users.shop OR orders.shop = users.home_shop) \
         CROSS JOIN regions"
    );
}

#[test]
fn test_select_without_table() {
    let stmt = SqlStatement::new();
    assert!(matches!(
        compile_select(&stmt, Dialect::MySQL),
        Err(QailError::InvalidArgument(_))
    ));
}

#[test]
fn test_insert_multi_row() {
    let stmt = InsertStatement {
        table: "users".to_string(),
        columns: vec!["name".to_string(), "age".to_string()],
        rows: vec![
            vec!["Ada".into(), 36.into()],
            vec!["Linus".into(), 54.into()],
        ],
    };
    let compiled = compile_insert(&stmt, Dialect::Postgres).unwrap();
    assert_eq!(
        compiled.sql,
        "INSERT INTO users (name, age) VALUES ($1, $2), ($3, $4)"
    );
    assert_eq!(compiled.params.len(), 4);
}

#[test]
fn test_insert_rejects_ragged_rows() {
    let stmt = InsertStatement {
        table: "users".to_string(),
        columns: vec!["name".to_string(), "age".to_string()],
        rows: vec![vec!["Ada".into()]],
    };
    assert!(matches!(
        compile_insert(&stmt, Dialect::MySQL),
        Err(QailError::InvalidArgument(_))
    ));
}

#[test]
fn test_update_increment_expression() {
    let mut statement = SqlStatement::from_tables(["pages"]);
    statement
        .wheres
        .push_condition(Combinator::And, Condition {
            operand: Operand::Column("id".to_string()),
            operator: Operator::Eq,
            value: ConditionValue::Value(Value::Int(9)),
        });
    let stmt = UpdateStatement {
        statement,
        assignments: vec![(
            "visits".to_string(),
            ColumnValue::expr(|e| {
                e.column("visits").op("+").value(1);
            }),
        )],
    };
    let compiled = compile_update(&stmt, Dialect::SqlServer).unwrap();
    assert_eq!(
        compiled.sql,
        "UPDATE pages SET visits = visits + @p1 WHERE id = @p2"
    );
    assert_eq!(compiled.params, vec![Value::Int(1), Value::Int(9)]);
}

#[test]
fn test_update_requires_assignments() {
    let stmt = UpdateStatement {
        statement: SqlStatement::from_tables(["pages"]),
        assignments: Vec::new(),
    };
    assert!(matches!(
        compile_update(&stmt, Dialect::MySQL),
        Err(QailError::InvalidArgument(_))
    ));
}

#[test]
fn test_delete_simple() {
    let stmt = DeleteStatement {
        statement: statement(|q| {
            q.from("sessions").filter("expired").is(true);
        }),
        targets: Vec::new(),
    };
    let compiled = compile_delete(&stmt, Dialect::Postgres).unwrap();
    assert_eq!(compiled.sql, "DELETE FROM sessions WHERE expired = $1");
}

#[test]
fn test_statement_json_round_trip_compiles() {
    let json = r#"{
        "kind": "drop_table",
        "table": "sessions"
    }"#;
    let stmt: Statement = serde_json::from_str(json).unwrap();
    let compiled = stmt.compile(Dialect::MySQL).unwrap();
    assert_eq!(compiled, vec![CompiledQuery::new("DROP TABLE sessions")]);
}
